//! Terminal front-end of the control.
//!
//! [`Tui`] owns the terminal and turns crossterm input into [`Event`]s,
//! [`App`] maps those events onto the controller session, and
//! [`SelectWidget`] draws the resulting view.

use std::num::ParseIntError;

pub use app::App;
pub use backend::Tui;
pub use event::Event;
use thiserror::Error;
pub use widget::{ControlLayout, SelectWidget};

mod app;
mod backend;
/// Terminal events and key bindings
pub mod event;
/// Control drawing and layout
pub mod widget;

/// Represents a size value, either as a percentage or fixed value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    /// Size as a percentage (0-100)
    Percent(u16),
    /// Fixed size in terminal cells
    Fixed(u16),
}

/// Error type for parsing size values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SizeParseError {
    /// Error parsing the size string
    #[error("Error parsing {0}: {1:?}")]
    ParseError(String, ParseIntError),
    /// Percentage value exceeds 100
    #[error("Invalid percentage {0}")]
    InvalidPercent(u16),
}

impl TryFrom<&str> for Size {
    type Error = SizeParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parse = |digits: &str| {
            digits
                .parse::<u16>()
                .map_err(|e| SizeParseError::ParseError(value.to_string(), e))
        };
        match value.strip_suffix('%') {
            Some(digits) => match parse(digits)? {
                percent if percent > 100 => Err(SizeParseError::InvalidPercent(percent)),
                percent => Ok(Self::Percent(percent)),
            },
            None => parse(value).map(Self::Fixed),
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Percent(100)
    }
}

impl Size {
    /// Number of terminal lines for a terminal of `total` lines, `None` meaning all of it
    pub fn lines(self, total: u16) -> Option<u16> {
        match self {
            Size::Percent(100) => None,
            Size::Fixed(lines) => Some(lines.min(total)),
            Size::Percent(p) => Some(u16::try_from(u32::from(total) * u32::from(p) / 100).unwrap_or(total)),
        }
    }
}

#[cfg(test)]
mod size_test {
    use super::*;
    use std::num::IntErrorKind;

    #[test]
    fn parses_heights() {
        assert_eq!(Size::try_from("12"), Ok(Size::Fixed(12)));
        assert_eq!(Size::try_from("40%"), Ok(Size::Percent(40)));
        assert_eq!(Size::try_from("110%"), Err(SizeParseError::InvalidPercent(110)));
    }

    #[test]
    fn rejects_garbage() {
        for (input, kind) in [("-3", IntErrorKind::InvalidDigit), ("4-0%", IntErrorKind::InvalidDigit), ("%", IntErrorKind::Empty)] {
            let Err(SizeParseError::ParseError(value, err)) = Size::try_from(input) else {
                panic!("{input} should not parse");
            };
            assert_eq!(value, input);
            assert_eq!(err.kind(), &kind);
        }
    }

    #[test]
    fn lines_of_terminal() {
        assert_eq!(Size::Percent(100).lines(50), None);
        assert_eq!(Size::Percent(40).lines(50), Some(20));
        assert_eq!(Size::Fixed(80).lines(50), Some(50));
    }
}
