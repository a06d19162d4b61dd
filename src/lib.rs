//! betterselect is a searchable select control.
//!
//! It turns a list of options, or a remote lookup endpoint, into a control
//! with a search input, a filtered dropdown, keyboard and pointer
//! navigation, and single or multi-value selection shown as removable pills.
//!
//! The state machine lives in [`controller`] and never performs I/O: it
//! returns [`Effect`]s that the [`runtime`] executes on tokio. The [`tui`]
//! module draws the control in a terminal, and [`BetterSelect`] runs it
//! end to end.
//!
//! # Examples
//!
//! ```no_run
//! use betterselect::prelude::*;
//! use std::io::Cursor;
//!
//! let options = SelectOptionsBuilder::default()
//!     .multi(true)
//!     .height(String::from("50%"))
//!     .build()
//!     .unwrap();
//!
//! let input = "sh\tBourne shell\nbash\tBourne again\nzsh\tZ shell";
//! let source = SelectSource::from_lines("shell", Cursor::new(input)).unwrap();
//!
//! let output = BetterSelect::run_with(options, source).unwrap();
//! println!("{output}");
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub use crate::controller::{ChangeEvent, Controller, ControllerConfig, DropdownState, Effect, Input, Key, Target};
pub use crate::option::{Catalog, SelectOption};
pub use crate::options::SelectOptions;
pub use crate::output::SelectOutput;
pub use crate::select::BetterSelect;
pub use crate::selection::{SelectMode, Selection};
pub use crate::source::SelectSource;

pub mod controller;
pub mod debounce;
pub mod field;
pub mod option;
pub mod options;
mod output;
pub mod prelude;
pub mod query;
pub mod render;
pub mod runtime;
mod select;
pub mod selection;
pub mod source;
pub mod template;
pub mod theme;
#[cfg(feature = "http")]
pub mod transport;
pub mod tui;
