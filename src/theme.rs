//! Handle the color theme
//!
//! Styling is a process-wide resource: the first call to [`register_theme`]
//! installs the theme for every control drawn afterwards, later calls are
//! ignored.
use std::sync::{LazyLock, OnceLock};

use ratatui::style::{Color, Modifier, Style};

use crate::options::SelectOptions;

/// Theme defaults to Dark256
pub static DEFAULT_THEME: LazyLock<ColorTheme> = LazyLock::new(ColorTheme::dark256);

static REGISTERED_THEME: OnceLock<ColorTheme> = OnceLock::new();

/// The color scheme of the control
///
/// <pre>
/// +------------------------+
/// | [Ada ×] [Bob ×]        |  --> pill & remove
/// |> query                 |  --> prompt & query (placeholder when empty)
/// |> [x] highlighted line  |  --> cursor & highlighted & checkbox
/// |  [ ] normal line       |  --> normal, selected lines use `selected`
/// |  Loading...            |  --> loading
/// +------------------------+
/// </pre>
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ColorTheme {
    /// Non-selected lines and general text
    pub normal: Style,
    /// Highlighted line
    pub highlighted: Style,
    /// Selected lines
    pub selected: Style,
    /// Checkbox marks
    pub checkbox: Style,
    /// Link content
    pub link: Style,
    /// Search text
    pub query: Style,
    /// Placeholder of the empty search input
    pub placeholder: Style,
    /// Prompt prefix
    pub prompt: Style,
    /// Cursor (prefix of the highlighted line)
    pub cursor: Style,
    /// Selection pills
    pub pill: Style,
    /// Remove affordance of the pills
    pub remove: Style,
    /// Loading indicator
    pub loading: Style,
}

impl ColorTheme {
    /// Setup the theme from the options
    pub fn init_from_options(options: &SelectOptions) -> ColorTheme {
        if options.no_color {
            return ColorTheme::none();
        }
        match std::env::var_os("NO_COLOR") {
            Some(no_color) if !no_color.is_empty() => ColorTheme::none(),
            _ => ColorTheme::dark256(),
        }
    }

    /// Monochrome theme relying on text attributes only
    pub fn none() -> Self {
        Self {
            highlighted: Style::default().add_modifier(Modifier::REVERSED),
            selected: Style::default().add_modifier(Modifier::BOLD),
            link: Style::default().add_modifier(Modifier::UNDERLINED),
            placeholder: Style::default().add_modifier(Modifier::DIM),
            loading: Style::default().add_modifier(Modifier::DIM),
            ..ColorTheme::default()
        }
    }

    /// 256 colors theme for dark terminals
    pub fn dark256() -> Self {
        Self {
            normal: Style::default(),
            highlighted: Style::default().fg(Color::Indexed(254)).bg(Color::Indexed(236)),
            selected: Style::default().fg(Color::Indexed(168)),
            checkbox: Style::default().fg(Color::Indexed(110)),
            link: Style::default()
                .fg(Color::Indexed(109))
                .add_modifier(Modifier::UNDERLINED),
            query: Style::default().fg(Color::Indexed(254)),
            placeholder: Style::default().fg(Color::Indexed(244)),
            prompt: Style::default().fg(Color::Indexed(110)),
            cursor: Style::default().fg(Color::Indexed(161)).bg(Color::Indexed(236)),
            pill: Style::default().fg(Color::Indexed(254)).bg(Color::Indexed(238)),
            remove: Style::default().fg(Color::Indexed(174)).bg(Color::Indexed(238)),
            loading: Style::default().fg(Color::Indexed(144)),
        }
    }
}

/// Installs `theme` process-wide.
///
/// Returns `false` when a theme was already registered, in which case the
/// existing one is kept.
pub fn register_theme(theme: ColorTheme) -> bool {
    let mut installed = false;
    REGISTERED_THEME.get_or_init(|| {
        installed = true;
        theme
    });
    if !installed {
        debug!("theme already registered, ignoring");
    }
    installed
}

/// The registered theme, or [`DEFAULT_THEME`] when none was registered
pub fn current_theme() -> ColorTheme {
    REGISTERED_THEME.get().copied().unwrap_or(*DEFAULT_THEME)
}
