//! Color theme system for mdnote.
//!
//! A `Theme` holds named `ratatui::style::Color` fields for every UI surface
//! the viewer draws. Document text itself is colored by the ANSI styles the
//! renderer emits; the theme only covers chrome around it. Two built-in
//! themes are provided:
//!
//! - `dark`: ANSI 16 colors, works on any terminal.
//! - `catppuccin_mocha`: Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;

use mdnote_core::selection::Severity;

/// All color values used across mdnote's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the focused pane.
    pub border_active: Color,
    /// Border color for unfocused panes.
    pub border_inactive: Color,

    // Document pane
    /// Background of the line under the cursor.
    pub cursor_bg: Color,
    /// Background of selected lines.
    pub selection_bg: Color,

    // Comments pane
    /// Line-range header above each comment (`L3-5`).
    pub comment_range: Color,
    /// Comment body text.
    pub comment_text: Color,
    /// Background of the comment under the list cursor.
    pub comment_focus_bg: Color,
    /// Placeholder text when there are no comments.
    pub muted: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar foreground (general text).
    pub status_bar_fg: Color,
    /// Key names in the hint list.
    pub status_key: Color,
    /// Mode indicator color in NORMAL / SELECT.
    pub status_mode_normal: Color,
    /// Mode indicator color while a comment is being written.
    pub status_mode_insert: Color,
    /// Status message colors by severity.
    pub status_info: Color,
    pub status_warning: Color,
    pub status_error: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            cursor_bg: Color::DarkGray,
            selection_bg: Color::Blue,

            comment_range: Color::Yellow,
            comment_text: Color::Reset,
            comment_focus_bg: Color::DarkGray,
            muted: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_key: Color::Cyan,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_info: Color::Green,
            status_warning: Color::Yellow,
            status_error: Color::Red,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let surface2 = Color::Rgb(88, 91, 112); // #585b70
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            cursor_bg: surface1,
            selection_bg: surface2,

            comment_range: peach,
            comment_text: text,
            comment_focus_bg: surface0,
            muted: overlay1,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_key: lavender,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_info: green,
            status_warning: yellow,
            status_error: red,

            background: base,
        }
    }

    /// Resolves a theme name to a built-in theme.
    ///
    /// Unknown names fall back to `dark()` with a warning, so a typo in config
    /// never prevents startup.
    ///
    /// # Arguments
    ///
    /// * `name` — theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.status_info,
            Severity::Warning => self.status_warning,
            Severity::Error => self.status_error,
        }
    }
}
