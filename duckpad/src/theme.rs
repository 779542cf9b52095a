//! Color themes for duckpad.
//!
//! - `dark`: ANSI 16 colors, safe on any terminal.
//! - `catppuccin-mocha`: RGB palette, needs truecolor.

use ratatui::style::Color;

/// Every color the UI draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Editor
    pub editor_text: Color,
    pub editor_heading: Color,
    /// Hint text shown in an empty document or empty panel.
    pub placeholder: Color,

    // Side panel
    pub comment_text: Color,
    /// Timestamp line under each comment.
    pub comment_meta: Color,
    pub prompt_text: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
    pub status_mode_prompt: Color,
    /// "analyzing" indicator while a request is in flight.
    pub status_busy: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            editor_text: Color::Reset,
            editor_heading: Color::Yellow,
            placeholder: Color::DarkGray,

            comment_text: Color::White,
            comment_meta: Color::DarkGray,
            prompt_text: Color::Gray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
            status_mode_prompt: Color::Magenta,
            status_busy: Color::Yellow,
        }
    }

    /// Catppuccin Mocha, <https://github.com/catppuccin/catppuccin>.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let mauve = Color::Rgb(203, 166, 247);    // #cba6f7
        let peach = Color::Rgb(250, 179, 135);    // #fab387
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            editor_text: text,
            editor_heading: peach,
            placeholder: overlay1,

            comment_text: text,
            comment_meta: overlay1,
            prompt_text: subtext0,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
            status_mode_prompt: mauve,
            status_busy: yellow,
        }
    }

    /// Resolves a config name; unknown names fall back to `dark` with a warning.
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
}
