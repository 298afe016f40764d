use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
pub struct Theme {
    pub background: Color,
    pub headline: Color,
    pub button_fg: Color,
    pub button_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub checkmark: Color,
    pub highlight_bg: Color,
    pub spinner: Color,
}

impl Theme {
    /// White on blue, like the payment screen it imitates.
    pub fn classic() -> Self {
        Self {
            background: Color::Blue,
            headline: Color::White,
            button_fg: Color::Blue,
            button_bg: Color::White,
            border: Color::Gray,
            text: Color::White,
            dim: Color::DarkGray,
            checkmark: Color::Rgb(0, 200, 80),
            highlight_bg: Color::Rgb(30, 60, 120),
            spinner: Color::Cyan,
        }
    }

    /// Low-glare variant on the terminal's own background.
    pub fn night() -> Self {
        Self {
            background: Color::Reset,
            headline: Color::Rgb(120, 180, 255),
            button_fg: Color::Black,
            button_bg: Color::Rgb(120, 180, 255),
            border: Color::DarkGray,
            text: Color::Gray,
            dim: Color::DarkGray,
            checkmark: Color::Green,
            highlight_bg: Color::Rgb(40, 40, 60),
            spinner: Color::Rgb(120, 180, 255),
        }
    }

    /// Resolve a theme name, falling back to classic.
    pub fn from_name(name: &str) -> Self {
        match name {
            "night" => Self::night(),
            _ => Self::classic(),
        }
    }

    pub fn button(&self) -> Style {
        Style::default()
            .fg(self.button_fg)
            .bg(self.button_bg)
            .add_modifier(Modifier::BOLD)
    }
}
