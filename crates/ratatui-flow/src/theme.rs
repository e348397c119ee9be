use ratatui::style::Style;

/// Base styles shared by the widgets. Per-widget options override them when set.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub tab_active: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            tab_active: Style::default().cyan().reversed(),
        }
    }
}
