use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Sage green used for the current-post ring, progress bar and scroll cue.
pub const SAGE: Color = Color::Rgb(0xab, 0xcc, 0xa3);
/// Muted rose used for the photo dump badge.
pub const ROSE: Color = Color::Rgb(0xde, 0xa4, 0xaf);
/// Dark moss used for text on sage buttons.
pub const MOSS: Color = Color::Rgb(0x2d, 0x50, 0x16);

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub title: Style,
    pub tagline: Style,
    pub accent: Style,
    pub badge_dump: Style,
    pub badge_current: Style,
    pub code_inline: Style,
    pub code_block: Style,
    pub link: Style,
    pub heading: Style,
    pub quote: Style,
    pub backdrop: Style,
    pub panel: Style,
    pub border: Style,
    pub button: Style,
    pub button_focused: Style,
    pub progress_track: Style,
    pub progress_fill: Style,
    pub placeholder: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            title: Style::default().add_modifier(Modifier::BOLD),
            tagline: Style::default().gray().add_modifier(Modifier::ITALIC),
            accent: Style::default().fg(SAGE),
            badge_dump: Style::default().fg(ROSE).add_modifier(Modifier::BOLD),
            badge_current: Style::default().fg(Color::White).bg(SAGE),
            code_inline: Style::default().cyan(),
            code_block: Style::default().cyan(),
            link: Style::default().blue().add_modifier(Modifier::UNDERLINED),
            heading: Style::default().add_modifier(Modifier::BOLD),
            quote: Style::default().gray().add_modifier(Modifier::ITALIC),
            backdrop: Style::default().add_modifier(Modifier::DIM),
            panel: Style::default(),
            border: Style::default().dark_gray(),
            button: Style::default().fg(MOSS).bg(Color::Rgb(0xd4, 0xe6, 0xd1)),
            button_focused: Style::default()
                .fg(MOSS)
                .bg(Color::Rgb(0xc4, 0xd6, 0xc1))
                .add_modifier(Modifier::BOLD),
            progress_track: Style::default().bg(Color::Rgb(0xf3, 0xf4, 0xf6)),
            progress_fill: Style::default().bg(SAGE),
            placeholder: Style::default().gray(),
        }
    }
}
