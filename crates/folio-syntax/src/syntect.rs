use crate::language;
use folio_core::text::CodeHighlighter;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::FontStyle;
use syntect::highlighting::Style as SynStyle;
use syntect::highlighting::Theme;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;

/// Dark theme closest to the blog's code block palette among syntect's bundled themes.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

pub struct SyntectHighlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Uses the bundled theme called `name`, or [`DEFAULT_THEME`] if there is no such theme.
    pub fn with_theme(name: &str) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let theme = match theme_set.themes.remove(name) {
            Some(theme) => theme,
            None => {
                tracing::warn!(theme = name, fallback = DEFAULT_THEME, "unknown syntax theme");
                theme_set
                    .themes
                    .remove(DEFAULT_THEME)
                    .or_else(|| theme_set.themes.into_values().next())
                    .unwrap_or_default()
            }
        };
        Self { syntax_set, theme }
    }

    /// Names of the bundled themes, sorted.
    pub fn theme_names() -> Vec<String> {
        let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
        names.sort();
        names
    }

    fn syntax_for(&self, tag: Option<&str>) -> &SyntaxReference {
        let Some(tag) = tag else {
            return self.syntax_set.find_syntax_plain_text();
        };
        let token = language::canonical_token(tag);
        self.syntax_set
            .find_syntax_by_extension(&token)
            .or_else(|| self.syntax_set.find_syntax_by_token(&token))
            .or_else(|| self.syntax_set.find_syntax_by_token(tag))
            .unwrap_or_else(|| {
                tracing::debug!(language = tag, "no syntax for fence tag, using plain text");
                self.syntax_set.find_syntax_plain_text()
            })
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight_lines(&self, language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>> {
        let syntax = self.syntax_for(language);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);

        lines
            .iter()
            .map(|line| {
                // The newline-aware syntax set expects each line to end in '\n'.
                let with_nl = format!("{line}\n");
                let regions = highlighter
                    .highlight_line(&with_nl, &self.syntax_set)
                    .unwrap_or_default();
                let mut spans: Vec<Span<'static>> = regions
                    .into_iter()
                    .filter_map(|(style, s)| {
                        let s = s.trim_end_matches('\n');
                        (!s.is_empty()).then(|| Span::styled(s.to_string(), syn_style(style)))
                    })
                    .collect();
                if spans.is_empty() {
                    spans.push(Span::raw((*line).to_string()));
                }
                spans
            })
            .collect()
    }

    fn background_color(&self) -> Option<Color> {
        self.theme
            .settings
            .background
            .map(|c| Color::Rgb(c.r, c.g, c.b))
    }
}

fn syn_style(s: SynStyle) -> Style {
    let mut out = Style::default().fg(Color::Rgb(s.foreground.r, s.foreground.g, s.foreground.b));
    let modifiers = [
        (FontStyle::BOLD, Modifier::BOLD),
        (FontStyle::ITALIC, Modifier::ITALIC),
        (FontStyle::UNDERLINE, Modifier::UNDERLINED),
    ];
    for (font, modifier) in modifiers {
        if s.font_style.contains(font) {
            out = out.add_modifier(modifier);
        }
    }
    out
}
