use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Span;

/// Highlights source code for fenced code blocks.
///
/// `language` is the fence tag as written by the author (`rs`, `rust`, `js`, ...). Backends must
/// return exactly one span list per input line, and fall back to plain spans for languages they
/// do not know.
pub trait CodeHighlighter {
    fn highlight_lines(&self, language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>>;

    fn highlight_text(&self, language: Option<&str>, text: &str) -> Vec<Vec<Span<'static>>> {
        let lines: Vec<&str> = text.split('\n').collect();
        self.highlight_lines(language, &lines)
    }

    /// Background for highlighted blocks, if the backend's theme defines one.
    fn background_color(&self) -> Option<Color> {
        None
    }
}

/// Renders every line as a single span in one style.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter {
    pub style: Style,
}

impl CodeHighlighter for PlainHighlighter {
    fn highlight_lines(&self, _language: Option<&str>, lines: &[&str]) -> Vec<Vec<Span<'static>>> {
        lines
            .iter()
            .map(|l| vec![Span::styled((*l).to_string(), self.style)])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_highlighter_keeps_one_span_list_per_line() {
        let h = PlainHighlighter::default();
        let out = h.highlight_text(Some("rs"), "fn a() {}\n\nfn b() {}");
        assert_eq!(out.len(), 3);
        assert_eq!(out[1][0].content, "");
    }
}
