//! Empty-state handling shared by the content renderer and the photo gallery.
use crate::theme::Theme;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

/// Shown instead of a post body that has not been written yet.
pub const EMPTY_STATE_MESSAGE: &str = "I will write this soon 🫡";

/// Rows of padding above and below the empty-state message.
pub const EMPTY_STATE_PADDING: usize = 2;

/// Returns `true` for content that should render the empty state.
pub fn is_blank(content: &str) -> bool {
    content.trim().is_empty()
}

/// The empty state as centered lines for a pane `width` columns wide.
pub fn empty_state_lines(width: u16, theme: &Theme) -> Vec<Line<'static>> {
    let cols = UnicodeWidthStr::width(EMPTY_STATE_MESSAGE);
    let pad = (width as usize).saturating_sub(cols) / 2;
    let mut lines = vec![Line::default(); EMPTY_STATE_PADDING];
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(pad)),
        Span::styled(EMPTY_STATE_MESSAGE, theme.placeholder),
    ]));
    lines.extend(std::iter::repeat_n(Line::default(), EMPTY_STATE_PADDING));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t\r\n "));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn message_is_centered() {
        let lines = empty_state_lines(40, &Theme::default());
        assert_eq!(lines.len(), EMPTY_STATE_PADDING * 2 + 1);
        let msg = &lines[EMPTY_STATE_PADDING];
        let text: String = msg.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.trim_start().starts_with("I will write this soon"));
        assert!(text.starts_with("          "));
    }
}
