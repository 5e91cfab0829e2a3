use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::viewport::ViewportState;

const TAB_WIDTH: usize = 4;

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if !state.has_overflow() || state.content_h == 0 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_y = state.max_y().max(1) as f64;
    let thumb_top = ((state.y as f64 / max_y) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Writes cells left to right starting at `(x, y)`, never past `max_cols` columns.
struct CellWriter<'a> {
    buf: &'a mut Buffer,
    x: u16,
    y: u16,
    max_cols: usize,
    cols: usize,
}

impl<'a> CellWriter<'a> {
    fn new(buf: &'a mut Buffer, x: u16, y: u16, max_cols: u16) -> Self {
        Self {
            buf,
            x,
            y,
            max_cols: max_cols as usize,
            cols: 0,
        }
    }

    /// Returns `false` once the line is full.
    fn push(&mut self, ch: char, style: Style) -> bool {
        if ch == '\t' {
            for _ in 0..TAB_WIDTH {
                if !self.push(' ', style) {
                    return false;
                }
            }
            return true;
        }
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            return true;
        }
        if self.cols + w > self.max_cols {
            return false;
        }
        let mut tmp = [0u8; 4];
        let dx = self.cols as u16;
        if let Some(cell) = self.buf.cell_mut((self.x + dx, self.y)) {
            cell.set_style(style);
            cell.set_symbol(ch.encode_utf8(&mut tmp));
        }
        if w == 2 {
            if let Some(cell) = self.buf.cell_mut((self.x + dx + 1, self.y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        self.cols += w;
        true
    }
}

pub fn render_str_clipped(x: u16, y: u16, max_cols: u16, buf: &mut Buffer, input: &str, style: Style) {
    if max_cols == 0 {
        return;
    }
    let mut w = CellWriter::new(buf, x, y, max_cols);
    for ch in input.chars() {
        if !w.push(ch, style) {
            return;
        }
    }
}

pub fn render_spans_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback_style: Style,
) {
    if max_cols == 0 {
        return;
    }
    let mut w = CellWriter::new(buf, x, y, max_cols);
    for span in spans {
        let style = fallback_style.patch(span.style);
        for ch in span.content.chars() {
            if !w.push(ch, style) {
                return;
            }
        }
    }
}

/// Renders `input` horizontally centered within `area`'s first row.
pub fn render_str_centered(area: Rect, buf: &mut Buffer, input: &str, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let text = truncate_with_ellipsis(input, area.width as usize);
    let cols = UnicodeWidthStr::width(text.as_str()) as u16;
    let x = area.x + area.width.saturating_sub(cols) / 2;
    render_str_clipped(x, area.y, area.width, buf, &text, style);
}

/// Shortens `input` to at most `max_cols` columns, ending in `…` when something was cut.
pub fn truncate_with_ellipsis(input: &str, max_cols: usize) -> String {
    if UnicodeWidthStr::width(input) <= max_cols {
        return input.to_string();
    }
    if max_cols == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut cols = 0usize;
    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w + 1 > max_cols {
            break;
        }
        out.push(ch);
        cols += w;
    }
    out.push('…');
    out
}

/// Draws a single-line box border around `area` using light box-drawing characters.
pub fn render_frame(area: Rect, buf: &mut Buffer, style: Style) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;
    for x in area.x..=right {
        let (top_ch, bottom_ch) = match x {
            _ if x == area.x => ("┌", "└"),
            _ if x == right => ("┐", "┘"),
            _ => ("─", "─"),
        };
        buf.set_stringn(x, area.y, top_ch, 1, style);
        buf.set_stringn(x, bottom, bottom_ch, 1, style);
    }
    for y in area.y + 1..bottom {
        buf.set_stringn(area.x, y, "│", 1, style);
        buf.set_stringn(right, y, "│", 1, style);
    }
}

/// Blanks every cell of `area` and applies `style`.
pub fn clear_area(area: Rect, buf: &mut Buffer, style: Style) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn render_spans_clipped_expands_tabs() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        let spans = vec![Span::raw("\t1")];
        render_spans_clipped(0, 0, 6, &mut buf, &spans, Style::default());
        assert!(row(&buf, 0).starts_with("    1"));
    }

    #[test]
    fn wide_chars_are_not_split_at_the_edge() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        render_str_clipped(0, 0, 3, &mut buf, "你好", Style::default());
        assert_eq!(row(&buf, 0), "你 ");
    }

    #[test]
    fn truncation_appends_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 4), "abc…");
        assert_eq!(truncate_with_ellipsis("abc", 4), "abc");
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }

    #[test]
    fn centered_text_is_padded_on_both_sides() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 7, 1));
        render_str_centered(Rect::new(0, 0, 7, 1), &mut buf, "abc", Style::default());
        assert_eq!(row(&buf, 0), "  abc  ");
    }

    #[test]
    fn frame_draws_corners() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 3));
        render_frame(Rect::new(0, 0, 4, 3), &mut buf, Style::default());
        assert_eq!(row(&buf, 0), "┌──┐");
        assert_eq!(row(&buf, 1), "│  │");
        assert_eq!(row(&buf, 2), "└──┘");
    }

    #[test]
    fn render_scrollbar_does_not_panic() {
        let mut state = ViewportState::default();
        state.set_viewport(10, 5);
        state.set_content(50);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 5));
        render_scrollbar(Rect::new(0, 0, 1, 5), &mut buf, &state, Style::default());
    }
}
