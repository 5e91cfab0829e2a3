//! Framed stand-ins for images, which the terminal cannot draw.
use folio_core::render::truncate_with_ellipsis;
use folio_core::stack;
use folio_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

pub(crate) const IMAGE_GLYPH: &str = "▣";

/// Last path segment of an image URL, without query or fragment.
pub(crate) fn file_name(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = url[..end].trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}

/// A `width` x `height` box with `label` and `detail` centered inside.
pub(crate) fn image_lines(
    width: u16,
    height: u16,
    label: &str,
    detail: &str,
    border: Style,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let w = width as usize;
    if width < 4 || height < 3 {
        let text = truncate_with_ellipsis(&format!("{IMAGE_GLYPH} {label}"), w);
        return (0..height)
            .map(|row| {
                if row == 0 {
                    Line::from(Span::styled(text.clone(), theme.text_muted))
                } else {
                    Line::default()
                }
            })
            .collect();
    }

    let inner = w - 2;
    let rows = height as usize - 2;
    let content: Vec<(String, Style)> = [
        (format!("{IMAGE_GLYPH} {label}"), theme.text_primary),
        (detail.to_string(), theme.text_muted),
    ]
    .into_iter()
    .filter(|(text, _)| !text.trim().is_empty())
    .take(rows)
    .collect();
    let first = (rows - content.len()) / 2;

    let mut lines = Vec::with_capacity(height as usize);
    lines.push(Line::from(Span::styled(
        format!("┌{}┐", "─".repeat(inner)),
        border,
    )));
    for row in 0..rows {
        let text = row
            .checked_sub(first)
            .and_then(|i| content.get(i))
            .map(|(text, style)| (truncate_with_ellipsis(text, inner), *style));
        let mut spans = vec![Span::styled("│", border)];
        match text {
            Some((text, style)) => {
                let cols = UnicodeWidthStr::width(text.as_str());
                let left = (inner - cols) / 2;
                spans.push(Span::raw(" ".repeat(left)));
                spans.push(Span::styled(text, style));
                spans.push(Span::raw(" ".repeat(inner - cols - left)));
            }
            None => spans.push(Span::raw(" ".repeat(inner))),
        }
        spans.push(Span::styled("│", border));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        format!("└{}┘", "─".repeat(inner)),
        border,
    )));
    lines
}

pub(crate) fn render_image(
    area: Rect,
    buf: &mut Buffer,
    label: &str,
    detail: &str,
    border: Style,
    theme: &Theme,
) {
    let lines = image_lines(area.width, area.height, label, detail, border, theme);
    stack::render_lines_from(area, buf, &lines, 0, theme.text_primary);
}
