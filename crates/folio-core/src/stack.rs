//! Vertical page composition: sections stacked top to bottom inside one scrolling viewport.
use crate::render;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;

/// A block of a vertically scrolling page.
pub trait Section {
    /// Height in rows when laid out `width` columns wide.
    fn height(&mut self, width: u16, theme: &Theme) -> u32;

    /// Renders section rows `skip..skip + area.height` into `area`.
    fn render_rows(&mut self, area: Rect, buf: &mut Buffer, skip: u32, theme: &Theme);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionSlot {
    pub top: u32,
    pub height: u32,
}

/// Where each section sits in page coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLayout {
    slots: Vec<SectionSlot>,
    total: u32,
}

impl PageLayout {
    pub fn from_heights(heights: impl IntoIterator<Item = u32>) -> Self {
        let mut slots = Vec::new();
        let mut top = 0u32;
        for height in heights {
            slots.push(SectionSlot { top, height });
            top = top.saturating_add(height);
        }
        Self { slots, total: top }
    }

    pub fn total_height(&self) -> u32 {
        self.total
    }

    pub fn slot(&self, index: usize) -> Option<SectionSlot> {
        self.slots.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Screen rect and skipped rows of section `index` when the page is scrolled to `scroll_y`.
    pub fn visible(&self, index: usize, area: Rect, scroll_y: u32) -> Option<(Rect, u32)> {
        let slot = self.slot(index)?;
        let view_top = scroll_y;
        let view_bottom = scroll_y.saturating_add(area.height as u32);
        let top = slot.top.max(view_top);
        let bottom = slot.top.saturating_add(slot.height).min(view_bottom);
        if top >= bottom {
            return None;
        }
        let rect = Rect::new(
            area.x,
            area.y + (top - view_top) as u16,
            area.width,
            (bottom - top) as u16,
        );
        Some((rect, top - slot.top))
    }

    /// Maps a screen row to `(section index, row within section)`.
    pub fn hit(&self, area: Rect, scroll_y: u32, y: u16) -> Option<(usize, u32)> {
        if y < area.y || y >= area.bottom() {
            return None;
        }
        let page_y = scroll_y + (y - area.y) as u32;
        self.slots
            .iter()
            .position(|s| page_y >= s.top && page_y < s.top + s.height)
            .map(|i| (i, page_y - self.slots[i].top))
    }
}

/// Renders `lines[skip..]` into `area`, one line per row.
pub fn render_lines_from(
    area: Rect,
    buf: &mut Buffer,
    lines: &[Line<'static>],
    skip: u32,
    style: Style,
) {
    for row in 0..area.height {
        let Some(line) = lines.get(skip as usize + row as usize) else {
            break;
        };
        let y = area.y + row;
        let line_style = style.patch(line.style);
        buf.set_style(Rect::new(area.x, y, area.width, 1), line_style);
        render::render_spans_clipped(area.x, y, area.width, buf, &line.spans, line_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_clips_sections_to_the_viewport() {
        let layout = PageLayout::from_heights([5, 10, 3]);
        assert_eq!(layout.total_height(), 18);
        let area = Rect::new(0, 1, 20, 6);

        // Scrolled to row 3: first section shows rows 3..5, second rows 0..4.
        assert_eq!(layout.visible(0, area, 3), Some((Rect::new(0, 1, 20, 2), 3)));
        assert_eq!(layout.visible(1, area, 3), Some((Rect::new(0, 3, 20, 4), 0)));
        assert_eq!(layout.visible(2, area, 3), None);
    }

    #[test]
    fn hit_maps_screen_rows_to_section_rows() {
        let layout = PageLayout::from_heights([5, 10]);
        let area = Rect::new(0, 1, 20, 6);
        assert_eq!(layout.hit(area, 3, 1), Some((0, 3)));
        assert_eq!(layout.hit(area, 3, 3), Some((1, 0)));
        assert_eq!(layout.hit(area, 3, 0), None);
    }

    #[test]
    fn render_lines_from_skips_rows() {
        let lines: Vec<Line<'static>> = vec!["a".into(), "b".into(), "c".into()];
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 2));
        render_lines_from(Rect::new(0, 0, 2, 2), &mut buf, &lines, 1, Style::default());
        assert_eq!(buf.cell((0, 0)).unwrap().symbol(), "b");
        assert_eq!(buf.cell((0, 1)).unwrap().symbol(), "c");
    }
}
