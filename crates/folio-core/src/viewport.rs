use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;

/// Distance from the maximum scroll offset (in layout units) still treated as "at the bottom".
///
/// Fractional offsets come from hosts that scroll in sub-cell units; anything closer than one
/// unit to the end is rounding noise.
pub const AT_BOTTOM_TOLERANCE: f64 = 1.0;

/// Vertical scroll state of a pane: offset, visible height and content height.
///
/// Everything the UI shows about scrolling (reading progress, scroll cue, scrollbar thumb) is
/// derived from these three numbers on demand and never cached separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportState {
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        self.viewport_w = w;
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, h: u32) {
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    pub fn scroll_to(&mut self, y: u32) {
        self.y = y.min(self.max_y());
    }

    pub fn page_down(&mut self) {
        self.scroll_y_by(self.viewport_h.saturating_sub(1) as i32);
    }

    pub fn page_up(&mut self) {
        self.scroll_y_by(-(self.viewport_h.saturating_sub(1) as i32));
    }

    pub fn to_top(&mut self) {
        self.y = 0;
    }

    pub fn to_bottom(&mut self) {
        self.y = self.max_y();
    }

    pub fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }

    /// Returns `true` if the content is taller than the visible area.
    pub fn has_overflow(&self) -> bool {
        self.content_h > self.viewport_h as u32
    }

    /// Reading progress in percent: 0 at the top, 100 at the bottom.
    ///
    /// Content that fits the viewport has nothing to read past and reports 0.
    pub fn progress_percent(&self) -> f64 {
        let max = self.max_y();
        if max == 0 {
            return 0.0;
        }
        (self.y as f64 / max as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Returns `true` if a "more content below" cue should be shown for this pane.
    pub fn show_scroll_cue(&self) -> bool {
        scroll_cue_visible(
            self.y as f64,
            self.viewport_h as f64,
            self.content_h as f64,
        )
    }
}

/// Scroll cue rule in host layout units.
///
/// The cue is visible when the content overflows the visible height and the offset is more than
/// [`AT_BOTTOM_TOLERANCE`] away from the maximum offset.
pub fn scroll_cue_visible(offset: f64, visible: f64, total: f64) -> bool {
    if total <= visible {
        return false;
    }
    let max_offset = total - visible;
    max_offset - offset >= AT_BOTTOM_TOLERANCE
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportOptions {
    pub style: Style,
    pub show_scrollbar: bool,
    pub scrollbar_style: Style,
}

/// Renders the visible slice of `lines` for `state`, with an optional one-column scrollbar.
pub fn render_text_lines(
    area: Rect,
    buf: &mut Buffer,
    lines: &[Line<'static>],
    state: &ViewportState,
    options: &ViewportOptions,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let (text_area, scrollbar_x) = if options.show_scrollbar && area.width >= 2 {
        (
            Rect::new(area.x, area.y, area.width - 1, area.height),
            Some(area.x + area.width - 1),
        )
    } else {
        (area, None)
    };

    for row in 0..text_area.height {
        let y = row + text_area.y;
        let idx = (state.y as usize).saturating_add(row as usize);
        buf.set_style(Rect::new(text_area.x, y, text_area.width, 1), options.style);
        if let Some(line) = lines.get(idx) {
            let style = options.style.patch(line.style);
            render::render_spans_clipped(
                text_area.x,
                y,
                text_area.width,
                buf,
                &line.spans,
                style,
            );
        }
    }

    if let Some(sb_x) = scrollbar_x {
        render::render_scrollbar(
            Rect::new(sb_x, area.y, 1, area.height),
            buf,
            state,
            options.scrollbar_style,
        );
    }
}
