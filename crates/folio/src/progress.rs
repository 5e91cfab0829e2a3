//! Reading progress bar pinned to the top of a post.
use folio_core::theme::Theme;
use folio_core::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

const FILL: &str = "━";
const TRACK: &str = "─";

/// A one-row bar whose filled part tracks how far the page has been scrolled.
///
/// It holds no state of its own: the fill is recomputed from the page viewport on every render.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadingProgress;

impl ReadingProgress {
    pub fn percent(state: &ViewportState) -> f64 {
        state.progress_percent()
    }

    /// Filled columns out of `width`.
    pub fn filled_cols(state: &ViewportState, width: u16) -> u16 {
        let cols = (width as f64 * Self::percent(state) / 100.0).round() as u16;
        cols.min(width)
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer, state: &ViewportState, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let filled = Self::filled_cols(state, area.width);
        for dx in 0..area.width {
            let (symbol, style) = if dx < filled {
                (FILL, theme.progress_fill)
            } else {
                (TRACK, theme.progress_track)
            };
            if let Some(cell) = buf.cell_mut((area.x + dx, area.y)) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(y: u32, viewport_h: u16, content_h: u32) -> ViewportState {
        let mut state = ViewportState::default();
        state.set_viewport(40, viewport_h);
        state.set_content(content_h);
        state.scroll_to(y);
        state
    }

    #[test]
    fn fill_follows_scroll_offset() {
        assert_eq!(ReadingProgress::filled_cols(&state(0, 10, 110), 40), 0);
        assert_eq!(ReadingProgress::filled_cols(&state(50, 10, 110), 40), 20);
        assert_eq!(ReadingProgress::filled_cols(&state(100, 10, 110), 40), 40);
    }

    #[test]
    fn content_that_fits_shows_no_progress() {
        let fits = state(0, 10, 8);
        assert_eq!(ReadingProgress::percent(&fits), 0.0);
        assert_eq!(ReadingProgress::filled_cols(&fits, 40), 0);
    }

    #[test]
    fn renders_one_row() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        ReadingProgress.render_ref(area, &mut buf, &state(50, 10, 110), &Theme::default());
        let row: String = (0..10)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(row, "━━━━━─────");
        assert_eq!(buf.cell((0, 1)).unwrap().symbol(), " ");
    }
}
