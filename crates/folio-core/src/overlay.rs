//! Geometry and drawing helpers for overlays: modals, slide-in panels and backdrops.
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Height of a terminal cell divided by its width. Used to keep images at their aspect ratio.
pub const CELL_ASPECT: f64 = 2.0;

/// A rect of `width_pct`/`height_pct` percent of `area`, centered in it.
pub fn centered_pct(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let w = (area.width as u32 * width_pct.min(100) as u32 / 100) as u16;
    let h = (area.height as u32 * height_pct.min(100) as u32 / 100) as u16;
    centered(area, w, h)
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Position of a panel of `panel_width` sliding in from the right edge of `area`.
///
/// `progress` runs from 0.0 (fully off-screen) to 1.0 (flush with the right edge). The returned
/// rect is clipped to `area`, so it is empty at 0.0.
pub fn slide_in_from_right(area: Rect, panel_width: u16, progress: f64) -> Rect {
    let w = panel_width.min(area.width);
    let visible = (w as f64 * progress.clamp(0.0, 1.0)).round() as u16;
    Rect::new(area.right() - visible, area.y, visible, area.height)
}

/// Largest rect inside `area` that shows a `width` x `height` image at its natural aspect ratio.
pub fn fit_aspect(area: Rect, width: u32, height: u32) -> Rect {
    if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
        return area;
    }
    // Image aspect in cells: columns per row.
    let ratio = width as f64 / height as f64 * CELL_ASPECT;
    let mut w = area.width as f64;
    let mut h = w / ratio;
    if h > area.height as f64 {
        h = area.height as f64;
        w = h * ratio;
    }
    let w = (w.round() as u16).clamp(1, area.width);
    let h = (h.round() as u16).clamp(1, area.height);
    centered(area, w, h)
}

/// Applies `style` on top of every cell in `area` (content stays visible underneath).
pub fn dim_backdrop(area: Rect, buf: &mut Buffer, style: Style) {
    buf.set_style(area, style);
}

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_in_starts_off_screen_and_ends_flush_right() {
        let area = Rect::new(0, 0, 100, 20);
        assert_eq!(slide_in_from_right(area, 40, 0.0).width, 0);
        assert_eq!(slide_in_from_right(area, 40, 1.0), Rect::new(60, 0, 40, 20));
        let half = slide_in_from_right(area, 40, 0.5);
        assert_eq!(half.x, 80);
        assert_eq!(half.right(), 100);
    }

    #[test]
    fn portrait_images_are_narrower_than_landscape() {
        let area = Rect::new(0, 0, 80, 24);
        let portrait = fit_aspect(area, 600, 900);
        let landscape = fit_aspect(area, 900, 600);
        assert!(portrait.width < landscape.width);
        assert!(portrait.height <= area.height);
        assert!(landscape.width <= area.width);
    }

    #[test]
    fn centered_shrinks_to_fit() {
        let area = Rect::new(5, 5, 10, 4);
        assert_eq!(centered(area, 20, 2), Rect::new(5, 6, 10, 2));
    }

    #[test]
    fn ease_out_hits_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
