//! Full-screen single image overlay.
use crate::frame;
use folio_core::input::InputEvent;
use folio_core::input::KeyEvent;
use folio_core::keymap::OverlayBindings;
use folio_core::overlay;
use folio_core::render;
use folio_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

const CLOSE_LABEL: &str = "[×]";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightboxImage {
    pub index: usize,
    pub url: String,
    pub dimensions: Option<(u32, u32)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightboxAction {
    None,
    Closed,
}

#[derive(Clone, Debug)]
pub struct LightboxOptions {
    pub width_pct: u16,
    pub height_pct: u16,
    pub bindings: OverlayBindings,
}

impl Default for LightboxOptions {
    fn default() -> Self {
        Self {
            width_pct: 96,
            height_pct: 90,
            bindings: OverlayBindings::default(),
        }
    }
}

/// Shows one image over a blacked-out page.
///
/// The image frame keeps the picture's aspect ratio once its size is known. Clicks on the frame
/// are swallowed; clicks on the backdrop or the close control dismiss it.
#[derive(Clone, Debug, Default)]
pub struct Lightbox {
    options: LightboxOptions,
    image: Option<LightboxImage>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LightboxOptions) -> Self {
        Self {
            options,
            image: None,
        }
    }

    pub fn open(&mut self, image: LightboxImage) {
        tracing::trace!(index = image.index, "lightbox opened");
        self.image = Some(image);
    }

    /// Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.image.take().is_some();
        if was_open {
            tracing::trace!("lightbox closed");
        }
        was_open
    }

    pub fn is_open(&self) -> bool {
        self.image.is_some()
    }

    pub fn image(&self) -> Option<&LightboxImage> {
        self.image.as_ref()
    }

    /// Updates the size of image `index` if it is the one showing.
    pub fn set_dimensions(&mut self, index: usize, dimensions: Option<(u32, u32)>) {
        if let Some(image) = self.image.as_mut().filter(|i| i.index == index) {
            image.dimensions = dimensions;
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> LightboxAction {
        if self.is_open() && self.options.bindings.is_close(key) {
            self.close();
            return LightboxAction::Closed;
        }
        LightboxAction::None
    }

    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> LightboxAction {
        if !self.is_open() {
            return LightboxAction::None;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(&key),
            InputEvent::Mouse(mouse) => {
                if !mouse.is_left_click() {
                    return LightboxAction::None;
                }
                let frame = self.frame_rect(area);
                if mouse.is_within(frame) && !mouse.is_within(close_rect(frame)) {
                    return LightboxAction::None;
                }
                self.close();
                LightboxAction::Closed
            }
        }
    }

    /// Where the image frame sits inside `area`.
    pub fn frame_rect(&self, area: Rect) -> Rect {
        let bounds = overlay::centered_pct(area, self.options.width_pct, self.options.height_pct);
        match self.image.as_ref().and_then(|i| i.dimensions) {
            Some((w, h)) => overlay::fit_aspect(bounds, w, h),
            None => bounds,
        }
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let Some(image) = &self.image else {
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }
        render::clear_area(area, buf, theme.backdrop);

        let rect = self.frame_rect(area);
        let detail = match image.dimensions {
            Some((w, h)) => format!("{} · {w}×{h}", frame::file_name(&image.url)),
            None => frame::file_name(&image.url).to_string(),
        };
        frame::render_image(rect, buf, "Selected photo", &detail, theme.border, theme);

        let close = close_rect(rect);
        render::render_str_clipped(close.x, close.y, close.width, buf, CLOSE_LABEL, theme.accent);
    }
}

/// The close control, on the frame's top edge near the right corner.
fn close_rect(frame: Rect) -> Rect {
    let w = CLOSE_LABEL.chars().count() as u16;
    if frame.width < w + 2 {
        return Rect::new(frame.x, frame.y, frame.width.min(w), frame.height.min(1));
    }
    Rect::new(frame.right() - w - 1, frame.y, w, frame.height.min(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::input::KeyCode;

    fn open_lightbox(dimensions: Option<(u32, u32)>) -> Lightbox {
        let mut lightbox = Lightbox::new();
        lightbox.open(LightboxImage {
            index: 0,
            url: "https://x/a.jpg".into(),
            dimensions,
        });
        lightbox
    }

    #[test]
    fn escape_closes() {
        let mut lightbox = open_lightbox(None);
        assert_eq!(
            lightbox.handle_event_in_area(Rect::new(0, 0, 80, 24), InputEvent::key(KeyCode::Esc)),
            LightboxAction::Closed
        );
        assert!(!lightbox.is_open());
    }

    #[test]
    fn clicks_on_the_frame_are_swallowed() {
        let area = Rect::new(0, 0, 80, 24);
        let mut lightbox = open_lightbox(None);
        let frame = lightbox.frame_rect(area);
        let click = InputEvent::click(frame.x + 2, frame.y + frame.height / 2);
        assert_eq!(lightbox.handle_event_in_area(area, click), LightboxAction::None);
        assert!(lightbox.is_open());
    }

    #[test]
    fn backdrop_and_close_control_dismiss() {
        let area = Rect::new(0, 0, 80, 24);
        let mut lightbox = open_lightbox(Some((600, 900)));
        let frame = lightbox.frame_rect(area);
        assert!(frame.x > 0);
        let backdrop = InputEvent::click(0, 0);
        assert_eq!(lightbox.handle_event_in_area(area, backdrop), LightboxAction::Closed);

        let mut lightbox = open_lightbox(None);
        let close = close_rect(lightbox.frame_rect(area));
        let click = InputEvent::click(close.x + 1, close.y);
        assert_eq!(lightbox.handle_event_in_area(area, click), LightboxAction::Closed);
    }

    #[test]
    fn portrait_frames_are_narrow() {
        let area = Rect::new(0, 0, 100, 30);
        let portrait = open_lightbox(Some((600, 900))).frame_rect(area);
        let landscape = open_lightbox(Some((900, 600))).frame_rect(area);
        assert!(portrait.width < landscape.width);
    }

    #[test]
    fn renders_only_when_open() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        Lightbox::new().render_ref(area, &mut buf, &Theme::default());
        assert_eq!(buf, Buffer::empty(area));

        open_lightbox(None).render_ref(area, &mut buf, &Theme::default());
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|p| buf.cell(p).unwrap().symbol().to_string())
            .collect();
        assert!(text.contains("Selected photo"));
        assert!(text.contains("[×]"));
    }
}
