use crate::document::ContentDocument;
use crate::document::ContentOptions;
use folio_core::input::InputEvent;
use folio_core::scroll::ScrollBindings;
use folio_core::stack;
use folio_core::stack::Section;
use folio_core::text::CodeHighlighter;
use folio_core::theme::Theme;
use folio_core::viewport;
use folio_core::viewport::ViewportOptions;
use folio_core::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ContentViewOptions {
    pub content: ContentOptions,
    pub show_scrollbar: bool,
    pub scroll: ScrollBindings,
    pub padding_left: u16,
    pub padding_right: u16,
}

impl Default for ContentViewOptions {
    fn default() -> Self {
        Self {
            content: ContentOptions::default(),
            show_scrollbar: true,
            scroll: ScrollBindings::default(),
            padding_left: 1,
            padding_right: 1,
        }
    }
}

/// Scrollable post body.
///
/// Parses once per [`ContentView::set_content`] and caches the layout per width. The viewport
/// state is public so page shells can derive reading progress from it.
#[derive(Default)]
pub struct ContentView {
    options: ContentViewOptions,
    source: String,
    document: ContentDocument,
    highlighter: Option<Arc<dyn CodeHighlighter + Send + Sync>>,
    state: ViewportState,
    cached_width: Option<u16>,
    rendered: Vec<Line<'static>>,
}

impl ContentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ContentViewOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Replaces the markdown source and reparses it.
    pub fn set_content(&mut self, markdown: &str) {
        self.source = markdown.to_string();
        self.document = ContentDocument::parse(markdown, &self.options.content);
        self.invalidate();
        self.state.to_top();
    }

    pub fn content(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    /// `true` while the body is blank and the empty state is shown instead.
    pub fn is_placeholder(&self) -> bool {
        self.document.is_placeholder()
    }

    pub fn set_highlighter(&mut self, highlighter: Option<Arc<dyn CodeHighlighter + Send + Sync>>) {
        self.highlighter = highlighter;
        self.invalidate();
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn set_viewport(&mut self, area: Rect) {
        let inner = self.inner_area(area);
        self.state.set_viewport(inner.width, inner.height);
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.state.scroll_y_by(delta);
    }

    /// Handles scroll keys and the mouse wheel. Returns `true` if a redraw is needed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => {
                let Some(action) = self.options.scroll.action_for(&key) else {
                    return false;
                };
                let before = self.state.y;
                self.options.scroll.apply(&mut self.state, action);
                self.state.y != before
            }
            InputEvent::Mouse(mouse) => self.options.scroll.apply_mouse(&mut self.state, &mouse),
        }
    }

    /// Like [`Self::handle_event`], but mouse events outside `area` are ignored.
    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> bool {
        if let InputEvent::Mouse(mouse) = &event {
            if !mouse.is_within(area) {
                return false;
            }
        }
        self.set_viewport(area);
        self.handle_event(event)
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.set_viewport(area);
        let inner = self.inner_area(area);
        self.ensure_layout(inner.width, theme);

        let (text_area, scrollbar) = self.split_scrollbar(area);
        let text_area = Rect::new(
            text_area.x + self.options.padding_left.min(text_area.width),
            text_area.y,
            inner.width,
            text_area.height,
        );
        viewport::render_text_lines(
            text_area,
            buf,
            &self.rendered,
            &self.state,
            &ViewportOptions {
                style: theme.text_primary,
                show_scrollbar: false,
                scrollbar_style: theme.text_muted,
            },
        );
        if let Some(bar) = scrollbar {
            folio_core::render::render_scrollbar(bar, buf, &self.state, theme.text_muted);
        }
    }

    /// The laid out lines at `width`, including padding columns.
    pub fn lines_for_width(&mut self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        let width = width
            .saturating_sub(self.options.padding_left)
            .saturating_sub(self.options.padding_right);
        self.ensure_layout(width, theme);
        self.rendered.clone()
    }

    fn invalidate(&mut self) {
        self.cached_width = None;
        self.rendered.clear();
    }

    fn split_scrollbar(&self, area: Rect) -> (Rect, Option<Rect>) {
        if self.options.show_scrollbar && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(Rect::new(area.right() - 1, area.y, 1, area.height)),
            )
        } else {
            (area, None)
        }
    }

    fn inner_area(&self, area: Rect) -> Rect {
        let (text, _) = self.split_scrollbar(area);
        let left = self.options.padding_left.min(text.width);
        let right = self.options.padding_right.min(text.width - left);
        Rect::new(text.x + left, text.y, text.width - left - right, text.height)
    }

    fn ensure_layout(&mut self, width: u16, theme: &Theme) {
        if self.cached_width == Some(width) {
            return;
        }
        self.cached_width = Some(width);
        let highlighter = self
            .highlighter
            .as_deref()
            .map(|h| h as &dyn CodeHighlighter);
        self.rendered = self
            .document
            .render(width, theme, &self.options.content, highlighter)
            .into_lines();
        tracing::trace!(width, lines = self.rendered.len(), "laid out post body");
        self.state.set_content(self.rendered.len() as u32);
    }
}

/// Embeds the body in a page that scrolls as a whole.
impl Section for ContentView {
    fn height(&mut self, width: u16, theme: &Theme) -> u32 {
        let inner = width
            .saturating_sub(self.options.padding_left)
            .saturating_sub(self.options.padding_right);
        self.ensure_layout(inner, theme);
        self.rendered.len() as u32
    }

    fn render_rows(&mut self, area: Rect, buf: &mut Buffer, skip: u32, theme: &Theme) {
        let left = self.options.padding_left.min(area.width);
        let right = self.options.padding_right.min(area.width - left);
        let inner = Rect::new(area.x + left, area.y, area.width - left - right, area.height);
        self.ensure_layout(inner.width, theme);
        stack::render_lines_from(inner, buf, &self.rendered, skip, theme.text_primary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::input::KeyCode;
    use folio_core::keymap;

    fn long_markdown() -> String {
        (0..40).map(|i| format!("paragraph {i}\n\n")).collect()
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn blank_content_shows_the_placeholder() {
        let mut view = ContentView::new();
        view.set_content("  \n  ");
        assert!(view.is_placeholder());
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());
        assert!(buffer_text(&buf).contains("I will write this soon"));
    }

    #[test]
    fn keys_scroll_and_report_redraw() {
        let mut view = ContentView::new();
        view.set_content(&long_markdown());
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());

        assert!(view.handle_event(InputEvent::key(KeyCode::Down)));
        assert_eq!(view.state().y, 1);
        assert!(view.handle_event(InputEvent::Key(keymap::key_char('G'))));
        assert_eq!(view.state().y, view.state().max_y());
        assert!(!view.handle_event(InputEvent::key(KeyCode::Down)));
        assert_eq!(view.state().progress_percent(), 100.0);
    }

    #[test]
    fn wheel_outside_the_area_is_ignored() {
        let mut view = ContentView::new();
        view.set_content(&long_markdown());
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());

        assert!(!view.handle_event_in_area(area, InputEvent::wheel(50, 50, true)));
        assert!(view.handle_event_in_area(area, InputEvent::wheel(3, 3, true)));
        assert_eq!(view.state().y, 3);
    }

    #[test]
    fn set_content_resets_scroll() {
        let mut view = ContentView::new();
        view.set_content(&long_markdown());
        let area = Rect::new(0, 0, 30, 10);
        let mut buf = Buffer::empty(area);
        view.render_ref(area, &mut buf, &Theme::default());
        view.scroll_y_by(5);
        view.set_content("short");
        assert_eq!(view.state().y, 0);
    }

    #[test]
    fn section_height_matches_lines_for_width() {
        let mut view = ContentView::new();
        view.set_content("# Title\n\nsome words that wrap around\n");
        let theme = Theme::default();
        let lines = view.lines_for_width(14, &theme).len() as u32;
        assert_eq!(view.height(14, &theme), lines);
        assert!(lines > 3);
    }
}
