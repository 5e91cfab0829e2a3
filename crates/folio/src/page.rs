//! The blog post page: header, hero image, body, post navigation and footer in one scrolling
//! column, with the reading progress bar on top and the sidebar and lightbox as overlays.
use crate::date::DEFAULT_DATE_FORMAT;
use crate::date::format_post_date_with;
use crate::footer::Footer;
use crate::footer::FooterAction;
use crate::footer::FooterOptions;
use crate::footer::FooterTarget;
use crate::frame;
use crate::gallery::GalleryAction;
use crate::gallery::PhotoGallery;
use crate::gallery::PhotoGalleryOptions;
use crate::gallery::ProbeRequest;
use crate::gallery::ProbeResponse;
use crate::model::Post;
use crate::navigation::Navigation;
use crate::progress::ReadingProgress;
use crate::scroll_lock::ScrollLock;
use crate::sidebar::Sidebar;
use crate::sidebar::SidebarAction;
use crate::sidebar::SidebarOptions;
use crate::source::posts_by_date_desc;
use crate::source::previous_post;
use folio_content::ContentView;
use folio_content::ContentViewOptions;
use folio_core::help::HintBar;
use folio_core::help::HintBarOptions;
use folio_core::input::InputEvent;
use folio_core::input::KeyCode;
use folio_core::input::KeyEvent;
use folio_core::input::MouseEvent;
use folio_core::keymap;
use folio_core::keymap::Binding;
use folio_core::scroll::ScrollBindings;
use folio_core::stack;
use folio_core::stack::PageLayout;
use folio_core::stack::Section;
use folio_core::theme::Theme;
use folio_core::viewport::ViewportState;
use folio_core::wrapping;
use folio_syntax::SharedHighlighter;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const HEADER: usize = 0;
const HERO: usize = 1;
const BODY: usize = 2;
const NAV: usize = 3;
const FOOTER: usize = 4;

const PREVIOUS_LABEL: &str = "[ ← Previous Post ]";
const ALL_POSTS_LABEL: &str = "[ All Posts ]";
/// Row of the buttons inside the navigation section.
const NAV_BUTTON_ROW: u32 = 1;

#[derive(Clone, Debug)]
pub struct PageBindings {
    pub all_posts: Vec<KeyEvent>,
    pub previous: Vec<KeyEvent>,
    pub focus_next: Vec<KeyEvent>,
    pub focus_prev: Vec<KeyEvent>,
    pub activate: Vec<KeyEvent>,
}

impl Default for PageBindings {
    fn default() -> Self {
        Self {
            all_posts: vec![keymap::key_char('a')],
            previous: vec![keymap::key_char('p')],
            focus_next: vec![keymap::key(KeyCode::Tab)],
            focus_prev: vec![keymap::key(KeyCode::BackTab)],
            activate: vec![keymap::key(KeyCode::Enter)],
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlogPostOptions {
    pub date_format: String,
    pub hero_height: u16,
    /// Widest the reading column gets; wider terminals center it.
    pub max_content_width: u16,
    pub show_hints: bool,
    pub scroll: ScrollBindings,
    pub bindings: PageBindings,
    pub content: ContentViewOptions,
    pub gallery: PhotoGalleryOptions,
    pub sidebar: SidebarOptions,
    pub footer: FooterOptions,
}

impl Default for BlogPostOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            hero_height: 10,
            max_content_width: 88,
            show_hints: true,
            scroll: ScrollBindings::default(),
            bindings: PageBindings::default(),
            content: ContentViewOptions::default(),
            gallery: PhotoGalleryOptions::default(),
            sidebar: SidebarOptions::default(),
            footer: FooterOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageAction {
    None,
    Redraw,
    Navigate(Navigation),
}

/// What Tab has moved the keyboard focus to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageFocus {
    Body,
    PreviousPost,
    AllPosts,
    Footer(FooterTarget),
}

enum Body {
    Article(ContentView),
    Dump(PhotoGallery),
}

pub struct BlogPostPage {
    options: BlogPostOptions,
    post: Post,
    previous: Option<Post>,
    body: Body,
    footer: Footer,
    sidebar: Sidebar,
    scroll_lock: ScrollLock,
    highlighter: Option<SharedHighlighter>,
    state: ViewportState,
    focus: PageFocus,
}

impl Default for BlogPostPage {
    fn default() -> Self {
        Self::new()
    }
}

impl BlogPostPage {
    pub fn new() -> Self {
        Self::with_options(BlogPostOptions::default())
    }

    pub fn with_options(options: BlogPostOptions) -> Self {
        let scroll_lock = ScrollLock::new();
        let sidebar = Sidebar::with_options(scroll_lock.clone(), options.sidebar.clone());
        let footer = Footer::new(options.footer.clone());
        let body = Body::Article(ContentView::with_options(options.content.clone()));
        Self {
            options,
            post: Post::default(),
            previous: None,
            body,
            footer,
            sidebar,
            scroll_lock,
            highlighter: None,
            state: ViewportState::default(),
            focus: PageFocus::Body,
        }
    }

    pub fn set_highlighter(&mut self, highlighter: Option<SharedHighlighter>) {
        if let Body::Article(view) = &mut self.body {
            view.set_highlighter(highlighter.clone());
        }
        self.highlighter = highlighter;
    }

    /// Shows `post`. `all_posts` feeds the sidebar and the previous-post button, in any order.
    ///
    /// Returns the image probes a photo dump needs; the host runs them and hands the responses
    /// to [`Self::apply_probe`].
    pub fn set_post(&mut self, post: Post, all_posts: &[Post]) -> Vec<ProbeRequest> {
        tracing::debug!(slug = %post.slug, kind = ?post.kind, "showing post");
        let sorted = posts_by_date_desc(all_posts.to_vec());
        self.previous = previous_post(&sorted, &post).cloned();
        self.sidebar.close();
        self.sidebar.set_posts(sorted, post.slug.clone());

        let requests = if post.is_dump() {
            if !matches!(self.body, Body::Dump(_)) {
                self.body = Body::Dump(PhotoGallery::with_options(self.options.gallery.clone()));
            }
            match &mut self.body {
                Body::Dump(gallery) => gallery.set_content(&post.content),
                Body::Article(_) => Vec::new(),
            }
        } else {
            if let Body::Dump(gallery) = &mut self.body {
                gallery.unmount();
            }
            let mut view = ContentView::with_options(self.options.content.clone());
            view.set_highlighter(self.highlighter.clone());
            view.set_content(&post.content);
            self.body = Body::Article(view);
            Vec::new()
        };

        self.post = post;
        self.state.to_top();
        self.focus = PageFocus::Body;
        self.footer.set_focus(None);
        requests
    }

    /// Applies a finished image probe. Returns `true` if the page needs a redraw.
    pub fn apply_probe(&mut self, response: ProbeResponse) -> bool {
        match &mut self.body {
            Body::Dump(gallery) => gallery.apply(response),
            Body::Article(_) => false,
        }
    }

    /// Advances overlay animations. Returns `true` if the page needs a redraw.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.sidebar.tick(dt)
    }

    /// Stops listening for probes and closes overlays.
    pub fn unmount(&mut self) {
        if let Body::Dump(gallery) = &mut self.body {
            gallery.unmount();
        }
        self.sidebar.close();
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn previous(&self) -> Option<&Post> {
        self.previous.as_ref()
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar.open();
    }

    pub fn scroll_lock(&self) -> &ScrollLock {
        &self.scroll_lock
    }

    pub fn gallery(&self) -> Option<&PhotoGallery> {
        match &self.body {
            Body::Dump(gallery) => Some(gallery),
            Body::Article(_) => None,
        }
    }

    pub fn content_view(&self) -> Option<&ContentView> {
        match &self.body {
            Body::Article(view) => Some(view),
            Body::Dump(_) => None,
        }
    }

    /// Scroll state of the whole page, which drives the progress bar.
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn progress_percent(&self) -> f64 {
        ReadingProgress::percent(&self.state)
    }

    pub fn focus(&self) -> PageFocus {
        self.focus
    }

    fn page_area(&self, area: Rect) -> Rect {
        let hints = u16::from(self.options.show_hints);
        let top = area.height.min(1);
        Rect::new(
            area.x,
            area.y + top,
            area.width,
            area.height.saturating_sub(top + hints),
        )
    }

    fn column(&self, page: Rect) -> Rect {
        let width = page.width.min(self.options.max_content_width);
        Rect::new(page.x + (page.width - width) / 2, page.y, width, page.height)
    }

    fn layout(&mut self, width: u16, theme: &Theme) -> PageLayout {
        let header = self.header_lines(width, theme).len() as u32;
        let hero = self.hero_lines(width, theme).len() as u32;
        let body = match &mut self.body {
            Body::Article(view) => view.height(width, theme),
            Body::Dump(gallery) => gallery.height(width, theme),
        };
        let nav = self.nav_lines(width, theme).0.len() as u32;
        let footer = self.footer.height(width, theme);
        PageLayout::from_heights([header, hero, body, nav, footer])
    }

    fn sync_viewport(&mut self, area: Rect, theme: &Theme) -> (Rect, PageLayout) {
        let column = self.column(self.page_area(area));
        let layout = self.layout(column.width, theme);
        self.state.set_viewport(column.width, column.height);
        self.state.set_content(layout.total_height());
        (column, layout)
    }

    fn header_lines(&self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![Line::default()];
        for text in wrapping::wrap_words(&self.post.title, width.max(1)) {
            lines.push(centered(text, width, theme.title));
        }
        if !self.post.tagline.trim().is_empty() {
            for text in wrapping::wrap_words(&self.post.tagline, width.max(1)) {
                lines.push(centered(text, width, theme.tagline));
            }
        }
        if !self.post.date.trim().is_empty() {
            let date = format_post_date_with(&self.post.date, &self.options.date_format);
            lines.push(centered(date, width, theme.text_muted));
        }
        lines.push(Line::default());
        lines
    }

    fn hero_lines(&self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        if self.post.image.trim().is_empty() {
            return Vec::new();
        }
        let mut lines = frame::image_lines(
            width,
            self.options.hero_height,
            &self.post.title,
            frame::file_name(&self.post.image),
            theme.border,
            theme,
        );
        lines.push(Line::default());
        lines
    }

    fn nav_lines(&self, width: u16, theme: &Theme) -> (Vec<Line<'static>>, Vec<(PageFocus, u16, u16)>) {
        let style = |focus: PageFocus| {
            if self.focus == focus {
                theme.button_focused
            } else {
                theme.button
            }
        };
        let all_w = UnicodeWidthStr::width(ALL_POSTS_LABEL) as u16;
        let all_x = width.saturating_sub(all_w);
        let mut spans = Vec::new();
        let mut hotspots = Vec::new();
        let mut x = 0u16;
        if self.previous.is_some() {
            let prev_w = UnicodeWidthStr::width(PREVIOUS_LABEL) as u16;
            spans.push(Span::styled(PREVIOUS_LABEL, style(PageFocus::PreviousPost)));
            hotspots.push((PageFocus::PreviousPost, 0, prev_w.min(all_x)));
            x = prev_w;
        }
        if all_x > x {
            spans.push(Span::raw(" ".repeat((all_x - x) as usize)));
        }
        spans.push(Span::styled(ALL_POSTS_LABEL, style(PageFocus::AllPosts)));
        hotspots.push((PageFocus::AllPosts, all_x.max(x), all_w));
        let lines = vec![Line::default(), Line::from(spans), Line::default()];
        (lines, hotspots)
    }

    fn focus_order(&self) -> Vec<PageFocus> {
        let mut order = vec![PageFocus::Body];
        if self.previous.is_some() {
            order.push(PageFocus::PreviousPost);
        }
        order.push(PageFocus::AllPosts);
        order.extend(self.footer.targets().into_iter().map(PageFocus::Footer));
        order
    }

    fn move_focus(&mut self, step: isize, column: Rect, layout: &PageLayout) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = (current as isize + step).rem_euclid(order.len() as isize) as usize;
        self.focus = order[next];
        self.footer.set_focus(match self.focus {
            PageFocus::Footer(target) => Some(target),
            _ => None,
        });
        tracing::trace!(focus = ?self.focus, "page focus moved");

        match self.focus {
            PageFocus::Body => {}
            PageFocus::PreviousPost | PageFocus::AllPosts => {
                if let Some(slot) = layout.slot(NAV) {
                    self.reveal(slot.top + NAV_BUTTON_ROW, 1);
                }
            }
            PageFocus::Footer(target) => {
                let row = self
                    .footer
                    .hotspots(column.width)
                    .into_iter()
                    .find(|h| h.target == target)
                    .map(|h| h.row);
                if let (Some(slot), Some(row)) = (layout.slot(FOOTER), row) {
                    self.reveal(slot.top + row, 1);
                }
            }
        }
    }

    /// Scrolls the least amount that brings page rows `top..top + height` into view.
    fn reveal(&mut self, top: u32, height: u32) {
        let visible = self.state.viewport_h as u32;
        if top < self.state.y {
            self.state.scroll_to(top);
        } else if top + height > self.state.y + visible {
            self.state.scroll_to((top + height).saturating_sub(visible));
        }
    }

    fn activate(&mut self, focus: PageFocus) -> PageAction {
        match focus {
            PageFocus::Body => PageAction::None,
            PageFocus::PreviousPost => self.go_previous(),
            PageFocus::AllPosts => {
                self.sidebar.open();
                PageAction::Redraw
            }
            PageFocus::Footer(target) => {
                let action = self.footer.activate(target);
                self.footer_action(action)
            }
        }
    }

    fn go_previous(&self) -> PageAction {
        match &self.previous {
            Some(previous) => {
                let target = Navigation::post(previous.slug.clone());
                tracing::debug!(path = %target.path(), "navigating to previous post");
                PageAction::Navigate(target)
            }
            None => PageAction::None,
        }
    }

    fn footer_action(&mut self, action: FooterAction) -> PageAction {
        match action {
            FooterAction::None => PageAction::None,
            FooterAction::ScrollToTop => {
                self.state.to_top();
                PageAction::Redraw
            }
            FooterAction::Open(target) => PageAction::Navigate(target),
        }
    }

    fn gallery_action(action: GalleryAction) -> PageAction {
        match action {
            GalleryAction::None => PageAction::None,
            GalleryAction::Redraw
            | GalleryAction::LightboxOpened(_)
            | GalleryAction::LightboxClosed => PageAction::Redraw,
        }
    }

    /// Routes one input event. Overlays come first: the sidebar, then the lightbox, then the page.
    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> PageAction {
        if self.sidebar.is_open() {
            return match self.sidebar.handle_event_in_area(area, event) {
                SidebarAction::None => PageAction::None,
                SidebarAction::Redraw | SidebarAction::Closed => PageAction::Redraw,
                SidebarAction::Navigate(target) => PageAction::Navigate(target),
            };
        }
        if let Body::Dump(gallery) = &mut self.body {
            if gallery.lightbox().is_open() {
                return Self::gallery_action(gallery.handle_lightbox_event(area, event));
            }
        }

        let (column, layout) = self.sync_viewport(area, &Theme::default());
        match event {
            InputEvent::Key(key) => self.handle_key(&key, column, &layout),
            InputEvent::Mouse(mouse) => self.handle_mouse(&mouse, column, &layout),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, column: Rect, layout: &PageLayout) -> PageAction {
        let b = &self.options.bindings;
        if keymap::matches_any(&b.all_posts, key) {
            self.sidebar.open();
            return PageAction::Redraw;
        }
        if keymap::matches_any(&b.previous, key) {
            return self.go_previous();
        }
        if keymap::matches_any(&b.focus_next, key) {
            self.move_focus(1, column, layout);
            return PageAction::Redraw;
        }
        if keymap::matches_any(&b.focus_prev, key) {
            self.move_focus(-1, column, layout);
            return PageAction::Redraw;
        }
        if self.focus != PageFocus::Body && keymap::matches_any(&b.activate, key) {
            return self.activate(self.focus);
        }

        if let Body::Dump(gallery) = &mut self.body {
            let action = gallery.handle_key(key);
            if action != GalleryAction::None {
                let selected = gallery
                    .selected()
                    .and_then(|i| gallery.cell_rows(column.width, i));
                if let (Some((top, height)), Some(slot)) = (selected, layout.slot(BODY)) {
                    self.reveal(slot.top + top, height);
                }
                return Self::gallery_action(action);
            }
        }

        if self.scroll_lock.is_locked() {
            return PageAction::None;
        }
        match self.options.scroll.action_for(key) {
            Some(action) => {
                let before = self.state.y;
                self.options.scroll.apply(&mut self.state, action);
                if self.state.y != before {
                    PageAction::Redraw
                } else {
                    PageAction::None
                }
            }
            None => PageAction::None,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, column: Rect, layout: &PageLayout) -> PageAction {
        if self.scroll_lock.is_locked() {
            return PageAction::None;
        }
        let before = self.state.y;
        if self.options.scroll.apply_mouse(&mut self.state, mouse) {
            return if self.state.y != before {
                PageAction::Redraw
            } else {
                PageAction::None
            };
        }
        if !mouse.is_left_click() || !mouse.is_within(column) {
            return PageAction::None;
        }
        let Some((section, row)) = layout.hit(column, self.state.y, mouse.y) else {
            return PageAction::None;
        };
        let x = mouse.x - column.x;
        match section {
            BODY => match &mut self.body {
                Body::Dump(gallery) => match gallery.cell_at(column.width, x, row) {
                    Some(index) => Self::gallery_action(gallery.open(index)),
                    None => PageAction::None,
                },
                Body::Article(_) => PageAction::None,
            },
            NAV if row == NAV_BUTTON_ROW => {
                let (_, hotspots) = self.nav_lines(column.width, &Theme::default());
                match hotspots
                    .into_iter()
                    .find(|(_, hx, hw)| x >= *hx && x < hx + hw)
                {
                    Some((focus, _, _)) => self.activate(focus),
                    None => PageAction::None,
                }
            }
            FOOTER => {
                let action = self.footer.click(column.width, x, row);
                self.footer_action(action)
            }
            _ => PageAction::None,
        }
    }

    fn hint_bindings(&self) -> Vec<Binding> {
        let b = &self.options.bindings;
        let mut hints = vec![
            Binding::new("↑/↓", "scroll", Vec::new()),
            Binding::new("a", "all posts", b.all_posts.clone()),
        ];
        if self.previous.is_some() {
            hints.push(Binding::new("p", "previous", b.previous.clone()));
        }
        if matches!(self.body, Body::Dump(_)) {
            hints.push(Binding::new("←/→ enter", "photos", Vec::new()));
        }
        hints.push(Binding::new("tab", "focus", b.focus_next.clone()));
        hints
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (column, layout) = self.sync_viewport(area, theme);
        let y = self.state.y;

        if let Some((rect, skip)) = layout.visible(HEADER, column, y) {
            let lines = self.header_lines(rect.width, theme);
            stack::render_lines_from(rect, buf, &lines, skip, theme.text_primary);
        }
        if let Some((rect, skip)) = layout.visible(HERO, column, y) {
            let lines = self.hero_lines(rect.width, theme);
            stack::render_lines_from(rect, buf, &lines, skip, theme.text_primary);
        }
        if let Some((rect, skip)) = layout.visible(BODY, column, y) {
            match &mut self.body {
                Body::Article(view) => view.render_rows(rect, buf, skip, theme),
                Body::Dump(gallery) => gallery.render_rows(rect, buf, skip, theme),
            }
        }
        if let Some((rect, skip)) = layout.visible(NAV, column, y) {
            let (lines, _) = self.nav_lines(rect.width, theme);
            stack::render_lines_from(rect, buf, &lines, skip, theme.text_primary);
        }
        if let Some((rect, skip)) = layout.visible(FOOTER, column, y) {
            self.footer.render_rows(rect, buf, skip, theme);
        }

        ReadingProgress.render_ref(Rect::new(area.x, area.y, area.width, 1), buf, &self.state, theme);
        if self.options.show_hints && area.height > 1 {
            let mut hints = HintBar::with_options(
                self.hint_bindings(),
                HintBarOptions {
                    style: theme.text_muted,
                    key_style: theme.accent,
                    status_style: theme.text_muted,
                    ..HintBarOptions::default()
                },
            );
            hints.set_status(Some(format!("{:.0}%", self.progress_percent())));
            hints.render_ref(Rect::new(area.x, area.bottom() - 1, area.width, 1), buf);
        }

        if let Body::Dump(gallery) = &self.body {
            gallery.render_lightbox(area, buf, theme);
        }
        self.sidebar.render_ref(area, buf, theme);
    }
}

fn centered(text: String, width: u16, style: Style) -> Line<'static> {
    let cols = UnicodeWidthStr::width(text.as_str());
    let left = (width as usize).saturating_sub(cols) / 2;
    Line::from(vec![Span::raw(" ".repeat(left)), Span::styled(text, style)])
}
