//! "All Posts" sidebar that slides in over the post page.
use crate::date::DEFAULT_DATE_FORMAT;
use crate::date::format_post_date_with;
use crate::model::Post;
use crate::navigation::Navigation;
use crate::scroll_lock::ScrollLock;
use crate::scroll_lock::ScrollLockGuard;
use folio_core::input::InputEvent;
use folio_core::input::KeyEvent;
use folio_core::keymap::OverlayBindings;
use folio_core::overlay;
use folio_core::render;
use folio_core::scroll::ScrollBindings;
use folio_core::theme::Theme;
use folio_core::viewport;
use folio_core::viewport::ViewportOptions;
use folio_core::viewport::ViewportState;
use folio_core::wrapping;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::text::Span;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const HEADER: &str = "All Posts";
const CLOSE_LABEL: &str = "✕";
const CURRENT_BADGE: &str = " Current ";
const DUMP_BADGE: &str = "📸 Photo Dump";
const FOCUS_MARK: &str = "▌ ";
const GUTTER: u16 = 2;

#[derive(Clone, Debug)]
pub struct SidebarOptions {
    pub slide_duration: Duration,
    pub backdrop_fade: Duration,
    /// Delay before the first entry starts to appear.
    pub item_delay: Duration,
    /// Extra delay per entry after the first.
    pub item_stagger: Duration,
    pub item_fade: Duration,
    pub max_width: u16,
    pub date_format: String,
    pub bindings: OverlayBindings,
    pub scroll: ScrollBindings,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self {
            slide_duration: Duration::from_millis(400),
            backdrop_fade: Duration::from_millis(300),
            item_delay: Duration::from_millis(150),
            item_stagger: Duration::from_millis(60),
            item_fade: Duration::from_millis(400),
            max_width: 56,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            bindings: OverlayBindings::default(),
            scroll: ScrollBindings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidebarPhase {
    Closed,
    /// Sliding in; entries fade in one after another.
    Opening,
    Open,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarAction {
    None,
    Redraw,
    Closed,
    /// The sidebar has already closed itself.
    Navigate(Navigation),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EntryRows {
    top: u32,
    height: u32,
}

/// Post listing overlay.
///
/// While open it holds a [`ScrollLockGuard`] on the page's [`ScrollLock`]. The guard goes away
/// on every way out: [`Sidebar::close`], navigating to another post, or dropping the sidebar.
#[derive(Debug)]
pub struct Sidebar {
    options: SidebarOptions,
    lock: ScrollLock,
    guard: Option<ScrollLockGuard>,
    posts: Vec<Post>,
    current_slug: String,
    phase: SidebarPhase,
    elapsed: Duration,
    focused: usize,
    list: ViewportState,
}

impl Sidebar {
    pub fn new(lock: ScrollLock) -> Self {
        Self::with_options(lock, SidebarOptions::default())
    }

    pub fn with_options(lock: ScrollLock, options: SidebarOptions) -> Self {
        Self {
            options,
            lock,
            guard: None,
            posts: Vec::new(),
            current_slug: String::new(),
            phase: SidebarPhase::Closed,
            elapsed: Duration::ZERO,
            focused: 0,
            list: ViewportState::default(),
        }
    }

    /// Replaces the listing. `posts` are shown in the given order.
    pub fn set_posts(&mut self, posts: Vec<Post>, current_slug: impl Into<String>) {
        self.posts = posts;
        self.current_slug = current_slug.into();
        self.focused = self.current_index().unwrap_or(0);
        self.list.to_top();
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn current_slug(&self) -> &str {
        &self.current_slug
    }

    pub fn phase(&self) -> SidebarPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != SidebarPhase::Closed
    }

    pub fn is_animating(&self) -> bool {
        self.phase == SidebarPhase::Opening
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.guard = Some(self.lock.acquire());
        self.phase = SidebarPhase::Opening;
        self.elapsed = Duration::ZERO;
        self.focused = self.current_index().unwrap_or(0);
        self.list.to_top();
        tracing::debug!(posts = self.posts.len(), "sidebar opened");
    }

    /// Closes the sidebar and releases the scroll lock. Closing twice is a no-op.
    pub fn close(&mut self) {
        let was_open = self.is_open();
        self.guard = None;
        self.phase = SidebarPhase::Closed;
        self.elapsed = Duration::ZERO;
        if was_open {
            tracing::debug!("sidebar closed");
        }
    }

    /// Advances the opening animation. Returns `true` if a redraw is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.phase != SidebarPhase::Opening {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.animation_duration() {
            self.phase = SidebarPhase::Open;
            tracing::trace!("sidebar animation finished");
        }
        true
    }

    /// Time from `open()` until every part has finished animating.
    pub fn animation_duration(&self) -> Duration {
        let o = &self.options;
        let items = match self.posts.len() {
            0 => Duration::ZERO,
            n => o.item_delay + o.item_stagger * (n as u32 - 1) + o.item_fade,
        };
        o.slide_duration.max(o.backdrop_fade).max(items)
    }

    /// Opacity of entry `index`, from 0.0 (not yet shown) to 1.0.
    pub fn item_visibility(&self, index: usize) -> f64 {
        match self.phase {
            SidebarPhase::Closed => 0.0,
            SidebarPhase::Open => 1.0,
            SidebarPhase::Opening => {
                let o = &self.options;
                let start = o.item_delay + o.item_stagger * index as u32;
                let Some(since) = self.elapsed.checked_sub(start) else {
                    return 0.0;
                };
                progress(since, o.item_fade)
            }
        }
    }

    fn panel_progress(&self) -> f64 {
        match self.phase {
            SidebarPhase::Closed => 0.0,
            SidebarPhase::Open => 1.0,
            SidebarPhase::Opening => {
                overlay::ease_out_cubic(progress(self.elapsed, self.options.slide_duration))
            }
        }
    }

    fn backdrop_progress(&self) -> f64 {
        match self.phase {
            SidebarPhase::Closed => 0.0,
            SidebarPhase::Open => 1.0,
            SidebarPhase::Opening => progress(self.elapsed, self.options.backdrop_fade),
        }
    }

    /// Selects entry `index`. Selecting the current post does nothing.
    pub fn select(&mut self, index: usize) -> SidebarAction {
        let Some(post) = self.posts.get(index) else {
            return SidebarAction::None;
        };
        if post.slug == self.current_slug {
            return SidebarAction::None;
        }
        let target = Navigation::post(post.slug.clone());
        self.close();
        tracing::debug!(path = %target.path(), "navigating from sidebar");
        SidebarAction::Navigate(target)
    }

    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> SidebarAction {
        if !self.is_open() {
            return SidebarAction::None;
        }
        match event {
            InputEvent::Key(key) => self.handle_key(area, &key),
            InputEvent::Mouse(mouse) => {
                let panel = self.panel_rect(area);
                if mouse.is_wheel() {
                    // The page behind is locked, so wheel input only ever scrolls the list.
                    if !mouse.is_within(panel) {
                        return SidebarAction::None;
                    }
                    self.options.scroll.apply_mouse(&mut self.list, &mouse);
                    return SidebarAction::Redraw;
                }
                if !mouse.is_left_click() {
                    return SidebarAction::None;
                }
                if !mouse.is_within(panel) || mouse.is_within(close_rect(panel)) {
                    self.close();
                    return SidebarAction::Closed;
                }
                let list = list_rect(self.full_panel_rect(area));
                if mouse.y < list.y || mouse.y >= list.bottom() {
                    return SidebarAction::None;
                }
                let row = self.list.y + (mouse.y - list.y) as u32;
                let hit = self
                    .entry_rows(text_width(list))
                    .iter()
                    .position(|e| row >= e.top && row < e.top + e.height);
                // Entries still waiting for their fade are blank and not clickable yet.
                match hit.filter(|&index| self.item_visibility(index) > 0.0) {
                    Some(index) => {
                        self.focused = index;
                        self.select(index)
                    }
                    None => SidebarAction::None,
                }
            }
        }
    }

    fn handle_key(&mut self, area: Rect, key: &KeyEvent) -> SidebarAction {
        let b = &self.options.bindings;
        if b.is_close(key) {
            self.close();
            return SidebarAction::Closed;
        }
        if b.is_activate(key) {
            return self.select(self.focused);
        }
        let step: i32 = if b.is_next(key) {
            1
        } else if b.is_prev(key) {
            -1
        } else {
            return match self.options.scroll.action_for(key) {
                Some(action) => {
                    self.options.scroll.apply(&mut self.list, action);
                    SidebarAction::Redraw
                }
                None => SidebarAction::None,
            };
        };
        if self.posts.is_empty() {
            return SidebarAction::None;
        }
        let next = (self.focused as i64 + step as i64).clamp(0, self.posts.len() as i64 - 1);
        self.focused = next as usize;
        let list = list_rect(self.full_panel_rect(area));
        self.reveal_focused(list);
        SidebarAction::Redraw
    }

    fn reveal_focused(&mut self, list: Rect) {
        let rows = self.entry_rows(text_width(list));
        let Some(entry) = rows.get(self.focused) else {
            return;
        };
        let total = rows.last().map_or(0, |e| e.top + e.height);
        self.list.set_viewport(list.width, list.height);
        self.list.set_content(total);
        if entry.top < self.list.y {
            self.list.scroll_to(entry.top);
        } else if entry.top + entry.height > self.list.y + list.height as u32 {
            self.list
                .scroll_to((entry.top + entry.height).saturating_sub(list.height as u32));
        }
    }

    fn current_index(&self) -> Option<usize> {
        self.posts.iter().position(|p| p.slug == self.current_slug)
    }

    fn full_panel_rect(&self, area: Rect) -> Rect {
        overlay::slide_in_from_right(area, self.options.max_width.min(area.width), 1.0)
    }

    /// The part of the panel on screen right now.
    pub fn panel_rect(&self, area: Rect) -> Rect {
        overlay::slide_in_from_right(
            area,
            self.options.max_width.min(area.width),
            self.panel_progress(),
        )
    }

    fn entry_rows(&self, width: u16) -> Vec<EntryRows> {
        let mut rows = Vec::with_capacity(self.posts.len());
        let mut top = 0u32;
        for (i, post) in self.posts.iter().enumerate() {
            if i > 0 {
                top += 1;
            }
            let height = self.entry_height(post, width);
            rows.push(EntryRows { top, height });
            top += height;
        }
        rows
    }

    fn entry_height(&self, post: &Post, width: u16) -> u32 {
        let title = title_lines(post, width, self.is_current(post)).len();
        let preview = preview_lines(post, width).len();
        (title + preview + 1) as u32
    }

    fn is_current(&self, post: &Post) -> bool {
        post.slug == self.current_slug
    }

    fn entry_lines(&self, index: usize, post: &Post, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        let current = self.is_current(post);
        let gutter = if index == self.focused {
            Span::styled(FOCUS_MARK, theme.accent)
        } else {
            Span::raw(" ".repeat(GUTTER as usize))
        };
        let title_style = if current {
            theme.accent.add_modifier(Modifier::BOLD)
        } else {
            theme.title
        };

        let mut lines = Vec::new();
        for (i, text) in title_lines(post, width, current).into_iter().enumerate() {
            let mut spans = vec![gutter.clone(), Span::styled(text.clone(), title_style)];
            if i == 0 && current {
                let pad = (width as usize)
                    .saturating_sub(UnicodeWidthStr::width(text.as_str()))
                    .saturating_sub(UnicodeWidthStr::width(CURRENT_BADGE));
                spans.push(Span::raw(" ".repeat(pad)));
                spans.push(Span::styled(CURRENT_BADGE, theme.badge_current));
            }
            lines.push(Line::from(spans));
        }
        for text in preview_lines(post, width) {
            lines.push(Line::from(vec![
                gutter.clone(),
                Span::styled(text, theme.text_primary),
            ]));
        }

        let date = format_post_date_with(&post.date, &self.options.date_format);
        let mut meta = vec![gutter, Span::styled(date.clone(), theme.text_muted)];
        if post.is_dump() {
            let used = UnicodeWidthStr::width(date.as_str());
            let badge = UnicodeWidthStr::width(DUMP_BADGE);
            let pad = (width as usize).saturating_sub(used + badge).max(1);
            meta.push(Span::raw(" ".repeat(pad)));
            meta.push(Span::styled(DUMP_BADGE, theme.badge_dump));
        }
        lines.push(Line::from(meta));

        let visibility = self.item_visibility(index);
        if visibility <= 0.0 {
            return lines.iter().map(|_| Line::default()).collect();
        }
        if visibility < 1.0 {
            for line in &mut lines {
                for span in &mut line.spans {
                    span.style = span.style.add_modifier(Modifier::DIM);
                }
            }
        }
        lines
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.is_open() || area.width == 0 || area.height == 0 {
            return;
        }
        if self.backdrop_progress() > 0.0 {
            overlay::dim_backdrop(area, buf, theme.backdrop);
        }
        let panel = self.panel_rect(area);
        if panel.width == 0 {
            return;
        }
        render::clear_area(panel, buf, theme.panel);
        for y in panel.top()..panel.bottom() {
            buf.set_stringn(panel.x, y, "│", 1, theme.border);
        }

        let inner_w = panel.width.saturating_sub(2);
        render::render_str_clipped(panel.x + 2, panel.y, inner_w, buf, HEADER, theme.title);
        let close = close_rect(panel);
        render::render_str_clipped(close.x, close.y, close.width, buf, CLOSE_LABEL, theme.text_muted);
        if panel.height > 1 {
            let divider = "─".repeat(panel.width.saturating_sub(1) as usize);
            render::render_str_clipped(
                panel.x + 1,
                panel.y + 1,
                panel.width.saturating_sub(1),
                buf,
                &divider,
                theme.border,
            );
        }

        // Entries are laid out at the final width and clipped while the panel slides in.
        let full = list_rect(self.full_panel_rect(area));
        let width = text_width(full);
        let mut lines = Vec::new();
        for (i, post) in self.posts.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.extend(self.entry_lines(i, post, width, theme));
        }
        self.list.set_viewport(full.width, full.height);
        self.list.set_content(lines.len() as u32);

        let visible = list_rect(panel);
        let target = Rect::new(visible.x, visible.y, visible.width.min(full.width), visible.height);
        viewport::render_text_lines(
            target,
            buf,
            &lines,
            &self.list,
            &ViewportOptions {
                style: theme.panel,
                show_scrollbar: target.width == full.width,
                scrollbar_style: theme.text_muted,
            },
        );
    }
}

fn progress(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
}

fn close_rect(panel: Rect) -> Rect {
    if panel.width < 5 {
        return Rect::new(panel.x, panel.y, 0, 0);
    }
    Rect::new(panel.right() - 3, panel.y, 2, panel.height.min(1))
}

fn list_rect(panel: Rect) -> Rect {
    Rect::new(
        panel.x + panel.width.min(2),
        panel.y + panel.height.min(2),
        panel.width.saturating_sub(3),
        panel.height.saturating_sub(2),
    )
}

/// Columns for entry text: the list minus its scrollbar and the focus gutter.
fn text_width(list: Rect) -> u16 {
    list.width.saturating_sub(1 + GUTTER).max(1)
}

fn title_lines(post: &Post, width: u16, current: bool) -> Vec<String> {
    let badge = if current {
        UnicodeWidthStr::width(CURRENT_BADGE) as u16 + 1
    } else {
        0
    };
    let mut lines = wrapping::clamp_lines(&post.title, width.saturating_sub(badge).max(1), 2);
    if current {
        // The badge shares the first row, so it must never be pushed off by a long word.
        let limit = width.saturating_sub(badge) as usize;
        if let Some(first) = lines.first_mut() {
            *first = render::truncate_with_ellipsis(first, limit);
        }
    }
    lines
}

fn preview_lines(post: &Post, width: u16) -> Vec<String> {
    if post.preview.trim().is_empty() {
        return Vec::new();
    }
    wrapping::clamp_lines(&post.preview, width, 2)
}
