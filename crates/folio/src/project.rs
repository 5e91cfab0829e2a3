//! Work cards, the project modal and the portfolio page that ties them together.
use crate::footer::Footer;
use crate::footer::FooterAction;
use crate::footer::FooterOptions;
use crate::frame;
use crate::model::Project;
use crate::navigation::Navigation;
use folio_core::input::InputEvent;
use folio_core::input::KeyCode;
use folio_core::input::KeyEvent;
use folio_core::input::MouseEvent;
use folio_core::keymap;
use folio_core::keymap::OverlayBindings;
use folio_core::overlay;
use folio_core::render;
use folio_core::scroll::ScrollBindings;
use folio_core::stack;
use folio_core::stack::PageLayout;
use folio_core::stack::Section;
use folio_core::theme::Theme;
use folio_core::viewport;
use folio_core::viewport::ViewportOptions;
use folio_core::viewport::ViewportState;
use folio_core::wrapping;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

const SCROLL_CUE: &str = "Scroll ▾";
const DEFAULT_NAME: &str = "Project Name";
const DEFAULT_HEADLINE: &str = "Headline";

/// Project description in its own scrolling pane.
///
/// Text keeps its line breaks and collapses runs of spaces. Whether the "more below" cue shows is
/// derived from the viewport every time it is asked, so resizes and new text never leave it
/// stale.
#[derive(Clone, Debug, Default)]
pub struct ScrollableDescription {
    text: String,
    lines: Vec<String>,
    wrapped_width: Option<u16>,
    state: ViewportState,
    scroll: ScrollBindings,
}

impl ScrollableDescription {
    pub fn new(text: impl Into<String>) -> Self {
        let mut description = Self::default();
        description.set_text(text);
        description
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.wrapped_width = None;
        self.state.to_top();
        self.rewrap(self.state.viewport_w);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.state.set_viewport(width, height);
        self.rewrap(width);
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.state.scroll_y_by(delta);
    }

    /// Returns `true` while there is unread text below the visible part.
    pub fn show_cue(&self) -> bool {
        self.state.show_scroll_cue()
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match self.scroll.action_for(key) {
            Some(action) => {
                self.scroll.apply(&mut self.state, action);
                true
            }
            None => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        self.scroll.apply_mouse(&mut self.state, mouse)
    }

    fn rewrap(&mut self, width: u16) {
        // One column is kept for the scrollbar.
        let text_width = width.saturating_sub(1).max(1);
        if self.wrapped_width == Some(text_width) {
            return;
        }
        self.lines = wrapping::wrap_pre_line(&self.text, text_width);
        self.wrapped_width = Some(text_width);
        self.state.set_content(self.lines.len() as u32);
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.set_viewport(area.width, area.height);
        let lines: Vec<Line<'static>> = self
            .lines
            .iter()
            .map(|l| Line::from(Span::styled(l.clone(), theme.text_primary)))
            .collect();
        viewport::render_text_lines(
            area,
            buf,
            &lines,
            &self.state,
            &ViewportOptions {
                style: theme.panel,
                show_scrollbar: self.state.has_overflow(),
                scrollbar_style: theme.text_muted,
            },
        );
    }
}

#[derive(Clone, Debug)]
pub struct ProjectModalOptions {
    pub width_pct: u16,
    pub height_pct: u16,
    /// Modal widths from here on put the image beside the text instead of above it.
    pub side_by_side_min_width: u16,
    pub bindings: OverlayBindings,
}

impl Default for ProjectModalOptions {
    fn default() -> Self {
        Self {
            width_pct: 94,
            height_pct: 75,
            side_by_side_min_width: 72,
            bindings: OverlayBindings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Redraw,
    Close,
    OpenUrl(Navigation),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ModalLayout {
    modal: Rect,
    image: Rect,
    title: Rect,
    headline: Rect,
    divider: Rect,
    cue: Rect,
    description: Rect,
    cta: Option<Rect>,
}

/// Details of one project over a dimmed page.
#[derive(Clone, Debug)]
pub struct ProjectModal {
    options: ProjectModalOptions,
    project: Project,
    description: ScrollableDescription,
}

impl ProjectModal {
    pub fn new(project: Project) -> Self {
        Self::with_options(project, ProjectModalOptions::default())
    }

    pub fn with_options(project: Project, options: ProjectModalOptions) -> Self {
        let description = ScrollableDescription::new(project.description.clone());
        Self {
            options,
            project,
            description,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn description(&self) -> &ScrollableDescription {
        &self.description
    }

    /// Lays the modal out in `area` and returns whether the scroll cue is showing.
    pub fn show_cue_in(&mut self, area: Rect) -> bool {
        self.layout(area);
        self.description.show_cue()
    }

    pub fn modal_rect(&self, area: Rect) -> Rect {
        overlay::centered_pct(area, self.options.width_pct, self.options.height_pct)
    }

    fn layout(&mut self, area: Rect) -> ModalLayout {
        let modal = self.modal_rect(area);
        let inner = Rect::new(
            modal.x + modal.width.min(1),
            modal.y + modal.height.min(1),
            modal.width.saturating_sub(2),
            modal.height.saturating_sub(2),
        );
        let (image, content) = if self.project.image_src.is_empty() {
            (Rect::new(inner.x, inner.y, 0, 0), inner)
        } else if inner.width >= self.options.side_by_side_min_width {
            let image_w = inner.width * 3 / 5;
            (
                Rect::new(inner.x, inner.y, image_w, inner.height),
                Rect::new(
                    inner.x + image_w + 2,
                    inner.y,
                    inner.width.saturating_sub(image_w + 3),
                    inner.height,
                ),
            )
        } else {
            let image_h = inner.height * 2 / 5;
            (
                Rect::new(inner.x, inner.y, inner.width, image_h),
                Rect::new(
                    inner.x + inner.width.min(1),
                    inner.y + image_h,
                    inner.width.saturating_sub(2),
                    inner.height - image_h,
                ),
            )
        };

        let mut y = content.y;
        let bottom = content.bottom();
        let mut take = |rows: u16| {
            let h = rows.min(bottom - y);
            let rect = Rect::new(content.x, y, content.width, h);
            y += h;
            rect
        };
        let title = take(1);
        let headline_rows = self.headline_lines(content.width).len() as u16;
        let headline = take(headline_rows);
        let divider = take(1);
        let cue = take(1);
        let rest = take(u16::MAX);

        let (description, cta) = match self.project.link() {
            Some(_) if rest.height >= 3 => (
                Rect::new(rest.x, rest.y, rest.width, rest.height - 2),
                Some(Rect::new(rest.x, rest.bottom() - 1, rest.width, 1)),
            ),
            _ => (rest, None),
        };
        self.description
            .set_viewport(description.width, description.height);

        ModalLayout {
            modal,
            image,
            title,
            headline,
            divider,
            cue,
            description,
            cta,
        }
    }

    fn headline_lines(&self, width: u16) -> Vec<String> {
        if self.project.headline.trim().is_empty() {
            return Vec::new();
        }
        wrapping::clamp_lines(&self.project.headline, width.max(1), 2)
    }

    fn cta_button(&self, cta: Rect) -> Rect {
        let label = format!("[ {} ]", self.project.cta_label());
        let w = (UnicodeWidthStr::width(label.as_str()) as u16).min(cta.width);
        Rect::new(cta.x, cta.y, w, cta.height)
    }

    fn open_link(&self) -> ModalAction {
        match self.project.link() {
            Some(url) => {
                tracing::debug!(url, "opening project link");
                ModalAction::OpenUrl(Navigation::external(url))
            }
            None => ModalAction::None,
        }
    }

    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> ModalAction {
        let layout = self.layout(area);
        match event {
            InputEvent::Key(key) => {
                if self.options.bindings.is_close(&key) {
                    return ModalAction::Close;
                }
                if keymap::key_event_matches(&keymap::key(KeyCode::Enter), &key) {
                    return self.open_link();
                }
                if self.description.handle_key(&key) {
                    return ModalAction::Redraw;
                }
                ModalAction::None
            }
            InputEvent::Mouse(mouse) => {
                if self.description.handle_mouse(&mouse) {
                    return ModalAction::Redraw;
                }
                if !mouse.is_left_click() {
                    return ModalAction::None;
                }
                if !mouse.is_within(layout.modal) {
                    return ModalAction::Close;
                }
                match layout.cta {
                    Some(cta) if mouse.is_within(self.cta_button(cta)) => self.open_link(),
                    _ => ModalAction::None,
                }
            }
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        overlay::dim_backdrop(area, buf, theme.backdrop);
        let layout = self.layout(area);
        if layout.modal.width < 3 || layout.modal.height < 3 {
            return;
        }
        render::clear_area(layout.modal, buf, theme.panel);
        render::render_frame(layout.modal, buf, theme.border);

        if !self.project.image_src.is_empty() && layout.image.height > 0 {
            frame::render_image(
                layout.image,
                buf,
                &self.project.title,
                frame::file_name(&self.project.image_src),
                theme.border,
                theme,
            );
        }

        let w = layout.title.width;
        render::render_str_clipped(
            layout.title.x,
            layout.title.y,
            w,
            buf,
            &self.project.title,
            theme.title,
        );
        for (i, line) in self.headline_lines(w).iter().enumerate() {
            if (i as u16) < layout.headline.height {
                render::render_str_clipped(
                    layout.headline.x,
                    layout.headline.y + i as u16,
                    w,
                    buf,
                    line,
                    theme.tagline,
                );
            }
        }
        if layout.divider.height > 0 {
            render::render_str_clipped(
                layout.divider.x,
                layout.divider.y,
                w,
                buf,
                &"─".repeat(w.min(12) as usize),
                theme.border,
            );
        }
        // The cue row stays reserved so text does not jump when the cue goes away.
        if layout.cue.height > 0 && self.description.show_cue() {
            render::render_str_clipped(layout.cue.x, layout.cue.y, w, buf, SCROLL_CUE, theme.accent);
        }
        self.description.render_ref(layout.description, buf, theme);

        if let Some(cta) = layout.cta {
            let button = self.cta_button(cta);
            let label = format!("[ {} ]", self.project.cta_label());
            render::render_str_clipped(button.x, button.y, button.width, buf, &label, theme.button);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkCardAction {
    None,
    Activated,
}

/// Grid card for one project: image, name and headline.
#[derive(Clone, Debug)]
pub struct WorkCard {
    project: Project,
    focused: bool,
}

impl WorkCard {
    pub const HEIGHT: u16 = 9;

    pub fn new(project: Project) -> Self {
        Self {
            project,
            focused: false,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn name(&self) -> &str {
        if self.project.title.trim().is_empty() {
            DEFAULT_NAME
        } else {
            &self.project.title
        }
    }

    pub fn headline(&self) -> &str {
        if self.project.headline.trim().is_empty() {
            DEFAULT_HEADLINE
        } else {
            &self.project.headline
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn handle_key(&self, key: &KeyEvent) -> WorkCardAction {
        let activate = [keymap::key(KeyCode::Enter), keymap::key_char(' ')];
        if self.focused && keymap::matches_any(&activate, key) {
            WorkCardAction::Activated
        } else {
            WorkCardAction::None
        }
    }

    pub fn handle_click(&self, area: Rect, mouse: &MouseEvent) -> WorkCardAction {
        if mouse.is_left_click() && mouse.is_within(area) {
            WorkCardAction::Activated
        } else {
            WorkCardAction::None
        }
    }

    fn lines(&self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        let border = if self.focused {
            theme.accent
        } else {
            theme.border
        };
        let inner = width.saturating_sub(2) as usize;
        let image_rows = Self::HEIGHT.saturating_sub(4);
        let mut lines = frame::image_lines(
            width,
            image_rows,
            self.name(),
            frame::file_name(&self.project.image_src),
            border,
            theme,
        );
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(render::truncate_with_ellipsis(self.name(), inner), theme.title),
        ]));
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(
                render::truncate_with_ellipsis(self.headline(), inner),
                theme.text_muted,
            ),
        ]));
        lines.push(Line::from(Span::styled("─".repeat(width as usize), border)));
        lines.push(Line::default());
        lines
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer, skip: u32, theme: &Theme) {
        let lines = self.lines(area.width, theme);
        stack::render_lines_from(area, buf, &lines, skip, theme.text_primary);
    }
}

#[derive(Clone, Debug)]
pub struct PortfolioOptions {
    pub heading: String,
    pub min_card_width: u16,
    pub max_columns: u16,
    pub gap: u16,
    pub scroll: ScrollBindings,
    pub modal: ProjectModalOptions,
    pub footer: FooterOptions,
}

impl Default for PortfolioOptions {
    fn default() -> Self {
        Self {
            heading: "Work.".to_string(),
            min_card_width: 28,
            max_columns: 3,
            gap: 2,
            scroll: ScrollBindings::default(),
            modal: ProjectModalOptions::default(),
            footer: FooterOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortfolioAction {
    None,
    Redraw,
    ModalOpened(usize),
    ModalClosed,
    Navigate(Navigation),
}

const HEADING_SECTION: usize = 0;
const GRID_SECTION: usize = 1;
const FOOTER_SECTION: usize = 2;

/// Heading, a grid of [`WorkCard`]s and the footer in one scrolling page.
///
/// Activating a card opens a [`ProjectModal`], which takes all input until it closes.
#[derive(Debug)]
pub struct PortfolioPage {
    options: PortfolioOptions,
    cards: Vec<WorkCard>,
    focused: usize,
    modal: Option<ProjectModal>,
    footer: Footer,
    state: ViewportState,
}

impl PortfolioPage {
    pub fn new(projects: Vec<Project>) -> Self {
        Self::with_options(projects, PortfolioOptions::default())
    }

    pub fn with_options(projects: Vec<Project>, options: PortfolioOptions) -> Self {
        let footer = Footer::new(options.footer.clone());
        let mut page = Self {
            options,
            cards: projects.into_iter().map(WorkCard::new).collect(),
            focused: 0,
            modal: None,
            footer,
            state: ViewportState::default(),
        };
        page.focus(0);
        page
    }

    pub fn cards(&self) -> &[WorkCard] {
        &self.cards
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn modal(&self) -> Option<&ProjectModal> {
        self.modal.as_ref()
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    fn focus(&mut self, index: usize) {
        self.focused = index.min(self.cards.len().saturating_sub(1));
        for (i, card) in self.cards.iter_mut().enumerate() {
            card.set_focused(i == self.focused);
        }
    }

    pub fn open(&mut self, index: usize) -> PortfolioAction {
        let Some(card) = self.cards.get(index) else {
            return PortfolioAction::None;
        };
        tracing::debug!(index, title = %card.project().title, "opening project");
        self.modal = Some(ProjectModal::with_options(
            card.project().clone(),
            self.options.modal.clone(),
        ));
        self.focus(index);
        PortfolioAction::ModalOpened(index)
    }

    pub fn close_modal(&mut self) -> bool {
        self.modal.take().is_some()
    }

    fn columns(&self, width: u16) -> u16 {
        let o = &self.options;
        (width.saturating_add(o.gap) / o.min_card_width.saturating_add(o.gap).max(1))
            .clamp(1, o.max_columns.max(1))
    }

    /// Grid-local rect of card `index` at `width`, with `y` in rows from the grid top.
    fn card_slot(&self, width: u16, index: usize) -> (u16, u32, u16) {
        let columns = self.columns(width);
        let gap = self.options.gap;
        let card_w = width.saturating_sub(gap * (columns - 1)) / columns;
        let col = (index % columns as usize) as u16;
        let row = (index / columns as usize) as u32;
        (col * (card_w + gap), row * WorkCard::HEIGHT as u32, card_w)
    }

    /// On-screen rect and skipped rows of every card at least partly in view.
    fn visible_cards(&self, area: Rect, layout: &PageLayout) -> Vec<(usize, Rect, u32)> {
        let Some((grid, skip)) = layout.visible(GRID_SECTION, area, self.state.y) else {
            return Vec::new();
        };
        let view_bottom = skip + grid.height as u32;
        (0..self.cards.len())
            .filter_map(|i| {
                let (x, top, width) = self.card_slot(area.width, i);
                let bottom = top + WorkCard::HEIGHT as u32;
                if bottom <= skip || top >= view_bottom {
                    return None;
                }
                let first = top.max(skip);
                let last = bottom.min(view_bottom);
                let rect = Rect::new(
                    grid.x + x,
                    grid.y + (first - skip) as u16,
                    width,
                    (last - first) as u16,
                );
                Some((i, rect, first - top))
            })
            .collect()
    }

    fn grid_height(&self, width: u16) -> u32 {
        let columns = self.columns(width) as usize;
        self.cards.len().div_ceil(columns) as u32 * WorkCard::HEIGHT as u32
    }

    fn page_layout(&mut self, width: u16, theme: &Theme) -> PageLayout {
        PageLayout::from_heights([
            3,
            self.grid_height(width),
            self.footer.height(width, theme),
        ])
    }

    fn sync_viewport(&mut self, area: Rect, theme: &Theme) -> PageLayout {
        let layout = self.page_layout(area.width, theme);
        self.state.set_viewport(area.width, area.height);
        self.state.set_content(layout.total_height());
        layout
    }

    fn reveal_focused(&mut self, area: Rect, layout: &PageLayout) {
        let Some(grid) = layout.slot(GRID_SECTION) else {
            return;
        };
        let (_, y, _) = self.card_slot(area.width, self.focused);
        let top = grid.top + y;
        let bottom = top + WorkCard::HEIGHT as u32;
        if top < self.state.y {
            self.state.scroll_to(top);
        } else if bottom > self.state.y + area.height as u32 {
            self.state.scroll_to(bottom.saturating_sub(area.height as u32));
        }
    }

    pub fn handle_event_in_area(&mut self, area: Rect, event: InputEvent) -> PortfolioAction {
        if let Some(modal) = self.modal.as_mut() {
            return match modal.handle_event_in_area(area, event) {
                ModalAction::None => PortfolioAction::None,
                ModalAction::Redraw => PortfolioAction::Redraw,
                ModalAction::Close => {
                    self.modal = None;
                    PortfolioAction::ModalClosed
                }
                ModalAction::OpenUrl(target) => PortfolioAction::Navigate(target),
            };
        }
        let layout = self.sync_viewport(area, &Theme::default());
        match event {
            InputEvent::Key(key) => self.handle_key(area, &layout, &key),
            InputEvent::Mouse(mouse) => {
                if self.options.scroll.apply_mouse(&mut self.state, &mouse) {
                    return PortfolioAction::Redraw;
                }
                if !mouse.is_left_click() {
                    return PortfolioAction::None;
                }
                let clicked = self
                    .visible_cards(area, &layout)
                    .into_iter()
                    .find(|(i, rect, _)| {
                        self.cards[*i].handle_click(*rect, &mouse) == WorkCardAction::Activated
                    });
                if let Some((index, _, _)) = clicked {
                    return self.open(index);
                }
                match layout.hit(area, self.state.y, mouse.y) {
                    Some((FOOTER_SECTION, row)) => {
                        let action = self.footer.click(area.width, mouse.x.saturating_sub(area.x), row);
                        self.footer_action(action)
                    }
                    _ => PortfolioAction::None,
                }
            }
        }
    }

    fn handle_key(&mut self, area: Rect, layout: &PageLayout, key: &KeyEvent) -> PortfolioAction {
        if let Some(card) = self.cards.get(self.focused) {
            if card.handle_key(key) == WorkCardAction::Activated {
                return self.open(self.focused);
            }
        }
        let columns = self.columns(area.width) as usize;
        let pressed = |keys: &[KeyEvent]| keymap::matches_any(keys, key);
        let next = if pressed(&[
            keymap::key(KeyCode::Tab),
            keymap::key(KeyCode::Right),
            keymap::key_char('l'),
        ]) {
            Some(self.focused + 1)
        } else if pressed(&[
            keymap::key(KeyCode::BackTab),
            keymap::key(KeyCode::Left),
            keymap::key_char('h'),
        ]) {
            self.focused.checked_sub(1)
        } else if pressed(&[keymap::key(KeyCode::Down), keymap::key_char('j')]) {
            Some(self.focused + columns)
        } else if pressed(&[keymap::key(KeyCode::Up), keymap::key_char('k')]) {
            self.focused.checked_sub(columns)
        } else {
            None
        };
        if let Some(next) = next.filter(|&n| n < self.cards.len()) {
            self.focus(next);
            self.reveal_focused(area, layout);
            return PortfolioAction::Redraw;
        }
        match self.options.scroll.action_for(key) {
            Some(action) => {
                self.options.scroll.apply(&mut self.state, action);
                PortfolioAction::Redraw
            }
            None => PortfolioAction::None,
        }
    }

    fn footer_action(&mut self, action: FooterAction) -> PortfolioAction {
        match action {
            FooterAction::None => PortfolioAction::None,
            FooterAction::ScrollToTop => {
                self.state.to_top();
                PortfolioAction::Redraw
            }
            FooterAction::Open(target) => PortfolioAction::Navigate(target),
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let layout = self.sync_viewport(area, theme);
        let y = self.state.y;

        if let Some((rect, skip)) = layout.visible(HEADING_SECTION, area, y) {
            let lines = [
                Line::default(),
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(self.options.heading.clone(), theme.heading),
                ]),
                Line::default(),
            ];
            stack::render_lines_from(rect, buf, &lines, skip, theme.text_primary);
        }

        for (i, rect, skip) in self.visible_cards(area, &layout) {
            self.cards[i].render_ref(rect, buf, skip, theme);
        }

        if let Some((rect, skip)) = layout.visible(FOOTER_SECTION, area, y) {
            self.footer.render_rows(rect, buf, skip, theme);
        }

        if let Some(modal) = self.modal.as_mut() {
            modal.render_ref(area, buf, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect::new(0, 0, 100, 40);

    fn project(title: &str, description: &str, url: Option<&str>) -> Project {
        Project {
            title: title.into(),
            headline: "A small tool".into(),
            description: description.into(),
            image_src: "/images/tool.png".into(),
            url: url.map(Into::into),
            cta_text: None,
        }
    }

    fn screen(buf: &Buffer) -> String {
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
    fn short_description_never_shows_the_cue() {
        let mut description = ScrollableDescription::new("One line.\nTwo lines.");
        description.set_viewport(30, 5);
        assert!(!description.show_cue());
        for _ in 0..5 {
            description.scroll_y_by(3);
            assert!(!description.show_cue());
            description.scroll_y_by(-1);
            assert!(!description.show_cue());
        }
    }

    #[test]
    fn long_description_hides_the_cue_at_the_bottom() {
        let text = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut description = ScrollableDescription::new(text);
        description.set_viewport(30, 5);
        assert!(description.show_cue());
        description.scroll_y_by(14);
        assert!(description.show_cue());
        description.scroll_y_by(1);
        assert!(!description.show_cue());
    }

    #[test]
    fn new_text_rewraps_before_the_first_layout() {
        let text = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let mut description = ScrollableDescription::new(text);
        description.set_viewport(0, 3);
        assert!(description.show_cue());

        description.set_text("");
        assert!(!description.show_cue());
        assert!(description.state().content_h <= 3);

        description.set_text("a\nb\nc\nd\ne");
        assert_eq!(description.state().content_h, 5);
        assert!(description.show_cue());
    }

    #[test]
    fn resizing_rederives_the_cue() {
        let mut description = ScrollableDescription::new("alpha beta gamma delta epsilon");
        description.set_viewport(40, 1);
        assert!(!description.show_cue());
        description.set_viewport(8, 1);
        assert!(description.show_cue());
    }

    #[test]
    fn cta_defaults_and_opens_the_link() {
        let mut modal = ProjectModal::new(project("Tool", "Short.", Some("https://tool.dev")));
        let mut buf = Buffer::empty(AREA);
        modal.render_ref(AREA, &mut buf, &Theme::default());
        let text = screen(&buf);
        assert!(text.contains("Visit project ↗"));
        assert!(text.contains("A small tool"));
        assert!(!text.contains("Scroll ▾"));

        assert_eq!(
            modal.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)),
            ModalAction::OpenUrl(Navigation::external("https://tool.dev"))
        );
    }

    #[test]
    fn modal_without_link_has_no_button() {
        let mut modal = ProjectModal::new(project("Tool", "Short.", None));
        let mut buf = Buffer::empty(AREA);
        modal.render_ref(AREA, &mut buf, &Theme::default());
        assert!(!screen(&buf).contains("Visit project"));
        assert_eq!(
            modal.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)),
            ModalAction::None
        );
    }

    #[test]
    fn escape_and_backdrop_close_the_modal() {
        let mut modal = ProjectModal::new(project("Tool", "Short.", None));
        assert_eq!(
            modal.handle_event_in_area(AREA, InputEvent::key(KeyCode::Esc)),
            ModalAction::Close
        );
        assert_eq!(
            modal.handle_event_in_area(AREA, InputEvent::click(0, 0)),
            ModalAction::Close
        );
        let rect = modal.modal_rect(AREA);
        assert_eq!(
            modal.handle_event_in_area(AREA, InputEvent::click(rect.x + 2, rect.y + 2)),
            ModalAction::None
        );
    }

    #[test]
    fn long_modal_description_shows_the_cue() {
        let text = (0..60).map(|i| format!("paragraph {i}")).collect::<Vec<_>>().join("\n");
        let mut modal = ProjectModal::new(project("Tool", &text, None));
        assert!(modal.show_cue_in(AREA));
        let mut buf = Buffer::empty(AREA);
        modal.render_ref(AREA, &mut buf, &Theme::default());
        assert!(screen(&buf).contains("Scroll ▾"));
    }

    #[test]
    fn work_card_defaults_and_activation() {
        let mut card = WorkCard::new(Project::default());
        assert_eq!(card.name(), "Project Name");
        assert_eq!(card.headline(), "Headline");
        assert_eq!(
            card.handle_key(&keymap::key(KeyCode::Enter)),
            WorkCardAction::None
        );
        card.set_focused(true);
        assert_eq!(
            card.handle_key(&keymap::key_char(' ')),
            WorkCardAction::Activated
        );
        let InputEvent::Mouse(click) = InputEvent::click(3, 3) else {
            panic!("click is a mouse event");
        };
        let area = Rect::new(0, 0, 20, 9);
        assert_eq!(card.handle_click(area, &click), WorkCardAction::Activated);
        assert_eq!(
            card.handle_click(Rect::new(10, 0, 20, 9), &click),
            WorkCardAction::None
        );
    }

    #[test]
    fn portfolio_opens_and_closes_the_modal() {
        let mut page = PortfolioPage::new(vec![
            project("One", "First.", None),
            project("Two", "Second.", Some("https://two.dev")),
        ]);
        assert_eq!(
            page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Right)),
            PortfolioAction::Redraw
        );
        assert_eq!(page.focused(), 1);
        assert_eq!(
            page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)),
            PortfolioAction::ModalOpened(1)
        );
        assert_eq!(page.modal().map(|m| m.project().title.as_str()), Some("Two"));
        assert_eq!(
            page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)),
            PortfolioAction::Navigate(Navigation::external("https://two.dev"))
        );
        assert_eq!(
            page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Esc)),
            PortfolioAction::ModalClosed
        );
        assert!(page.modal().is_none());
    }

    #[test]
    fn clicking_a_card_opens_it() {
        let mut page = PortfolioPage::new(vec![project("One", "First.", None)]);
        let mut buf = Buffer::empty(AREA);
        page.render_ref(AREA, &mut buf, &Theme::default());
        // Heading takes three rows; the first card starts right below.
        assert_eq!(
            page.handle_event_in_area(AREA, InputEvent::click(4, 5)),
            PortfolioAction::ModalOpened(0)
        );
    }
}
