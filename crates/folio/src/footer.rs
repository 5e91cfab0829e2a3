//! Page footer: social links, the webring and a back-to-top control.
use crate::navigation::Navigation;
use folio_core::stack;
use folio_core::stack::Section;
use folio_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use serde::Deserialize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const WEBRING_PREV_LABEL: &str = "←";
const WEBRING_HOME_LABEL: &str = "CS Webring";
const WEBRING_NEXT_LABEL: &str = "→";
const TOP_LABEL: &str = "↑ Back to top";
const SEPARATOR: &str = " · ";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FooterOptions {
    pub socials: Vec<SocialLink>,
    pub webring_prev: String,
    pub webring_home: String,
    pub webring_next: String,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            socials: Vec::new(),
            webring_prev: "https://cs.uwatering.com/#https://fiona-cai.vercel.app?nav=prev"
                .to_string(),
            webring_home: "https://cs.uwatering.com/#https://fiona-cai.vercel.app/".to_string(),
            webring_next: "https://cs.uwatering.com/#https://fiona-cai.vercel.app?nav=next"
                .to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FooterTarget {
    Social(usize),
    WebringPrev,
    WebringHome,
    WebringNext,
    ScrollToTop,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FooterAction {
    None,
    ScrollToTop,
    Open(Navigation),
}

/// Clickable span of a footer row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hotspot {
    pub target: FooterTarget,
    pub row: u32,
    pub x: u16,
    pub width: u16,
}

#[derive(Clone, Debug, Default)]
pub struct Footer {
    options: FooterOptions,
    focused: Option<FooterTarget>,
}

impl Footer {
    pub fn new(options: FooterOptions) -> Self {
        Self {
            options,
            focused: None,
        }
    }

    pub fn options(&self) -> &FooterOptions {
        &self.options
    }

    /// Every target in reading order.
    pub fn targets(&self) -> Vec<FooterTarget> {
        let mut targets: Vec<_> = (0..self.options.socials.len())
            .map(FooterTarget::Social)
            .collect();
        targets.extend([
            FooterTarget::WebringPrev,
            FooterTarget::WebringHome,
            FooterTarget::WebringNext,
            FooterTarget::ScrollToTop,
        ]);
        targets
    }

    pub fn focused(&self) -> Option<FooterTarget> {
        self.focused
    }

    /// Highlights `target`, or nothing.
    pub fn set_focus(&mut self, target: Option<FooterTarget>) {
        self.focused = target;
    }

    pub fn activate(&self, target: FooterTarget) -> FooterAction {
        let url = match target {
            FooterTarget::ScrollToTop => return FooterAction::ScrollToTop,
            FooterTarget::Social(i) => match self.options.socials.get(i) {
                Some(link) => &link.url,
                None => return FooterAction::None,
            },
            FooterTarget::WebringPrev => &self.options.webring_prev,
            FooterTarget::WebringHome => &self.options.webring_home,
            FooterTarget::WebringNext => &self.options.webring_next,
        };
        FooterAction::Open(Navigation::external(url.clone()))
    }

    pub fn hotspots(&self, width: u16) -> Vec<Hotspot> {
        self.layout(width, &Theme::default()).1
    }

    /// The target under footer-local `x` and `row`.
    pub fn target_at(&self, width: u16, x: u16, row: u32) -> Option<FooterTarget> {
        self.hotspots(width)
            .into_iter()
            .find(|h| h.row == row && x >= h.x && x < h.x + h.width)
            .map(|h| h.target)
    }

    pub fn click(&self, width: u16, x: u16, row: u32) -> FooterAction {
        match self.target_at(width, x, row) {
            Some(target) => self.activate(target),
            None => FooterAction::None,
        }
    }

    fn layout(&self, width: u16, theme: &Theme) -> (Vec<Line<'static>>, Vec<Hotspot>) {
        let mut lines = vec![
            Line::from(Span::styled("─".repeat(width as usize), theme.border)),
            Line::default(),
        ];
        let mut hotspots = Vec::new();

        let socials: Vec<(FooterTarget, String)> = self
            .options
            .socials
            .iter()
            .enumerate()
            .map(|(i, link)| (FooterTarget::Social(i), link.label.clone()))
            .collect();
        if !socials.is_empty() {
            self.centered_row(&socials, width, theme.link, theme, &mut lines, &mut hotspots);
        }

        let webring = [
            (FooterTarget::WebringPrev, WEBRING_PREV_LABEL.to_string()),
            (FooterTarget::WebringHome, WEBRING_HOME_LABEL.to_string()),
            (FooterTarget::WebringNext, WEBRING_NEXT_LABEL.to_string()),
        ];
        self.centered_row(&webring, width, theme.text_muted, theme, &mut lines, &mut hotspots);

        lines.push(Line::default());
        let top = [(FooterTarget::ScrollToTop, TOP_LABEL.to_string())];
        self.centered_row(&top, width, theme.text_muted, theme, &mut lines, &mut hotspots);
        lines.push(Line::default());
        (lines, hotspots)
    }

    fn centered_row(
        &self,
        items: &[(FooterTarget, String)],
        width: u16,
        style: Style,
        theme: &Theme,
        lines: &mut Vec<Line<'static>>,
        hotspots: &mut Vec<Hotspot>,
    ) {
        let sep = UnicodeWidthStr::width(SEPARATOR);
        let total: usize = items
            .iter()
            .map(|(_, label)| UnicodeWidthStr::width(label.as_str()))
            .sum::<usize>()
            + sep * items.len().saturating_sub(1);
        let left = (width as usize).saturating_sub(total) / 2;
        let row = lines.len() as u32;

        let mut spans = vec![Span::raw(" ".repeat(left))];
        let mut x = left;
        for (i, (target, label)) in items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, theme.text_muted));
                x += sep;
            }
            let cols = UnicodeWidthStr::width(label.as_str());
            let label_style = if self.focused == Some(*target) {
                theme.button_focused
            } else {
                style
            };
            spans.push(Span::styled(label.clone(), label_style));
            if x < width as usize {
                hotspots.push(Hotspot {
                    target: *target,
                    row,
                    x: x as u16,
                    width: cols.min(width as usize - x) as u16,
                });
            }
            x += cols;
        }
        lines.push(Line::from(spans));
    }
}

impl Section for Footer {
    fn height(&mut self, width: u16, theme: &Theme) -> u32 {
        self.layout(width, theme).0.len() as u32
    }

    fn render_rows(&mut self, area: Rect, buf: &mut Buffer, skip: u32, theme: &Theme) {
        let (lines, _) = self.layout(area.width, theme);
        stack::render_lines_from(area, buf, &lines, skip, theme.text_primary);
    }
}
