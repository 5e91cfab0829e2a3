//! Photo dump: a grid of images listed one URL per line, with a lightbox.
//!
//! The grid shows one horizontal cell per URL as soon as the content is set. Image dimensions
//! arrive later from [`probe`] workers and reclassify cells in place; the order never changes.
//! Every [`PhotoGallery::set_content`] and [`PhotoGallery::unmount`] starts a new generation,
//! and responses tagged with an older generation are ignored.
use crate::frame;
use folio_core::input::InputEvent;
use folio_core::input::KeyCode;
use folio_core::input::KeyEvent;
use folio_core::keymap;
use folio_core::placeholder;
use folio_core::stack;
use folio_core::stack::Section;
use folio_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

pub mod lightbox;
pub mod probe;

pub use lightbox::Lightbox;
pub use lightbox::LightboxAction;
pub use lightbox::LightboxImage;
pub use probe::DimensionProbe;
pub use probe::ProbeResponse;

// Shared by every gallery so tickets from one gallery can never match another.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Image URLs of a photo dump: one per line, blank lines dropped, order kept.
pub fn parse_image_urls(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Portrait images are vertical; square and landscape images are horizontal.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height > width {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// Identifies one probe: which gallery generation asked, and for which cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProbeTicket {
    generation: u64,
    index: usize,
}

impl ProbeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeRequest {
    pub ticket: ProbeTicket,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeOutcome {
    Loaded { width: u32, height: u32 },
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryCell {
    pub url: String,
    pub orientation: Orientation,
    /// Pixel size once a probe has loaded it.
    pub dimensions: Option<(u32, u32)>,
}

#[derive(Clone, Debug)]
pub struct GalleryBindings {
    pub prev: Vec<KeyEvent>,
    pub next: Vec<KeyEvent>,
    pub open: Vec<KeyEvent>,
}

impl Default for GalleryBindings {
    fn default() -> Self {
        Self {
            prev: vec![keymap::key(KeyCode::Left), keymap::key_char('h')],
            next: vec![keymap::key(KeyCode::Right), keymap::key_char('l')],
            open: vec![keymap::key(KeyCode::Enter)],
        }
    }
}

#[derive(Clone, Debug)]
pub struct PhotoGalleryOptions {
    pub min_cell_width: u16,
    pub max_columns: u16,
    /// Rows of a horizontal cell. Vertical cells are twice as tall.
    pub cell_height: u16,
    pub gap: u16,
    pub bindings: GalleryBindings,
}

impl Default for PhotoGalleryOptions {
    fn default() -> Self {
        Self {
            min_cell_width: 22,
            max_columns: 3,
            cell_height: 6,
            gap: 1,
            bindings: GalleryBindings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryAction {
    None,
    Redraw,
    LightboxOpened(usize),
    LightboxClosed,
}

/// Where a cell sits inside the grid, in grid-local columns and rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSlot {
    pub index: usize,
    pub x: u16,
    pub y: u32,
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Default)]
pub struct PhotoGallery {
    options: PhotoGalleryOptions,
    generation: u64,
    cells: Vec<GalleryCell>,
    selected: usize,
    lightbox: Lightbox,
}

impl PhotoGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PhotoGalleryOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Replaces the gallery content and returns one probe request per image.
    ///
    /// All cells start out horizontal. Responses for earlier content are ignored from here on.
    pub fn set_content(&mut self, content: &str) -> Vec<ProbeRequest> {
        self.generation = next_generation();
        self.selected = 0;
        self.lightbox.close();
        self.cells = parse_image_urls(content)
            .into_iter()
            .map(|url| GalleryCell {
                url,
                orientation: Orientation::Horizontal,
                dimensions: None,
            })
            .collect();
        tracing::debug!(
            generation = self.generation,
            images = self.cells.len(),
            "photo dump mounted"
        );
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| ProbeRequest {
                ticket: ProbeTicket {
                    generation: self.generation,
                    index,
                },
                url: cell.url.clone(),
            })
            .collect()
    }

    /// Applies a probe result. Returns `false` if the ticket is stale or out of range.
    pub fn resolve(&mut self, ticket: ProbeTicket, outcome: ProbeOutcome) -> bool {
        if ticket.generation != self.generation {
            tracing::trace!(
                ticket = ticket.generation,
                current = self.generation,
                "ignoring stale probe result"
            );
            return false;
        }
        let Some(cell) = self.cells.get_mut(ticket.index) else {
            return false;
        };
        match outcome {
            ProbeOutcome::Loaded { width, height } => {
                cell.orientation = Orientation::from_dimensions(width, height);
                cell.dimensions = Some((width, height));
            }
            ProbeOutcome::Failed => {
                cell.orientation = Orientation::Horizontal;
                cell.dimensions = None;
            }
        }
        self.lightbox.set_dimensions(ticket.index, cell.dimensions);
        true
    }

    pub fn apply(&mut self, response: ProbeResponse) -> bool {
        self.resolve(response.ticket, response.outcome)
    }

    /// Drops the content; every probe still in flight becomes a no-op.
    pub fn unmount(&mut self) {
        self.generation = next_generation();
        self.cells.clear();
        self.selected = 0;
        self.lightbox.close();
        tracing::debug!(generation = self.generation, "photo dump unmounted");
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cells(&self) -> &[GalleryCell] {
        &self.cells
    }

    /// `true` while there is nothing to show and the empty state renders instead.
    pub fn is_placeholder(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.cells.is_empty()).then_some(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.cells.len() {
            self.selected = index;
        }
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Shows cell `index` alone in the lightbox.
    pub fn open(&mut self, index: usize) -> GalleryAction {
        let Some(cell) = self.cells.get(index) else {
            return GalleryAction::None;
        };
        self.selected = index;
        self.lightbox.open(LightboxImage {
            index,
            url: cell.url.clone(),
            dimensions: cell.dimensions,
        });
        GalleryAction::LightboxOpened(index)
    }

    /// Cursor movement and opening. The lightbox gets keys first while it is open.
    pub fn handle_key(&mut self, key: &KeyEvent) -> GalleryAction {
        if self.lightbox.is_open() {
            return match self.lightbox.handle_key(key) {
                LightboxAction::Closed => GalleryAction::LightboxClosed,
                LightboxAction::None => GalleryAction::None,
            };
        }
        if self.cells.is_empty() {
            return GalleryAction::None;
        }
        let b = &self.options.bindings;
        if keymap::matches_any(&b.prev, key) {
            if self.selected == 0 {
                return GalleryAction::None;
            }
            self.selected -= 1;
            return GalleryAction::Redraw;
        }
        if keymap::matches_any(&b.next, key) {
            if self.selected + 1 >= self.cells.len() {
                return GalleryAction::None;
            }
            self.selected += 1;
            return GalleryAction::Redraw;
        }
        if keymap::matches_any(&b.open, key) {
            return self.open(self.selected);
        }
        GalleryAction::None
    }

    /// Routes an event to the open lightbox covering `area`.
    pub fn handle_lightbox_event(&mut self, area: Rect, event: InputEvent) -> GalleryAction {
        match self.lightbox.handle_event_in_area(area, event) {
            LightboxAction::Closed => GalleryAction::LightboxClosed,
            LightboxAction::None => GalleryAction::None,
        }
    }

    pub fn render_lightbox(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.lightbox.render_ref(area, buf, theme);
    }

    /// Grid geometry at `width` columns, in index order, and the total height.
    pub fn grid(&self, width: u16) -> (Vec<GridSlot>, u32) {
        let o = &self.options;
        let gap = o.gap;
        let columns = (width.saturating_add(gap) / o.min_cell_width.saturating_add(gap).max(1))
            .clamp(1, o.max_columns.max(1));
        let cell_width = width.saturating_sub(gap * (columns - 1)) / columns;

        let mut slots = Vec::with_capacity(self.cells.len());
        let mut y = 0u32;
        for (row, chunk) in self.cells.chunks(columns as usize).enumerate() {
            if row > 0 {
                y += gap as u32;
            }
            let mut row_height = 0u16;
            for (col, cell) in chunk.iter().enumerate() {
                let height = match cell.orientation {
                    Orientation::Horizontal => o.cell_height,
                    Orientation::Vertical => o.cell_height * 2,
                };
                row_height = row_height.max(height);
                slots.push(GridSlot {
                    index: row * columns as usize + col,
                    x: col as u16 * (cell_width + gap),
                    y,
                    width: cell_width,
                    height,
                });
            }
            y += row_height as u32;
        }
        (slots, y)
    }

    /// Grid-local rows `(top, height)` of cell `index`.
    pub fn cell_rows(&self, width: u16, index: usize) -> Option<(u32, u32)> {
        let (slots, _) = self.grid(width);
        slots.get(index).map(|s| (s.y, s.height as u32))
    }

    /// The cell under grid-local column `x` and row `y`.
    pub fn cell_at(&self, width: u16, x: u16, y: u32) -> Option<usize> {
        let (slots, _) = self.grid(width);
        slots
            .iter()
            .find(|s| {
                x >= s.x && x < s.x + s.width && y >= s.y && y < s.y + s.height as u32
            })
            .map(|s| s.index)
    }

    fn lines(&self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        if self.cells.is_empty() {
            return placeholder::empty_state_lines(width, theme);
        }
        let (slots, total) = self.grid(width);
        let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new(); total as usize];
        let mut filled: Vec<u16> = vec![0; total as usize];

        for slot in &slots {
            let cell = &self.cells[slot.index];
            let border = if slot.index == self.selected {
                theme.accent
            } else {
                theme.border
            };
            let label = format!("Photo {}", slot.index + 1);
            let detail = match cell.orientation {
                Orientation::Horizontal => frame::file_name(&cell.url).to_string(),
                Orientation::Vertical => format!("▯ {}", frame::file_name(&cell.url)),
            };
            let lines = frame::image_lines(slot.width, slot.height, &label, &detail, border, theme);
            for (dy, line) in lines.into_iter().enumerate() {
                let row = slot.y as usize + dy;
                if slot.x > filled[row] {
                    rows[row].push(Span::raw(" ".repeat((slot.x - filled[row]) as usize)));
                }
                rows[row].extend(line.spans);
                filled[row] = slot.x + slot.width;
            }
        }
        rows.into_iter().map(Line::from).collect()
    }
}

impl Section for PhotoGallery {
    fn height(&mut self, width: u16, _theme: &Theme) -> u32 {
        if self.cells.is_empty() {
            return (placeholder::EMPTY_STATE_PADDING * 2 + 1) as u32;
        }
        self.grid(width).1
    }

    fn render_rows(&mut self, area: Rect, buf: &mut Buffer, skip: u32, theme: &Theme) {
        let lines = self.lines(area.width, theme);
        stack::render_lines_from(area, buf, &lines, skip, theme.text_primary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loaded(width: u32, height: u32) -> ProbeOutcome {
        ProbeOutcome::Loaded { width, height }
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        assert_eq!(
            parse_image_urls("https://x/a.jpg\nhttps://x/b.jpg\n\n"),
            ["https://x/a.jpg", "https://x/b.jpg"]
        );
        assert_eq!(parse_image_urls("  a.jpg \r\n\t\n b.jpg"), ["a.jpg", "b.jpg"]);
    }

    #[test]
    fn blank_content_is_a_placeholder() {
        let mut gallery = PhotoGallery::new();
        assert!(gallery.set_content(" \n\n ").is_empty());
        assert!(gallery.is_placeholder());
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 5));
        gallery.render_rows(Rect::new(0, 0, 40, 5), &mut buf, 0, &Theme::default());
        let row: String = (0..40)
            .map(|x| buf.cell((x, 2)).unwrap().symbol().to_string())
            .collect();
        assert!(row.contains("I will write this soon"));
    }

    #[test]
    fn cells_start_horizontal_and_reclassify_in_place() {
        let mut gallery = PhotoGallery::new();
        let requests = gallery.set_content("a.jpg\nb.jpg\nc.jpg");
        assert_eq!(requests.len(), 3);
        assert!(
            gallery
                .cells()
                .iter()
                .all(|c| c.orientation == Orientation::Horizontal)
        );

        // Completion order is arbitrary.
        assert!(gallery.resolve(requests[2].ticket, loaded(600, 900)));
        assert!(gallery.resolve(requests[0].ticket, ProbeOutcome::Failed));
        assert!(gallery.resolve(requests[1].ticket, loaded(900, 900)));

        let urls: Vec<_> = gallery.cells().iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, ["a.jpg", "b.jpg", "c.jpg"]);
        let orientations: Vec<_> = gallery.cells().iter().map(|c| c.orientation).collect();
        assert_eq!(
            orientations,
            [
                Orientation::Horizontal,
                Orientation::Horizontal,
                Orientation::Vertical
            ]
        );
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let mut gallery = PhotoGallery::new();
        let old = gallery.set_content("a.jpg");
        let new = gallery.set_content("b.jpg");
        assert!(!gallery.resolve(old[0].ticket, loaded(1, 2)));
        assert_eq!(gallery.cells()[0].orientation, Orientation::Horizontal);
        assert!(gallery.resolve(new[0].ticket, loaded(1, 2)));

        gallery.unmount();
        assert!(!gallery.resolve(new[0].ticket, loaded(1, 2)));
        assert!(gallery.cells().is_empty());
    }

    #[test]
    fn tickets_never_cross_galleries() {
        let mut a = PhotoGallery::new();
        let mut b = PhotoGallery::new();
        let from_a = a.set_content("x.jpg");
        b.set_content("y.jpg");
        assert!(!b.resolve(from_a[0].ticket, loaded(1, 2)));
    }

    #[test]
    fn vertical_cells_are_twice_as_tall() {
        let mut gallery = PhotoGallery::new();
        let requests = gallery.set_content("a.jpg\nb.jpg\nc.jpg\nd.jpg");
        gallery.resolve(requests[1].ticket, loaded(2, 3));
        let (slots, total) = gallery.grid(70);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0].height, 6);
        assert_eq!(slots[1].height, 12);
        // Three columns, second row starts below the tall cell.
        assert_eq!(slots[3].y, 13);
        assert_eq!(total, 19);
        assert_eq!(gallery.cell_at(70, slots[1].x, 11), Some(1));
        assert_eq!(gallery.cell_at(70, slots[0].x, 11), None);
    }

    #[test]
    fn narrow_width_uses_one_column() {
        let mut gallery = PhotoGallery::new();
        gallery.set_content("a.jpg\nb.jpg");
        let (slots, _) = gallery.grid(20);
        assert!(slots.iter().all(|s| s.x == 0 && s.width == 20));
    }

    #[test]
    fn keys_move_the_cursor_and_open_the_lightbox() {
        let mut gallery = PhotoGallery::new();
        gallery.set_content("a.jpg\nb.jpg");
        assert_eq!(gallery.handle_key(&keymap::key(KeyCode::Left)), GalleryAction::None);
        assert_eq!(gallery.handle_key(&keymap::key(KeyCode::Right)), GalleryAction::Redraw);
        assert_eq!(
            gallery.handle_key(&keymap::key(KeyCode::Enter)),
            GalleryAction::LightboxOpened(1)
        );
        assert_eq!(gallery.lightbox().image().map(|i| i.url.as_str()), Some("b.jpg"));
        assert_eq!(
            gallery.handle_key(&keymap::key(KeyCode::Esc)),
            GalleryAction::LightboxClosed
        );
        assert!(!gallery.lightbox().is_open());
    }

    #[test]
    fn probe_results_reach_the_open_lightbox() {
        let mut gallery = PhotoGallery::new();
        let requests = gallery.set_content("a.jpg");
        gallery.open(0);
        gallery.resolve(requests[0].ticket, loaded(600, 900));
        assert_eq!(
            gallery.lightbox().image().and_then(|i| i.dimensions),
            Some((600, 900))
        );
    }

    proptest! {
        #[test]
        fn one_cell_per_non_blank_line(lines in proptest::collection::vec("[ a-z./:]{0,12}", 0..20)) {
            let content = lines.join("\n");
            let mut gallery = PhotoGallery::new();
            let requests = gallery.set_content(&content);
            let expected: Vec<String> = lines
                .iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            prop_assert_eq!(requests.len(), expected.len());
            let urls: Vec<String> = gallery.cells().iter().map(|c| c.url.clone()).collect();
            prop_assert_eq!(urls, expected);
            prop_assert_eq!(gallery.is_placeholder(), content.trim().is_empty());
        }

        #[test]
        fn orientation_follows_dimensions(width in 1u32..5000, height in 1u32..5000) {
            let mut gallery = PhotoGallery::new();
            let requests = gallery.set_content("a.jpg");
            gallery.resolve(requests[0].ticket, loaded(width, height));
            let vertical = gallery.cells()[0].orientation == Orientation::Vertical;
            prop_assert_eq!(vertical, height > width);
        }
    }
}
