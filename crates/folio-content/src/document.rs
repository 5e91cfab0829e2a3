//! Post body parsing: markdown in, a flat list of [`Block`]s out.
//!
//! The document is flat on purpose: nested containers (block quotes, list items, footnote
//! definitions) only contribute line prefixes, and every block remembers where it sat among its
//! container's element children through [`Placement`]. That is all the image-group pass in
//! [`crate::grouping`] needs to find runs of adjacent image paragraphs.
use crate::grouping;
use crate::layout;
use folio_core::placeholder;
use folio_core::text::CodeHighlighter;
use folio_core::theme::Theme;
use pulldown_cmark::Alignment;
use pulldown_cmark::CodeBlockKind;
use pulldown_cmark::CowStr;
use pulldown_cmark::Event;
use pulldown_cmark::HeadingLevel;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::text::Line;
use ratatui::text::Text;
use unicode_width::UnicodeWidthStr;
use url::Url;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InlineFlags {
    pub emphasis: bool,
    pub strong: bool,
    pub strike: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProseStyle {
    Normal,
    Heading(u8),
    BlockQuote,
    List,
}

/// A run of text sharing one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: ProseStyle,
    pub flags: InlineFlags,
    pub inline_code: bool,
    pub link: bool,
    pub muted: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: ProseStyle, flags: InlineFlags) -> Self {
        Self {
            text: text.into(),
            style,
            flags,
            inline_code: false,
            link: false,
            muted: false,
        }
    }

    fn muted(mut self) -> Self {
        self.muted = true;
        self
    }
}

/// Position of a block among the element children of its container.
///
/// `parent` identifies the container (0 is the document root), `index` counts every element
/// child of that container, including ones that produce no block of their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub parent: u32,
    pub index: u32,
}

impl Placement {
    /// Returns `true` if `next` is the element right after `self` in the same container.
    pub fn is_followed_by(&self, next: &Placement) -> bool {
        self.parent == next.parent && self.index.checked_add(1) == Some(next.index)
    }
}

/// Line prefixes contributed by enclosing containers (quote bars, list markers).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Prefix {
    pub initial: Vec<Segment>,
    pub subsequent: Vec<Segment>,
}

impl Prefix {
    pub fn for_line(&self, line: usize) -> &[Segment] {
        if line == 0 {
            &self.initial
        } else {
            &self.subsequent
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProseBlock {
    /// Logical lines, split on hard breaks. Wrapping happens at layout time.
    pub lines: Vec<Vec<Segment>>,
}

/// A paragraph whose only child is a single image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBlock {
    pub url: String,
    pub alt: String,
    pub last_in_group: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    /// Fence tag as written by the author; `None` for untagged and indented code.
    pub language: Option<String>,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    pub aligns: Vec<Alignment>,
    pub head: Vec<Vec<Segment>>,
    pub body: Vec<Vec<Vec<Segment>>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    Prose(ProseBlock),
    Image(ImageBlock),
    Code(CodeBlock),
    Table(TableBlock),
    Rule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub placement: Placement,
    pub prefix: Prefix,
    /// Blank separator line rendered before the block, carrying the enclosing quote bars.
    pub gap: Option<Vec<Segment>>,
}

impl Block {
    pub fn is_image(&self) -> bool {
        matches!(self.kind, BlockKind::Image(_))
    }

    pub fn image(&self) -> Option<&ImageBlock> {
        match &self.kind {
            BlockKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// An image paragraph followed directly by another image paragraph of its group.
    pub fn continues_image_group(&self) -> bool {
        self.image().is_some_and(|image| !image.last_in_group)
    }
}

/// Parse and layout configuration for [`ContentDocument`].
///
/// `show_link_destinations`, `blockquote_prefix` and `base_url` affect parsing; changing them
/// requires a new [`ContentDocument::parse`].
#[derive(Clone, Debug)]
pub struct ContentOptions {
    pub wrap_prose: bool,
    pub show_link_destinations: bool,
    pub blockquote_prefix: String,
    pub code_block_indent: u16,
    /// Resolves relative link and image destinations.
    pub base_url: Option<String>,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            wrap_prose: true,
            show_link_destinations: true,
            blockquote_prefix: "│ ".to_string(),
            code_block_indent: 2,
            base_url: None,
        }
    }
}

/// A parsed post body.
///
/// Blank or whitespace-only markdown never reaches the parser: it yields a placeholder document
/// that renders the empty-state message.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentDocument {
    blocks: Vec<Block>,
    placeholder: bool,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl ContentDocument {
    pub fn parse(markdown: &str, options: &ContentOptions) -> Self {
        if placeholder::is_blank(markdown) {
            return Self::placeholder();
        }
        let mut blocks = Builder::new(options).run(markdown);
        grouping::mark_image_groups(&mut blocks);
        tracing::trace!(blocks = blocks.len(), "parsed post body");
        Self {
            blocks,
            placeholder: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            blocks: Vec::new(),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Lays the document out `width` columns wide.
    ///
    /// Fenced code with a language tag goes through `highlighter`; everything else uses theme
    /// styles only.
    pub fn render(
        &self,
        width: u16,
        theme: &Theme,
        options: &ContentOptions,
        highlighter: Option<&dyn CodeHighlighter>,
    ) -> RenderedContent {
        let lines = if self.placeholder {
            placeholder::empty_state_lines(width, theme)
        } else {
            layout::layout_blocks(&self.blocks, width, theme, options, highlighter)
        };
        RenderedContent { lines }
    }
}

/// Output of [`ContentDocument::render`].
#[derive(Clone, Debug, Default)]
pub struct RenderedContent {
    lines: Vec<Line<'static>>,
}

impl RenderedContent {
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn height(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.lines
    }

    pub fn into_text(self) -> Text<'static> {
        Text::from(self.lines)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContainerKind {
    Root,
    Quote,
    List,
    Item,
    Footnote,
}

#[derive(Debug)]
struct Container {
    id: u32,
    kind: ContainerKind,
    next: u32,
}

#[derive(Debug)]
struct Indent {
    initial: Vec<Segment>,
    subsequent: Vec<Segment>,
    used: bool,
}

#[derive(Debug)]
struct ListCtx {
    ordered: bool,
    index: u64,
    items: u32,
    loose: bool,
}

#[derive(Debug)]
struct Slot {
    placement: Placement,
    gap: Option<Vec<Segment>>,
}

#[derive(Debug)]
struct Paragraph {
    slot: Slot,
    style: ProseStyle,
    lines: Vec<Vec<Segment>>,
    /// Only `Paragraph` tags can become image paragraphs; headings and tight list text cannot.
    image_eligible: bool,
    images: Vec<(String, String)>,
    has_other_inline: bool,
}

#[derive(Debug)]
struct LinkCtx {
    dest: String,
    text: String,
}

#[derive(Debug)]
struct CodeCtx {
    slot: Slot,
    language: Option<String>,
    text: String,
}

#[derive(Debug)]
struct TableCtx {
    slot: Slot,
    aligns: Vec<Alignment>,
    head: Vec<Vec<Segment>>,
    body: Vec<Vec<Vec<Segment>>>,
    row: Vec<Vec<Segment>>,
    cell: Vec<Segment>,
}

#[derive(Debug)]
struct HtmlCtx {
    slot: Slot,
    text: String,
}

struct Builder<'a> {
    options: &'a ContentOptions,
    blocks: Vec<Block>,
    containers: Vec<Container>,
    next_container: u32,
    indents: Vec<Indent>,
    lists: Vec<ListCtx>,
    wants_gap: bool,
    pending_gap: Option<Vec<Segment>>,
    inline: InlineFlags,
    para: Option<Paragraph>,
    link: Option<LinkCtx>,
    image: Option<LinkCtx>,
    code: Option<CodeCtx>,
    table: Option<TableCtx>,
    html: Option<HtmlCtx>,
}

impl<'a> Builder<'a> {
    fn new(options: &'a ContentOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            containers: vec![Container {
                id: 0,
                kind: ContainerKind::Root,
                next: 0,
            }],
            next_container: 1,
            indents: Vec::new(),
            lists: Vec::new(),
            wants_gap: false,
            pending_gap: None,
            inline: InlineFlags::default(),
            para: None,
            link: None,
            image: None,
            code: None,
            table: None,
            html: None,
        }
    }

    fn run(mut self, input: &str) -> Vec<Block> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        for event in Parser::new_ext(input, options) {
            match event {
                Event::Start(tag) => self.start(tag),
                Event::End(tag) => self.end(tag),
                Event::Text(text) => self.text(&text),
                Event::Code(code) => {
                    let mut seg = self.segment(code.to_string());
                    seg.inline_code = true;
                    self.push_inline(seg);
                }
                Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
                Event::SoftBreak => {
                    if let Some(code) = self.code.as_mut() {
                        code.text.push('\n');
                    } else {
                        let seg = self.segment(" ");
                        self.push_inline(seg);
                    }
                }
                Event::HardBreak => self.hard_break(),
                Event::Rule => {
                    let slot = self.start_leaf();
                    self.push_block(BlockKind::Rule, slot);
                }
                Event::TaskListMarker(checked) => self.task_marker(checked),
                Event::FootnoteReference(label) => {
                    let seg = self.segment(format!("[^{label}]")).muted();
                    self.push_inline(seg);
                }
                _ => {}
            }
        }
        self.flush_para();
        self.blocks
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.current_container() == ContainerKind::Item {
                    if let Some(list) = self.lists.last_mut() {
                        list.loose = true;
                    }
                }
                let style = self.body_style();
                self.start_paragraph(style, true);
            }
            Tag::Heading { level, .. } => {
                self.start_paragraph(ProseStyle::Heading(heading_level(level)), false);
            }
            Tag::BlockQuote(_) => {
                self.open_container(ContainerKind::Quote);
                let bar = Segment::new(
                    self.options.blockquote_prefix.clone(),
                    ProseStyle::BlockQuote,
                    InlineFlags::default(),
                );
                self.indents.push(Indent {
                    initial: vec![bar.clone()],
                    subsequent: vec![bar],
                    used: false,
                });
            }
            Tag::List(start) => {
                let nested_in_tight_item = self.current_container() == ContainerKind::Item
                    && self.lists.last().is_some_and(|list| !list.loose);
                if nested_in_tight_item {
                    self.flush_para();
                    self.wants_gap = false;
                    self.pending_gap = None;
                }
                self.open_container(ContainerKind::List);
                self.lists.push(ListCtx {
                    ordered: start.is_some(),
                    index: start.unwrap_or(1),
                    items: 0,
                    loose: false,
                });
            }
            Tag::Item => {
                self.flush_para();
                let Some(list) = self.lists.last() else {
                    return;
                };
                if list.items > 0 {
                    self.wants_gap = list.loose;
                    self.pending_gap = None;
                }
                let marker = if list.ordered {
                    format!("{}. ", list.index)
                } else {
                    "• ".to_string()
                };
                self.open_container(ContainerKind::Item);
                self.indents.push(marker_indent(marker));
            }
            Tag::FootnoteDefinition(label) => {
                self.open_container(ContainerKind::Footnote);
                let mut indent = marker_indent(format!("[^{label}]: "));
                for seg in indent.initial.iter_mut() {
                    seg.muted = true;
                }
                self.indents.push(indent);
            }
            Tag::CodeBlock(kind) => {
                let slot = self.start_leaf();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) => normalize_fenced_lang(&lang),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeCtx {
                    slot,
                    language,
                    text: String::new(),
                });
            }
            Tag::Table(aligns) => {
                let slot = self.start_leaf();
                self.table = Some(TableCtx {
                    slot,
                    aligns,
                    head: Vec::new(),
                    body: Vec::new(),
                    row: Vec::new(),
                    cell: Vec::new(),
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.cell.clear();
                }
            }
            Tag::HtmlBlock => {
                let slot = self.start_leaf();
                self.html = Some(HtmlCtx {
                    slot,
                    text: String::new(),
                });
            }
            Tag::Emphasis => self.inline.emphasis = true,
            Tag::Strong => self.inline.strong = true,
            Tag::Strikethrough => self.inline.strike = true,
            Tag::Link { dest_url, .. } => {
                self.mark_inline_content();
                self.link = Some(LinkCtx {
                    dest: resolve_url(self.options.base_url.as_deref(), &dest_url),
                    text: String::new(),
                });
            }
            Tag::Image { dest_url, .. } => {
                if self.para.is_none() && self.table.is_none() {
                    let style = self.body_style();
                    self.start_paragraph(style, false);
                }
                self.image = Some(LinkCtx {
                    dest: resolve_url(self.options.base_url.as_deref(), &dest_url),
                    text: String::new(),
                });
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) => self.flush_para(),
            TagEnd::BlockQuote(_) | TagEnd::FootnoteDefinition => {
                self.flush_para();
                self.indents.pop();
                self.close_container();
                self.wants_gap = true;
            }
            TagEnd::List(_) => {
                self.flush_para();
                self.lists.pop();
                self.close_container();
                self.wants_gap = true;
            }
            TagEnd::Item => {
                self.flush_para();
                self.indents.pop();
                self.close_container();
                if let Some(list) = self.lists.last_mut() {
                    list.index += 1;
                    list.items += 1;
                }
            }
            TagEnd::CodeBlock => {
                let Some(code) = self.code.take() else {
                    return;
                };
                let text = code.text.strip_suffix('\n').unwrap_or(&code.text);
                let lines = text.split('\n').map(str::to_string).collect();
                self.push_block(
                    BlockKind::Code(CodeBlock {
                        language: code.language,
                        lines,
                    }),
                    code.slot,
                );
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.head = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.body.push(row);
                }
            }
            TagEnd::Table => {
                let Some(table) = self.table.take() else {
                    return;
                };
                self.push_block(
                    BlockKind::Table(TableBlock {
                        aligns: table.aligns,
                        head: table.head,
                        body: table.body,
                    }),
                    table.slot,
                );
            }
            TagEnd::HtmlBlock => {
                let Some(html) = self.html.take() else {
                    return;
                };
                let text = html_to_text(&html.text);
                if text.is_empty() {
                    // The element still occupies its slot; only the separator carries over.
                    self.pending_gap = html.slot.gap;
                    return;
                }
                let seg = Segment::new(text, self.body_style(), InlineFlags::default());
                self.push_block(
                    BlockKind::Prose(ProseBlock {
                        lines: vec![vec![seg]],
                    }),
                    html.slot,
                );
            }
            TagEnd::Emphasis => self.inline.emphasis = false,
            TagEnd::Strong => self.inline.strong = false,
            TagEnd::Strikethrough => self.inline.strike = false,
            TagEnd::Link => {
                let Some(link) = self.link.take() else {
                    return;
                };
                let show = self.options.show_link_destinations
                    && !link.dest.is_empty()
                    && !link.dest.starts_with('#')
                    && link.dest != link.text.trim();
                if show {
                    let seg = self.segment(format!(" ({})", link.dest)).muted();
                    self.push_inline(seg);
                }
            }
            TagEnd::Image => {
                let Some(image) = self.image.take() else {
                    return;
                };
                let label = if image.text.trim().is_empty() {
                    "[image]".to_string()
                } else {
                    format!("[{}]", image.text.trim())
                };
                let mut seg = self.segment(label);
                seg.link = true;
                if let Some(table) = self.table.as_mut() {
                    table.cell.push(seg);
                    return;
                }
                let inside_link = self.link.is_some();
                if let Some(para) = self.para.as_mut() {
                    para.images.push((image.dest, image.text));
                    if inside_link {
                        para.has_other_inline = true;
                    }
                    if let Some(line) = para.lines.last_mut() {
                        line.push(seg);
                    }
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &CowStr<'_>) {
        if let Some(image) = self.image.as_mut() {
            image.text.push_str(text);
            return;
        }
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
            return;
        }
        if let Some(html) = self.html.as_mut() {
            html.text.push_str(text);
            return;
        }
        let mut seg = self.segment(text.to_string());
        if let Some(link) = self.link.as_mut() {
            link.text.push_str(text);
            seg.link = true;
        }
        self.push_inline(seg);
    }

    fn html(&mut self, html: &CowStr<'_>) {
        if let Some(ctx) = self.html.as_mut() {
            ctx.text.push_str(html);
            return;
        }
        let text = strip_tags(html);
        if text.is_empty() {
            return;
        }
        let seg = self.segment(decode_basic_html_entities(&text));
        self.push_inline(seg);
    }

    fn hard_break(&mut self) {
        if let Some(code) = self.code.as_mut() {
            code.text.push('\n');
            return;
        }
        if let Some(table) = self.table.as_mut() {
            table.cell.push(Segment::new(" ", ProseStyle::Normal, self.inline));
            return;
        }
        if let Some(para) = self.para.as_mut() {
            para.has_other_inline = true;
            para.lines.push(Vec::new());
        }
    }

    fn task_marker(&mut self, checked: bool) {
        let Some(indent) = self.indents.last_mut() else {
            return;
        };
        if indent.used {
            return;
        }
        let marker = if checked { "[x] " } else { "[ ] " };
        *indent = marker_indent(marker.to_string());
    }

    fn current_container(&self) -> ContainerKind {
        self.containers
            .last()
            .map(|c| c.kind)
            .unwrap_or(ContainerKind::Root)
    }

    fn body_style(&self) -> ProseStyle {
        if self
            .containers
            .iter()
            .any(|c| c.kind == ContainerKind::Quote)
        {
            ProseStyle::BlockQuote
        } else {
            ProseStyle::Normal
        }
    }

    fn segment(&self, text: impl Into<String>) -> Segment {
        let style = self
            .para
            .as_ref()
            .map(|p| p.style)
            .unwrap_or_else(|| self.body_style());
        Segment::new(text, style, self.inline)
    }

    fn claim_slot(&mut self) -> Placement {
        let Some(container) = self.containers.last_mut() else {
            return Placement::default();
        };
        let placement = Placement {
            parent: container.id,
            index: container.next,
        };
        container.next += 1;
        placement
    }

    fn open_container(&mut self, kind: ContainerKind) {
        self.flush_para();
        self.claim_slot();
        self.freeze_gap();
        let id = self.next_container;
        self.next_container += 1;
        self.containers.push(Container { id, kind, next: 0 });
    }

    fn close_container(&mut self) {
        if self.containers.len() > 1 {
            self.containers.pop();
        }
    }

    /// Pins the pending separator to the prefixes outside a container about to open.
    fn freeze_gap(&mut self) {
        if self.wants_gap && self.pending_gap.is_none() {
            self.pending_gap = Some(self.gap_prefix());
        }
        self.wants_gap = false;
    }

    fn take_gap(&mut self) -> Option<Vec<Segment>> {
        let gap = match self.pending_gap.take() {
            Some(gap) => Some(gap),
            None if self.wants_gap => Some(self.gap_prefix()),
            None => None,
        };
        self.wants_gap = false;
        gap
    }

    fn gap_prefix(&self) -> Vec<Segment> {
        let mut out: Vec<Segment> = self
            .indents
            .iter()
            .flat_map(|i| i.subsequent.iter().cloned())
            .collect();
        while let Some(last) = out.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
            if !last.text.is_empty() {
                break;
            }
            out.pop();
        }
        out
    }

    fn take_prefix(&mut self) -> Prefix {
        let mut prefix = Prefix::default();
        for indent in self.indents.iter_mut() {
            let initial = if indent.used {
                &indent.subsequent
            } else {
                &indent.initial
            };
            prefix.initial.extend(initial.iter().cloned());
            prefix.subsequent.extend(indent.subsequent.iter().cloned());
            indent.used = true;
        }
        prefix
    }

    fn start_leaf(&mut self) -> Slot {
        self.flush_para();
        let placement = self.claim_slot();
        let gap = self.take_gap();
        Slot { placement, gap }
    }

    fn start_paragraph(&mut self, style: ProseStyle, image_eligible: bool) {
        let slot = self.start_leaf();
        self.para = Some(Paragraph {
            slot,
            style,
            lines: vec![Vec::new()],
            image_eligible,
            images: Vec::new(),
            has_other_inline: false,
        });
    }

    fn mark_inline_content(&mut self) {
        if let Some(para) = self.para.as_mut() {
            para.has_other_inline = true;
        }
    }

    fn push_inline(&mut self, seg: Segment) {
        if let Some(table) = self.table.as_mut() {
            table.cell.push(seg);
            return;
        }
        if self.para.is_none() {
            let style = self.body_style();
            self.start_paragraph(style, false);
        }
        if let Some(para) = self.para.as_mut() {
            para.has_other_inline = true;
            if let Some(line) = para.lines.last_mut() {
                line.push(seg);
            }
        }
    }

    fn flush_para(&mut self) {
        let Some(mut para) = self.para.take() else {
            return;
        };
        let single_image = para.image_eligible && !para.has_other_inline && para.images.len() == 1;
        let kind = match para.images.pop() {
            Some((url, alt)) if single_image => BlockKind::Image(ImageBlock {
                url,
                alt,
                last_in_group: true,
            }),
            _ => {
                while para.lines.last().is_some_and(|l| l.is_empty()) && para.lines.len() > 1 {
                    para.lines.pop();
                }
                BlockKind::Prose(ProseBlock { lines: para.lines })
            }
        };
        self.push_block(kind, para.slot);
    }

    fn push_block(&mut self, kind: BlockKind, slot: Slot) {
        let prefix = self.take_prefix();
        self.blocks.push(Block {
            kind,
            placement: slot.placement,
            prefix,
            gap: slot.gap,
        });
        self.wants_gap = true;
    }
}

fn marker_indent(marker: String) -> Indent {
    let width = UnicodeWidthStr::width(marker.as_str());
    Indent {
        initial: vec![Segment::new(marker, ProseStyle::List, InlineFlags::default())],
        subsequent: vec![Segment::new(
            " ".repeat(width),
            ProseStyle::List,
            InlineFlags::default(),
        )],
        used: false,
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Leading word characters of a fence info string, after a `language-` or `{` wrapper.
pub fn normalize_fenced_lang(info: &str) -> Option<String> {
    let first = info.split_whitespace().next().unwrap_or("");
    let first = first.strip_prefix("language-").unwrap_or(first);
    let first = first.strip_prefix('{').unwrap_or(first);
    let end = first
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(first.len());
    let first = &first[..end];
    (!first.is_empty()).then(|| first.to_string())
}

fn strip_tags(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if in_tag => {}
            _ => out.push(ch),
        }
    }
    out
}

fn html_to_text(html: &str) -> String {
    normalize_whitespace(&decode_basic_html_entities(&strip_tags(html)))
}

fn decode_basic_html_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves `dest` against `base_url`; absolute URLs, fragments and rooted paths pass through.
pub fn resolve_url(base_url: Option<&str>, dest: &str) -> String {
    let dest = dest.trim();
    if dest.is_empty() || is_absolute_url(dest) {
        return dest.to_string();
    }
    let Some(base) = base_url.map(str::trim).filter(|s| !s.is_empty()) else {
        return dest.to_string();
    };
    if let Ok(base) = Url::parse(base) {
        return base
            .join(dest)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| dest.to_string());
    }
    let base = base.trim_end_matches(['/', '\\']);
    let dest = dest.trim_start_matches("./").trim_start_matches('/');
    format!("{base}/{dest}")
}

fn is_absolute_url(dest: &str) -> bool {
    dest.starts_with('#')
        || dest.starts_with('/')
        || dest.starts_with("mailto:")
        || dest.starts_with("http://")
        || dest.starts_with("https://")
        || dest.starts_with("file://")
        || dest.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(md: &str) -> ContentDocument {
        ContentDocument::parse(md, &ContentOptions::default())
    }

    fn kinds(doc: &ContentDocument) -> Vec<&'static str> {
        doc.blocks()
            .iter()
            .map(|b| match b.kind {
                BlockKind::Prose(_) => "prose",
                BlockKind::Image(_) => "image",
                BlockKind::Code(_) => "code",
                BlockKind::Table(_) => "table",
                BlockKind::Rule => "rule",
            })
            .collect()
    }

    fn plain(segs: &[Segment]) -> String {
        segs.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn blank_input_is_a_placeholder() {
        assert!(parse("").is_placeholder());
        assert!(parse(" \n\t\n").is_placeholder());
        assert!(!parse("hi").is_placeholder());
    }

    #[test]
    fn paragraph_with_only_an_image_is_an_image_block() {
        let doc = parse("![Alt text](https://x/a.jpg)\n");
        let image = doc.blocks()[0].image().unwrap();
        assert_eq!(image.url, "https://x/a.jpg");
        assert_eq!(image.alt, "Alt text");
    }

    #[test]
    fn image_with_text_stays_prose() {
        let doc = parse("look ![a](https://x/a.jpg)\n\n![a](x.jpg) ![b](y.jpg)\n");
        assert_eq!(kinds(&doc), ["prose", "prose"]);
    }

    #[test]
    fn linked_image_stays_prose() {
        let doc = parse("[![a](https://x/a.jpg)](https://x)\n");
        assert_eq!(kinds(&doc), ["prose"]);
    }

    #[test]
    fn blocks_record_sibling_positions() {
        let doc = parse("# T\n\npara\n\n> quoted\n\nafter\n");
        let placements: Vec<_> = doc.blocks().iter().map(|b| b.placement).collect();
        assert_eq!(placements[0], Placement { parent: 0, index: 0 });
        assert_eq!(placements[1], Placement { parent: 0, index: 1 });
        // The quote itself takes index 2 in the root; its paragraph lives in a new container.
        assert_eq!(placements[2].index, 0);
        assert_ne!(placements[2].parent, 0);
        assert_eq!(placements[3], Placement { parent: 0, index: 3 });
    }

    #[test]
    fn parses_code_block_language_and_lines() {
        let doc = parse("```rust title=main.rs\nfn main() {}\n\nlet x = 1;\n```\n");
        let BlockKind::Code(code) = &doc.blocks()[0].kind else {
            panic!("expected code block");
        };
        assert_eq!(code.language.as_deref(), Some("rust"));
        assert_eq!(code.lines, ["fn main() {}", "", "let x = 1;"]);
    }

    #[test]
    fn indented_code_has_no_language() {
        let doc = parse("text\n\n    let x = 1;\n");
        let BlockKind::Code(code) = &doc.blocks()[1].kind else {
            panic!("expected code block");
        };
        assert_eq!(code.language, None);
    }

    #[test]
    fn list_items_get_markers_and_hanging_indent() {
        let doc = parse("1. one\n2. two\n");
        let first = &doc.blocks()[0];
        assert_eq!(plain(&first.prefix.initial), "1. ");
        assert_eq!(plain(&first.prefix.subsequent), "   ");
        assert_eq!(plain(&doc.blocks()[1].prefix.initial), "2. ");
        assert!(doc.blocks()[1].gap.is_none(), "tight list items are not separated");
    }

    #[test]
    fn loose_list_items_are_separated() {
        let doc = parse("- one\n\n- two\n");
        assert!(doc.blocks()[1].gap.is_some());
    }

    #[test]
    fn task_list_marker_replaces_bullet() {
        let doc = parse("- [x] done\n- [ ] todo\n");
        assert_eq!(plain(&doc.blocks()[0].prefix.initial), "[x] ");
        assert_eq!(plain(&doc.blocks()[1].prefix.initial), "[ ] ");
    }

    #[test]
    fn blockquote_separator_keeps_the_bar() {
        let doc = parse("> one\n>\n> two\n");
        let second = &doc.blocks()[1];
        assert_eq!(plain(&second.prefix.initial), "│ ");
        assert_eq!(second.gap.as_deref().map(plain), Some("│".to_string()));
    }

    #[test]
    fn parses_table_cells() {
        let doc = parse("| a | b |\n|---|--:|\n| 1 | 2 |\n");
        let BlockKind::Table(table) = &doc.blocks()[0].kind else {
            panic!("expected table");
        };
        assert_eq!(table.head.len(), 2);
        assert_eq!(table.body.len(), 1);
        assert_eq!(table.aligns[1], Alignment::Right);
        assert_eq!(plain(&table.body[0][1]), "2");
    }

    #[test]
    fn html_blocks_become_text_and_take_a_slot() {
        let doc = parse("<div>Hello &amp; <b>bye</b></div>\n\nafter\n");
        let BlockKind::Prose(prose) = &doc.blocks()[0].kind else {
            panic!("expected prose");
        };
        assert_eq!(plain(&prose.lines[0]), "Hello & bye");
        assert_eq!(doc.blocks()[1].placement.index, 1);
    }

    #[test]
    fn link_destination_follows_text() {
        let doc = parse("see [docs](https://docs.rs)\n");
        let BlockKind::Prose(prose) = &doc.blocks()[0].kind else {
            panic!("expected prose");
        };
        assert_eq!(plain(&prose.lines[0]), "see docs (https://docs.rs)");
    }

    #[test]
    fn hard_breaks_split_logical_lines() {
        let doc = parse("one  \ntwo\n");
        let BlockKind::Prose(prose) = &doc.blocks()[0].kind else {
            panic!("expected prose");
        };
        assert_eq!(prose.lines.len(), 2);
    }

    #[test]
    fn resolves_relative_images_with_base_url() {
        let options = ContentOptions {
            base_url: Some("https://example.com/posts/".to_string()),
            ..Default::default()
        };
        let doc = ContentDocument::parse("![a](img/a.png)\n", &options);
        assert_eq!(
            doc.blocks()[0].image().unwrap().url,
            "https://example.com/posts/img/a.png"
        );
        assert_eq!(resolve_url(Some("/tmp/site"), "./a.png"), "/tmp/site/a.png");
        assert_eq!(resolve_url(None, "a.png"), "a.png");
    }

    #[test]
    fn normalizes_fence_tags() {
        assert_eq!(normalize_fenced_lang("language-js"), Some("js".to_string()));
        assert_eq!(normalize_fenced_lang("{python}"), Some("python".to_string()));
        assert_eq!(normalize_fenced_lang("rust,ignore"), Some("rust".to_string()));
        assert_eq!(normalize_fenced_lang("   "), None);
        assert_eq!(normalize_fenced_lang("c++"), Some("c".to_string()));
        assert_eq!(normalize_fenced_lang("objective-c"), Some("objective".to_string()));
        assert_eq!(normalize_fenced_lang("language-c++ {.numbered}"), Some("c".to_string()));
        assert_eq!(normalize_fenced_lang("+++"), None);
    }
}
