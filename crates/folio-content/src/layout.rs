use crate::document::Block;
use crate::document::BlockKind;
use crate::document::CodeBlock;
use crate::document::ContentOptions;
use crate::document::ImageBlock;
use crate::document::Prefix;
use crate::document::ProseStyle;
use crate::document::Segment;
use crate::document::TableBlock;
use folio_core::render;
use folio_core::text::CodeHighlighter;
use folio_core::theme::Theme;
use pulldown_cmark::Alignment;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub(crate) fn layout_blocks(
    blocks: &[Block],
    width: u16,
    theme: &Theme,
    options: &ContentOptions,
    highlighter: Option<&dyn CodeHighlighter>,
) -> Vec<Line<'static>> {
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut tight = false;
    for block in blocks {
        // Image paragraphs inside a group stack without a separator.
        if let Some(gap) = &block.gap {
            if !(tight && block.is_image()) {
                out.push(Line::from(segments_to_spans(gap, theme)));
            }
        }
        match &block.kind {
            BlockKind::Prose(prose) => {
                for (i, logical) in prose.lines.iter().enumerate() {
                    let initial = block.prefix.for_line(i);
                    if options.wrap_prose {
                        out.extend(wrap_segments(
                            initial,
                            &block.prefix.subsequent,
                            logical,
                            width,
                            theme,
                        ));
                    } else {
                        let mut spans = segments_to_spans(initial, theme);
                        spans.extend(segments_to_spans(logical, theme));
                        out.push(Line::from(spans));
                    }
                }
            }
            BlockKind::Image(image) => out.extend(layout_image(image, &block.prefix, width, theme)),
            BlockKind::Code(code) => out.extend(layout_code(
                code,
                &block.prefix,
                options.code_block_indent,
                theme,
                highlighter,
            )),
            BlockKind::Table(table) => out.extend(layout_table(table, &block.prefix, width, theme)),
            BlockKind::Rule => {
                let mut spans = segments_to_spans(&block.prefix.initial, theme);
                let used = prefix_cols(&block.prefix.initial);
                let len = (width as usize).saturating_sub(used).max(1);
                spans.push(Span::styled("─".repeat(len), theme.text_muted));
                out.push(Line::from(spans));
            }
        }
        tight = block.continues_image_group();
    }
    out
}

const IMAGE_MARK: &str = "▣ ";

/// An image paragraph as a framed label: alt text over the source URL.
fn layout_image(
    image: &ImageBlock,
    prefix: &Prefix,
    width: u16,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let inner = (width as usize)
        .saturating_sub(prefix_cols(&prefix.subsequent))
        .max(4)
        - 2;
    let label = if image.alt.trim().is_empty() {
        format!("{IMAGE_MARK}image")
    } else {
        format!("{IMAGE_MARK}{}", image.alt.trim())
    };
    let rows = vec![
        vec![Span::styled(format!("┌{}┐", "─".repeat(inner)), theme.border)],
        framed(&label, inner, theme.text_primary, theme),
        framed(&image.url, inner, theme.text_muted, theme),
        vec![Span::styled(format!("└{}┘", "─".repeat(inner)), theme.border)],
    ];
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = segments_to_spans(prefix.for_line(i), theme);
            spans.extend(row);
            Line::from(spans)
        })
        .collect()
}

fn framed(text: &str, inner: usize, style: Style, theme: &Theme) -> Vec<Span<'static>> {
    let body = render::truncate_with_ellipsis(text, inner);
    let pad = inner.saturating_sub(UnicodeWidthStr::width(body.as_str()));
    vec![
        Span::styled("│", theme.border),
        Span::styled(body, style),
        Span::raw(" ".repeat(pad)),
        Span::styled("│", theme.border),
    ]
}

fn layout_code(
    code: &CodeBlock,
    prefix: &Prefix,
    indent: u16,
    theme: &Theme,
    highlighter: Option<&dyn CodeHighlighter>,
) -> Vec<Line<'static>> {
    // Only tagged blocks are highlighted; untagged code keeps the inline code look.
    let highlighted = match (code.language.as_deref(), highlighter) {
        (Some(language), Some(h)) => {
            let lines: Vec<&str> = code.lines.iter().map(String::as_str).collect();
            let out = h.highlight_lines(Some(language), &lines);
            let base = match h.background_color() {
                Some(bg) => theme.code_block.bg(bg),
                None => theme.code_block,
            };
            Some((out, base))
        }
        _ => None,
    };
    let base = match (&highlighted, code.language.is_some()) {
        (Some((_, base)), _) => *base,
        (None, true) => theme.code_block,
        (None, false) => theme.code_inline,
    };
    let indent = " ".repeat(indent as usize);

    code.lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut spans = segments_to_spans(prefix.for_line(i), theme);
            if !indent.is_empty() {
                spans.push(Span::styled(indent.clone(), base));
            }
            let body = highlighted
                .as_ref()
                .and_then(|(hl, _)| hl.get(i))
                .cloned()
                .unwrap_or_else(|| vec![Span::raw(expand_tabs(line))]);
            spans.extend(body.into_iter().map(|s| {
                let style = base.patch(s.style);
                Span::styled(s.content, style)
            }));
            Line::from(spans)
        })
        .collect()
}

fn expand_tabs(line: &str) -> String {
    line.replace('\t', "    ")
}

fn layout_table(
    table: &TableBlock,
    prefix: &Prefix,
    width: u16,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let cols = table
        .body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.head.len()))
        .max()
        .unwrap_or(0);
    if cols == 0 {
        return Vec::new();
    }

    let mut col_w = vec![1usize; cols];
    for row in std::iter::once(&table.head).chain(table.body.iter()) {
        for (c, cell) in row.iter().enumerate() {
            col_w[c] = col_w[c].max(UnicodeWidthStr::width(plain(cell).as_str()));
        }
    }

    const SEP: &str = " │ ";
    let avail = (width as usize)
        .saturating_sub(prefix_cols(&prefix.subsequent))
        .saturating_sub((cols - 1) * UnicodeWidthStr::width(SEP));
    shrink_columns(&mut col_w, avail);

    let mut out = Vec::new();
    let mut row_idx = 0usize;
    let mut push_row = |out: &mut Vec<Line<'static>>, spans: Vec<Span<'static>>| {
        let mut line = segments_to_spans(prefix.for_line(row_idx), theme);
        line.extend(spans);
        out.push(Line::from(line));
        row_idx += 1;
    };

    let render_row = |row: &[Vec<Segment>], header: bool| -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for c in 0..cols {
            if c > 0 {
                spans.push(Span::styled(SEP, theme.border));
            }
            let cell = row.get(c).map(Vec::as_slice).unwrap_or(&[]);
            let align = table.aligns.get(c).copied().unwrap_or(Alignment::None);
            let mut cell_spans = fit_cell(cell, col_w[c], align, theme);
            if header {
                for s in &mut cell_spans {
                    s.style = s.style.add_modifier(Modifier::BOLD);
                }
            }
            spans.extend(cell_spans);
        }
        spans
    };

    if !table.head.is_empty() {
        push_row(&mut out, render_row(&table.head, true));
        let rule = col_w
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        push_row(&mut out, vec![Span::styled(rule, theme.border)]);
    }
    for row in &table.body {
        push_row(&mut out, render_row(row, false));
    }
    out
}

/// Narrows the widest columns first until the table fits `avail` columns.
fn shrink_columns(col_w: &mut [usize], avail: usize) {
    let mut total: usize = col_w.iter().sum();
    while total > avail {
        let Some((idx, widest)) = col_w
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(_, w)| *w)
        else {
            return;
        };
        if widest <= 3 {
            return;
        }
        col_w[idx] -= 1;
        total -= 1;
    }
}

fn fit_cell(cell: &[Segment], width: usize, align: Alignment, theme: &Theme) -> Vec<Span<'static>> {
    let text = plain(cell);
    let cols = UnicodeWidthStr::width(text.as_str());
    let mut spans = if cols > width {
        let style = cell
            .first()
            .map(|s| style_for_segment(theme, s))
            .unwrap_or(theme.text_primary);
        vec![Span::styled(render::truncate_with_ellipsis(&text, width), style)]
    } else {
        segments_to_spans(cell, theme)
    };
    let used: usize = spans.iter().map(|s| s.width()).sum();
    let pad = width.saturating_sub(used);
    let (left, right) = match align {
        Alignment::Right => (pad, 0),
        Alignment::Center => (pad / 2, pad - pad / 2),
        Alignment::Left | Alignment::None => (0, pad),
    };
    if left > 0 {
        spans.insert(0, Span::raw(" ".repeat(left)));
    }
    if right > 0 {
        spans.push(Span::raw(" ".repeat(right)));
    }
    spans
}

/// Greedy word wrap over styled segments; words longer than the line are split.
fn wrap_segments(
    initial_prefix: &[Segment],
    subsequent_prefix: &[Segment],
    segments: &[Segment],
    width: u16,
    theme: &Theme,
) -> Vec<Line<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let width = width as usize;

    let tokens: Vec<Segment> = segments.iter().flat_map(split_segment_ws).collect();

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut prefix = initial_prefix;
    let mut cur: Vec<Segment> = Vec::new();
    let mut cur_cols = prefix_cols(prefix);

    let push_line = |out: &mut Vec<Line<'static>>, cur: &mut Vec<Segment>, prefix: &[Segment]| {
        while cur.last().is_some_and(|s| is_all_ws(&s.text)) {
            cur.pop();
        }
        let mut spans = segments_to_spans(prefix, theme);
        spans.extend(segments_to_spans(cur, theme));
        out.push(Line::from(spans));
        cur.clear();
    };

    for tok in tokens {
        if cur.is_empty() && is_all_ws(&tok.text) {
            continue;
        }
        let tok_cols = UnicodeWidthStr::width(tok.text.as_str());
        if cur_cols + tok_cols <= width {
            cur_cols += tok_cols;
            cur.push(tok);
            continue;
        }
        if !cur.is_empty() {
            push_line(&mut out, &mut cur, prefix);
            prefix = subsequent_prefix;
            cur_cols = prefix_cols(prefix);
            if is_all_ws(&tok.text) {
                continue;
            }
        }
        let mut remaining = tok;
        loop {
            let remaining_cols = UnicodeWidthStr::width(remaining.text.as_str());
            if cur_cols + remaining_cols <= width {
                cur_cols += remaining_cols;
                cur.push(remaining);
                break;
            }
            let max = width.saturating_sub(cur_cols).max(1);
            let (head, tail) = split_to_width(&remaining, max);
            cur.push(head);
            push_line(&mut out, &mut cur, prefix);
            prefix = subsequent_prefix;
            cur_cols = prefix_cols(prefix);
            if tail.text.is_empty() {
                break;
            }
            remaining = tail;
        }
    }

    if !cur.is_empty() || out.is_empty() {
        push_line(&mut out, &mut cur, prefix);
    }
    out
}

fn split_segment_ws(seg: &Segment) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut last_ws: Option<bool> = None;
    for ch in seg.text.chars() {
        let ws = ch.is_whitespace();
        if last_ws.is_some_and(|prev| prev != ws) {
            let mut s = seg.clone();
            s.text = std::mem::take(&mut buf);
            out.push(s);
        }
        buf.push(ch);
        last_ws = Some(ws);
    }
    if !buf.is_empty() {
        let mut s = seg.clone();
        s.text = buf;
        out.push(s);
    }
    out
}

fn split_to_width(seg: &Segment, max_cols: usize) -> (Segment, Segment) {
    let mut cols = 0usize;
    let mut idx = 0usize;
    for (byte_idx, ch) in seg.text.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if cols + w > max_cols && idx > 0 {
            break;
        }
        cols += w;
        idx = byte_idx + ch.len_utf8();
    }
    let (a, b) = seg.text.split_at(idx);
    let mut left = seg.clone();
    left.text = a.to_string();
    let mut right = seg.clone();
    right.text = b.to_string();
    (left, right)
}

fn is_all_ws(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

fn plain(segs: &[Segment]) -> String {
    segs.iter().map(|s| s.text.as_str()).collect()
}

fn prefix_cols(prefix: &[Segment]) -> usize {
    prefix
        .iter()
        .map(|s| UnicodeWidthStr::width(s.text.as_str()))
        .sum()
}

fn segments_to_spans(segs: &[Segment], theme: &Theme) -> Vec<Span<'static>> {
    segs.iter()
        .filter(|s| !s.text.is_empty())
        .map(|s| Span::styled(s.text.clone(), style_for_segment(theme, s)))
        .collect()
}

fn style_for_segment(theme: &Theme, seg: &Segment) -> Style {
    let mut style = if seg.muted {
        theme.text_muted
    } else {
        match seg.style {
            ProseStyle::Normal => theme.text_primary,
            ProseStyle::Heading(1) => theme.heading.add_modifier(Modifier::UNDERLINED),
            ProseStyle::Heading(_) => theme.heading,
            ProseStyle::BlockQuote => theme.quote,
            ProseStyle::List => theme.text_muted,
        }
    };
    if seg.inline_code {
        style = theme.code_inline;
    }
    if seg.link {
        style = theme.link;
    }
    if seg.flags.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if seg.flags.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if seg.flags.strike {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}
