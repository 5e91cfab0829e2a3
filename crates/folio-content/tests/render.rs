use folio_content::ContentDocument;
use folio_content::ContentOptions;
use folio_content::ContentView;
use folio_content::grouping;
use folio_core::theme::Theme;
use folio_syntax::syntect::SyntectHighlighter;
use ratatui::text::Line;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("read fixture")
}

fn line_to_plain(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn fixture_image_runs_are_grouped() {
    let doc = ContentDocument::parse(&fixture("post.md"), &ContentOptions::default());
    let groups = grouping::image_groups(doc.blocks());
    let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
    // Three in a row, the summit alone, the quoted footprints alone.
    assert_eq!(sizes, [3, 1, 1]);

    let urls: Vec<&str> = groups[0]
        .clone()
        .filter_map(|i| doc.blocks()[i].image().map(|img| img.url.as_str()))
        .collect();
    assert_eq!(
        urls,
        [
            "https://images.example.com/sunrise.jpg",
            "https://images.example.com/fog.jpg",
            "https://images.example.com/tent.jpg",
        ]
    );
}

#[test]
fn fixture_renders_every_block_kind() {
    let options = ContentOptions::default();
    let doc = ContentDocument::parse(&fixture("post.md"), &options);
    let theme = Theme::default();
    let lines: Vec<String> = doc
        .render(60, &theme, &options, None)
        .lines()
        .iter()
        .map(line_to_plain)
        .collect();

    assert_eq!(lines[0], "Notes from the trail");
    let joined = lines.join(" ");
    assert!(joined.contains("river"));
    assert!(joined.contains("(https://example.com/river)"));
    assert!(lines.iter().any(|l| l.starts_with("│ Take only pictures")));
    assert!(lines.iter().any(|l| l == "[x] stove"));
    assert!(lines.iter().any(|l| l == "• water filter"));
    assert!(lines.iter().any(|l| l == "  fn main() {"));
    assert!(lines.iter().any(|l| l.contains("─┼─")));
    assert_eq!(lines.last().map(String::as_str), Some("Thanks for reading."));
    assert!(lines.iter().all(|l| unicode_width::UnicodeWidthStr::width(l.as_str()) <= 60));
}

#[test]
fn grouped_frames_touch_and_the_group_keeps_its_trailing_gap() {
    let options = ContentOptions::default();
    let doc = ContentDocument::parse(&fixture("post.md"), &options);
    let lines: Vec<String> = doc
        .render(40, &Theme::default(), &options, None)
        .lines()
        .iter()
        .map(line_to_plain)
        .collect();
    let first_frame = lines
        .iter()
        .position(|l| l.starts_with('┌'))
        .expect("image frame");
    // Three frames of four rows each with no separators between them.
    for k in 0..3 {
        assert!(lines[first_frame + 4 * k].starts_with('┌'));
        assert!(lines[first_frame + 4 * k + 3].starts_with('└'));
    }
    assert_eq!(lines[first_frame + 12], "");
    assert_eq!(lines[first_frame + 13], "After breakfast we walked for hours.");
}

#[test]
fn tagged_code_is_colored_by_syntect() {
    let mut view = ContentView::new();
    view.set_highlighter(Some(std::sync::Arc::new(SyntectHighlighter::new())));
    view.set_content("```rust\nfn main() {}\n```\n\n```\nfn main() {}\n```\n");
    let theme = Theme::default();
    let lines = view.lines_for_width(40, &theme);

    let tagged: std::collections::HashSet<_> =
        lines[0].spans.iter().map(|s| s.style.fg).collect();
    assert!(tagged.len() > 1, "tagged block should use several colors");

    let untagged = lines[2].spans.last().expect("code span");
    assert_eq!(untagged.style, theme.code_inline);
}
