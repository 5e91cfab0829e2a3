use folio::BlogPostPage;
use folio::ContentSource;
use folio::DirectorySource;
use folio::Navigation;
use folio::Navigator;
use folio::PageAction;
use folio::PortfolioAction;
use folio::PortfolioPage;
use folio::PostField;
use folio::gallery::Orientation;
use folio::gallery::probe::spawn_probes;
use folio::source::load_projects;
use folio_core::input::InputEvent;
use folio_core::input::KeyCode;
use folio_core::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

const AREA: Rect = Rect::new(0, 0, 90, 30);

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "hello-world.md",
        "---\ntitle: Hello World\npreview: The first one\ndate: 2023-11-02\n---\n# Hi\n\nWelcome.\n",
    );
    write(
        dir.path(),
        "kyoto.md",
        "---\ntitle: Spring in Kyoto\ndate: 2024-04-02T09:00:00Z\ntype: dump\n---\n\
         /photos/temple-tall.jpg\n/photos/river.jpg\n\n/photos/lanterns-tall.jpg\n",
    );
    write(
        dir.path(),
        "parsers.md",
        "---\ntitle: Writing a parser\ntagline: Tokens all the way down\ndate: 2024-01-15\n\
         type: essay\n---\n```rust\nfn main() {}\n```\n",
    );
    write(dir.path(), "draft.md", "---\ntitle: Draft\n---\n   \n");
    dir
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

fn render(page: &mut BlogPostPage) -> String {
    let mut buf = Buffer::empty(AREA);
    page.render_ref(AREA, &mut buf, &Theme::default());
    screen(&buf)
}

#[test]
fn sidebar_navigation_walks_between_posts() {
    let dir = site();
    let source = DirectorySource::new(dir.path());
    let listing = source.all_posts(PostField::LISTING).unwrap();
    let post = source.post_by_slug("parsers", PostField::PAGE).unwrap();

    let mut page = BlogPostPage::new();
    page.set_post(post, &listing);
    let text = render(&mut page);
    assert!(text.contains("Writing a parser"));
    assert!(text.contains("January 15, 2024"));
    assert!(text.contains("Previous Post"));
    assert_eq!(page.previous().map(|p| p.slug.as_str()), Some("hello-world"));

    let mut history: Vec<Navigation> = Vec::new();
    page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Char('a')));
    while page.tick(Duration::from_millis(50)) {}
    let text = render(&mut page);
    assert!(text.contains("All Posts"));
    assert!(text.contains("Photo Dump"));
    assert!(page.scroll_lock().is_locked());

    // Newest first: kyoto, parsers (current), hello-world, then the undated draft.
    page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Up));
    match page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)) {
        PageAction::Navigate(target) => history.navigate(&target),
        other => panic!("expected navigation, got {other:?}"),
    }
    assert_eq!(history, [Navigation::post("kyoto")]);
    assert_eq!(history[0].path(), "/blog/kyoto");
    assert!(!page.scroll_lock().is_locked());
}

#[test]
fn photo_dump_reflows_as_probes_arrive() {
    let dir = site();
    let source = DirectorySource::new(dir.path());
    let listing = source.all_posts(PostField::LISTING).unwrap();
    let post = source.post_by_slug("kyoto", PostField::PAGE).unwrap();

    let mut page = BlogPostPage::new();
    let requests = page.set_post(post, &listing);
    assert_eq!(requests.len(), 3);
    let before = page.gallery().unwrap().cells().to_vec();
    assert!(before.iter().all(|c| c.orientation == Orientation::Horizontal));

    let probe = |url: &str| -> Result<(u32, u32), folio::ProbeError> {
        if url.contains("tall") {
            Ok((800, 1200))
        } else {
            Ok((1200, 800))
        }
    };
    let (tx, rx) = mpsc::channel();
    for handle in spawn_probes(Arc::new(probe), requests, tx, 2) {
        handle.join().unwrap();
    }
    for response in rx.try_iter() {
        page.apply_probe(response);
    }

    let cells = page.gallery().unwrap().cells();
    let urls: Vec<_> = cells.iter().map(|c| c.url.as_str()).collect();
    assert_eq!(
        urls,
        ["/photos/temple-tall.jpg", "/photos/river.jpg", "/photos/lanterns-tall.jpg"]
    );
    let orientations: Vec<_> = cells.iter().map(|c| c.orientation).collect();
    assert_eq!(
        orientations,
        [Orientation::Vertical, Orientation::Horizontal, Orientation::Vertical]
    );
    assert!(render(&mut page).contains("Photo 1"));
}

#[test]
fn blank_posts_render_the_placeholder() {
    let dir = site();
    let source = DirectorySource::new(dir.path());
    let listing = source.all_posts(PostField::LISTING).unwrap();
    let post = source.post_by_slug("draft", PostField::PAGE).unwrap();

    let mut page = BlogPostPage::new();
    page.set_post(post, &listing);
    assert!(render(&mut page).contains("I will write this soon"));
    // Undated posts have no older neighbour.
    assert!(page.previous().is_none());
}

#[test]
fn unknown_slugs_are_not_found() {
    let dir = site();
    let source = DirectorySource::new(dir.path());
    let err = source.post_by_slug("missing", PostField::PAGE).unwrap_err();
    assert!(matches!(err, folio::ContentError::NotFound { .. }));
    assert!(source.post_by_slug("../kyoto", PostField::PAGE).is_err());
}

#[test]
fn portfolio_loads_projects_and_opens_links() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.toml");
    write(
        dir.path(),
        "projects.toml",
        r#"
[[projects]]
title = "Lantern"
headline = "A static site generator"
description = """
Builds pages from markdown.
Ships as one binary."""
image_src = "/images/lantern.png"
url = "https://lantern.dev"
cta_text = "Try it"

[[projects]]
title = "Notebook"
"#,
    );
    let projects = load_projects(&path).unwrap();
    assert_eq!(projects.len(), 2);

    let mut page = PortfolioPage::new(projects);
    let mut buf = Buffer::empty(AREA);
    page.render_ref(AREA, &mut buf, &Theme::default());
    let text = screen(&buf);
    assert!(text.contains("Lantern"));
    assert!(text.contains("Headline"));

    assert_eq!(
        page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)),
        PortfolioAction::ModalOpened(0)
    );
    let mut buf = Buffer::empty(AREA);
    page.render_ref(AREA, &mut buf, &Theme::default());
    let text = screen(&buf);
    assert!(text.contains("Try it"));
    assert!(text.contains("Ships as one binary."));
    assert_eq!(
        page.handle_event_in_area(AREA, InputEvent::key(KeyCode::Enter)),
        PortfolioAction::Navigate(Navigation::external("https://lantern.dev"))
    );
}
