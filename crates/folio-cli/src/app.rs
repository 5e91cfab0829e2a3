use folio::BlogPostPage;
use folio::ContentError;
use folio::ContentSource;
use folio::DirectorySource;
use folio::FolioConfig;
use folio::Navigation;
use folio::Navigator;
use folio::PageAction;
use folio::PortfolioAction;
use folio::PortfolioPage;
use folio::PostField;
use folio::Project;
use folio::folio_core::input::InputEvent;
use folio::folio_core::theme::Theme;
use folio::folio_syntax::SharedHighlighter;
use folio::gallery::DimensionProbe;
use folio::gallery::ProbeResponse;
use folio::gallery::probe::DEFAULT_PROBE_WORKERS;
use folio::gallery::probe::spawn_probes;
use folio::page::BlogPostOptions;
use folio::project::PortfolioOptions;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

enum Screen {
    Post(Box<BlogPostPage>),
    Portfolio(Box<PortfolioPage>),
}

/// Owns the current page and carries out the navigation intents it returns.
pub struct App {
    source: DirectorySource,
    screen: Screen,
    theme: Theme,
    probe: Arc<dyn DimensionProbe>,
    probe_tx: mpsc::Sender<ProbeResponse>,
    probe_rx: mpsc::Receiver<ProbeResponse>,
    /// Links the pages asked to open outside the terminal, newest last.
    external: Vec<Navigation>,
}

impl App {
    pub fn blog(
        config: &FolioConfig,
        source: DirectorySource,
        probe: Arc<dyn DimensionProbe>,
        highlighter: SharedHighlighter,
    ) -> Self {
        let mut page = BlogPostPage::with_options(blog_options(config));
        page.set_highlighter(Some(highlighter));
        Self::with_screen(source, Screen::Post(Box::new(page)), probe)
    }

    pub fn portfolio(
        config: &FolioConfig,
        source: DirectorySource,
        projects: Vec<Project>,
        probe: Arc<dyn DimensionProbe>,
    ) -> Self {
        let options = PortfolioOptions {
            footer: config.footer.to_options(),
            ..PortfolioOptions::default()
        };
        let page = PortfolioPage::with_options(projects, options);
        Self::with_screen(source, Screen::Portfolio(Box::new(page)), probe)
    }

    fn with_screen(source: DirectorySource, screen: Screen, probe: Arc<dyn DimensionProbe>) -> Self {
        let (probe_tx, probe_rx) = mpsc::channel();
        Self {
            source,
            screen,
            theme: Theme::default(),
            probe,
            probe_tx,
            probe_rx,
            external: Vec::new(),
        }
    }

    /// Loads `slug` into the post screen and starts probing its images.
    pub fn show_post(&mut self, slug: &str) -> Result<(), ContentError> {
        let post = self.source.post_by_slug(slug, PostField::PAGE)?;
        let listing = self.source.all_posts(PostField::LISTING)?;
        let Screen::Post(page) = &mut self.screen else {
            return Ok(());
        };
        let requests = page.set_post(post, &listing);
        if !requests.is_empty() {
            // Workers finish on their own; stale answers are dropped by generation.
            drop(spawn_probes(
                Arc::clone(&self.probe),
                requests,
                self.probe_tx.clone(),
                DEFAULT_PROBE_WORKERS,
            ));
        }
        tracing::info!(slug, "opened post");
        Ok(())
    }

    pub fn handle_event(&mut self, area: Rect, event: InputEvent) {
        let target = match &mut self.screen {
            Screen::Post(page) => match page.handle_event_in_area(area, event) {
                PageAction::Navigate(target) => Some(target),
                PageAction::None | PageAction::Redraw => None,
            },
            Screen::Portfolio(page) => match page.handle_event_in_area(area, event) {
                PortfolioAction::Navigate(target) => Some(target),
                _ => None,
            },
        };
        if let Some(target) = target {
            self.navigate(&target);
        }
    }

    /// Advances animations and applies finished probes.
    pub fn tick(&mut self, dt: Duration) {
        let Screen::Post(page) = &mut self.screen else {
            return;
        };
        page.tick(dt);
        for response in self.probe_rx.try_iter() {
            page.apply_probe(response);
        }
    }

    /// Whether the next frame should come sooner than the idle poll interval.
    pub fn is_animating(&self) -> bool {
        match &self.screen {
            Screen::Post(page) => page.sidebar().is_animating(),
            Screen::Portfolio(_) => false,
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        match &mut self.screen {
            Screen::Post(page) => page.render_ref(area, buf, &self.theme),
            Screen::Portfolio(page) => page.render_ref(area, buf, &self.theme),
        }
    }

    pub fn external_links(&self) -> &[Navigation] {
        &self.external
    }

    pub fn unmount(&mut self) {
        if let Screen::Post(page) = &mut self.screen {
            page.unmount();
        }
    }
}

impl Navigator for App {
    fn navigate(&mut self, target: &Navigation) {
        match target {
            Navigation::Post { slug } => {
                if let Err(err) = self.show_post(slug) {
                    tracing::warn!(path = %target.path(), error = %err, "navigation failed");
                }
            }
            Navigation::External { url } => {
                tracing::info!(url = %url, "external link");
                self.external.navigate(target);
            }
        }
    }
}

pub fn blog_options(config: &FolioConfig) -> BlogPostOptions {
    BlogPostOptions {
        date_format: config.date_format.clone(),
        sidebar: config.sidebar.to_options(&config.date_format),
        footer: config.footer.to_options(),
        ..BlogPostOptions::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::ProbeError;
    use folio::folio_core::input::KeyCode;

    fn write(dir: &std::path::Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn no_probe() -> Arc<dyn DimensionProbe> {
        Arc::new(|url: &str| -> Result<(u32, u32), ProbeError> {
            Err(ProbeError::Unsupported(url.to_string()))
        })
    }

    #[test]
    fn previous_post_key_loads_the_older_post() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "old.md", "---\ntitle: Old\ndate: 2023-01-01\n---\nold body\n");
        write(dir.path(), "new.md", "---\ntitle: New\ndate: 2024-01-01\n---\nnew body\n");

        let config = FolioConfig::default();
        let source = DirectorySource::new(dir.path());
        let highlighter = folio::folio_syntax::plain_highlighter();
        let mut app = App::blog(&config, source, no_probe(), highlighter);
        app.show_post("new").unwrap();

        let area = Rect::new(0, 0, 60, 20);
        app.handle_event(area, InputEvent::key(KeyCode::Char('p')));
        let Screen::Post(page) = &app.screen else {
            panic!("expected the post screen");
        };
        assert_eq!(page.post().slug, "old");
    }

    #[test]
    fn missing_posts_leave_the_page_alone() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "only.md", "---\ntitle: Only\n---\nbody\n");
        let config = FolioConfig::default();
        let source = DirectorySource::new(dir.path());
        let mut app = App::blog(&config, source, no_probe(), folio::folio_syntax::plain_highlighter());
        app.show_post("only").unwrap();

        app.navigate(&Navigation::post("gone"));
        app.navigate(&Navigation::external("https://example.com"));
        let Screen::Post(page) = &app.screen else {
            panic!("expected the post screen");
        };
        assert_eq!(page.post().slug, "only");
        assert_eq!(app.external_links(), [Navigation::external("https://example.com")]);
    }
}
