//! `folio`: read a blog and portfolio in the terminal.
mod app;

use app::App;
use clap::Parser;
use clap::Subcommand;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use folio::ContentSource;
use folio::DirectorySource;
use folio::FolioConfig;
use folio::Navigation;
use folio::PostField;
use folio::date::format_post_date_with;
use folio::folio_core::crossterm_input::input_event_from_crossterm;
use folio::gallery::DimensionProbe;
use folio::gallery::probe::ImageFileProbe;
use folio::source::load_projects;
use folio::source::posts_by_date_desc;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);
const IDLE: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Read a blog and portfolio in the terminal")]
struct Args {
    /// Config file. Defaults to folio/folio.toml in the platform config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of markdown posts, overriding `content.posts_dir`.
    #[arg(long)]
    posts: Option<PathBuf>,

    /// Directory that site-absolute image paths resolve against. Defaults to the posts directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Log file, overriding `log.file`.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read a post. Accepts a slug or a `/blog/{slug}` path; opens the newest post by default.
    Read { slug: Option<String> },
    /// Browse the portfolio.
    Work {
        /// Project list, overriding `content.projects_file`.
        #[arg(long)]
        projects: Option<PathBuf>,
    },
    /// Print every post, newest first.
    List,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = match args.config.clone().or_else(FolioConfig::default_path) {
        Some(path) => FolioConfig::load_from(&path)?,
        None => FolioConfig::default(),
    };
    if let Some(posts) = &args.posts {
        config.content.posts_dir = posts.clone();
    }
    if let Some(file) = &args.log_file {
        config.log.file = Some(file.clone());
    }
    init_logging(&config)?;

    let source = DirectorySource::new(&config.content.posts_dir);
    let assets = args
        .assets
        .clone()
        .unwrap_or_else(|| config.content.posts_dir.clone());
    let probe: Arc<dyn DimensionProbe> = Arc::new(ImageFileProbe::with_base_dir(assets));

    let mut app = match args.command {
        Some(Command::List) => return list(&config, &source),
        Some(Command::Work { projects }) => {
            let path = projects
                .or_else(|| config.content.projects_file.clone())
                .ok_or("no project list: pass --projects or set content.projects_file")?;
            let projects = load_projects(&path)?;
            App::portfolio(&config, source, projects, probe)
        }
        Some(Command::Read { slug: Some(slug) }) => {
            let slug = match Navigation::from_path(&slug) {
                Some(Navigation::Post { slug }) => slug,
                _ => slug,
            };
            let highlighter = folio::folio_syntax::default_highlighter(config.syntax_theme.as_deref());
            let mut app = App::blog(&config, source, probe, highlighter);
            app.show_post(&slug)?;
            app
        }
        Some(Command::Read { slug: None }) | None => {
            let newest = posts_by_date_desc(source.all_posts(&[PostField::Slug, PostField::Date])?)
                .into_iter()
                .next()
                .ok_or_else(|| format!("no posts in {}", config.content.posts_dir.display()))?;
            let highlighter = folio::folio_syntax::default_highlighter(config.syntax_theme.as_deref());
            let mut app = App::blog(&config, source, probe, highlighter);
            app.show_post(&newest.slug)?;
            app
        }
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    install_panic_hook();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = run(&mut terminal, &mut app);

    app.unmount();
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    for link in app.external_links() {
        println!("{}", link.path());
    }
    res.map_err(Into::into)
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last = Instant::now();
    loop {
        let mut area = Rect::default();
        terminal.draw(|f| {
            area = f.area();
            app.render(area, f.buffer_mut());
        })?;

        let timeout = if app.is_animating() { FRAME } else { IDLE };
        if crossterm::event::poll(timeout)? {
            let event = crossterm::event::read()?;
            if is_quit(&event) {
                return Ok(());
            }
            if let Some(input) = input_event_from_crossterm(event) {
                app.handle_event(area, input);
            }
        }

        let now = Instant::now();
        app.tick(now.duration_since(last));
        last = now;
    }
}

fn is_quit(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(key.code, KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn list(config: &FolioConfig, source: &DirectorySource) -> Result<(), Box<dyn Error>> {
    let posts = posts_by_date_desc(source.all_posts(PostField::LISTING)?);
    for post in posts {
        let date = format_post_date_with(&post.date, &config.date_format);
        let kind = if post.is_dump() { "dump" } else { "post" };
        println!("{:<20} {:<4} {}  {}", date, kind, post.slug, post.title);
    }
    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI. Without a file, logging stays off.
fn init_logging(config: &FolioConfig) -> Result<(), Box<dyn Error>> {
    let Some(path) = &config.log.file else {
        return Ok(());
    };
    let file = File::options().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    tracing::info!(posts = %config.content.posts_dir.display(), "folio starting");
    Ok(())
}

fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        hook(info);
    }));
}
