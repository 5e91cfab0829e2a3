//! Blog and portfolio pages for the terminal.
//!
//! `folio` composes the [`folio_core`] primitives and the [`folio_content`] renderer into the
//! pages of a personal site:
//!
//! - [`page::BlogPostPage`]: a post with its reading progress bar, hero image, body, previous
//!   post link, [`sidebar::Sidebar`] listing every post and [`footer::Footer`]. Photo dump posts
//!   show a [`gallery::PhotoGallery`] instead of markdown.
//! - [`project::PortfolioPage`]: work cards that open a [`project::ProjectModal`].
//!
//! Like the rest of the workspace, the components never own the event loop. Hosts pass input
//! events in, get action enums back, and act on [`navigation::Navigation`] intents themselves.
//! Background image probing is the one piece of concurrency; see [`gallery::probe`].
pub mod config;
pub mod date;
pub mod error;
pub mod footer;
mod frame;
pub mod gallery;
pub mod model;
pub mod navigation;
pub mod page;
pub mod progress;
pub mod project;
pub mod scroll_lock;
pub mod sidebar;
pub mod source;

pub use folio_content;
pub use folio_core;
pub use folio_syntax;

pub use config::FolioConfig;
pub use error::ConfigError;
pub use error::ContentError;
pub use error::ProbeError;
pub use model::Post;
pub use model::PostField;
pub use model::PostKind;
pub use model::Project;
pub use navigation::Navigation;
pub use navigation::Navigator;
pub use page::BlogPostPage;
pub use page::PageAction;
pub use project::PortfolioAction;
pub use project::PortfolioPage;
pub use source::ContentSource;
pub use source::DirectorySource;
pub use source::MemorySource;
