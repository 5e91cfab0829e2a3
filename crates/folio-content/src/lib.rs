//! Post body rendering for folio.
//!
//! Markdown goes through three steps:
//!
//! 1. [`document::ContentDocument::parse`] builds a flat block list with `pulldown-cmark`. Blank
//!    input short-circuits to the empty-state placeholder.
//! 2. [`grouping::mark_image_groups`] tags the last image paragraph of every run of adjacent
//!    image paragraphs.
//! 3. [`document::ContentDocument::render`] lays the blocks out for a width, highlighting tagged
//!    code blocks through a [`folio_core::text::CodeHighlighter`].
//!
//! [`view::ContentView`] wraps all three with a viewport, key/wheel scrolling and a layout cache.
pub mod document;
pub mod grouping;
mod layout;
pub mod view;

pub use document::ContentDocument;
pub use document::ContentOptions;
pub use grouping::mark_image_groups;
pub use view::ContentView;
pub use view::ContentViewOptions;
