//! Syntax highlighting backends for folio code blocks.
//!
//! Backends implement [`folio_core::text::CodeHighlighter`]. The `syntect` backend is behind the
//! `syntect` feature; without it, [`default_highlighter`] falls back to a plain, single-style
//! highlighter so content still renders.
use folio_core::text::CodeHighlighter;
use folio_core::text::PlainHighlighter;
use std::sync::Arc;

pub mod language;

#[cfg(feature = "syntect")]
pub mod syntect;

/// Shared highlighter handle, cheap to clone into every render call.
pub type SharedHighlighter = Arc<dyn CodeHighlighter + Send + Sync>;

/// Returns the best available highlighter, using `theme` when the backend supports themes.
pub fn default_highlighter(theme: Option<&str>) -> SharedHighlighter {
    #[cfg(feature = "syntect")]
    {
        let h = match theme {
            Some(name) => crate::syntect::SyntectHighlighter::with_theme(name),
            None => crate::syntect::SyntectHighlighter::new(),
        };
        Arc::new(h)
    }
    #[cfg(not(feature = "syntect"))]
    {
        if let Some(name) = theme {
            tracing::debug!(theme = name, "syntect disabled, ignoring syntax theme");
        }
        Arc::new(PlainHighlighter::default())
    }
}

/// A highlighter that renders code without colors.
pub fn plain_highlighter() -> SharedHighlighter {
    Arc::new(PlainHighlighter::default())
}
