//! `folio-core` provides the building blocks shared by every folio page component.
//!
//! Components in the higher-level crates follow the same shape:
//!
//! - Event-loop agnostic: the host feeds [`input::InputEvent`]s in and gets an action enum back.
//! - Rendering is immediate-mode into a [`ratatui::buffer::Buffer`] via `render_ref`.
//! - Animation state is advanced explicitly with elapsed [`std::time::Duration`]s, so the
//!   components never read the clock themselves.
//!
//! Useful entry points:
//! - [`viewport::ViewportState`]: scroll offsets plus derived reading progress and scroll cue.
//! - [`overlay`]: geometry for modals, slide-in panels and backdrops.
//! - [`text::CodeHighlighter`]: the seam syntax highlighting backends plug into.
pub mod theme;

pub mod text;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod overlay;
pub mod placeholder;
pub mod render;
pub mod scroll;
pub mod stack;
pub mod viewport;
pub mod wrapping;

pub mod help;
pub mod input;
pub mod keymap;
