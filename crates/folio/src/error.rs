//! Error types for loading content and configuration.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`crate::source::ContentSource`].
#[derive(Debug, Error)]
pub enum ContentError {
    /// No post exists for the requested slug.
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    /// A post or project file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML front matter of a post is malformed.
    #[error("invalid front matter in {}: {source}", path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The project list is not valid TOML.
    #[error("invalid project list {}: {source}", path.display())]
    Projects {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while loading [`crate::config::FolioConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// `date_format` contains a specifier chrono does not understand.
    #[error("invalid value for 'date_format': got '{0}', expected a strftime pattern")]
    DateFormat(String),
}

/// Why an image's dimensions could not be determined.
///
/// Probe failures are never shown to the reader; the gallery falls back to a horizontal cell.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("unsupported image location: {0}")]
    Unsupported(String),

    #[error("failed to decode {url}: {message}")]
    Decode { url: String, message: String },

    #[error("image has no pixels: {0}")]
    Empty(String),
}
