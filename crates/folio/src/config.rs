//! `folio.toml`: where content lives and how the pages behave.
use crate::date;
use crate::error::ConfigError;
use crate::footer::FooterOptions;
use crate::footer::SocialLink;
use crate::sidebar::SidebarOptions;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration. Every field has a default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub content: ContentConfig,
    /// strftime pattern for post dates.
    pub date_format: String,
    /// Syntect theme for code blocks. `None` uses the backend default.
    pub syntax_theme: Option<String>,
    pub sidebar: SidebarConfig,
    pub footer: FooterConfig,
    pub log: LogConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            date_format: date::DEFAULT_DATE_FORMAT.to_string(),
            syntax_theme: None,
            sidebar: SidebarConfig::default(),
            footer: FooterConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory of `*.md` posts.
    pub posts_dir: PathBuf,
    /// TOML file with `[[projects]]` tables.
    pub projects_file: Option<PathBuf>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("_posts"),
            projects_file: None,
        }
    }
}

/// Sidebar animation timings in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    pub slide_ms: u64,
    pub backdrop_fade_ms: u64,
    pub item_delay_ms: u64,
    pub item_stagger_ms: u64,
    pub item_fade_ms: u64,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        let o = SidebarOptions::default();
        Self {
            slide_ms: o.slide_duration.as_millis() as u64,
            backdrop_fade_ms: o.backdrop_fade.as_millis() as u64,
            item_delay_ms: o.item_delay.as_millis() as u64,
            item_stagger_ms: o.item_stagger.as_millis() as u64,
            item_fade_ms: o.item_fade.as_millis() as u64,
        }
    }
}

impl SidebarConfig {
    pub fn to_options(&self, date_format: &str) -> SidebarOptions {
        SidebarOptions {
            slide_duration: Duration::from_millis(self.slide_ms),
            backdrop_fade: Duration::from_millis(self.backdrop_fade_ms),
            item_delay: Duration::from_millis(self.item_delay_ms),
            item_stagger: Duration::from_millis(self.item_stagger_ms),
            item_fade: Duration::from_millis(self.item_fade_ms),
            date_format: date_format.to_string(),
            ..SidebarOptions::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    pub socials: Vec<SocialLink>,
    pub webring_prev: String,
    pub webring_home: String,
    pub webring_next: String,
}

impl Default for FooterConfig {
    fn default() -> Self {
        let o = FooterOptions::default();
        Self {
            socials: o.socials,
            webring_prev: o.webring_prev,
            webring_home: o.webring_home,
            webring_next: o.webring_next,
        }
    }
}

impl FooterConfig {
    pub fn to_options(&self) -> FooterOptions {
        FooterOptions {
            socials: self.socials.clone(),
            webring_prev: self.webring_prev.clone(),
            webring_home: self.webring_home.clone(),
            webring_next: self.webring_next.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Log file. The terminal belongs to the UI, so logs never go to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

impl FolioConfig {
    /// Loads the config from `path`, or the defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: FolioConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        config.resolve_relative_to(path.parent().unwrap_or(Path::new("")));
        Ok(config)
    }

    /// `folio/folio.toml` under the platform config directory (`$XDG_CONFIG_HOME`,
    /// `~/Library/Application Support`, `%APPDATA%`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("folio.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !date::is_valid_format(&self.date_format) {
            return Err(ConfigError::DateFormat(self.date_format.clone()));
        }
        Ok(())
    }

    /// Makes relative content paths relative to the config file's directory.
    fn resolve_relative_to(&mut self, base: &Path) {
        if self.content.posts_dir.is_relative() {
            self.content.posts_dir = base.join(&self.content.posts_dir);
        }
        if let Some(projects) = &mut self.content.projects_file {
            if projects.is_relative() {
                *projects = base.join(&*projects);
            }
        }
        if let Some(file) = &mut self.log.file {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }
}
