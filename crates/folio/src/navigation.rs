//! Navigation intents issued by components and carried out by the host.

/// Where a component wants to go.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// A blog post, routed as `/blog/{slug}`.
    Post { slug: String },
    /// A link that leaves the site.
    External { url: String },
}

impl Navigation {
    pub fn post(slug: impl Into<String>) -> Self {
        Self::Post { slug: slug.into() }
    }

    pub fn external(url: impl Into<String>) -> Self {
        Self::External { url: url.into() }
    }

    /// Route path for posts, the URL itself for external links.
    pub fn path(&self) -> String {
        match self {
            Self::Post { slug } => format!("/blog/{slug}"),
            Self::External { url } => url.clone(),
        }
    }

    /// Inverse of [`Navigation::path`] for post routes.
    pub fn from_path(path: &str) -> Option<Self> {
        let slug = path.strip_prefix("/blog/")?.trim_end_matches('/');
        if slug.is_empty() || slug.contains('/') {
            return None;
        }
        Some(Self::post(slug))
    }
}

/// Implemented by the host to carry out navigation intents.
pub trait Navigator {
    fn navigate(&mut self, target: &Navigation);
}

/// Records intents in order; handy for hosts that act on them later.
impl Navigator for Vec<Navigation> {
    fn navigate(&mut self, target: &Navigation) {
        self.push(target.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_paths_round_trip() {
        let nav = Navigation::post("spring-in-kyoto");
        assert_eq!(nav.path(), "/blog/spring-in-kyoto");
        assert_eq!(Navigation::from_path(&nav.path()), Some(nav));
        assert_eq!(Navigation::from_path("/about"), None);
        assert_eq!(Navigation::from_path("/blog/"), None);
    }

    #[test]
    fn external_path_is_the_url() {
        let nav = Navigation::external("https://example.com");
        assert_eq!(nav.path(), "https://example.com");
    }

    #[test]
    fn vec_navigator_records_in_order() {
        let mut log: Vec<Navigation> = Vec::new();
        log.navigate(&Navigation::post("a"));
        log.navigate(&Navigation::post("b"));
        assert_eq!(log, [Navigation::post("a"), Navigation::post("b")]);
    }
}
