//! Where posts and projects come from.
use crate::date::parse_post_date;
use crate::error::ContentError;
use crate::model::Post;
use crate::model::PostField;
use crate::model::Project;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// Read-only access to published posts.
pub trait ContentSource {
    /// The post stored under `slug`, with only `fields` populated.
    fn post_by_slug(&self, slug: &str, fields: &[PostField]) -> Result<Post, ContentError>;

    /// Every post, with only `fields` populated, in no particular order.
    fn all_posts(&self, fields: &[PostField]) -> Result<Vec<Post>, ContentError>;
}

/// Posts stored as `<slug>.md` files with YAML front matter.
///
/// ```text
/// ---
/// title: Spring in Kyoto
/// date: 2024-04-02
/// type: dump
/// ---
/// https://example.com/a.jpg
/// ```
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Slugs of every `*.md` file in the directory, sorted.
    pub fn slugs(&self) -> Result<Vec<String>, ContentError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| ContentError::Io {
            path: self.root.clone(),
            source,
        })?;
        let mut slugs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ContentError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                slugs.push(stem.to_string());
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    fn read_post(&self, slug: &str) -> Result<Post, ContentError> {
        let path = self.root.join(format!("{slug}.md"));
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContentError::NotFound {
                    slug: slug.to_string(),
                });
            }
            Err(source) => return Err(ContentError::Io { path, source }),
        };
        parse_post(slug, &raw).map_err(|source| ContentError::FrontMatter { path, source })
    }
}

impl ContentSource for DirectorySource {
    fn post_by_slug(&self, slug: &str, fields: &[PostField]) -> Result<Post, ContentError> {
        if !is_plain_slug(slug) {
            return Err(ContentError::NotFound {
                slug: slug.to_string(),
            });
        }
        let post = self.read_post(slug)?;
        tracing::debug!(slug, "loaded post");
        Ok(post.project(fields))
    }

    fn all_posts(&self, fields: &[PostField]) -> Result<Vec<Post>, ContentError> {
        let slugs = self.slugs()?;
        let mut posts = Vec::with_capacity(slugs.len());
        for slug in &slugs {
            posts.push(self.read_post(slug)?.project(fields));
        }
        tracing::debug!(root = %self.root.display(), count = posts.len(), "listed posts");
        Ok(posts)
    }
}

/// Posts held in memory, for previews and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    posts: Vec<Post>,
}

impl MemorySource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

impl ContentSource for MemorySource {
    fn post_by_slug(&self, slug: &str, fields: &[PostField]) -> Result<Post, ContentError> {
        self.posts
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| p.project(fields))
            .ok_or_else(|| ContentError::NotFound {
                slug: slug.to_string(),
            })
    }

    fn all_posts(&self, fields: &[PostField]) -> Result<Vec<Post>, ContentError> {
        Ok(self.posts.iter().map(|p| p.project(fields)).collect())
    }
}

/// Splits a document into its YAML front matter and body.
///
/// Front matter is a block fenced by `---` lines at the very start of the file. Without one,
/// the whole input is the body.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(rest) = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
    else {
        return (None, raw);
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = &rest[offset + line.len()..];
            return (Some(&rest[..offset]), body);
        }
        offset += line.len();
    }
    (None, raw)
}

/// Builds a post from a markdown document. The slug always comes from the file name.
pub fn parse_post(slug: &str, raw: &str) -> Result<Post, serde_yaml::Error> {
    let (front, body) = split_front_matter(raw);
    let mut post: Post = match front {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => Post::default(),
    };
    post.slug = slug.to_string();
    post.content = body.to_string();
    Ok(post)
}

/// Sorts posts newest first. Posts with unparseable dates sink to the end in their
/// original order.
pub fn posts_by_date_desc(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by_key(|p| std::cmp::Reverse(parse_post_date(&p.date)));
    posts
}

/// The post shown as "Previous Post": the first post in `sorted` (newest first) dated strictly
/// before `current`.
pub fn previous_post<'a>(sorted: &'a [Post], current: &Post) -> Option<&'a Post> {
    let current_date = parse_post_date(&current.date)?;
    sorted
        .iter()
        .find(|p| parse_post_date(&p.date).is_some_and(|d| d < current_date))
}

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<Project>,
}

/// Reads the portfolio from a TOML file of `[[projects]]` tables.
pub fn load_projects(path: &Path) -> Result<Vec<Project>, ContentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let list: ProjectList = toml::from_str(&raw).map_err(|source| ContentError::Projects {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = list.projects.len(), "loaded projects");
    Ok(list.projects)
}

fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PostKind;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            slug: slug.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn splits_front_matter() {
        let (front, body) = split_front_matter("---\ntitle: A\n---\nhello\n");
        assert_eq!(front, Some("title: A\n"));
        assert_eq!(body, "hello\n");
        assert_eq!(split_front_matter("no front"), (None, "no front"));
        assert_eq!(split_front_matter("---\nunterminated"), (None, "---\nunterminated"));
    }

    #[test]
    fn slug_comes_from_the_file_name() {
        let post = parse_post("kyoto", "---\nslug: other\ntitle: Kyoto\ntype: dump\n---\na.jpg\n")
            .unwrap();
        assert_eq!(post.slug, "kyoto");
        assert_eq!(post.title, "Kyoto");
        assert_eq!(post.kind, PostKind::Dump);
        assert_eq!(post.content, "a.jpg\n");
    }

    #[test]
    fn sorts_newest_first_with_undated_last() {
        let sorted = posts_by_date_desc(vec![
            post("old", "2023-01-01"),
            post("undated", "soon"),
            post("new", "2024-06-01T08:00:00Z"),
            post("mid", "2023-07-01"),
        ]);
        let slugs: Vec<_> = sorted.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "mid", "old", "undated"]);
    }

    #[test]
    fn previous_post_is_strictly_older() {
        let sorted = posts_by_date_desc(vec![
            post("c", "2024-03-01"),
            post("b", "2024-02-01"),
            post("b2", "2024-02-01"),
            post("a", "2024-01-01"),
        ]);
        let current = post("b", "2024-02-01");
        assert_eq!(previous_post(&sorted, &current).map(|p| p.slug.as_str()), Some("a"));
        let oldest = post("a", "2024-01-01");
        assert_eq!(previous_post(&sorted, &oldest), None);
        assert_eq!(previous_post(&sorted, &post("x", "whenever")), None);
    }

    #[test]
    fn directory_source_reads_and_projects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("hello.md"),
            "---\ntitle: Hello\ntagline: first\ndate: 2024-01-02\n---\n# Hi\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let source = DirectorySource::new(dir.path());

        assert_eq!(source.slugs().unwrap(), ["hello"]);
        let full = source.post_by_slug("hello", PostField::PAGE).unwrap();
        assert_eq!(full.title, "Hello");
        assert_eq!(full.content, "# Hi\n");
        let listed = source.all_posts(PostField::LISTING).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].content.is_empty());
        assert!(listed[0].tagline.is_empty());
    }

    #[test]
    fn unknown_and_unsafe_slugs_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());
        for slug in ["missing", "../etc/passwd", ""] {
            let err = source.post_by_slug(slug, PostField::ALL).unwrap_err();
            assert!(matches!(err, ContentError::NotFound { .. }), "{slug}");
        }
    }

    #[test]
    fn loads_projects_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.toml");
        std::fs::write(
            &path,
            "[[projects]]\ntitle = \"Loom\"\nheadline = \"A weaving sim\"\nurl = \"https://loom.dev\"\n\n[[projects]]\ntitle = \"Quiet\"\n",
        )
        .unwrap();
        let projects = load_projects(&path).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].link(), Some("https://loom.dev"));
        assert_eq!(projects[1].url, None);
    }
}
