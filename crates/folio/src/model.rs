//! Read-only records the pages are rendered from.
use serde::Deserialize;
use serde::Serialize;

/// How a post body is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// One image URL per line.
    Dump,
    /// Markdown prose. Any kind other than `dump` lands here.
    #[default]
    #[serde(other)]
    Article,
}

/// A blog entry.
///
/// Posts come from a [`crate::source::ContentSource`] with only the requested
/// [`PostField`]s populated; the rest keep their empty defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub preview: String,
    /// ISO-8601 date as written in the front matter.
    pub date: String,
    /// Hero image URL.
    pub image: String,
    #[serde(skip)]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
}

impl Post {
    pub fn is_dump(&self) -> bool {
        self.kind == PostKind::Dump
    }

    /// A copy with only `fields` kept.
    pub fn project(&self, fields: &[PostField]) -> Post {
        let mut out = Post::default();
        for field in fields {
            match field {
                PostField::Slug => out.slug = self.slug.clone(),
                PostField::Title => out.title = self.title.clone(),
                PostField::Tagline => out.tagline = self.tagline.clone(),
                PostField::Preview => out.preview = self.preview.clone(),
                PostField::Date => out.date = self.date.clone(),
                PostField::Image => out.image = self.image.clone(),
                PostField::Content => out.content = self.content.clone(),
                PostField::Kind => out.kind = self.kind,
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PostField {
    Slug,
    Title,
    Tagline,
    Preview,
    Date,
    Image,
    Content,
    Kind,
}

impl PostField {
    pub const ALL: &'static [PostField] = &[
        PostField::Slug,
        PostField::Title,
        PostField::Tagline,
        PostField::Preview,
        PostField::Date,
        PostField::Image,
        PostField::Content,
        PostField::Kind,
    ];

    /// Everything a post page shows.
    pub const PAGE: &'static [PostField] = &[
        PostField::Date,
        PostField::Slug,
        PostField::Preview,
        PostField::Title,
        PostField::Tagline,
        PostField::Image,
        PostField::Content,
        PostField::Kind,
    ];

    /// What the sidebar listing and previous-post lookup need.
    pub const LISTING: &'static [PostField] = &[
        PostField::Slug,
        PostField::Date,
        PostField::Title,
        PostField::Image,
        PostField::Preview,
        PostField::Kind,
    ];
}

pub const DEFAULT_CTA: &str = "Visit project ↗";

/// A portfolio project shown as a work card and in the project modal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub headline: String,
    pub description: String,
    pub image_src: String,
    pub url: Option<String>,
    pub cta_text: Option<String>,
}

impl Project {
    /// Label of the call-to-action button.
    pub fn cta_label(&self) -> &str {
        self.cta_text
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_CTA)
    }

    /// The project link, if it has a usable one.
    pub fn link(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}
