pub mod export;
pub mod transform;

use std::future::Future;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use mime_guess::MimeGuess;
use serde::Serialize;

use crate::{
    config::Format,
    datocms::{RawMedia, RawPost, StructuredText},
    error::SourceUnavailable,
};

pub use transform::PostTransformer;

/// A published blog post, ready for the page layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Pre-rendered content.
    pub html: String,
    #[serde(skip)]
    pub content: Option<StructuredText>,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub read_time: Option<u32>,
    pub featured: bool,
    pub media: Vec<Media>,
    pub seo_title: Option<String>,
}

impl Post {
    /// Site path of the post, with the slug percent-encoded.
    pub fn path(&self) -> String {
        format!("/post/{}", urlencoding::encode(&self.slug))
    }

    pub fn cover(&self) -> Option<&Media> {
        self.media.iter().find(|media| media.mime.starts_with("image/"))
    }

    pub fn plain_text(&self) -> String {
        self.content
            .as_ref()
            .map(StructuredText::plain_text)
            .unwrap_or_default()
    }

    pub fn markdown(&self) -> String {
        self.content
            .as_ref()
            .map(StructuredText::to_markdown)
            .unwrap_or_default()
    }

    pub fn render(&self, format: Format) -> String {
        match format {
            Format::Html => self.html.clone(),
            Format::Markdown => self.markdown(),
            Format::Text => self.plain_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Media {
    pub url: String,
    pub alt: Option<String>,
    pub mime: String,
}

impl Media {
    pub fn from_raw(raw: &RawMedia) -> Option<Self> {
        let url = raw.url.clone().filter(|url| !url.is_empty())?;

        let mut filename = url.split('/').next_back().unwrap_or_default().to_string();
        filename.truncate(filename.find('?').unwrap_or(filename.len()));
        let mime = MimeGuess::from_path(&filename)
            .first_or_octet_stream()
            .to_string();

        Some(Self {
            url,
            alt: raw.alt.clone(),
            mime,
        })
    }
}

/// Somewhere blog posts come from.
pub trait ContentSource {
    /// Every post the source knows about, whatever its status.
    fn fetch_raw_posts(
        &self,
    ) -> impl Future<Output = Result<Vec<RawPost>, SourceUnavailable>> + Send;
}

/// Read-only access to the published posts of a [`ContentSource`].
#[derive(Debug, Clone)]
pub struct Blog<S> {
    source: S,
}

impl<S: ContentSource> Blog<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Published posts, newest first. An unreachable source yields no posts.
    pub async fn fetch_published_posts(&self) -> Vec<Post> {
        match self.source.fetch_raw_posts().await {
            Ok(raw) => published_posts(raw, &PostTransformer::new()),
            Err(e) => {
                error!("Content source unavailable: {}", e);
                vec![]
            }
        }
    }

    pub async fn fetch_post_by_slug(&self, slug: &str) -> Option<Post> {
        let post = self
            .fetch_published_posts()
            .await
            .into_iter()
            .find(|post| post.slug == slug);
        if post.is_none() {
            debug!("No published post with slug {:?}", slug);
        }
        post
    }
}

/// Keeps published items, transforms them and sorts newest first.
///
/// The sort is stable, so posts published at the same moment keep their
/// source order. Only the first post after sorting is featured.
pub fn published_posts(raw: Vec<RawPost>, transformer: &PostTransformer) -> Vec<Post> {
    let total = raw.len();
    let mut posts: Vec<Post> = raw
        .into_iter()
        .filter(RawPost::is_published)
        .enumerate()
        .map(|(position, item)| transformer.transform(item, position))
        .collect();
    info!("{} posts, {} published", total, posts.len());

    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    for (position, post) in posts.iter_mut().enumerate() {
        post.featured = position == 0;
    }
    posts
}

pub fn display_posts(posts: &[Post]) {
    if log::log_enabled!(log::Level::Info) {
        let date_width = 10_usize;
        let mut slug_width = 6_usize;
        for post in posts.iter() {
            slug_width = post.slug.len().max(slug_width);
        }

        info!(
            "+-{:-<slug_width$}-+-{:-<date_width$}-+------+-{}------- - -",
            " Slug ", " Date ", " Title "
        );
        for post in posts.iter() {
            let read_time = post
                .read_time
                .map(|minutes| format!("{}m", minutes))
                .unwrap_or_default();
            let marker = if post.featured { "*" } else { " " };
            info!(
                "| {:slug_width$} | {:date_width$} | {:>4} |{}{}",
                post.slug,
                post.published_at.format("%Y-%m-%d"),
                read_time,
                marker,
                post.title
            );
        }
        info!(
            "+-{}-+-{}-+------+------------ - -",
            "-".repeat(slug_width),
            "-".repeat(date_width)
        );
        info!("");
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    struct StaticSource(serde_json::Value);

    impl ContentSource for StaticSource {
        async fn fetch_raw_posts(&self) -> Result<Vec<RawPost>, SourceUnavailable> {
            Ok(serde_json::from_value(self.0.clone())?)
        }
    }

    struct DownSource;

    impl ContentSource for DownSource {
        async fn fetch_raw_posts(&self) -> Result<Vec<RawPost>, SourceUnavailable> {
            Err(SourceUnavailable::Query(vec!["timeout".to_string()]))
        }
    }

    fn transformer() -> PostTransformer {
        PostTransformer::at(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn returns_only_published_posts() {
        let blog = Blog::new(StaticSource(json!([
            { "id": "1", "_status": "draft", "headings": "Draft" },
            { "id": "2", "_status": "published", "headings": "Live" }
        ])));

        let posts = blog.fetch_published_posts().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "2");
        assert_eq!(posts[0].title, "Live");
        assert!(posts[0].featured);
    }

    #[tokio::test]
    async fn unavailable_source_yields_no_posts() {
        let blog = Blog::new(DownSource);
        assert!(blog.fetch_published_posts().await.is_empty());
        assert!(blog.fetch_post_by_slug("anything").await.is_none());
    }

    #[tokio::test]
    async fn looks_up_by_exact_slug() {
        let blog = Blog::new(StaticSource(json!([
            { "_status": "published", "slug": "inbound-vs-outbound" },
            { "_status": "published", "headings": "Qualified Leads" },
            { "_status": "draft", "slug": "hidden" }
        ])));

        let post = blog.fetch_post_by_slug("qualified-leads").await.unwrap();
        assert_eq!(post.title, "Qualified Leads");
        assert!(blog.fetch_post_by_slug("Qualified-Leads").await.is_none());
        assert!(blog.fetch_post_by_slug("hidden").await.is_none());
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let raw: Vec<RawPost> = serde_json::from_value(json!([
            { "id": "older", "_status": "published", "date": "2024-01-09" },
            { "id": "first", "_status": "published", "date": "2024-01-10" },
            { "id": "second", "_status": "published", "date": "2024-01-10" }
        ]))
        .unwrap();

        let posts = published_posts(raw, &transformer());
        let ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "older"]);
        assert!(posts[0].featured);
        assert!(!posts[1].featured);
        assert!(!posts[2].featured);
    }

    #[test]
    fn featured_follows_sorted_order() {
        let raw: Vec<RawPost> = serde_json::from_value(json!([
            { "id": "old", "_status": "published", "date": "2023-01-01" },
            { "id": "new", "_status": "published", "date": "2024-01-01" }
        ]))
        .unwrap();

        let posts = published_posts(raw, &transformer());
        assert_eq!(posts[0].id, "new");
        assert!(posts[0].featured);
        assert!(!posts[1].featured);
    }

    #[test]
    fn path_encodes_slug() {
        let raw: Vec<RawPost> = serde_json::from_value(json!([
            { "_status": "published", "slug": "growth & scale" }
        ]))
        .unwrap();
        let posts = published_posts(raw, &transformer());
        assert_eq!(posts[0].path(), "/post/growth%20%26%20scale");
    }

    #[test]
    fn media_mime_ignores_query() {
        let media = Media::from_raw(&RawMedia {
            url: Some("https://cdn/photos/cover.jpg?auto=format".to_string()),
            alt: None,
        })
        .unwrap();
        assert_eq!(media.mime, "image/jpeg");
        assert!(Media::from_raw(&RawMedia::default()).is_none());
    }

    #[test]
    fn renders_in_each_format() {
        let raw: Vec<RawPost> = serde_json::from_value(json!([{
            "_status": "published",
            "richText": { "value": { "schema": "dast", "document": {
                "type": "root",
                "children": [{ "type": "paragraph", "children": [
                    { "type": "span", "value": "Grow", "marks": ["strong"] }
                ]}]
            }}}
        }]))
        .unwrap();
        let post = &published_posts(raw, &transformer())[0];

        assert_eq!(post.render(Format::Html), "<p><strong>Grow</strong></p>");
        assert_eq!(post.render(Format::Markdown).trim(), "**Grow**");
        assert_eq!(post.render(Format::Text), "Grow");
    }
}
