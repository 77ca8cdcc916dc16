use chrono::{DateTime, NaiveDate, Utc};
use log::warn;

use crate::{datocms::RawPost, richtext::word_count};

use super::{Media, Post};

pub const EXCERPT_LENGTH: usize = 150;
pub const WORDS_PER_MINUTE: usize = 200;
pub const NO_EXCERPT: &str = "No excerpt available";
pub const AUTHOR: &str = "Social Bloom Team";

/// Maps raw items onto [`Post`]s.
///
/// The transformer carries the moment of the fetch, which stands in for the
/// publication date of items that have none, so one fetch always yields the
/// same posts for the same input.
#[derive(Debug, Clone, Copy)]
pub struct PostTransformer {
    fetched_at: DateTime<Utc>,
}

impl Default for PostTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl PostTransformer {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub const fn at(fetched_at: DateTime<Utc>) -> Self {
        Self { fetched_at }
    }

    /// `position` is the item's index among the published items.
    pub fn transform(&self, raw: RawPost, position: usize) -> Post {
        let number = position + 1;

        let explicit_title = non_empty(raw.headings.as_deref())
            .or_else(|| non_empty(raw.seo.as_ref().and_then(|seo| seo.title.as_deref())));
        let title = explicit_title
            .map(str::to_string)
            .unwrap_or_else(|| format!("Blog Post {}", number));

        let slug = non_empty(raw.slug.as_deref())
            .map(str::to_string)
            .or_else(|| explicit_title.map(slugify).filter(|slug| !slug.is_empty()))
            .unwrap_or_else(|| format!("post-{}", number));

        let plain_text = raw
            .rich_text
            .as_ref()
            .map(|text| text.plain_text())
            .unwrap_or_default();

        let excerpt = non_empty(raw.seo.as_ref().and_then(|seo| seo.description.as_deref()))
            .map(str::to_string)
            .unwrap_or_else(|| excerpt_from(&plain_text));

        let read_time = raw.rich_text.as_ref().map(|_| read_time(&plain_text));
        let html = raw
            .rich_text
            .as_ref()
            .map(|text| text.to_html())
            .unwrap_or_default();

        let published_at = published_at(&raw, self.fetched_at);
        let seo_title = raw.seo.as_ref().and_then(|seo| seo.title.clone());
        let media = raw.media.iter().filter_map(Media::from_raw).collect();

        Post {
            id: raw.id.unwrap_or_else(|| slug.clone()),
            slug,
            title,
            excerpt,
            html,
            content: raw.rich_text,
            author: AUTHOR.to_string(),
            published_at,
            tags: raw.tags,
            read_time,
            featured: position == 0,
            media,
            seo_title,
        }
    }
}

/// Lowercases and collapses every run of non-alphanumeric characters into a
/// single hyphen. Only ASCII alphanumerics survive.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// First [`EXCERPT_LENGTH`] characters of the text, cut mid-word if need be.
pub fn excerpt_from(plain_text: &str) -> String {
    if plain_text.trim().is_empty() {
        return NO_EXCERPT.to_string();
    }

    let mut chars = plain_text.chars();
    let excerpt: String = chars.by_ref().take(EXCERPT_LENGTH).collect();
    if chars.next().is_some() {
        format!("{}...", excerpt)
    } else {
        excerpt
    }
}

/// Minutes to read, never less than one.
pub fn read_time(plain_text: &str) -> u32 {
    let words = word_count(plain_text);
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Explicit date, then first publication, then the given fallback.
pub fn published_at(raw: &RawPost, fallback: DateTime<Utc>) -> DateTime<Utc> {
    [raw.date.as_deref(), raw.first_published_at.as_deref()]
        .into_iter()
        .flatten()
        .find_map(|value| {
            let parsed = parse_date(value);
            if parsed.is_none() {
                warn!("Unparseable date {:?}", value);
            }
            parsed
        })
        .unwrap_or(fallback)
}

/// RFC 3339 timestamps, or bare `YYYY-MM-DD` dates taken as midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.to_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Whitespace-only counts as missing; the value itself is kept as is.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
