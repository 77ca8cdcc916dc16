use serde::Deserialize;

use crate::richtext::{self, HtmlRenderer, Node};

use super::{lenient, lenient_list, Record};

/// A blog post exactly as the content service returns it.
///
/// Every field is optional and tolerant of type mismatches; the transformer
/// decides what to fall back to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "_status", default, deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(rename = "_firstPublishedAt", default, deserialize_with = "lenient")]
    pub first_published_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub headings: Option<String>,
    #[serde(rename = "richText", default, deserialize_with = "lenient")]
    pub rich_text: Option<StructuredText>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub media: Vec<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    pub seo: Option<Seo>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
}

impl RawPost {
    pub fn is_published(&self) -> bool {
        self.status.as_deref() == Some("published")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seo {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alt: Option<String>,
}

/// The rich-text field: the document tree plus the records it embeds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuredText {
    #[serde(default)]
    pub value: Node,
    #[serde(default, deserialize_with = "lenient_list")]
    pub blocks: Vec<Record>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub links: Vec<Record>,
}

impl StructuredText {
    pub fn plain_text(&self) -> String {
        richtext::extract_plain_text(&self.value)
    }

    pub fn to_html(&self) -> String {
        HtmlRenderer::new(&self.blocks, &self.links).render(&self.value)
    }

    pub fn to_markdown(&self) -> String {
        HtmlRenderer::new(&self.blocks, &self.links).render_markdown(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_full_item() {
        let raw: RawPost = serde_json::from_value(json!({
            "id": "123",
            "_status": "published",
            "_firstPublishedAt": "2024-01-15T09:00:00Z",
            "slug": "best-outbound-strategies",
            "headings": "Best Outbound Strategies",
            "richText": {
                "value": {
                    "schema": "dast",
                    "document": {
                        "type": "root",
                        "children": [{
                            "type": "paragraph",
                            "children": [{ "type": "span", "value": "Outbound works." }]
                        }]
                    }
                },
                "blocks": [],
                "links": []
            },
            "date": "2024-01-15",
            "media": [{ "url": "https://cdn/cover.jpg", "alt": "Cover" }],
            "seo": { "title": "SEO title", "description": "SEO description" }
        }))
        .unwrap();

        assert!(raw.is_published());
        assert_eq!(raw.headings.as_deref(), Some("Best Outbound Strategies"));
        assert_eq!(raw.media.len(), 1);
        let text = raw.rich_text.unwrap();
        assert_eq!(text.plain_text(), "Outbound works.");
        assert_eq!(text.to_html(), "<p>Outbound works.</p>");
    }

    #[test]
    fn malformed_fields_degrade_to_empty() {
        let raw: RawPost = serde_json::from_value(json!({
            "_status": "draft",
            "headings": 42,
            "richText": "not a document",
            "media": { "url": "https://cdn/single.png" },
            "seo": null,
            "tags": ["growth", 7, "b2b"]
        }))
        .unwrap();

        assert!(!raw.is_published());
        assert!(raw.headings.is_none());
        assert!(raw.rich_text.is_none());
        assert!(raw.seo.is_none());
        assert_eq!(raw.media.len(), 1);
        assert_eq!(raw.tags, vec!["growth".to_string(), "b2b".to_string()]);
    }
}
