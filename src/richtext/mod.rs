//! Structured-text ("dast") documents as delivered by the content service.
//!
//! Conversion from JSON never fails: unexpected shapes collapse into empty
//! nodes, and unknown node kinds keep their children so nothing with content
//! is lost.
pub mod html;
pub mod text;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub use html::{to_html, to_markdown, HtmlRenderer};
pub use text::{extract_plain_text, word_count};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Root {
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    List {
        style: ListStyle,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    Link {
        url: String,
        title: Option<String>,
        children: Vec<Node>,
    },
    /// Link to another record of the content service.
    ItemLink {
        item: String,
        children: Vec<Node>,
    },
    Blockquote {
        attribution: Option<String>,
        children: Vec<Node>,
    },
    Code {
        code: String,
        language: Option<String>,
    },
    ThematicBreak,
    Span {
        value: String,
        marks: Vec<Mark>,
    },
    /// Block-level embedded record, resolved against the document's `blocks`.
    Block {
        item: String,
    },
    /// Inline embedded record, resolved against `links` then `blocks`.
    InlineItem {
        item: String,
    },
    Unknown {
        kind: String,
        children: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStyle {
    #[default]
    Bulleted,
    Numbered,
}

impl ListStyle {
    fn from_name(name: &str) -> Self {
        match name {
            "numbered" | "ordered" => Self::Numbered,
            _ => Self::Bulleted,
        }
    }
}

/// Inline formatting applied to a span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    Strong,
    Emphasis,
    Underline,
    Code,
    Strikethrough,
    Highlight,
    Other(String),
}

impl Mark {
    pub fn from_name(name: &str) -> Self {
        match name {
            "strong" => Self::Strong,
            "emphasis" => Self::Emphasis,
            "underline" => Self::Underline,
            "code" => Self::Code,
            "strikethrough" => Self::Strikethrough,
            "highlight" => Self::Highlight,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Strong => "strong",
            Self::Emphasis => "emphasis",
            Self::Underline => "underline",
            Self::Code => "code",
            Self::Strikethrough => "strikethrough",
            Self::Highlight => "highlight",
            Self::Other(name) => name,
        }
    }
}

/// Sorts marks by name and drops duplicates, so a span nests the same way
/// whatever order the editor stored its marks in.
pub fn normalize_marks(marks: &[Mark]) -> Vec<Mark> {
    let mut marks = marks.to_vec();
    marks.sort_by(|a, b| a.name().cmp(b.name()));
    marks.dedup_by(|a, b| a.name() == b.name());
    marks
}

impl Default for Node {
    fn default() -> Self {
        Self::Root { children: vec![] }
    }
}

impl Node {
    /// Builds a node from a JSON value.
    ///
    /// Accepts either a bare node or a wrapper carrying it under `document`.
    /// Anything that is not an object yields an empty root.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let Some(kind) = object.get("type") else {
            return match object.get("document") {
                Some(document) => Self::from_value(document),
                None => Self::default(),
            };
        };

        let kind = kind.as_str().unwrap_or_default();
        let children = || children_of(object);

        match kind {
            "root" => Self::Root {
                children: children(),
            },
            "paragraph" => Self::Paragraph {
                children: children(),
            },
            "heading" => Self::Heading {
                level: heading_level(object.get("level")),
                children: children(),
            },
            "list" => Self::List {
                style: ListStyle::from_name(str_field(object, "style").unwrap_or_default()),
                children: children(),
            },
            "listItem" => Self::ListItem {
                children: children(),
            },
            "link" => Self::Link {
                url: str_field(object, "url").unwrap_or_default().to_string(),
                title: link_title(object),
                children: children(),
            },
            "itemLink" => Self::ItemLink {
                item: str_field(object, "item").unwrap_or_default().to_string(),
                children: children(),
            },
            "blockquote" => Self::Blockquote {
                attribution: str_field(object, "attribution").map(str::to_string),
                children: children(),
            },
            "code" | "codeBlock" => Self::Code {
                code: match str_field(object, "code") {
                    Some(code) => code.to_string(),
                    None => children()
                        .iter()
                        .map(extract_plain_text)
                        .collect::<Vec<_>>()
                        .join("\n"),
                },
                language: str_field(object, "language").map(str::to_string),
            },
            "thematicBreak" => Self::ThematicBreak,
            "span" => Self::Span {
                value: str_field(object, "value").unwrap_or_default().to_string(),
                marks: marks_of(object),
            },
            "block" => Self::Block {
                item: str_field(object, "item").unwrap_or_default().to_string(),
            },
            "inlineItem" => Self::InlineItem {
                item: str_field(object, "item").unwrap_or_default().to_string(),
            },
            other => Self::Unknown {
                kind: other.to_string(),
                children: children(),
            },
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Self::Root { children }
            | Self::Paragraph { children }
            | Self::Heading { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children }
            | Self::Link { children, .. }
            | Self::ItemLink { children, .. }
            | Self::Blockquote { children, .. }
            | Self::Unknown { children, .. } => children,
            Self::Code { .. }
            | Self::ThematicBreak
            | Self::Span { .. }
            | Self::Block { .. }
            | Self::InlineItem { .. } => &[],
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn children_of(object: &Map<String, Value>) -> Vec<Node> {
    object
        .get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(Node::from_value).collect())
        .unwrap_or_default()
}

fn marks_of(object: &Map<String, Value>) -> Vec<Mark> {
    let marks: Vec<Mark> = object
        .get("marks")
        .and_then(Value::as_array)
        .map(|marks| {
            marks
                .iter()
                .filter_map(Value::as_str)
                .map(Mark::from_name)
                .collect()
        })
        .unwrap_or_default();
    normalize_marks(&marks)
}

fn heading_level(value: Option<&Value>) -> u8 {
    let level = value.and_then(Value::as_i64).unwrap_or(1);
    level.clamp(1, 6) as u8
}

fn str_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// Links carry their title either directly or as a `{ id: "title" }` meta entry.
fn link_title(object: &Map<String, Value>) -> Option<String> {
    if let Some(title) = str_field(object, "title") {
        return Some(title.to_string());
    }

    object
        .get("meta")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(Value::as_object)
        .find(|entry| str_field(entry, "id") == Some("title"))
        .and_then(|entry| str_field(entry, "value"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_wrapped_document() {
        let value = json!({
            "schema": "dast",
            "document": {
                "type": "root",
                "children": [{
                    "type": "heading",
                    "level": 2,
                    "children": [{ "type": "span", "value": "Introduction" }]
                }]
            }
        });

        let node = Node::from_value(&value);
        assert_eq!(
            node,
            Node::Root {
                children: vec![Node::Heading {
                    level: 2,
                    children: vec![Node::Span {
                        value: "Introduction".to_string(),
                        marks: vec![],
                    }],
                }],
            }
        );
    }

    #[test]
    fn clamps_heading_level() {
        let high = Node::from_value(&json!({ "type": "heading", "level": 9 }));
        let low = Node::from_value(&json!({ "type": "heading", "level": 0 }));
        assert!(matches!(high, Node::Heading { level: 6, .. }));
        assert!(matches!(low, Node::Heading { level: 1, .. }));
    }

    #[test]
    fn sorts_and_dedups_marks() {
        let node = Node::from_value(&json!({
            "type": "span",
            "value": "x",
            "marks": ["strong", "emphasis", "strong", 3]
        }));
        let Node::Span { marks, .. } = node else {
            panic!("expected span");
        };
        assert_eq!(marks, vec![Mark::Emphasis, Mark::Strong]);
    }

    #[test]
    fn unknown_kind_keeps_children() {
        let node = Node::from_value(&json!({
            "type": "callout",
            "children": [{ "type": "span", "value": "kept" }]
        }));
        let Node::Unknown { kind, children } = node else {
            panic!("expected unknown");
        };
        assert_eq!(kind, "callout");
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn tolerates_missing_and_malformed_fields() {
        assert_eq!(Node::from_value(&Value::Null), Node::default());
        assert_eq!(
            Node::from_value(&json!({ "type": "paragraph", "children": "nope" })),
            Node::Paragraph { children: vec![] }
        );
        assert_eq!(
            Node::from_value(&json!({ "type": "span" })),
            Node::Span {
                value: String::new(),
                marks: vec![],
            }
        );
    }

    #[test]
    fn reads_link_title_from_meta() {
        let node = Node::from_value(&json!({
            "type": "link",
            "url": "https://example.com",
            "meta": [{ "id": "rel", "value": "nofollow" }, { "id": "title", "value": "Example" }],
            "children": []
        }));
        assert!(matches!(node, Node::Link { title: Some(ref t), .. } if t == "Example"));
    }

    #[test]
    fn deserializes_through_serde() {
        let node: Node = serde_json::from_str(r#"{"type":"list","style":"numbered"}"#).unwrap();
        assert_eq!(
            node,
            Node::List {
                style: ListStyle::Numbered,
                children: vec![],
            }
        );
    }
}
