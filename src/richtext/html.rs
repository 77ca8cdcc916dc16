use html_escape::{encode_double_quoted_attribute, encode_text};
use log::warn;

use crate::datocms::Record;

use super::{extract_plain_text, normalize_marks, ListStyle, Mark, Node};

const BLOCK_IMAGE_SIZE: (u32, u32) = (800, 400);
const INLINE_IMAGE_SIZE: (u32, u32) = (200, 150);

/// Renders a document without embedded records.
pub fn to_html(root: &Node) -> String {
    HtmlRenderer::default().render(root)
}

pub fn to_markdown(root: &Node) -> String {
    HtmlRenderer::default().render_markdown(root)
}

/// Turns a document into HTML, resolving embedded records by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer<'a> {
    blocks: &'a [Record],
    links: &'a [Record],
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(blocks: &'a [Record], links: &'a [Record]) -> Self {
        Self { blocks, links }
    }

    /// Renders each top-level node on its own and drops the empty ones.
    pub fn render(&self, root: &Node) -> String {
        match root {
            Node::Root { children } => children
                .iter()
                .map(|node| self.node(node))
                .filter(|unit| !unit.is_empty())
                .collect(),
            node => self.node(node),
        }
    }

    /// Markdown through the HTML form; falls back to plain text if the
    /// conversion fails.
    pub fn render_markdown(&self, root: &Node) -> String {
        let html = self.render(root);
        match htmd::convert(&html) {
            Ok(markdown) => markdown,
            Err(e) => {
                warn!("Failed to convert post to markdown: {}", e);
                extract_plain_text(root)
            }
        }
    }

    fn children(&self, children: &[Node]) -> String {
        children.iter().map(|node| self.node(node)).collect()
    }

    fn node(&self, node: &Node) -> String {
        match node {
            Node::Span { value, marks } => span(value, marks),
            Node::Paragraph { children } => {
                let mut inner = String::new();
                let mut blank = true;
                for child in children {
                    let unit = self.node(child);
                    blank &= match child {
                        Node::Span { value, .. } => value.trim().is_empty(),
                        _ => unit.trim().is_empty(),
                    };
                    inner.push_str(&unit);
                }
                if blank {
                    String::new()
                } else {
                    format!("<p>{}</p>", inner)
                }
            }
            Node::Heading { level, children } => {
                let level = (*level).clamp(1, 6);
                format!("<h{level}>{}</h{level}>", self.children(children))
            }
            Node::List { style, children } => {
                let tag = match style {
                    ListStyle::Bulleted => "ul",
                    ListStyle::Numbered => "ol",
                };
                format!("<{tag}>{}</{tag}>", self.children(children))
            }
            Node::ListItem { children } => format!("<li>{}</li>", self.children(children)),
            Node::Link {
                url,
                title,
                children,
            } => {
                let title = title
                    .as_ref()
                    .map(|title| {
                        format!(" title=\"{}\"", encode_double_quoted_attribute(title))
                    })
                    .unwrap_or_default();
                format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\"{}>{}</a>",
                    encode_double_quoted_attribute(url),
                    title,
                    self.children(children)
                )
            }
            Node::ItemLink { children, .. } => {
                format!("<span>{}</span>", self.children(children))
            }
            Node::Blockquote {
                attribution,
                children,
            } => {
                let footer = attribution
                    .as_ref()
                    .map(|who| format!("<footer>{}</footer>", encode_text(who)))
                    .unwrap_or_default();
                format!("<blockquote>{}{}</blockquote>", self.children(children), footer)
            }
            Node::Code { code, language } => {
                let class = language
                    .as_ref()
                    .map(|language| {
                        format!(
                            " class=\"language-{}\"",
                            encode_double_quoted_attribute(language)
                        )
                    })
                    .unwrap_or_default();
                format!("<pre><code{}>{}</code></pre>", class, encode_text(code))
            }
            Node::ThematicBreak => "<hr>".to_string(),
            Node::Block { item } => find(self.blocks, item)
                .map(block_record)
                .unwrap_or_default(),
            Node::InlineItem { item } => find(self.links, item)
                .or_else(|| find(self.blocks, item))
                .map(inline_record)
                .unwrap_or_default(),
            Node::Root { children } | Node::Unknown { children, .. } => self.children(children),
        }
    }
}

fn span(value: &str, marks: &[Mark]) -> String {
    let mut html = encode_text(value).replace('\n', "<br>");
    for mark in normalize_marks(marks) {
        html = wrap(&mark, &html);
    }
    html
}

fn wrap(mark: &Mark, inner: &str) -> String {
    let tag = match mark {
        Mark::Strong => "strong",
        Mark::Emphasis => "em",
        Mark::Underline => "u",
        Mark::Code => "code",
        Mark::Strikethrough => "s",
        Mark::Highlight => "mark",
        Mark::Other(name) => {
            return format!(
                "<span class=\"mark-{}\">{}</span>",
                encode_double_quoted_attribute(name),
                inner
            );
        }
    };
    format!("<{tag}>{inner}</{tag}>")
}

fn find<'r>(records: &'r [Record], id: &str) -> Option<&'r Record> {
    records.iter().find(|record| record.id.as_deref() == Some(id))
}

fn block_record(record: &Record) -> String {
    if !record.is_image() {
        return String::new();
    }
    let Some(url) = record.image_url() else {
        return String::new();
    };

    let alt = record
        .image_alt()
        .or(record.caption.as_deref())
        .unwrap_or("Blog image");
    let (width, height) = record.image_size();
    let caption = record
        .caption
        .as_ref()
        .filter(|caption| !caption.is_empty())
        .map(|caption| format!("<figcaption>{}</figcaption>", encode_text(caption)))
        .unwrap_or_default();

    format!(
        "<figure><img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\">{}</figure>",
        encode_double_quoted_attribute(url),
        encode_double_quoted_attribute(alt),
        width.unwrap_or(BLOCK_IMAGE_SIZE.0),
        height.unwrap_or(BLOCK_IMAGE_SIZE.1),
        caption
    )
}

fn inline_record(record: &Record) -> String {
    if !record.is_image() {
        return String::new();
    }
    let Some(url) = record.image_url() else {
        return String::new();
    };

    let alt = record.image_alt().unwrap_or("Inline image");
    format!(
        "<img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\">",
        encode_double_quoted_attribute(url),
        encode_double_quoted_attribute(alt),
        INLINE_IMAGE_SIZE.0,
        INLINE_IMAGE_SIZE.1
    )
}
