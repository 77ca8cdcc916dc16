use super::Node;

/// Flattens a document into plain text for excerpts and search.
///
/// Children are joined with a single space; only the final result is trimmed.
pub fn extract_plain_text(root: &Node) -> String {
    collect(root).trim().to_string()
}

fn collect(node: &Node) -> String {
    match node {
        Node::Span { value, .. } => value.clone(),
        node => node
            .children()
            .iter()
            .map(collect)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
