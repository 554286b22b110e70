//! Markdown Codec
//!
//! Serializer/parser pair converting between the document tree and a
//! textual form that carries block identity as hidden HTML-comment marker
//! lines (`<!-- block_id:block_ab12cd34 -->`).
//!
//! The codec is deliberately asymmetric: serialization is lossless for the
//! supported node set, while parsing is a best-effort leading-token
//! classification that recovers headings, code blocks, blockquotes, and
//! paragraphs only. Richer structure (lists, inline marks, images) degrades
//! to paragraph text on the way back in.

mod parse;
mod serialize;

pub use parse::parse_from_markdown;
pub use serialize::{export_clean_markdown, serialize_to_markdown};

use regex::Regex;
use std::sync::LazyLock;

/// Matches an identity-marker line and captures the block id
pub(crate) static BLOCK_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*block_id:([a-z0-9_]+)\s*-->").unwrap());

/// Matches a marker plus its trailing newline, for clean export removal
pub(crate) static BLOCK_MARKER_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*block_id:[a-z0-9_]+\s*-->\n").unwrap());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockIdAssigner;
    use crate::models::DocumentNode;

    #[test]
    fn test_reconcile_serialize_parse_keeps_ids() {
        let tree = DocumentNode::doc(vec![
            DocumentNode::heading(1, vec![DocumentNode::text("Title")]),
            DocumentNode::paragraph(vec![DocumentNode::text("Body text")]),
        ]);
        let (tree, _) = BlockIdAssigner::default().reconcile(tree);
        let original_ids: Vec<String> = tree
            .descendants()
            .filter_map(|(n, _)| n.block_id().map(str::to_string))
            .collect();

        let markdown = serialize_to_markdown(&tree);
        let reparsed = parse_from_markdown(&markdown);
        let reparsed_ids: Vec<String> = reparsed
            .descendants()
            .filter_map(|(n, _)| n.block_id().map(str::to_string))
            .collect();

        assert_eq!(reparsed_ids, original_ids);
    }
}
