//! Block Locator
//!
//! Lookup and bounded-context extraction by block id over a document tree.
//! `find_by_id` is a single pre-order scan that short-circuits on the first
//! match; `block_context` renders a clean-markdown window of addressable
//! blocks around a target id for collaborator prompts.

use crate::markdown::export_clean_markdown;
use crate::models::{DocumentNode, NodePath};

/// Find the first node carrying `block_id`, pre-order, with its path
pub fn find_by_id<'a>(
    tree: &'a DocumentNode,
    block_id: &str,
) -> Option<(&'a DocumentNode, NodePath)> {
    tree.descendants()
        .find(|(node, _)| node.block_id() == Some(block_id))
}

/// The flat, document-order sequence of nodes carrying a block id
pub fn addressable_blocks(tree: &DocumentNode) -> Vec<&DocumentNode> {
    tree.descendants()
        .filter(|(node, _)| node.block_id().is_some())
        .map(|(node, _)| node)
        .collect()
}

/// Clean markdown of the blocks within `window` positions of `block_id`
///
/// Returns an empty string when the id is not present; callers that must
/// distinguish "no context" from "unknown id" should call [`find_by_id`]
/// first.
pub fn block_context(tree: &DocumentNode, block_id: &str, window: usize) -> String {
    let blocks = addressable_blocks(tree);
    let Some(target) = blocks
        .iter()
        .position(|node| node.block_id() == Some(block_id))
    else {
        return String::new();
    };

    let start = target.saturating_sub(window);
    let end = (target + window + 1).min(blocks.len());
    let slice: Vec<DocumentNode> = blocks[start..end].iter().map(|&n| n.clone()).collect();

    export_clean_markdown(&DocumentNode::doc(slice))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_id(mut node: DocumentNode, id: &str) -> DocumentNode {
        node.set_block_id(id.to_string());
        node
    }

    fn numbered_doc(count: usize) -> DocumentNode {
        let blocks = (0..count)
            .map(|i| {
                with_id(
                    DocumentNode::paragraph(vec![DocumentNode::text(&format!("para {}", i))]),
                    &format!("block_{:08}", i),
                )
            })
            .collect();
        DocumentNode::doc(blocks)
    }

    #[test]
    fn test_find_by_id_returns_node_and_path() {
        let tree = numbered_doc(3);
        let (node, path) = find_by_id(&tree, "block_00000001").unwrap();
        assert_eq!(node.inline_text(), "para 1");
        assert_eq!(path, vec![1]);
    }

    #[test]
    fn test_find_by_id_first_match_wins() {
        let tree = DocumentNode::doc(vec![
            with_id(
                DocumentNode::paragraph(vec![DocumentNode::text("first")]),
                "block_dup00000",
            ),
            with_id(
                DocumentNode::paragraph(vec![DocumentNode::text("second")]),
                "block_dup00000",
            ),
        ]);
        let (node, path) = find_by_id(&tree, "block_dup00000").unwrap();
        assert_eq!(node.inline_text(), "first");
        assert_eq!(path, vec![0]);
    }

    #[test]
    fn test_find_by_id_missing() {
        let tree = numbered_doc(2);
        assert!(find_by_id(&tree, "block_missing").is_none());
    }

    #[test]
    fn test_context_window_slices_neighbors() {
        let tree = numbered_doc(5);
        let context = block_context(&tree, "block_00000002", 1);
        assert_eq!(context, "para 1\n\npara 2\n\npara 3");
    }

    #[test]
    fn test_context_window_clamped_at_edges() {
        let tree = numbered_doc(3);
        assert_eq!(block_context(&tree, "block_00000000", 1), "para 0\n\npara 1");
        assert_eq!(block_context(&tree, "block_00000002", 5), "para 0\n\npara 1\n\npara 2");
    }

    #[test]
    fn test_context_unknown_id_is_empty() {
        let tree = numbered_doc(3);
        assert_eq!(block_context(&tree, "block_missing", 1), "");
    }

    #[test]
    fn test_context_output_is_clean() {
        let tree = numbered_doc(3);
        let context = block_context(&tree, "block_00000001", 0);
        assert!(!context.contains("block_id"));
        assert_eq!(context, "para 1");
    }
}
