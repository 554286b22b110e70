//! Block Identity Assigner
//!
//! The reconciliation pass that guarantees every addressable block-level
//! node carries a stable block id. The hosting edit pipeline must run
//! [`BlockIdAssigner::reconcile`] synchronously after every content-changing
//! edit, before the tree is handed to the codec, locator, or ledger.
//!
//! # Examples
//!
//! ```rust
//! use draftdoc_core::blocks::BlockIdAssigner;
//! use draftdoc_core::models::DocumentNode;
//!
//! let assigner = BlockIdAssigner::default();
//! let tree = DocumentNode::doc(vec![DocumentNode::paragraph(vec![
//!     DocumentNode::text("hello"),
//! ])]);
//!
//! let (tree, changed) = assigner.reconcile(tree);
//! assert!(changed);
//! let (_, changed_again) = assigner.reconcile(tree);
//! assert!(!changed_again);
//! ```

use crate::models::{DocumentNode, NodeKind};
use std::collections::HashSet;
use uuid::Uuid;

/// Node kinds eligible to carry a block id by default
///
/// Everything block-level except `listItem`, which inherits addressability
/// from its containing list in the markdown projection.
pub const DEFAULT_ADDRESSABLE_KINDS: [NodeKind; 7] = [
    NodeKind::Heading,
    NodeKind::Paragraph,
    NodeKind::Blockquote,
    NodeKind::CodeBlock,
    NodeKind::HorizontalRule,
    NodeKind::BulletList,
    NodeKind::OrderedList,
];

/// Pluggable block id source
///
/// Implementations only promise a well-formed token; uniqueness within a
/// tree is enforced by the assigner, which retries on collision against the
/// full current id set.
pub trait BlockIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: UUID v4 truncated to 8 lowercase hex characters
///
/// The truncation materially weakens collision resistance compared to a
/// full UUID; the assigner's collision retry is what actually upholds the
/// per-tree uniqueness contract.
#[derive(Debug, Default)]
pub struct UuidBlockIdGenerator;

impl BlockIdGenerator for UuidBlockIdGenerator {
    fn generate(&self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("block_{}", &hex[..8])
    }
}

/// Reconciliation pass over a document tree
///
/// Assigns a fresh id to every addressable node whose `block_id` is empty
/// and never touches a node that already has one. Two consecutive passes
/// with no intervening mutation report `changed = false` the second time.
pub struct BlockIdAssigner {
    kinds: HashSet<NodeKind>,
    generator: Box<dyn BlockIdGenerator>,
}

impl Default for BlockIdAssigner {
    fn default() -> Self {
        Self::new(
            DEFAULT_ADDRESSABLE_KINDS.into_iter().collect(),
            Box::new(UuidBlockIdGenerator),
        )
    }
}

impl BlockIdAssigner {
    pub fn new(kinds: HashSet<NodeKind>, generator: Box<dyn BlockIdGenerator>) -> Self {
        Self { kinds, generator }
    }

    /// Whether `kind` is in this assigner's addressable set
    pub fn is_addressable(&self, kind: NodeKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Assign ids to every addressable node missing one
    ///
    /// Returns the reconciled tree and whether at least one assignment
    /// occurred. New ids are checked against every id already present in
    /// the tree, including ids assigned earlier in the same pass.
    pub fn reconcile(&self, mut tree: DocumentNode) -> (DocumentNode, bool) {
        let mut seen: HashSet<String> = tree
            .descendants()
            .filter_map(|(node, _)| node.block_id().map(str::to_string))
            .collect();

        let mut changed = false;
        self.visit(&mut tree, &mut seen, &mut changed);
        (tree, changed)
    }

    fn visit(&self, node: &mut DocumentNode, seen: &mut HashSet<String>, changed: &mut bool) {
        if self.is_addressable(node.kind()) && node.block_id().is_none() {
            node.set_block_id(self.fresh_id(seen));
            *changed = true;
        }
        if let Some(children) = node.children_mut() {
            for child in children {
                self.visit(child, seen, changed);
            }
        }
    }

    fn fresh_id(&self, seen: &mut HashSet<String>) -> String {
        loop {
            let id = self.generator.generate();
            if seen.insert(id.clone()) {
                return id;
            }
        }
    }
}
