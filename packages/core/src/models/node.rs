//! Document Tree Model
//!
//! This module defines `DocumentNode`, the closed tagged-variant tree that
//! represents editable document content, plus the inline `Mark` set.
//!
//! # Architecture
//!
//! - **Closed variant set**: every node kind the editor produces is a variant
//!   here; codec and locator match exhaustively, no runtime type sniffing
//! - **Single root**: a well-formed tree is rooted at `DocumentNode::Doc`
//! - **Exclusive ownership**: a node owns its children, so the structure is a
//!   tree by construction (no node can be its own descendant)
//! - **Stable addressing**: block-level kinds carry an optional `block_id`
//!   assigned by the reconciliation pass in [`crate::blocks::assigner`]
//!
//! # Examples
//!
//! ```rust
//! use draftdoc_core::models::DocumentNode;
//!
//! let tree = DocumentNode::doc(vec![
//!     DocumentNode::heading(1, vec![DocumentNode::text("Title")]),
//!     DocumentNode::paragraph(vec![DocumentNode::text("Body text")]),
//! ]);
//!
//! assert_eq!(tree.descendants().count(), 5);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for structural tree operations
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Invalid tree path: {0:?}")]
    InvalidPath(Vec<usize>),

    #[error("Node kind '{0}' has no children")]
    NotAContainer(NodeKind),
}

/// Inline formatting marks carried by text nodes
///
/// Marks are applied innermost-first in the order they are listed on the
/// text node, so `[Emphasis, Strong]` renders as `***text***`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mark {
    Emphasis,
    Strong,
    Code,
    Underline,
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

/// Discriminant for [`DocumentNode`] variants
///
/// Used wherever a set of kinds must be configured or compared without
/// holding node payloads (e.g. the assigner's addressable-kind set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Doc,
    Heading,
    Paragraph,
    Blockquote,
    CodeBlock,
    HorizontalRule,
    BulletList,
    OrderedList,
    ListItem,
    Image,
    Text,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Doc => "doc",
            NodeKind::Heading => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Blockquote => "blockquote",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::Image => "image",
            NodeKind::Text => "text",
        };
        write!(f, "{}", name)
    }
}

/// Path from the root to a node, as child indexes at each level
pub type NodePath = Vec<usize>;

/// A node in the document content tree
///
/// Container variants own an ordered sequence of children. Block-level
/// variants (everything except `Text` and `ListItem`) carry an optional
/// `block_id` that gives the automated collaborator a stable address for
/// the block; `ListItem` inherits addressability from its containing list
/// in the markdown projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DocumentNode {
    Doc {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    Heading {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        level: u8,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    Paragraph {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    Blockquote {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    CodeBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    HorizontalRule {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        /// Stored custom marker, e.g. `***`; serializer falls back to `---`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        markup: Option<String>,
    },
    BulletList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    OrderedList {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
        #[serde(default = "default_list_start")]
        start: u64,
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    ListItem {
        #[serde(default)]
        content: Vec<DocumentNode>,
    },
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

fn default_list_start() -> u64 {
    1
}

impl DocumentNode {
    /// Create a `doc` root node
    pub fn doc(content: Vec<DocumentNode>) -> Self {
        DocumentNode::Doc { content }
    }

    /// Create a heading; level is clamped to the markdown range 1..=6
    pub fn heading(level: u8, content: Vec<DocumentNode>) -> Self {
        DocumentNode::Heading {
            block_id: None,
            level: level.clamp(1, 6),
            content,
        }
    }

    /// Create a paragraph with no block id
    pub fn paragraph(content: Vec<DocumentNode>) -> Self {
        DocumentNode::Paragraph {
            block_id: None,
            content,
        }
    }

    /// Create a blockquote wrapping the given blocks
    pub fn blockquote(content: Vec<DocumentNode>) -> Self {
        DocumentNode::Blockquote {
            block_id: None,
            content,
        }
    }

    /// Create a fenced code block with an optional language tag
    pub fn code_block(language: Option<&str>, body: &str) -> Self {
        DocumentNode::CodeBlock {
            block_id: None,
            language: language.map(str::to_string),
            content: vec![DocumentNode::text(body)],
        }
    }

    /// Create a horizontal rule with the default `---` marker
    pub fn horizontal_rule() -> Self {
        DocumentNode::HorizontalRule {
            block_id: None,
            markup: None,
        }
    }

    /// Create a bullet list from list items
    pub fn bullet_list(items: Vec<DocumentNode>) -> Self {
        DocumentNode::BulletList {
            block_id: None,
            content: items,
        }
    }

    /// Create an ordered list numbered from `start`
    pub fn ordered_list(start: u64, items: Vec<DocumentNode>) -> Self {
        DocumentNode::OrderedList {
            block_id: None,
            start,
            content: items,
        }
    }

    /// Create a list item wrapping the given content
    pub fn list_item(content: Vec<DocumentNode>) -> Self {
        DocumentNode::ListItem { content }
    }

    /// Create a plain text node with no marks
    pub fn text(text: &str) -> Self {
        DocumentNode::Text {
            text: text.to_string(),
            marks: Vec::new(),
        }
    }

    /// Create a text node carrying the given marks
    pub fn marked_text(text: &str, marks: Vec<Mark>) -> Self {
        DocumentNode::Text {
            text: text.to_string(),
            marks,
        }
    }

    /// The variant discriminant of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            DocumentNode::Doc { .. } => NodeKind::Doc,
            DocumentNode::Heading { .. } => NodeKind::Heading,
            DocumentNode::Paragraph { .. } => NodeKind::Paragraph,
            DocumentNode::Blockquote { .. } => NodeKind::Blockquote,
            DocumentNode::CodeBlock { .. } => NodeKind::CodeBlock,
            DocumentNode::HorizontalRule { .. } => NodeKind::HorizontalRule,
            DocumentNode::BulletList { .. } => NodeKind::BulletList,
            DocumentNode::OrderedList { .. } => NodeKind::OrderedList,
            DocumentNode::ListItem { .. } => NodeKind::ListItem,
            DocumentNode::Image { .. } => NodeKind::Image,
            DocumentNode::Text { .. } => NodeKind::Text,
        }
    }

    /// Ordered children of this node, or `None` for leaf variants
    pub fn children(&self) -> Option<&[DocumentNode]> {
        match self {
            DocumentNode::Doc { content }
            | DocumentNode::Heading { content, .. }
            | DocumentNode::Paragraph { content, .. }
            | DocumentNode::Blockquote { content, .. }
            | DocumentNode::CodeBlock { content, .. }
            | DocumentNode::BulletList { content, .. }
            | DocumentNode::OrderedList { content, .. }
            | DocumentNode::ListItem { content } => Some(content),
            DocumentNode::HorizontalRule { .. }
            | DocumentNode::Image { .. }
            | DocumentNode::Text { .. } => None,
        }
    }

    /// Mutable children of this node, or `None` for leaf variants
    pub fn children_mut(&mut self) -> Option<&mut Vec<DocumentNode>> {
        match self {
            DocumentNode::Doc { content }
            | DocumentNode::Heading { content, .. }
            | DocumentNode::Paragraph { content, .. }
            | DocumentNode::Blockquote { content, .. }
            | DocumentNode::CodeBlock { content, .. }
            | DocumentNode::BulletList { content, .. }
            | DocumentNode::OrderedList { content, .. }
            | DocumentNode::ListItem { content } => Some(content),
            DocumentNode::HorizontalRule { .. }
            | DocumentNode::Image { .. }
            | DocumentNode::Text { .. } => None,
        }
    }

    /// The stable block id, if this variant carries one and it is assigned
    pub fn block_id(&self) -> Option<&str> {
        match self {
            DocumentNode::Heading { block_id, .. }
            | DocumentNode::Paragraph { block_id, .. }
            | DocumentNode::Blockquote { block_id, .. }
            | DocumentNode::CodeBlock { block_id, .. }
            | DocumentNode::HorizontalRule { block_id, .. }
            | DocumentNode::BulletList { block_id, .. }
            | DocumentNode::OrderedList { block_id, .. } => block_id.as_deref(),
            _ => None,
        }
    }

    /// Set the block id; no-op for variants that cannot carry one
    pub fn set_block_id(&mut self, id: String) {
        match self {
            DocumentNode::Heading { block_id, .. }
            | DocumentNode::Paragraph { block_id, .. }
            | DocumentNode::Blockquote { block_id, .. }
            | DocumentNode::CodeBlock { block_id, .. }
            | DocumentNode::HorizontalRule { block_id, .. }
            | DocumentNode::BulletList { block_id, .. }
            | DocumentNode::OrderedList { block_id, .. } => *block_id = Some(id),
            _ => {}
        }
    }

    /// Concatenated text payload of this subtree, marks and structure ignored
    pub fn inline_text(&self) -> String {
        match self {
            DocumentNode::Text { text, .. } => text.clone(),
            _ => self
                .children()
                .into_iter()
                .flatten()
                .map(DocumentNode::inline_text)
                .collect(),
        }
    }

    /// Lazy depth-first pre-order traversal yielding `(node, path)` pairs
    ///
    /// The root itself is yielded first with an empty path. The iterator is
    /// restartable; call `descendants()` again for a fresh walk.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![(self, Vec::new())],
        }
    }

    /// Replace the node at `path` with `replacement`, returning the new tree
    ///
    /// Consumes the tree and rebuilds only the spine along `path`; all
    /// unaffected substructure is moved, not copied. An empty path replaces
    /// the root itself.
    pub fn replace_child(
        mut self,
        path: &[usize],
        replacement: DocumentNode,
    ) -> Result<DocumentNode, NodeError> {
        let Some((&index, rest)) = path.split_first() else {
            return Ok(replacement);
        };

        let kind = self.kind();
        let children = self
            .children_mut()
            .ok_or(NodeError::NotAContainer(kind))?;
        if index >= children.len() {
            return Err(NodeError::InvalidPath(path.to_vec()));
        }

        let child = std::mem::replace(&mut children[index], DocumentNode::text(""));
        children[index] = child.replace_child(rest, replacement)?;
        Ok(self)
    }
}

/// Iterator state for [`DocumentNode::descendants`]
pub struct Descendants<'a> {
    stack: Vec<(&'a DocumentNode, NodePath)>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (&'a DocumentNode, NodePath);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, path) = self.stack.pop()?;
        if let Some(children) = node.children() {
            for (index, child) in children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(index);
                self.stack.push((child, child_path));
            }
        }
        Some((node, path))
    }
}
