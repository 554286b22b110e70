//! Markdown Serializer
//!
//! Renders a document tree to markdown, emitting a hidden identity-marker
//! comment line (`<!-- block_id:... -->`) immediately before every block
//! that carries a block id. `export_clean_markdown` is the same rendering
//! with exactly those marker lines removed and nothing else changed.

use super::BLOCK_MARKER_STRIP_RE;
use crate::models::{DocumentNode, Mark};

/// Serialize a tree to markdown with identity markers
///
/// Top-level blocks are separated by a blank line. The per-kind rendering
/// rules are fixed; round-trip consumers depend on them byte-for-byte.
pub fn serialize_to_markdown(tree: &DocumentNode) -> String {
    match tree {
        DocumentNode::Doc { content } => content
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => render_block(other),
    }
}

/// Serialize a tree to markdown with every identity-marker line removed
pub fn export_clean_markdown(tree: &DocumentNode) -> String {
    let markdown = serialize_to_markdown(tree);
    BLOCK_MARKER_STRIP_RE.replace_all(&markdown, "").to_string()
}

fn render_block(node: &DocumentNode) -> String {
    let mut out = String::new();
    if let Some(id) = node.block_id() {
        out.push_str(&format!("<!-- block_id:{} -->\n", id));
    }
    out.push_str(&render_body(node));
    out
}

fn render_body(node: &DocumentNode) -> String {
    match node {
        DocumentNode::Doc { content } => content
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n\n"),
        DocumentNode::Heading { level, content, .. } => {
            format!("{} {}", "#".repeat(*level as usize), render_inline(content))
        }
        DocumentNode::Paragraph { content, .. } => render_inline(content),
        DocumentNode::Blockquote { content, .. } => {
            let inner = content
                .iter()
                .map(render_block)
                .collect::<Vec<_>>()
                .join("\n\n");
            inner
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        DocumentNode::CodeBlock {
            language, content, ..
        } => {
            let body = node_text(content);
            let mut fenced = format!("```{}\n", language.as_deref().unwrap_or(""));
            fenced.push_str(&body);
            if !body.is_empty() && !body.ends_with('\n') {
                fenced.push('\n');
            }
            fenced.push_str("```");
            fenced
        }
        DocumentNode::HorizontalRule { markup, .. } => {
            markup.as_deref().unwrap_or("---").to_string()
        }
        DocumentNode::BulletList { content, .. } => {
            render_list(content, |_| "* ".to_string(), "  ")
        }
        DocumentNode::OrderedList { start, content, .. } => {
            let last = start + content.len().max(1) as u64 - 1;
            let width = last.to_string().len();
            let indent = " ".repeat(width + 2);
            render_list(
                content,
                |index| {
                    let number = (start + index as u64).to_string();
                    format!("{}{}. ", " ".repeat(width - number.len()), number)
                },
                &indent,
            )
        }
        DocumentNode::ListItem { content } => content
            .iter()
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n"),
        DocumentNode::Image { .. } | DocumentNode::Text { .. } => {
            render_inline(std::slice::from_ref(node))
        }
    }
}

/// Render list items, prefixing the first line of each item with its bullet
/// and continuation lines with the list's indent
fn render_list<F>(items: &[DocumentNode], bullet: F, indent: &str) -> String
where
    F: Fn(usize) -> String,
{
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let body = render_body(item);
            let mut lines = body.lines();
            let first = lines.next().unwrap_or_default();
            let mut rendered = format!("{}{}", bullet(index), first);
            for line in lines {
                rendered.push('\n');
                if line.is_empty() {
                    continue;
                }
                rendered.push_str(indent);
                rendered.push_str(line);
            }
            rendered
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_inline(nodes: &[DocumentNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            DocumentNode::Text { text, marks } => apply_marks(text, marks),
            DocumentNode::Image { src, alt, title } => {
                let title_clause = title
                    .as_deref()
                    .map(|t| format!(" \"{}\"", t))
                    .unwrap_or_default();
                format!("![{}]({}{})", alt.as_deref().unwrap_or(""), src, title_clause)
            }
            other => other
                .children()
                .map(render_inline)
                .unwrap_or_default(),
        })
        .collect()
}

/// Wrap text with its marks, innermost-first in listed order
fn apply_marks(text: &str, marks: &[Mark]) -> String {
    let mut out = text.to_string();
    for mark in marks {
        out = match mark {
            Mark::Emphasis => format!("*{}*", out),
            Mark::Strong => format!("**{}**", out),
            Mark::Code => format!("`{}`", out),
            Mark::Underline => format!("<u>{}</u>", out),
            Mark::Link { href, title } => {
                let title_clause = title
                    .as_deref()
                    .map(|t| format!(" \"{}\"", t))
                    .unwrap_or_default();
                format!("[{}]({}{})", out, href, title_clause)
            }
        };
    }
    out
}

fn node_text(nodes: &[DocumentNode]) -> String {
    nodes.iter().map(DocumentNode::inline_text).collect()
}
