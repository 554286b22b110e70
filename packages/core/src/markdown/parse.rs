//! Markdown Parser
//!
//! Best-effort recovery of a document tree from marker-carrying markdown.
//! The parser splits the input on blank lines and identity-marker lines,
//! then classifies each block by its leading token only. Lists, inline
//! marks, images, and nesting are deliberately not reconstructed; that
//! asymmetry with the serializer is part of the codec's contract.

use super::BLOCK_MARKER_RE;
use crate::models::DocumentNode;

/// One flat block recovered from the text: optional id plus raw lines
#[derive(Debug)]
struct RawBlock {
    block_id: Option<String>,
    content: String,
}

/// Parse markdown back into a document tree
///
/// Unclassifiable blocks become paragraphs. A marker's id attaches to
/// the next non-blank run, even across blank lines; an id is only lost
/// when the marker sits at end of input or is immediately overwritten
/// by another marker.
pub fn parse_from_markdown(markdown: &str) -> DocumentNode {
    let blocks = split_blocks(markdown);
    let content = blocks.iter().map(classify_block).collect();
    DocumentNode::doc(content)
}

/// Split into `(blockId | none, rawLines)` runs on markers and blank lines
fn split_blocks(markdown: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    let mut flush = |id: &mut Option<String>, lines: &mut Vec<&str>| {
        if !lines.is_empty() {
            blocks.push(RawBlock {
                block_id: id.take(),
                content: lines.join("\n"),
            });
            lines.clear();
        }
    };

    for line in markdown.lines() {
        if let Some(captures) = BLOCK_MARKER_RE.captures(line) {
            flush(&mut current_id, &mut current_lines);
            current_id = Some(captures[1].to_string());
            continue;
        }

        if line.trim().is_empty() {
            if !current_lines.is_empty() {
                flush(&mut current_id, &mut current_lines);
            }
            continue;
        }

        current_lines.push(line);
    }
    flush(&mut current_id, &mut current_lines);

    blocks
}

/// Classify a raw block by its leading token
fn classify_block(block: &RawBlock) -> DocumentNode {
    let text = block.content.trim();

    if text.starts_with('#') {
        let level = text.chars().take_while(|&c| c == '#').count() as u8;
        let body = text.trim_start_matches('#').trim_start();
        let mut heading = DocumentNode::heading(level, text_children(body));
        if let Some(id) = &block.block_id {
            heading.set_block_id(id.clone());
        }
        return heading;
    }

    if text.starts_with("```") {
        let body = strip_fences(text);
        return DocumentNode::CodeBlock {
            block_id: block.block_id.clone(),
            // language tag is not recovered; see module docs on asymmetry
            language: None,
            content: text_children(&body),
        };
    }

    if text.starts_with('>') {
        // only the leading prefix is stripped; continuation lines keep theirs
        let body = text
            .strip_prefix('>')
            .map(str::trim_start)
            .unwrap_or(text);
        return DocumentNode::Blockquote {
            block_id: block.block_id.clone(),
            content: vec![DocumentNode::paragraph(text_children(body))],
        };
    }

    DocumentNode::Paragraph {
        block_id: block.block_id.clone(),
        content: text_children(text),
    }
}

fn strip_fences(text: &str) -> String {
    let without_open = match text.split_once('\n') {
        Some((_fence, rest)) => rest,
        // a lone fence line has no body
        None => "",
    };
    without_open
        .strip_suffix("```")
        .map(|body| body.strip_suffix('\n').unwrap_or(body))
        .unwrap_or(without_open)
        .to_string()
}

fn text_children(text: &str) -> Vec<DocumentNode> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![DocumentNode::text(text)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    fn blocks(tree: &DocumentNode) -> &[DocumentNode] {
        tree.children().unwrap()
    }

    #[test]
    fn test_parse_heading_with_marker() {
        let tree = parse_from_markdown("<!-- block_id:block_ab12cd34 -->\n## Overview\n");
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 1);
        match &parsed[0] {
            DocumentNode::Heading {
                block_id,
                level,
                content,
            } => {
                assert_eq!(block_id.as_deref(), Some("block_ab12cd34"));
                assert_eq!(*level, 2);
                assert_eq!(content[0].inline_text(), "Overview");
            }
            other => panic!("expected heading, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_parse_paragraphs_split_on_blank_lines() {
        let tree = parse_from_markdown("first paragraph\n\nsecond paragraph");
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].inline_text(), "first paragraph");
        assert_eq!(parsed[1].inline_text(), "second paragraph");
    }

    #[test]
    fn test_parse_code_block_strips_fences_and_language() {
        let tree = parse_from_markdown("```rust\nfn main() {}\n```");
        let parsed = blocks(&tree);
        match &parsed[0] {
            DocumentNode::CodeBlock {
                language, content, ..
            } => {
                assert_eq!(language.as_deref(), None);
                assert_eq!(content[0].inline_text(), "fn main() {}");
            }
            other => panic!("expected code block, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_parse_blockquote_wraps_one_paragraph() {
        let tree = parse_from_markdown("> quoted words");
        let parsed = blocks(&tree);
        match &parsed[0] {
            DocumentNode::Blockquote { content, .. } => {
                assert_eq!(content.len(), 1);
                assert_eq!(content[0].kind(), NodeKind::Paragraph);
                assert_eq!(content[0].inline_text(), "quoted words");
            }
            other => panic!("expected blockquote, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_parse_marker_id_carries_across_blank_line() {
        let tree = parse_from_markdown("<!-- block_id:block_carry000 -->\n\nsurvivor");
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].inline_text(), "survivor");
        assert_eq!(parsed[0].block_id(), Some("block_carry000"));
    }

    #[test]
    fn test_parse_marker_at_end_of_input_is_dropped() {
        let tree = parse_from_markdown("text\n\n<!-- block_id:block_tail0000 -->\n");
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].inline_text(), "text");
    }

    #[test]
    fn test_parse_back_to_back_markers_keep_last_id() {
        let tree = parse_from_markdown(
            "<!-- block_id:block_first000 -->\n<!-- block_id:block_second00 -->\ntext",
        );
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].block_id(), Some("block_second00"));
    }

    #[test]
    fn test_parse_multi_line_block_joined() {
        let tree = parse_from_markdown("line one\nline two\n\nnext");
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].inline_text(), "line one\nline two");
    }

    #[test]
    fn test_parse_lists_degrade_to_paragraphs() {
        // documented asymmetry: list syntax is not reconstructed
        let tree = parse_from_markdown("* one\n* two");
        let parsed = blocks(&tree);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind(), NodeKind::Paragraph);
        assert_eq!(parsed[0].inline_text(), "* one\n* two");
    }

    #[test]
    fn test_parse_empty_input() {
        let tree = parse_from_markdown("");
        assert!(blocks(&tree).is_empty());
    }

    #[test]
    fn test_parse_marker_tolerates_whitespace() {
        let tree = parse_from_markdown("<!--  block_id:block_ab12cd34  -->\ntext");
        let parsed = blocks(&tree);
        assert_eq!(parsed[0].block_id(), Some("block_ab12cd34"));
    }
}
