//! Plaintext and indented text, rendered into equivalent HTML lists.

use once_cell::sync::Lazy;
use regex::Regex;

use super::html::escape_html;

/// A leading `-`, `—`, or `*` followed by whitespace. A bare `*` is left
/// alone so `*footnotes` and `*italic*` survive.
static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-—]|\*\s)").expect("bullet regex"));

/// Any line starting with a tab or two spaces.
static INDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(?:\t| {2})").expect("indent regex"));

/// Width of a tab when measuring indentation.
const TAB_WIDTH: usize = 2;

/// A line and the more deeply indented lines below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub scope: String,
    pub children: Vec<Block>,
}

/// Whether any line is indented.
pub fn has_indentation(text: &str) -> bool {
    INDENT.is_match(text)
}

/// Remove a leading bullet marker and surrounding whitespace.
pub fn strip_bullet(line: &str) -> String {
    BULLET.replace(line, "").trim().to_string()
}

/// Group lines into blocks by indentation. Blank lines are ignored.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, Block)> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = indent_width(line);
        while stack.last().is_some_and(|(top, _)| *top >= indent) {
            if let Some((_, done)) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }
        stack.push((
            indent,
            Block {
                scope: line.to_string(),
                children: Vec::new(),
            },
        ));
    }
    while let Some((_, done)) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }
    roots
}

fn attach(stack: &mut [(usize, Block)], roots: &mut Vec<Block>, block: Block) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(block),
        None => roots.push(block),
    }
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Render blocks as nested `<li>`/`<ul>` markup.
///
/// A block with no text keeps its children, which the walk then hoists to
/// the block's own level.
pub fn blocks_to_html(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| {
            let value = strip_bullet(&block.scope);
            let children = if block.children.is_empty() {
                String::new()
            } else {
                format!("<ul>{}</ul>", blocks_to_html(&block.children))
            };
            if value.is_empty() && children.is_empty() {
                String::new()
            } else {
                format!("<li>{}{}</li>", escape_html(&value), children)
            }
        })
        .collect()
}

/// Render each non-blank line as a flat `<li>`.
pub fn lines_to_html(text: &str) -> String {
    text.lines()
        .map(strip_bullet)
        .filter(|v| !v.is_empty())
        .map(|v| format!("<li>{}</li>", escape_html(&v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bullets() {
        assert_eq!(strip_bullet("  - apple"), "apple");
        assert_eq!(strip_bullet("— pear"), "pear");
        assert_eq!(strip_bullet("* kiwi"), "kiwi");
        assert_eq!(strip_bullet("*footnote"), "*footnote");
    }

    #[test]
    fn groups_by_indentation() {
        let blocks = parse_blocks("fruits\n  apple\n    gala\n  pear\nveggies\n\tkale\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].children.len(), 2);
        assert_eq!(blocks[0].children[0].children[0].scope.trim(), "gala");
        assert_eq!(blocks[1].children[0].scope.trim(), "kale");
    }

    #[test]
    fn renders_nested_html() {
        let blocks = parse_blocks("a\n  - b & c\n");
        assert_eq!(blocks_to_html(&blocks), "<li>a<ul><li>b &amp; c</li></ul></li>");
    }

    #[test]
    fn detects_indentation() {
        assert!(has_indentation("a\n  b"));
        assert!(has_indentation("a\n\tb"));
        assert!(!has_indentation("a\n b\n\nc"));
    }
}
