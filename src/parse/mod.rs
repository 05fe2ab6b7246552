//! Import text parsing: format detection, normalization to HTML, and the
//! event walk that turns it into an `ImportNode` tree.

pub mod html;
pub mod plaintext;
pub mod walk;

use once_cell::sync::Lazy;
use regex::Regex;

pub use html::{decode_entities, escape_html, extract_body, tokenize, HtmlEvent};
pub use plaintext::{has_indentation, parse_blocks, strip_bullet, Block};
pub use walk::{walk, WalkState, Walker};

/// An opening `<li>` or `<p>` tag.
static HTML_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(?:li|p)(?:\s[^>]*)?>").expect("html detection regex"));

/// One node of a parsed import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportNode {
    ListItem(String),
    /// Children of the preceding `ListItem`.
    NestedList(Vec<ImportNode>),
    /// Note attached to the preceding `ListItem`.
    Note(String),
}

/// Detected shape of raw import text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Html,
    Indented,
    Plain,
}

/// Classify raw import text.
pub fn detect_format(raw: &str) -> InputFormat {
    if HTML_LIST.is_match(raw) {
        InputFormat::Html
    } else if has_indentation(&decode_entities(raw)) {
        InputFormat::Indented
    } else {
        InputFormat::Plain
    }
}

/// Convert raw import text of any format into list HTML.
pub fn normalize(raw: &str) -> String {
    match detect_format(raw) {
        InputFormat::Html => extract_body(raw).to_string(),
        InputFormat::Indented => {
            let text = decode_entities(raw);
            plaintext::blocks_to_html(&parse_blocks(&text))
        }
        InputFormat::Plain => plaintext::lines_to_html(&decode_entities(raw)),
    }
}

/// Parse raw import text into a node tree.
pub fn parse_import(raw: &str) -> Vec<ImportNode> {
    let format = detect_format(raw);
    let nodes = walk(&tokenize(&normalize(raw)));
    log::debug!("parsed {:?} import into {} top-level nodes", format, nodes.len());
    nodes
}

/// Total `ListItem`s at every depth.
pub fn count_items(nodes: &[ImportNode]) -> usize {
    nodes
        .iter()
        .map(|n| match n {
            ImportNode::ListItem(_) => 1,
            ImportNode::NestedList(children) => count_items(children),
            ImportNode::Note(_) => 0,
        })
        .sum()
}

/// Total `Note`s at every depth.
pub fn count_notes(nodes: &[ImportNode]) -> usize {
    nodes
        .iter()
        .map(|n| match n {
            ImportNode::Note(_) => 1,
            ImportNode::NestedList(children) => count_notes(children),
            ImportNode::ListItem(_) => 0,
        })
        .sum()
}
