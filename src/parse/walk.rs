//! Event walk from HTML tokens to an import tree.

use super::html::{decode_entities, HtmlEvent};
use super::ImportNode;

/// Where the walk currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Outside,
    InListFrame(usize),
    InNote,
}

/// Tags that end the current item's text.
const BLOCK_TAGS: &[&str] = &[
    "li", "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "tr",
];

#[derive(Debug, Default)]
struct Frame {
    nodes: Vec<ImportNode>,
    /// An item's text was emitted and its element is still open.
    item_open: bool,
}

/// Streaming walker. Feed events, then `finish`.
#[derive(Debug)]
pub struct Walker {
    frames: Vec<Frame>,
    /// One entry per open `ul`/`ol`: whether it pushed a frame.
    lists: Vec<bool>,
    /// Note element name and nesting depth of that name.
    note: Option<(String, usize)>,
    pending: String,
}

impl Walker {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
            lists: Vec::new(),
            note: None,
            pending: String::new(),
        }
    }

    pub fn state(&self) -> WalkState {
        if self.note.is_some() {
            WalkState::InNote
        } else if self.lists.is_empty() {
            WalkState::Outside
        } else {
            WalkState::InListFrame(self.lists.len())
        }
    }

    pub fn feed(&mut self, event: &HtmlEvent) {
        match event {
            HtmlEvent::Text(text) => self.pending.push_str(&decode_entities(text)),
            HtmlEvent::Open { name, .. } => {
                if let Some((tag, depth)) = &mut self.note {
                    if tag == name {
                        *depth += 1;
                    }
                    return;
                }
                if event.is_note() {
                    self.flush_item();
                    self.note = Some((name.clone(), 1));
                } else if name == "ul" || name == "ol" {
                    self.flush_item();
                    // A list directly inside a list belongs to the item before it,
                    // even when that item's element has already closed.
                    let in_list = !self.lists.is_empty();
                    let top = self.top();
                    let nested = top.item_open
                        || (in_list
                            && top
                                .nodes
                                .iter()
                                .any(|n| matches!(n, ImportNode::ListItem(_))));
                    if nested {
                        self.frames.push(Frame::default());
                    }
                    self.lists.push(nested);
                } else if BLOCK_TAGS.contains(&name.as_str()) {
                    self.flush_item();
                    self.top().item_open = false;
                }
            }
            HtmlEvent::Close { name } => {
                if let Some((tag, depth)) = &mut self.note {
                    if tag == name {
                        *depth -= 1;
                        if *depth == 0 {
                            self.note = None;
                            self.flush_note();
                        }
                    }
                    return;
                }
                if name == "ul" || name == "ol" {
                    self.flush_item();
                    if self.lists.pop() == Some(true) {
                        self.pop_frame();
                    }
                } else if BLOCK_TAGS.contains(&name.as_str()) {
                    self.flush_item();
                    self.top().item_open = false;
                }
            }
        }
    }

    /// Flush pending text and fold any unclosed frames into their parents.
    pub fn finish(mut self) -> Vec<ImportNode> {
        if self.note.take().is_some() {
            self.flush_note();
        } else {
            self.flush_item();
        }
        while self.frames.len() > 1 {
            self.pop_frame();
        }
        self.frames.pop().map(|f| f.nodes).unwrap_or_default()
    }

    fn top(&mut self) -> &mut Frame {
        if self.frames.is_empty() {
            self.frames.push(Frame::default());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn pop_frame(&mut self) {
        if self.frames.len() < 2 {
            return;
        }
        if let Some(frame) = self.frames.pop() {
            if !frame.nodes.is_empty() {
                self.top().nodes.push(ImportNode::NestedList(frame.nodes));
            }
        }
    }

    fn take_pending(&mut self) -> Option<String> {
        let text = self.pending.split_whitespace().collect::<Vec<_>>().join(" ");
        self.pending.clear();
        (!text.is_empty()).then_some(text)
    }

    fn flush_item(&mut self) {
        if let Some(text) = self.take_pending() {
            let top = self.top();
            top.nodes.push(ImportNode::ListItem(text));
            top.item_open = true;
        }
    }

    /// A note with no preceding item at its level becomes an ordinary item.
    fn flush_note(&mut self) {
        if let Some(text) = self.take_pending() {
            let top = self.top();
            if top.nodes.iter().any(|n| matches!(n, ImportNode::ListItem(_))) {
                top.nodes.push(ImportNode::Note(text));
            } else {
                top.nodes.push(ImportNode::ListItem(text));
                top.item_open = true;
            }
        }
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a full event stream.
pub fn walk(events: &[HtmlEvent]) -> Vec<ImportNode> {
    let mut walker = Walker::new();
    for event in events {
        walker.feed(event);
    }
    walker.finish()
}
