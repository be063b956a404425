//! Parsed documentation comment trees
//!
//! The front-end hands us an already-parsed comment tree; we keep a
//! simplified kind-tagged mirror of it so consumers (and the
//! comment-attribute extraction pass) can walk it uniformly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    Full,
    Paragraph,
    Text,
    BlockCommand,
    InlineCommand,
    ParamCommand,
}

/// One node of a parsed comment tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text payload for `Text` nodes
    pub text: Option<String>,
    /// Command name for command nodes (`param`, `brief`, ...)
    pub command: Option<String>,
    pub children: Vec<Comment>,
}

impl Comment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: CommentKind::Text,
            text: Some(text.into()),
            command: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: CommentKind, children: Vec<Comment>) -> Self {
        Self {
            kind,
            text: None,
            command: None,
            children,
        }
    }

    /// Collect the text of every `Text` descendant, depth-first.
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(text.trim());
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Visit every text node, depth-first.
    pub fn for_each_text(&self, f: &mut impl FnMut(&str)) {
        if let Some(text) = &self.text {
            f(text);
        }
        for child in &self.children {
            child.for_each_text(f);
        }
    }
}
