//! Markdown block parsing.
//!
//! Turns a solution body into an ordered list of [`DocumentNode`]s. Fenced code
//! is kept apart from everything else so the renderer can give each block its
//! own copy affordance.

mod parser;

pub use parser::parse;

/// A block-level node, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Prose(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    ListItem { marker: ListMarker, depth: usize, content: Vec<Inline> },
    FencedCode { language: Option<String>, content: String },
}

/// Bullet or ordinal of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(u64),
}

/// Inline content within a prose-bearing node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// An inline code span. Shown highlighted, never copyable on its own.
    Code(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Link { url: String, content: Vec<Inline> },
    LineBreak,
}

impl Inline {
    /// The visible text with all markup stripped.
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        push_plain(inlines, &mut out);
        out
    }
}

fn push_plain(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::Code(t) => out.push_str(t),
            Inline::Strong(children) | Inline::Emphasis(children) => push_plain(children, out),
            Inline::Link { content, .. } => push_plain(content, out),
            Inline::LineBreak => out.push('\n'),
        }
    }
}

impl DocumentNode {
    pub fn is_code(&self) -> bool {
        matches!(self, DocumentNode::FencedCode { .. })
    }
}
