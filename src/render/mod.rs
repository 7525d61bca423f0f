//! Document rendering.
//!
//! [`render`] maps parsed nodes onto a display tree; [`render_payload`] does the
//! same for a whole result, adding the status line above the body. Both are
//! pure, so re-rendering the same input gives an equal tree.

pub mod html;

use crate::markdown::{self, DocumentNode, Inline, ListMarker};
use crate::models::ResultPayload;

/// A fenced code block as it appears in the tree. `index` counts code blocks
/// only, in document order, and is how a block's presentation unit is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockSpec {
    pub index: usize,
    pub language: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Status message above a successful result.
    Banner(String),
    /// Status message for a failed submission.
    Notice(String),
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    ListItem { marker: ListMarker, depth: usize, content: Vec<Inline> },
    CodeBlock(CodeBlockSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedTree {
    pub elements: Vec<Element>,
}

impl RenderedTree {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlockSpec> {
        self.elements.iter().filter_map(|e| match e {
            Element::CodeBlock(spec) => Some(spec),
            _ => None,
        })
    }
}

pub fn render(nodes: &[DocumentNode]) -> RenderedTree {
    let mut next_block = 0;
    let elements = nodes
        .iter()
        .map(|node| match node {
            DocumentNode::Heading { level, content } => Element::Heading {
                level: *level,
                content: content.clone(),
            },
            DocumentNode::Prose(content) => Element::Paragraph(content.clone()),
            DocumentNode::ListItem { marker, depth, content } => Element::ListItem {
                marker: *marker,
                depth: *depth,
                content: content.clone(),
            },
            DocumentNode::FencedCode { language, content } => {
                let index = next_block;
                next_block += 1;
                Element::CodeBlock(CodeBlockSpec {
                    index,
                    language: language.clone(),
                    content: content.clone(),
                })
            }
        })
        .collect();

    RenderedTree { elements }
}

/// Renders a whole result: the status line (if any) followed by the parsed body.
pub fn render_payload(payload: &ResultPayload) -> RenderedTree {
    let mut elements = Vec::new();

    if let Some(message) = payload.annotation() {
        elements.push(Element::Banner(message.to_string()));
    } else if let Some(message) = payload.failure() {
        elements.push(Element::Notice(message.to_string()));
    }

    if let Some(body) = payload.body() {
        elements.extend(render(&markdown::parse(body)).elements);
    }

    RenderedTree { elements }
}
