//! HTML fragment emission for a [`RenderedTree`].

use std::fmt::Write;

use super::{CodeBlockSpec, Element, RenderedTree};
use crate::markdown::{Inline, ListMarker};

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

/// Label for a copy button in the given state.
pub fn copy_label(acknowledged: bool) -> &'static str {
    if acknowledged { COPIED_LABEL } else { COPY_LABEL }
}

/// Emits `tree` as HTML. `acknowledged` reports the copy state of the code
/// block with the given index.
pub fn to_html(tree: &RenderedTree, acknowledged: impl Fn(usize) -> bool) -> String {
    let mut out = String::new();
    for element in &tree.elements {
        push_element(&mut out, element, &acknowledged);
    }
    out
}

fn push_element(out: &mut String, element: &Element, acknowledged: &impl Fn(usize) -> bool) {
    match element {
        Element::Banner(message) => {
            let _ = write!(out, "<div class=\"solution-banner\">{}</div>", escape(message));
        }
        Element::Notice(message) => {
            let _ = write!(out, "<div class=\"solution-notice\" role=\"alert\">{}</div>", escape(message));
        }
        Element::Heading { level, content } => {
            let level = (*level).clamp(1, 6);
            let _ = write!(out, "<h{}>", level);
            push_inlines(out, content);
            let _ = write!(out, "</h{}>", level);
        }
        Element::Paragraph(content) => {
            out.push_str("<p>");
            push_inlines(out, content);
            out.push_str("</p>");
        }
        Element::ListItem { marker, depth, content } => {
            let marker = match marker {
                ListMarker::Bullet => "•".to_string(),
                ListMarker::Ordered(n) => format!("{}.", n),
            };
            let _ = write!(
                out,
                "<div class=\"list-item\" data-depth=\"{}\"><span class=\"list-marker\">{}</span> ",
                depth, marker
            );
            push_inlines(out, content);
            out.push_str("</div>");
        }
        Element::CodeBlock(spec) => push_code_block(out, spec, acknowledged(spec.index)),
    }
}

fn push_code_block(out: &mut String, spec: &CodeBlockSpec, acknowledged: bool) {
    let label = spec.language.as_deref().unwrap_or("code");
    let _ = write!(
        out,
        "<div class=\"code-block\" data-index=\"{}\"><div class=\"code-header\"><span class=\"code-language\">{}</span><button class=\"copy-button\" data-copied=\"{}\">{}</button></div><pre><code>{}</code></pre></div>",
        spec.index,
        escape(label),
        acknowledged,
        copy_label(acknowledged),
        escape(&spec.content)
    );
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape(text)),
            Inline::Code(code) => {
                let _ = write!(out, "<code class=\"inline-code\">{}</code>", escape(code));
            }
            Inline::Strong(children) => {
                out.push_str("<strong>");
                push_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                push_inlines(out, children);
                out.push_str("</em>");
            }
            Inline::Link { url, content } => {
                let _ = write!(out, "<a href=\"{}\" rel=\"noopener noreferrer\">", escape(url));
                push_inlines(out, content);
                out.push_str("</a>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

/// Escapes text for use in HTML bodies and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
