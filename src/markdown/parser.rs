//! pulldown-cmark event stream to [`DocumentNode`]s.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{DocumentNode, Inline, ListMarker};

/// Parses `raw` into block nodes. Never fails: constructs outside the
/// supported set degrade to prose, and an unterminated fence runs to the end
/// of the input.
pub fn parse(raw: &str) -> Vec<DocumentNode> {
    let mut builder = Builder::default();
    for event in Parser::new_ext(raw, Options::empty()) {
        builder.event(event);
    }
    builder.finish()
}

/// One open list: the next ordinal, if ordered.
struct OpenList {
    next: Option<u64>,
}

/// One open list item. `emitted` is set once a nested block has interrupted
/// it; anything flushed after that is continuation prose, not a new item.
struct OpenItem {
    marker: ListMarker,
    depth: usize,
    emitted: bool,
}

enum Container {
    Paragraph,
    Heading(u8),
}

struct Builder {
    nodes: Vec<DocumentNode>,
    /// Inline accumulators; the bottom entry belongs to the current block and
    /// each open strong/emphasis/link pushes another.
    spans: Vec<Vec<Inline>>,
    links: Vec<String>,
    lists: Vec<OpenList>,
    items: Vec<OpenItem>,
    container: Option<Container>,
    code: Option<(Option<String>, String)>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            spans: vec![Vec::new()],
            links: Vec::new(),
            lists: Vec::new(),
            items: Vec::new(),
            container: None,
            code: None,
        }
    }
}

impl Builder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Paragraph) | Event::Start(Tag::HtmlBlock) => {
                if self.items.is_empty() {
                    self.container = Some(Container::Paragraph);
                } else if !self.current().is_empty() {
                    // Loose list item with several paragraphs.
                    self.push_text(" ");
                }
            }
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::HtmlBlock) => {
                if self.items.is_empty() {
                    self.flush_prose();
                }
            }
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_item();
                self.container = Some(Container::Heading(heading_level(level)));
            }
            Event::End(TagEnd::Heading(_)) => {
                let content = self.take_spans();
                let level = match self.container.take() {
                    Some(Container::Heading(level)) => level,
                    _ => 1,
                };
                self.nodes.push(DocumentNode::Heading { level, content });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_item();
                self.flush_prose();
                let language = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => Some(info.trim().to_string()),
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, content)) = self.code.take() {
                    self.nodes.push(DocumentNode::FencedCode { language, content });
                }
            }
            Event::Start(Tag::List(first)) => {
                self.flush_item();
                self.lists.push(OpenList { next: first });
            }
            Event::End(TagEnd::List(_)) => {
                self.lists.pop();
            }
            Event::Start(Tag::Item) => {
                self.flush_item();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(OpenList { next: Some(n) }) => {
                        let marker = ListMarker::Ordered(*n);
                        *n += 1;
                        marker
                    }
                    _ => ListMarker::Bullet,
                };
                self.items.push(OpenItem { marker, depth, emitted: false });
            }
            Event::End(TagEnd::Item) => {
                self.flush_item();
                self.items.pop();
            }
            Event::Start(Tag::Strong) | Event::Start(Tag::Emphasis) => {
                self.spans.push(Vec::new());
            }
            Event::End(TagEnd::Strong) => {
                let children = self.pop_span();
                self.current().push(Inline::Strong(children));
            }
            Event::End(TagEnd::Emphasis) => {
                let children = self.pop_span();
                self.current().push(Inline::Emphasis(children));
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.links.push(dest_url.to_string());
                self.spans.push(Vec::new());
            }
            Event::End(TagEnd::Link) => {
                let content = self.pop_span();
                let url = self.links.pop().unwrap_or_default();
                self.current().push(Inline::Link { url, content });
            }
            Event::Text(text) => match self.code.as_mut() {
                Some((_, buf)) => buf.push_str(&text),
                None => self.push_text(&text),
            },
            Event::Code(text) => self.current().push(Inline::Code(text.to_string())),
            Event::Html(html) | Event::InlineHtml(html) => match self.code.as_mut() {
                Some((_, buf)) => buf.push_str(&html),
                None => self.push_text(&html),
            },
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.current().push(Inline::LineBreak),
            // Block quotes, images and rules carry no structure we keep; their
            // text still arrives through the events above.
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<DocumentNode> {
        // pulldown-cmark closes open blocks itself; this only guards against
        // text left over by a truncated event stream.
        if let Some((language, content)) = self.code.take() {
            self.nodes.push(DocumentNode::FencedCode { language, content });
        }
        if !self.items.is_empty() {
            self.flush_item();
        }
        self.flush_prose();
        self.nodes
    }

    fn current(&mut self) -> &mut Vec<Inline> {
        if self.spans.is_empty() {
            self.spans.push(Vec::new());
        }
        let last = self.spans.len() - 1;
        &mut self.spans[last]
    }

    fn push_text(&mut self, text: &str) {
        let current = self.current();
        if let Some(Inline::Text(prev)) = current.last_mut() {
            prev.push_str(text);
        } else {
            current.push(Inline::Text(text.to_string()));
        }
    }

    fn pop_span(&mut self) -> Vec<Inline> {
        if self.spans.len() > 1 {
            self.spans.pop().unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    /// Takes everything accumulated for the current block, closing any
    /// unbalanced inline containers into their parent.
    fn take_spans(&mut self) -> Vec<Inline> {
        while self.spans.len() > 1 {
            let orphan = self.spans.pop().unwrap_or_default();
            self.current().extend(orphan);
        }
        trim_edges(std::mem::take(self.current()))
    }

    fn flush_prose(&mut self) {
        self.container = None;
        let content = self.take_spans();
        if !content.is_empty() {
            self.nodes.push(DocumentNode::Prose(content));
        }
    }

    fn flush_item(&mut self) {
        let content = self.take_spans();
        let Some(item) = self.items.last_mut() else {
            if !content.is_empty() {
                self.nodes.push(DocumentNode::Prose(content));
            }
            return;
        };
        if content.is_empty() {
            // Nothing before the nested block; its marker is not shown.
            item.emitted = true;
            return;
        }
        if item.emitted {
            self.nodes.push(DocumentNode::Prose(content));
            return;
        }
        item.emitted = true;
        self.nodes.push(DocumentNode::ListItem {
            marker: item.marker,
            depth: item.depth,
            content,
        });
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Drops whitespace-only text at either end left behind by soft breaks.
fn trim_edges(mut inlines: Vec<Inline>) -> Vec<Inline> {
    if let Some(Inline::Text(t)) = inlines.first_mut() {
        let trimmed = t.trim_start().to_string();
        *t = trimmed;
    }
    if let Some(Inline::Text(t)) = inlines.last_mut() {
        let trimmed = t.trim_end().to_string();
        *t = trimmed;
    }
    inlines.retain(|i| !matches!(i, Inline::Text(t) if t.is_empty()));
    inlines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_single_fenced_block() {
        let nodes = parse("```python\nprint(1)\n```");
        assert_eq!(
            nodes,
            vec![DocumentNode::FencedCode {
                language: Some("python".to_string()),
                content: "print(1)\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let nodes = parse("```js\nunterminated");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            DocumentNode::FencedCode { language, content } => {
                assert_eq!(language.as_deref(), Some("js"));
                assert_eq!(content.trim_end(), "unterminated");
            }
            other => panic!("expected fenced code, got {:?}", other),
        }
    }

    #[test]
    fn test_fence_without_tag() {
        let nodes = parse("```\nx = 1\n```\n");
        assert_eq!(
            nodes,
            vec![DocumentNode::FencedCode { language: None, content: "x = 1\n".to_string() }]
        );
    }

    #[test]
    fn test_info_string_is_kept_verbatim() {
        let nodes = parse("~~~rust ignore\nfn main() {}\n~~~\n");
        assert!(matches!(
            &nodes[0],
            DocumentNode::FencedCode { language: Some(l), .. } if l == "rust ignore"
        ));
    }

    #[test]
    fn test_heading_paragraph_and_code_in_order() {
        let nodes = parse("## Approach\nUse a hash map.\n```python\ndef f(): pass\n```");
        assert_eq!(
            nodes,
            vec![
                DocumentNode::Heading { level: 2, content: vec![text("Approach")] },
                DocumentNode::Prose(vec![text("Use a hash map.")]),
                DocumentNode::FencedCode {
                    language: Some("python".to_string()),
                    content: "def f(): pass\n".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_inline_code_stays_inside_paragraph() {
        let nodes = parse("Call `solve()` twice.");
        assert_eq!(
            nodes,
            vec![DocumentNode::Prose(vec![
                text("Call "),
                Inline::Code("solve()".to_string()),
                text(" twice."),
            ])]
        );
    }

    #[test]
    fn test_lists_with_markers_and_depth() {
        let nodes = parse("1. first\n2. second\n   - nested\n\n- bullet\n");
        assert_eq!(
            nodes,
            vec![
                DocumentNode::ListItem { marker: ListMarker::Ordered(1), depth: 0, content: vec![text("first")] },
                DocumentNode::ListItem { marker: ListMarker::Ordered(2), depth: 0, content: vec![text("second")] },
                DocumentNode::ListItem { marker: ListMarker::Bullet, depth: 1, content: vec![text("nested")] },
                DocumentNode::ListItem { marker: ListMarker::Bullet, depth: 0, content: vec![text("bullet")] },
            ]
        );
    }

    #[test]
    fn test_code_block_inside_list_item_keeps_order() {
        let nodes = parse("- step one:\n\n  ```go\n  x := 1\n  ```\n- step two\n");
        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[0], DocumentNode::ListItem { content, .. } if *content == vec![text("step one:")]));
        assert!(matches!(&nodes[1], DocumentNode::FencedCode { language: Some(l), .. } if l == "go"));
        assert!(matches!(&nodes[2], DocumentNode::ListItem { content, .. } if *content == vec![text("step two")]));
    }

    #[test]
    fn test_text_after_nested_code_continues_item() {
        let nodes = parse(
            "1. Build the map:\n\n   ```py\n   d = {}\n   ```\n\n   Then scan once.\n2. Return the pair.\n",
        );
        assert_eq!(
            nodes,
            vec![
                DocumentNode::ListItem { marker: ListMarker::Ordered(1), depth: 0, content: vec![text("Build the map:")] },
                DocumentNode::FencedCode { language: Some("py".to_string()), content: "d = {}\n".to_string() },
                DocumentNode::Prose(vec![text("Then scan once.")]),
                DocumentNode::ListItem { marker: ListMarker::Ordered(2), depth: 0, content: vec![text("Return the pair.")] },
            ]
        );
        assert!(nodes[1].is_code());
        assert!(!nodes[2].is_code());
    }

    #[test]
    fn test_heading_inside_item_leaves_no_empty_item() {
        let nodes = parse("- # Title\n- next\n");
        assert_eq!(
            nodes,
            vec![
                DocumentNode::Heading { level: 1, content: vec![text("Title")] },
                DocumentNode::ListItem { marker: ListMarker::Bullet, depth: 0, content: vec![text("next")] },
            ]
        );
    }

    #[test]
    fn test_emphasis_strong_and_links() {
        let nodes = parse("**Time**: *O(n)* via [docs](https://example.com)");
        assert_eq!(
            nodes,
            vec![DocumentNode::Prose(vec![
                Inline::Strong(vec![text("Time")]),
                text(": "),
                Inline::Emphasis(vec![text("O(n)")]),
                text(" via "),
                Inline::Link { url: "https://example.com".to_string(), content: vec![text("docs")] },
            ])]
        );
    }

    #[test]
    fn test_block_quote_degrades_to_prose() {
        let nodes = parse("> note this\n");
        assert_eq!(nodes, vec![DocumentNode::Prose(vec![text("note this")])]);
    }

    #[test]
    fn test_plain_text_strips_markup() {
        let nodes = parse("Use **two** `pointers`.");
        let DocumentNode::Prose(inlines) = &nodes[0] else { panic!("expected prose") };
        assert_eq!(Inline::plain_text(inlines), "Use two pointers.");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n").is_empty());
    }

    #[test]
    fn test_parse_is_pure() {
        let raw = "# T\n\ntext `x`\n\n```c\nint a;\n```\n";
        assert_eq!(parse(raw), parse(raw));
    }
}
