//! Markdown to HTML rendering.

use std::collections::HashSet;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::codeblock::render_code_block;

/// A rendered documentation page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDoc {
    /// Embeddable HTML
    pub html: String,

    /// Headings in document order
    pub toc: Vec<TocEntry>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Render markdown documentation to HTML.
pub fn render_docs(markdown: &str) -> String {
    render_document(markdown).html
}

/// Render markdown documentation to HTML, collecting the table of contents.
///
/// Output is deterministic: anchors depend only on heading text and order.
pub fn render_document(markdown: &str) -> RenderedDoc {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;

    let parser = Parser::new_ext(markdown, options);

    let mut events: Vec<Event> = Vec::new();
    let mut toc = Vec::new();
    let mut anchors = Anchors::default();

    let mut current_code_block: Option<(String, String)> = None; // (info, source)
    let mut current_heading: Option<(usize, String)> = None; // (start event index, text)

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_code_block = Some((info, String::new()));
            }

            Event::Text(text) if current_code_block.is_some() => {
                if let Some((_, ref mut source)) = current_code_block {
                    source.push_str(&text);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, source)) = current_code_block.take() {
                    events.push(Event::Html(render_code_block(&source, &info).into()));
                }
            }

            Event::Start(Tag::Heading { .. }) => {
                current_heading = Some((events.len(), String::new()));
                events.push(event);
            }

            Event::Text(ref text) | Event::Code(ref text) if current_heading.is_some() => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(text);
                }
                events.push(event);
            }

            Event::End(TagEnd::Heading(level)) => {
                if let Some((start, title)) = current_heading.take() {
                    if let Some(Event::Start(Tag::Heading { id, .. })) = events.get_mut(start) {
                        let anchor = match id.take() {
                            Some(explicit) => anchors.claim(explicit.to_string()),
                            None => anchors.claim(slugify(&title)),
                        };
                        *id = Some(CowStr::from(anchor.clone()));
                        toc.push(TocEntry {
                            title: title.trim().to_string(),
                            id: anchor,
                            level: level as u8,
                        });
                    }
                }
                events.push(event);
            }

            _ => events.push(event),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    RenderedDoc {
        html: html_output,
        toc,
    }
}

/// Anchors already used in a document.
#[derive(Debug, Default)]
struct Anchors {
    used: HashSet<String>,
}

impl Anchors {
    /// Reserve `base`, suffixing `-1`, `-2`, ... when it is taken.
    fn claim(&mut self, base: String) -> String {
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };

        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_headings_with_anchors() {
        let html = render_docs("# Getting Started\n\nText.\n\n## API Reference\n");

        assert!(html.contains(r#"<h1 id="getting-started">Getting Started</h1>"#));
        assert!(html.contains(r#"<h2 id="api-reference">API Reference</h2>"#));
        assert!(html.contains("<p>Text.</p>"));
    }

    #[test]
    fn duplicate_headings_get_unique_anchors() {
        let doc = render_document("## Usage\n\n## Usage\n\n## Usage\n");

        let ids: Vec<_> = doc.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["usage", "usage-1", "usage-2"]);
    }

    #[test]
    fn explicit_heading_id_is_kept() {
        let html = render_docs("## Events {#custom-events}\n");
        assert!(html.contains(r#"<h2 id="custom-events">Events</h2>"#));
    }

    #[test]
    fn heading_with_inline_code_uses_code_text() {
        let doc = render_document("## The `label` attribute\n");

        assert_eq!(doc.toc[0].id, "the-label-attribute");
        assert_eq!(doc.toc[0].title, "The label attribute");
        assert_eq!(doc.toc[0].level, 2);
    }

    #[test]
    fn symbol_only_heading_gets_fallback_anchor() {
        let doc = render_document("# !!!\n");
        assert_eq!(doc.toc[0].id, "section");
    }

    #[test]
    fn highlights_fenced_code() {
        let html = render_docs("```js\nconst x = 1;\n```\n");

        assert!(html.contains(r#"<pre><code class="hljs language-js">"#));
        assert!(html.contains("hljs-"));
    }

    #[test]
    fn unknown_language_degrades_only_that_block() {
        let source = "# Title\n\n```klingon\n<b>qapla'</b>\n```\n\n```js\nlet a = 1;\n```\n\nAfter.\n";
        let html = render_docs(source);

        assert!(html.contains(r#"<h1 id="title">Title</h1>"#));
        assert!(html.contains("&lt;b&gt;qapla'&lt;/b&gt;"));
        assert!(html.contains(r#"<code class="hljs language-js">"#));
        assert!(html.contains("<p>After.</p>"));
    }

    #[test]
    fn indented_code_is_escaped() {
        let html = render_docs("Para.\n\n    <div>\n");
        assert!(html.contains("&lt;div&gt;"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let source = "# A\n\n## A\n\n```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";

        assert_eq!(render_document(source), render_document(source));
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("API Reference"), "api-reference");
        assert_eq!(slugify("Button (Primary)"), "button-primary");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("snake_case name"), "snake-case-name");
    }
}
