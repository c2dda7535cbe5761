//! Markdown to HTML rendering.
//!
//! Rendering sits behind the [`Renderer`] trait so the rest of the build only
//! ever sees `markdown in, HTML fragment out`. The default implementation uses
//! pulldown-cmark and rewrites its event stream for a book:
//!
//! - raw HTML and MDX component tags are stripped, keeping the text inside them
//! - links into the website (`/handbook/...`, `/docs/...`) become plain text
//! - fenced code with a known language is syntax highlighted
//!
//! Syntax pulldown-cmark doesn't understand simply comes through as text.

mod highlight;
mod mdx;

pub use highlight::{load_theme, CLASS_PREFIX};

use crate::config::SyntaxTheme;
use highlight::Highlighter;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

pub trait Renderer {
    /// Render a markdown document to an HTML fragment.
    fn render(&self, markdown: &str) -> String;
}

pub struct CmarkRenderer {
    highlighter: Option<Highlighter>,
}

impl CmarkRenderer {
    /// A renderer that highlights code blocks with `theme`.
    pub fn new(theme: SyntaxTheme) -> CmarkRenderer {
        CmarkRenderer {
            highlighter: Some(Highlighter::new(theme)),
        }
    }

    /// A renderer that leaves code blocks unhighlighted.
    pub fn plain() -> CmarkRenderer {
        CmarkRenderer { highlighter: None }
    }
}

impl Renderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let cleaned = mdx::clean(markdown);
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(&cleaned, options);
        let events = rewrite(parser, self.highlighter.as_ref());

        let mut body = String::with_capacity(cleaned.len() * 3 / 2);
        html::push_html(&mut body, events.into_iter());
        body
    }
}

fn rewrite<'a>(parser: Parser<'a>, highlighter: Option<&Highlighter>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    // whether each open link was dropped
    let mut links: Vec<bool> = Vec::new();
    let mut code: Option<(String, String)> = None;
    let mut html_block: Option<String> = None;
    // index of the open paragraph's start event
    let mut paragraph: Option<usize> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Paragraph) => {
                paragraph = Some(events.len());
                events.push(Event::Start(Tag::Paragraph));
            }
            Event::End(TagEnd::Paragraph) => match paragraph.take() {
                // everything in it was markup that got stripped
                Some(start) if events[start + 1..].iter().all(is_blank) => events.truncate(start),
                _ => events.push(Event::End(TagEnd::Paragraph)),
            },
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if highlighter.is_some() => {
                let lang = info
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if lang.is_empty() {
                    events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                } else {
                    code = Some((lang, String::new()));
                }
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, buffer)) = code.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) if code.is_some() => {
                if let Some((lang, buffer)) = code.take() {
                    match highlighter.and_then(|h| h.highlight(&buffer, &lang)) {
                        Some(highlighted) => events.push(Event::Html(highlighted.into())),
                        None => {
                            events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                                CowStr::from(lang),
                            ))));
                            events.push(Event::Text(buffer.into()));
                            events.push(Event::End(TagEnd::CodeBlock));
                        }
                    }
                }
            }
            Event::Start(Tag::Link { ref dest_url, .. }) if is_site_link(dest_url) => {
                links.push(true);
            }
            Event::Start(link @ Tag::Link { .. }) => {
                links.push(false);
                events.push(Event::Start(link));
            }
            Event::End(TagEnd::Link) => {
                if !links.pop().unwrap_or(false) {
                    events.push(Event::End(TagEnd::Link));
                }
            }
            Event::Start(Tag::HtmlBlock) => html_block = Some(String::new()),
            Event::Html(raw) if html_block.is_some() => {
                if let Some(block) = html_block.as_mut() {
                    block.push_str(&raw);
                }
            }
            Event::End(TagEnd::HtmlBlock) => {
                let text = html_block.take().map(|b| strip_tags(&b)).unwrap_or_default();
                let text = text.trim();
                if !text.is_empty() {
                    events.push(Event::Start(Tag::Paragraph));
                    events.push(Event::Text(text.to_string().into()));
                    events.push(Event::End(TagEnd::Paragraph));
                }
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                let text = strip_tags(&raw);
                if !text.is_empty() {
                    events.push(Event::Text(text.into()));
                }
            }
            other => events.push(other),
        }
    }

    events
}

fn is_blank(event: &Event) -> bool {
    match event {
        Event::Text(text) => text.trim().is_empty(),
        Event::SoftBreak | Event::HardBreak => true,
        _ => false,
    }
}

/// Links into the website itself, which the book doesn't contain.
fn is_site_link(dest: &str) -> bool {
    dest.starts_with('/') && !dest.starts_with("//")
}

/// Drop tags and comments from a fragment of raw HTML, keeping its text.
fn strip_tags(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        rest = &rest[start..];

        let end = if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else {
            mdx::tag_end(rest)
        };
        match end {
            Some(end) => rest = &rest[end..],
            None => {
                // an unclosed `<` is just text
                text.push_str(rest);
                rest = "";
            }
        }
    }
    text.push_str(rest);

    html_escape::decode_html_entities(&text).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(markdown: &str) -> String {
        CmarkRenderer::plain().render(markdown)
    }

    #[test]
    fn renders_common_markdown() {
        assert_eq!(render("## Values"), "<h2>Values</h2>\n");
        assert_eq!(
            render("- one\n- **two**\n"),
            "<ul>\n<li>one</li>\n<li><strong>two</strong></li>\n</ul>\n"
        );
        assert_eq!(
            render("[site](https://example.com)"),
            "<p><a href=\"https://example.com\">site</a></p>\n"
        );
        assert_eq!(
            render("![hog](hog.png)"),
            "<p><img src=\"hog.png\" alt=\"hog\" /></p>\n"
        );
        assert_eq!(
            render("```\na < b\n```\n"),
            "<pre><code>a &lt; b\n</code></pre>\n"
        );
    }

    #[test]
    fn renders_tables_and_strikethrough() {
        let html = render("| a | b |\n|---|---|\n| 1 | ~~2~~ |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>2</del>"));
    }

    #[test]
    fn unwraps_site_links() {
        assert_eq!(
            render("See [our values](/handbook/company/values) and [docs](//cdn.example.com/x)."),
            "<p>See our values and <a href=\"//cdn.example.com/x\">docs</a>.</p>\n"
        );
    }

    #[test]
    fn strips_components_but_keeps_their_text() {
        let html = render("import { Callout } from 'components'\n\nBefore <Tooltip tip=\"x\">hover</Tooltip> after\n\n<CalloutBox icon=\"info\">\n\nInside the box\n\n</CalloutBox>\n\n<!-- hidden -->\n");
        assert!(!html.contains("import"));
        assert!(!html.contains("Tooltip"));
        assert!(!html.contains("CalloutBox"));
        assert!(!html.contains("hidden"));
        assert!(html.contains("<p>Before hover after</p>"));
        assert!(html.contains("<p>Inside the box</p>"));
    }

    #[test]
    fn raw_html_blocks_become_paragraphs_of_text() {
        assert_eq!(
            render("<div class=\"note\">Fish &amp; chips</div>\n"),
            "<p>Fish &amp; chips</p>\n"
        );
    }

    #[test]
    fn highlights_fenced_code_with_a_language() {
        let renderer = CmarkRenderer::new(SyntaxTheme::default());
        let html = renderer.render("```rust title=\"main.rs\"\nfn main() {}\n```\n");
        assert!(html.starts_with(r#"<pre class="highlight"><code>"#));

        let html = renderer.render("```nonsense\nplain\n```\n");
        assert_eq!(
            html,
            "<pre><code class=\"language-nonsense\">plain\n</code></pre>\n"
        );
    }

    #[test]
    fn strip_tags_handles_unclosed_brackets() {
        assert_eq!(strip_tags("<b>1 < 2"), "1 < 2");
        assert_eq!(strip_tags("a <!-- x > y --> b"), "a  b");
    }

    #[test]
    fn strip_tags_skips_brackets_in_attribute_values() {
        assert_eq!(strip_tags("<a title=\"x > y\">link</a>"), "link");
        assert_eq!(strip_tags("<span data-x='1>0'>on</span>"), "on");
    }

    #[test]
    fn components_with_expressions_leave_no_markup() {
        assert_eq!(
            render("Hover <Tooltip tip=\"a > b\">here</Tooltip> now\n"),
            "<p>Hover here now</p>\n"
        );
        assert_eq!(
            render("<CallToAction onClick={() => go()}>Click</CallToAction>\n"),
            "<p>Click</p>\n"
        );
    }

    #[test]
    fn paragraphs_left_empty_are_dropped() {
        assert_eq!(
            render("<ProductScreenshot\n  imageLight={light}\n  alt=\"Insights\"\n/>\n\nAfter\n"),
            "<p>After</p>\n"
        );
        assert_eq!(
            render("<span class=\"x\"></span>\n\nAfter\n"),
            "<p>After</p>\n"
        );
        assert_eq!(render("Kept <span></span>\n"), "<p>Kept </p>\n");
    }
}
