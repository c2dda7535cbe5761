//! Making rendered HTML safe to put in an XHTML document.
//!
//! E-readers are strict XML parsers, and the rendered handbook is HTML from a
//! website. Fragments are rewritten through quick-xml: only a known set of
//! elements and attributes survive, everything else is unwrapped to its text.
//! Images aren't bundled, so they become their alt text, and links survive only
//! when they point somewhere an e-reader can follow.

use crate::error::AssemblyError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

const ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "caption", "cite", "code", "col", "colgroup", "dd",
    "del", "div", "dl", "dt", "em", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "i", "ins", "kbd", "li", "mark", "ol", "p", "pre", "q", "s", "samp", "section", "small",
    "span", "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "u",
    "ul", "var",
];

const ATTRIBUTES: &[&str] = &[
    "class", "colspan", "href", "id", "rowspan", "start", "style", "title",
];

/// What to do with an element's tags.
enum Action<'a> {
    Keep(BytesStart<'a>),
    Unwrap,
    /// Replace the element with text
    Replace(String),
}

/// Rewrite an HTML fragment into well-formed XHTML.
///
/// `resource` names the document being built, for error messages.
pub fn sanitize(resource: &str, html: &str) -> Result<String, AssemblyError> {
    let cleaned: String = html.chars().filter(|&c| is_xml_char(c)).collect();
    let wrapped = format!("<div>{cleaned}</div>");

    let mut reader = Reader::from_str(&wrapped);
    let mut writer = Writer::new(Vec::with_capacity(wrapped.len()));
    // whether each open element was kept
    let mut open: Vec<bool> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| serialize_error(resource, e))?;
        let out = match event {
            Event::Start(start) => {
                let action = rewrite(&start);
                open.push(matches!(action, Action::Keep(_)));
                match action {
                    Action::Keep(start) => Some(Event::Start(start)),
                    Action::Replace(text) => Some(Event::Text(BytesText::new(&text).into_owned())),
                    Action::Unwrap => None,
                }
            }
            Event::End(end) => match open.pop() {
                Some(true) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                    Some(Event::End(BytesEnd::new(name)))
                }
                _ => None,
            },
            Event::Empty(empty) => match rewrite(&empty) {
                Action::Keep(empty) => Some(Event::Empty(empty)),
                Action::Replace(text) => Some(Event::Text(BytesText::new(&text).into_owned())),
                Action::Unwrap => None,
            },
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(&reference).to_string();
                match name.as_str() {
                    "amp" | "lt" | "gt" | "quot" | "apos" => Some(Event::GeneralRef(reference)),
                    _ if reference.is_char_ref() => Some(Event::GeneralRef(reference)),
                    // HTML's named entities aren't defined in XHTML
                    _ => {
                        let entity = format!("&{name};");
                        let decoded = html_escape::decode_html_entities(&entity).to_string();
                        Some(Event::Text(BytesText::new(&decoded).into_owned()))
                    }
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).to_string();
                Some(Event::Text(BytesText::new(&text).into_owned()))
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => None,
            Event::Eof => break,
            other => Some(other),
        };

        if let Some(event) = out {
            writer
                .write_event(event)
                .map_err(|e| serialize_error(resource, e))?;
        }
    }

    let bytes = writer.into_inner();
    String::from_utf8(bytes).map_err(|e| serialize_error(resource, e))
}

/// Fail unless `xhtml` parses as well-formed XML.
pub fn check_well_formed(resource: &str, xhtml: &str) -> Result<(), AssemblyError> {
    let mut reader = Reader::from_str(xhtml);
    let mut depth = 0usize;
    let mut roots = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Ok(Event::Empty(_)) if depth == 0 => roots += 1,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(serialize_error(resource, e)),
        }
    }

    if depth != 0 || roots != 1 {
        return Err(AssemblyError::Serialize {
            resource: resource.to_string(),
            reason: "document must have exactly one closed root element".to_string(),
        });
    }
    Ok(())
}

fn rewrite<'a>(element: &BytesStart<'a>) -> Action<'a> {
    let name = String::from_utf8_lossy(element.name().as_ref()).to_ascii_lowercase();
    let attributes = attributes(element);
    let attribute = |key: &str| {
        attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    match name.as_str() {
        "img" => {
            let alt = attribute("alt").unwrap_or_default().trim();
            if alt.is_empty() {
                Action::Unwrap
            } else {
                Action::Replace(format!("[{alt}]"))
            }
        }
        "input" => match attribute("type") {
            Some("checkbox") if attribute("checked").is_some() => {
                Action::Replace("\u{2611} ".to_string())
            }
            Some("checkbox") => Action::Replace("\u{2610} ".to_string()),
            _ => Action::Unwrap,
        },
        "a" if !attribute("href").is_some_and(is_followable) => Action::Unwrap,
        _ if ELEMENTS.contains(&name.as_str()) => {
            let mut kept = BytesStart::new(name.clone());
            for (key, value) in attributes.iter() {
                if ATTRIBUTES.contains(&key.as_str()) {
                    kept.push_attribute((key.as_str(), value.as_str()));
                }
            }
            Action::Keep(kept)
        }
        _ => Action::Unwrap,
    }
}

/// Attributes with lowercase names and unescaped values. Malformed ones are dropped.
fn attributes(element: &BytesStart) -> Vec<(String, String)> {
    element
        .attributes()
        .with_checks(false)
        .filter_map(|a| a.ok())
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).to_ascii_lowercase();
            let raw = String::from_utf8_lossy(&a.value).to_string();
            let value = match quick_xml::escape::unescape(&raw) {
                Ok(value) => value.to_string(),
                Err(_) => html_escape::decode_html_entities(&raw).to_string(),
            };
            (key, value)
        })
        .collect()
}

fn is_followable(href: &str) -> bool {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || href.starts_with('#')
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn serialize_error(resource: &str, e: impl std::fmt::Display) -> AssemblyError {
    AssemblyError::Serialize {
        resource: resource.to_string(),
        reason: e.to_string(),
    }
}

/// Escape text for use inside an XHTML element or attribute.
pub fn escape(text: &str) -> String {
    let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    html_escape::encode_double_quoted_attribute(&cleaned).into_owned()
}

#[cfg(test)]
mod test {
    use super::*;

    fn clean(html: &str) -> String {
        sanitize("test.xhtml", html).expect("can sanitize")
    }

    #[test]
    fn keeps_allowed_markup() {
        assert_eq!(
            clean("<p>Be <em>calm</em> &amp; <a href=\"https://example.com\">kind</a>.</p>\n"),
            "<div><p>Be <em>calm</em> &amp; <a href=\"https://example.com\">kind</a>.</p>\n</div>"
        );
        assert_eq!(clean("<hr />"), "<div><hr/></div>");
    }

    #[test]
    fn unwraps_unknown_elements_and_attributes() {
        assert_eq!(
            clean("<p onclick=\"x()\">a <video src=\"v.mp4\">clip</video> b</p>"),
            "<div><p>a clip b</p></div>"
        );
    }

    #[test]
    fn images_become_alt_text() {
        assert_eq!(
            clean("<p><img src=\"hog.png\" alt=\"Max &amp; friends\" /></p>"),
            "<div><p>[Max &amp; friends]</p></div>"
        );
        assert_eq!(clean("<p><img src=\"x.png\" /></p>"), "<div><p></p></div>");
    }

    #[test]
    fn unwraps_links_readers_cannot_follow() {
        assert_eq!(
            clean("<a href=\"../other.md\">other</a> <a href=\"#fn1\">1</a> <a>bare</a>"),
            "<div>other <a href=\"#fn1\">1</a> bare</div>"
        );
    }

    #[test]
    fn replaces_html_entities_and_invalid_characters() {
        assert_eq!(clean("a&nbsp;b\u{1}c"), "<div>a\u{a0}bc</div>");
        assert_eq!(clean("&#8212;"), "<div>&#8212;</div>");
    }

    #[test]
    fn renders_task_list_checkboxes() {
        assert_eq!(
            clean("<li><input disabled=\"\" type=\"checkbox\" checked=\"\"/>\ndone</li>"),
            "<div><li>\u{2611} \ndone</li></div>"
        );
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(
            sanitize("broken.xhtml", "<p><em>oops</p>"),
            Err(AssemblyError::Serialize { .. })
        ));
    }

    #[test]
    fn checks_whole_documents() {
        assert!(check_well_formed("ok.xhtml", "<?xml version=\"1.0\"?>\n<!DOCTYPE html>\n<html><body/></html>").is_ok());
        assert!(check_well_formed("bad.xhtml", "<html><body></html>").is_err());
        assert!(check_well_formed("two.xhtml", "<a/><b></b>").is_err());
    }

    #[test]
    fn escapes_text() {
        assert_eq!(escape("Fish & \"chips\"\u{0}"), "Fish &amp; &quot;chips&quot;");
    }
}
