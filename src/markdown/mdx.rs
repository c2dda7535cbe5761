//! Source-level cleanup of MDX before it reaches the markdown parser.
//!
//! Handbook pages are MDX: besides markdown they carry `import`/`export`
//! statements and tags for the site's React components. Neither means anything
//! in a book. Component tags are removed here rather than during rendering
//! because their props (`onClick={() => go()}`, `tip="a > b"`) often aren't
//! something CommonMark recognises as HTML, and would otherwise come through
//! as text. The text between an opening and closing tag is kept.

/// Remove module statements and component tags outside code, and squeeze long
/// blank runs.
pub fn clean(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut prose = String::new();
    let mut fence: Option<String> = None;

    for line in markdown.lines() {
        let trimmed = line.trim_start();

        if let Some(marker) = &fence {
            if trimmed.starts_with(marker.as_str()) {
                fence = None;
            }
            push_line(&mut out, line);
            continue;
        }

        if let Some(marker) = fence_marker(trimmed) {
            flush(&mut out, &mut prose);
            fence = Some(marker);
            push_line(&mut out, line);
            continue;
        }

        if is_module_statement(line) {
            continue;
        }
        push_line(&mut prose, line);
    }
    flush(&mut out, &mut prose);

    out
}

/// Move the prose gathered since the last fence into `out`.
fn flush(out: &mut String, prose: &mut String) {
    let stripped = strip_components(prose);
    let mut blank_run = 0;
    for line in stripped.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 2 {
                continue;
            }
            // whitespace left behind by a removed tag
            push_line(out, "");
        } else {
            blank_run = 0;
            push_line(out, line);
        }
    }
    prose.clear();
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn fence_marker(trimmed: &str) -> Option<String> {
    let c = trimmed.chars().next()?;
    if c != '`' && c != '~' {
        return None;
    }
    let run: String = trimmed.chars().take_while(|&x| x == c).collect();
    (run.len() >= 3).then_some(run)
}

fn is_module_statement(line: &str) -> bool {
    line.starts_with("import ") || line.starts_with("export ")
}

/// Remove `<Component ...>`, `</Component>`, `<Component ... />` and fragment
/// tags, leaving code spans alone.
fn strip_components(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if rest.starts_with('`') {
            let span = code_span(rest);
            out.push_str(&rest[..span]);
            i += span;
            continue;
        }

        if rest.starts_with('<') {
            if let Some(end) = component_tag(rest) {
                i += end;
                continue;
            }
        }

        let Some(c) = rest.chars().next() else {
            break;
        };
        out.push(c);
        i += c.len_utf8();
    }

    out
}

/// Length of the code span starting at `text`, or of its opening backticks when
/// they are never closed.
fn code_span(text: &str) -> usize {
    let ticks = text.bytes().take_while(|&b| b == b'`').count();
    let mut offset = ticks;
    while let Some(found) = text[offset..].find('`') {
        let start = offset + found;
        let run = text[start..].bytes().take_while(|&b| b == b'`').count();
        if run == ticks {
            return start + run;
        }
        offset = start + run;
    }
    ticks
}

/// Length of the component tag starting at `text`, if it is one.
fn component_tag(text: &str) -> Option<usize> {
    if text.starts_with("<>") {
        return Some(2);
    }
    if text.starts_with("</>") {
        return Some(3);
    }

    let name = text.strip_prefix("</").unwrap_or(&text[1..]);
    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    let after_name =
        name.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '.' || c == '_');
    if !after_name.starts_with(|c: char| c.is_whitespace() || c == '/' || c == '>') {
        return None;
    }
    tag_end(text)
}

/// Offset just past the `>` closing the tag at the start of `text`, skipping
/// `>` inside quoted values and `{...}` expressions. A tag never spans a blank
/// line.
pub fn tag_end(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for (i, c) in text.char_indices().skip(1) {
        if c == '\n' && text[i + 1..].lines().next().is_some_and(|l| l.trim().is_empty()) {
            return None;
        }
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'' | '`') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => depth = depth.saturating_sub(1),
            (None, '>') if depth == 0 => return Some(i + 1),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_imports_and_exports() {
        let source = "import Foo from 'components/Foo'\nexport const meta = {}\n\n# Title\n";
        assert_eq!(clean(source), "\n# Title\n");
    }

    #[test]
    fn keeps_statements_inside_code_fences() {
        let source = "```js\nimport x from 'y'\n```\n~~~~\nexport default 1\n~~~~\n";
        assert_eq!(clean(source), source);
    }

    #[test]
    fn squeezes_blank_runs() {
        assert_eq!(clean("a\n\n\n\n\n\nb\n"), "a\n\n\nb\n");
    }

    #[test]
    fn strips_component_tags_keeping_their_text() {
        assert_eq!(
            clean("Hover <Tooltip tip=\"a > b\">here</Tooltip> now\n"),
            "Hover here now\n"
        );
        assert_eq!(
            clean("<CallToAction onClick={() => go()}>Click</CallToAction>\n"),
            "Click\n"
        );
        assert_eq!(clean("<>fragment</>\n"), "fragment\n");
    }

    #[test]
    fn strips_multi_line_self_closing_components() {
        let source = "<ProductScreenshot\n  imageLight={light}\n  alt=\"Insights > trends\"\n/>\n\nAfter\n";
        assert_eq!(clean(source), "\n\nAfter\n");
    }

    #[test]
    fn leaves_components_in_code_alone() {
        let source = "Use `<Callout />` here\n\n```jsx\n<Callout type=\"note\" />\n```\n";
        assert_eq!(clean(source), source);
    }

    #[test]
    fn leaves_lowercase_html_and_comparisons_alone() {
        let source = "a <b>bold</b> move, 1 < 2 and x <Y\n";
        assert_eq!(clean(source), source);
    }

    #[test]
    fn finds_tag_ends_past_quotes_and_braces() {
        assert_eq!(tag_end("<a title=\"x > y\">"), Some(17));
        assert_eq!(tag_end("<X on={() => 1}>rest"), Some(16));
        assert_eq!(tag_end("<a title=\"open"), None);
        assert_eq!(tag_end("<Note\n\nlater > here"), None);
    }
}
