//! Syntax highlighting for fenced code blocks.
//!
//! Colours are written inline on each token so they survive e-readers that
//! ignore most of a stylesheet, while bold/italic/underline are CSS classes
//! (see `epub::styles`) to keep the markup small. Blocks whose language syntect
//! doesn't know are left to the plain markdown renderer.

use crate::config::SyntaxTheme;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// CSS class prefix for syntax highlighting spans.
pub const CLASS_PREFIX: &str = "syn-";

pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme: SyntaxTheme) -> Highlighter {
        Highlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme: load_theme(theme),
        }
    }

    /// Highlight `code` as `lang`, or `None` if the language is unknown.
    pub fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = self.syntaxes.find_syntax_by_token(lang)?;
        let code = code.replace('\t', "    ");

        let mut h = HighlightLines::new(syntax, &self.theme);
        let mut html = String::from(r#"<pre class="highlight"><code>"#);
        for line in LinesWithEndings::from(&code) {
            let ranges = match h.highlight_line(line, &self.syntaxes) {
                Ok(ranges) => ranges,
                Err(e) => {
                    log::debug!("Failed to highlight {lang} block: {e}");
                    return None;
                }
            };

            for (style, text) in ranges {
                let class = font_style_classes(style.font_style);
                let escaped = html_escape::encode_text(text);
                let colour = style.foreground;

                // always use inline colour, add classes for bold/italic/underline
                if class.is_empty() {
                    html.push_str(&format!(
                        r#"<span style="color: rgb({}, {}, {})">{}</span>"#,
                        colour.r, colour.g, colour.b, escaped
                    ));
                } else {
                    html.push_str(&format!(
                        r#"<span class="{}" style="color: rgb({}, {}, {})">{}</span>"#,
                        class, colour.r, colour.g, colour.b, escaped
                    ));
                }
            }
        }
        html.push_str("</code></pre>\n");
        Some(html)
    }
}

/// Load one of syntect's bundled themes.
pub fn load_theme(theme: SyntaxTheme) -> Theme {
    let mut themes = ThemeSet::load_defaults();
    themes.themes.remove(theme.name()).unwrap_or_else(|| {
        log::warn!("Syntax theme {theme} isn't available, using the default");
        Theme::default()
    })
}

/// Map font style to CSS class names.
fn font_style_classes(font_style: FontStyle) -> String {
    let mut classes = Vec::new();

    if font_style.intersects(FontStyle::BOLD) {
        classes.push(format!("{CLASS_PREFIX}bold"));
    }
    if font_style.intersects(FontStyle::ITALIC) {
        classes.push(format!("{CLASS_PREFIX}italic"));
    }
    if font_style.intersects(FontStyle::UNDERLINE) {
        classes.push(format!("{CLASS_PREFIX}underline"));
    }

    classes.join(" ")
}
