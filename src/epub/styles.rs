//! The book's stylesheet.
//!
//! One stylesheet is shared by every page. It is tuned for e-ink: a serif body,
//! generous line height, and light greys that survive greyscale screens. Code
//! blocks take their background from the syntax theme so highlighted tokens
//! stay readable, and token font styles are plain classes (see
//! `markdown::CLASS_PREFIX`).

use crate::config::SyntaxTheme;
use crate::markdown::{load_theme, CLASS_PREFIX};
use syntect::highlighting::{Color, Theme};

/// Generate the complete stylesheet for `theme`.
pub fn generate_stylesheet(theme: SyntaxTheme) -> String {
    let theme = load_theme(theme);
    let mut css = String::with_capacity(4096);

    css.push_str(&base_styles(&theme));
    css.push_str("\n/* Syntax highlighting */\n");
    css.push_str(&format!(".{CLASS_PREFIX}bold {{ font-weight: bold; }}\n"));
    css.push_str(&format!(".{CLASS_PREFIX}italic {{ font-style: italic; }}\n"));
    css.push_str(&format!(
        ".{CLASS_PREFIX}underline {{ text-decoration: underline; }}\n"
    ));

    css
}

fn base_styles(theme: &Theme) -> String {
    let code_bg = theme.settings.background.unwrap_or(Color {
        r: 0xf3,
        g: 0xf4,
        b: 0xf6,
        a: 0xff,
    });
    let code_fg = theme.settings.foreground.unwrap_or(Color {
        r: 0x1a,
        g: 0x1a,
        b: 0x1a,
        a: 0xff,
    });

    format!(
        r#"/* Base styles */
body {{
    font-family: Georgia, "Times New Roman", serif;
    line-height: 1.6;
    margin: 1em;
    color: #1a1a1a;
}}

h1 {{
    font-size: 1.8em;
    margin-top: 1.5em;
    margin-bottom: 0.5em;
    page-break-before: always;
}}

h2 {{
    font-size: 1.4em;
    margin-top: 1.2em;
    margin-bottom: 0.4em;
}}

h3 {{
    font-size: 1.15em;
    margin-top: 1em;
    margin-bottom: 0.3em;
}}

p {{
    margin-bottom: 0.8em;
    text-align: justify;
}}

a {{
    color: #1d4ed8;
    text-decoration: underline;
}}

blockquote {{
    border-left: 3px solid #d1d5db;
    margin-left: 0;
    padding-left: 1em;
    color: #4b5563;
    font-style: italic;
}}

ul, ol {{
    margin-bottom: 0.8em;
    padding-left: 1.5em;
}}

li {{
    margin-bottom: 0.3em;
}}

hr {{
    border: none;
    border-top: 1px solid #e5e7eb;
    margin: 2em 0;
}}

/* Tables */
table {{
    border-collapse: collapse;
    width: 100%;
    margin: 1em 0;
    font-size: 0.9em;
}}

th, td {{
    border: 1px solid #d1d5db;
    padding: 0.5em;
    text-align: left;
}}

th {{
    background-color: #f9fafb;
    font-weight: bold;
}}

/* Code */
code {{
    font-family: "Courier New", Courier, monospace;
    font-size: 0.9em;
    background-color: #f3f4f6;
    padding: 0.1em 0.3em;
}}

pre {{
    font-size: 0.85em;
    line-height: 1.4;
    padding: 1em;
    margin: 1em 0;
    white-space: pre-wrap;
    background-color: #f3f4f6;
}}

pre code {{
    background: none;
    padding: 0;
}}

pre.highlight {{
    background-color: rgb({bg_r}, {bg_g}, {bg_b});
    color: rgb({fg_r}, {fg_g}, {fg_b});
}}

/* Footnotes */
.footnote-definition {{
    font-size: 0.85em;
    margin-top: 1em;
}}

/* Cover page */
body.cover {{
    margin: 0;
    padding: 0;
    text-align: center;
}}

body.cover img {{
    max-width: 100%;
    max-height: 100%;
}}

/* Part dividers */
.part-title {{
    font-size: 2em;
    text-align: center;
    margin-top: 3em;
    margin-bottom: 1em;
    font-weight: bold;
    page-break-before: always;
}}

.part-subtitle {{
    text-align: center;
    color: #6b7280;
    font-size: 1.1em;
    margin-bottom: 2em;
}}

/* About this edition */
.edition {{
    text-align: center;
    margin-top: 6em;
}}

.edition h1 {{
    font-size: 2em;
    margin-bottom: 0.2em;
    page-break-before: avoid;
}}

.edition .label {{
    font-size: 1.3em;
    font-weight: bold;
    margin-bottom: 1.5em;
}}

.edition hr {{
    width: 40%;
    margin: 0 auto 2em;
}}

.build-info {{
    text-align: center;
    color: #6b7280;
    font-size: 0.85em;
    line-height: 2;
}}

.build-info p {{
    text-align: center;
    margin: 0;
}}

.mono {{
    font-family: "Courier New", Courier, monospace;
}}

/* Colophon */
.colophon {{
    margin: 2em 0;
}}

.colophon .stats {{
    font-family: "Courier New", Courier, monospace;
    padding-left: 1em;
}}
"#,
        bg_r = code_bg.r,
        bg_g = code_bg.g,
        bg_b = code_bg.b,
        fg_r = code_fg.r,
        fg_g = code_fg.g,
        fg_b = code_fg.b,
    )
}
