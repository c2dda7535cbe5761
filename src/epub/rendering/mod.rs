//! XHTML documents that make up the book.
//!
//! Every page shares one document shell and the stylesheet. File names encode a
//! page's position (`part-02.xhtml`, `chapter-02-013.xhtml`) so the package
//! reads in order even to tools that ignore the spine.

pub mod chapter;
pub mod colophon;
pub mod cover;
pub mod edition;
pub mod part;

use super::sanitize::escape;

pub const COVER_FILE: &str = "cover.xhtml";
pub const EDITION_FILE: &str = "edition.xhtml";
pub const COLOPHON_FILE: &str = "colophon.xhtml";

/// File name of the divider page for the part at `part` (zero-based).
pub fn part_file(part: usize) -> String {
    format!("part-{:02}.xhtml", part + 1)
}

/// File name of a chapter, by zero-based part and chapter index.
pub fn chapter_file(part: usize, chapter: usize) -> String {
    format!("chapter-{:02}-{:03}.xhtml", part + 1, chapter + 1)
}

/// Wrap `body` in a complete XHTML document.
pub fn document(lang: &str, title: &str, body_class: Option<&str>, body: &str) -> String {
    let class = body_class
        .map(|c| format!(r#" class="{}""#, escape(c)))
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body{class}>
{body}
</body>
</html>
"#,
        lang = escape(lang),
        title = escape(title),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::epub::sanitize::check_well_formed;

    #[test]
    fn names_files_by_position() {
        assert_eq!(part_file(0), "part-01.xhtml");
        assert_eq!(chapter_file(1, 12), "chapter-02-013.xhtml");
    }

    #[test]
    fn documents_are_well_formed() {
        let doc = document("en", "Fish & chips", Some("cover"), "<p>Hi</p>");
        assert!(doc.contains("<title>Fish &amp; chips</title>"));
        assert!(doc.contains(r#"<body class="cover">"#));
        check_well_formed("doc.xhtml", &doc).expect("is well-formed");
    }
}
