use super::document;
use crate::epub::sanitize::{escape, sanitize};
use crate::error::AssemblyError;
use crate::source::Page;

/// A chapter page: the page title followed by its sanitized body.
pub fn render(lang: &str, resource: &str, page: &Page) -> Result<String, AssemblyError> {
    let body = sanitize(resource, &page.html)?;
    let body = format!("<h1>{}</h1>\n{body}", escape(&page.title));
    Ok(document(lang, &page.title, None, &body))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edition::test::page;
    use crate::epub::sanitize::check_well_formed;

    #[test]
    fn titles_and_cleans_the_body() {
        let page = page(
            "values.md",
            "Values",
            "<p>We <em>ship</em>.</p>\n<p><img src=\"x.png\" alt=\"chart\" /></p>\n",
        );
        let html = render("en", "chapter-01-001.xhtml", &page).expect("can render");
        check_well_formed("chapter-01-001.xhtml", &html).expect("is well-formed");
        assert!(html.contains("<h1>Values</h1>"));
        assert!(html.contains("<p>We <em>ship</em>.</p>"));
        assert!(html.contains("[chart]"));
        assert!(!html.contains("x.png"));
    }

    #[test]
    fn broken_markup_names_the_resource() {
        let page = page("a.md", "A", "<p>unclosed");
        match render("en", "chapter-01-002.xhtml", &page) {
            Err(AssemblyError::Serialize { resource, .. }) => {
                assert_eq!(resource, "chapter-01-002.xhtml")
            }
            other => panic!("expected serialize error, got {other:?}"),
        }
    }
}
