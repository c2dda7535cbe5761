use super::document;
use crate::edition::Edition;
use crate::epub::sanitize::escape;

/// The page that shows the cover image.
pub fn render(edition: &Edition) -> String {
    let body = format!(
        r#"<div><img src="{src}" alt="{alt}"/></div>"#,
        src = escape(&edition.cover.file_name()),
        alt = escape(&edition.title),
    );
    document(&edition.language, "Cover", Some("cover"), &body)
}
