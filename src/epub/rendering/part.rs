use super::document;
use crate::epub::sanitize::escape;
use crate::organize::Part;

/// Divider page for the `number`th part (one-based).
pub fn render(lang: &str, number: usize, part: &Part) -> String {
    let subtitle = part
        .subtitle
        .as_ref()
        .map(|s| format!("\n<p class=\"part-subtitle\">{}</p>", escape(s)))
        .unwrap_or_default();

    let body = format!(
        "<div class=\"part-subtitle\">Part {number}</div>\n<h1 class=\"part-title\">{name}</h1>{subtitle}",
        name = escape(&part.name),
    );
    document(lang, &part.name, None, &body)
}
