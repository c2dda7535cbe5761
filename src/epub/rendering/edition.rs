//! The "About This Edition" page shown right after the cover.

use super::document;
use crate::edition::Edition;
use crate::epub::sanitize::escape;

pub fn render(edition: &Edition) -> String {
    let mut info = Vec::new();

    if let Some(url) = &edition.repository_url {
        info.push(format!(
            r#"<p>Source: <a href="{url}">{url}</a></p>"#,
            url = escape(url)
        ));
    }

    if let Some(commit) = &edition.commit {
        let short = escape(commit.short_hash());
        let link = match &edition.repository_url {
            Some(url) => format!(
                r#"<a class="mono" href="{}">{short}</a>"#,
                escape(&commit.url(url))
            ),
            None => format!(r#"<span class="mono">{short}</span>"#),
        };
        info.push(format!(
            "<p>Commit: {link} &#183; {}</p>",
            escape(&commit.date_human())
        ));
        if let Some(summary) = &commit.summary {
            info.push(format!("<p>{}</p>", escape(summary)));
        }
    }

    info.push(format!(
        "<p>Built: {}</p>",
        edition.build_date.format("%Y-%m-%d")
    ));

    let live = edition
        .live_url
        .as_ref()
        .map(|url| {
            format!(
                r#"<p>For the live version, visit <a href="{url}">{url}</a>.</p>"#,
                url = escape(url)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<div class="edition">
<h1>{title}</h1>
<p class="label">{label}</p>
<hr/>
<div class="build-info">
{info}
{live}
</div>
</div>"#,
        title = escape(&edition.title),
        label = escape(&edition.label),
        info = info.join("\n"),
    );

    document(&edition.language, "About This Edition", None, &body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edition::test::edition;
    use crate::epub::sanitize::check_well_formed;
    use crate::source::Commit;
    use chrono::DateTime;

    #[test]
    fn describes_the_build() {
        let mut edition = edition(Vec::new());
        edition.repository_url = Some("https://github.com/example/site".to_string());
        edition.live_url = Some("https://example.com/handbook".to_string());
        edition.commit = Some(Commit {
            hash: "abcdef0123456789".to_string(),
            summary: Some("Fix <typo>".to_string()),
            date: DateTime::parse_from_rfc3339("2026-10-18T09:30:00Z").unwrap(),
        });

        let html = render(&edition);
        check_well_formed(super::super::EDITION_FILE, &html).expect("is well-formed");
        assert!(html.contains("October 2026 Edition"));
        assert!(html.contains(
            r#"<a class="mono" href="https://github.com/example/site/commit/abcdef0123456789">abcdef0</a>"#
        ));
        assert!(html.contains("18 October 2026 at 09:30 UTC"));
        assert!(html.contains("Fix &lt;typo&gt;"));
        assert!(html.contains("Built: 2026-10-19"));
        assert!(html.contains("https://example.com/handbook"));
    }

    #[test]
    fn works_without_commit_or_urls() {
        let html = render(&edition(Vec::new()));
        check_well_formed("edition.xhtml", &html).expect("is well-formed");
        assert!(!html.contains("Commit:"));
        assert!(!html.contains("Source:"));
    }
}
