//! Colophon page rendering.
//!
//! The colophon is a plain-text template with placeholders, laid out line by
//! line: blank lines separate paragraphs, `---` lines become rules and indented
//! lines are set as statistics. A breakdown of chapters per part follows the
//! template.

use super::document;
use crate::edition::Edition;
use crate::epub::sanitize::escape;

pub fn render(edition: &Edition, template: &str) -> String {
    let (commit, commit_date) = match &edition.commit {
        Some(commit) => (commit.short_hash().to_string(), commit.date_human()),
        None => ("unknown".to_string(), "unknown date".to_string()),
    };

    let content = template
        .replace("{title}", &edition.title)
        .replace("{edition}", &edition.label)
        .replace("{commit}", &commit)
        .replace("{commit_date}", &commit_date)
        .replace(
            "{generated_date}",
            &edition.build_date.format("%Y-%m-%d").to_string(),
        )
        .replace("{tool_version}", env!("CARGO_PKG_VERSION"))
        .replace("{part_count}", &edition.parts.len().to_string())
        .replace("{chapter_count}", &edition.chapter_count().to_string())
        .replace("{word_count}", &format_number(edition.word_count()))
        .replace(
            "{repository_url}",
            edition.repository_url.as_deref().unwrap_or("unknown"),
        )
        .replace(
            "{live_url}",
            edition.live_url.as_deref().unwrap_or("the website"),
        );

    let mut lines: Vec<String> = content.lines().map(layout_line).collect();

    lines.push("<hr/>".to_string());
    for part in edition.parts.iter() {
        let chapters = match part.pages.len() {
            1 => "1 chapter".to_string(),
            n => format!("{n} chapters"),
        };
        lines.push(format!(
            r#"<div class="stats">{}: {chapters}</div>"#,
            escape(&part.name)
        ));
    }

    let body = format!(
        "<div class=\"colophon\">\n<h1>Colophon</h1>\n{}\n</div>",
        lines.join("\n")
    );
    document(&edition.language, "Colophon", None, &body)
}

fn layout_line(line: &str) -> String {
    if line.trim().is_empty() {
        String::new()
    } else if line.starts_with("---") {
        "<hr/>".to_string()
    } else if line.starts_with("  ") {
        format!(r#"<div class="stats">{}</div>"#, escape(line.trim()))
    } else {
        format!("<p>{}</p>", escape(line))
    }
}

/// Group digits in thousands, e.g. `1,234,567`.
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::default_colophon_template;
    use crate::edition::test::{edition, page};
    use crate::epub::sanitize::check_well_formed;
    use crate::organize::Part;

    #[test]
    fn fills_in_the_template() {
        let edition = edition(vec![Part {
            name: "Engineering".to_string(),
            subtitle: None,
            pages: vec![page("a.md", "A", "")],
        }]);

        let html = render(&edition, &default_colophon_template());
        check_well_formed("colophon.xhtml", &html).expect("is well-formed");
        assert!(html.contains("<p>The Example Handbook</p>"));
        assert!(html.contains("Built from commit unknown (unknown date)"));
        assert!(html.contains(r#"<div class="stats">1 parts</div>"#));
        assert!(html.contains(r#"<div class="stats">3 words</div>"#));
        assert!(html.contains(r#"<div class="stats">Engineering: 1 chapter</div>"#));
        assert!(html.contains("<hr/>"));
        assert!(!html.contains('{'));
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
