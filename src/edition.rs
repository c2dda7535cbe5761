use crate::cover::CoverImage;
use crate::organize::Part;
use crate::source::Commit;
use chrono::{DateTime, Utc};
use derive_builder::Builder;

/// One build of the book: everything the packager needs to write it.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct Edition {
    pub title: String,
    pub author: String,
    #[builder(default = "\"en\".to_string()")]
    pub language: String,
    /// e.g. `October 2026 Edition`
    pub label: String,
    pub build_date: DateTime<Utc>,
    #[builder(setter(into, strip_option), default)]
    pub commit: Option<Commit>,
    #[builder(setter(into, strip_option), default)]
    pub repository_url: Option<String>,
    #[builder(setter(into, strip_option), default)]
    pub live_url: Option<String>,
    pub parts: Vec<Part>,
    pub cover: CoverImage,
}

/// The default edition label for a build date.
pub fn label_for(date: &DateTime<Utc>) -> String {
    date.format("%B %Y Edition").to_string()
}

impl Edition {
    /// Title shown by e-readers, which includes the edition.
    pub fn full_title(&self) -> String {
        format!("{} — {}", self.title, self.label)
    }

    /// Identifies this build: the book, the source commit and the build day.
    pub fn identifier(&self) -> String {
        let slug: String = self
            .title
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let commit = self
            .commit
            .as_ref()
            .map(|c| c.short_hash().to_string())
            .unwrap_or_else(|| "unversioned".to_string());
        format!("{slug}-{commit}-{}", self.build_date.format("%Y-%m-%d"))
    }

    pub fn description(&self) -> String {
        let mut description = format!("{}, {}.", self.title, self.label);
        if let Some(commit) = &self.commit {
            description.push_str(&format!(" Built from commit {}.", commit.short_hash()));
        }
        description.push_str(&format!(" Identifier {}.", self.identifier()));
        description
    }

    pub fn chapter_count(&self) -> usize {
        self.parts.iter().map(|p| p.pages.len()).sum()
    }

    pub fn word_count(&self) -> usize {
        self.parts
            .iter()
            .flat_map(|p| p.pages.iter())
            .map(|p| p.word_count())
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::cover::CoverSource;
    use crate::source::Page;
    use chrono::TimeZone;
    use std::path::PathBuf;

    pub fn page(path: &str, title: &str, html: &str) -> Page {
        Page {
            path: PathBuf::from(path),
            title: title.to_string(),
            order: None,
            section: "core".to_string(),
            markdown: "three little words".to_string(),
            html: html.to_string(),
        }
    }

    pub fn cover() -> CoverImage {
        CoverImage {
            bytes: b"\x89PNG\r\n\x1a\n".to_vec(),
            format: image::ImageFormat::Png,
            source: CoverSource::Generated,
        }
    }

    pub fn edition(parts: Vec<Part>) -> Edition {
        EditionBuilder::default()
            .title("The Example Handbook")
            .author("Example")
            .label("October 2026 Edition")
            .build_date(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap())
            .parts(parts)
            .cover(cover())
            .build()
            .expect("can build edition")
    }

    #[test]
    fn counts_chapters_and_words() {
        let edition = edition(vec![
            Part {
                name: "Core".to_string(),
                subtitle: None,
                pages: vec![page("a.md", "A", ""), page("b.md", "B", "")],
            },
            Part {
                name: "Other".to_string(),
                subtitle: None,
                pages: vec![page("c.md", "C", "")],
            },
        ]);
        assert_eq!(edition.chapter_count(), 3);
        assert_eq!(edition.word_count(), 9);
        assert_eq!(edition.language, "en");
        assert_eq!(edition.full_title(), "The Example Handbook — October 2026 Edition");
    }

    #[test]
    fn identifier_names_book_commit_and_day() {
        let edition = edition(Vec::new());
        assert_eq!(
            edition.identifier(),
            "the-example-handbook-unversioned-2026-10-19"
        );
        assert!(edition.description().contains("October 2026 Edition"));
    }

    #[test]
    fn labels_follow_build_month() {
        let date = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(label_for(&date), "March 2026 Edition");
    }
}
