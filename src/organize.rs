//! Grouping pages into the parts of the book.
//!
//! Which part a page lands in depends only on its section label and the
//! configured mapping, and the order within a part depends only on the page's
//! own fields. Sorting never looks at the file system, so the same pages always
//! produce the same book no matter what order they were read in.

use crate::config::PartsConfig;
use crate::error::OrganizationError;
use crate::source::Page;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A top-level grouping of chapters.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub subtitle: Option<String>,
    pub pages: Vec<Page>,
}

/// Group `pages` into parts following the canonical order in `config`.
///
/// Pages whose section isn't mapped go to the catch-all part, which is always
/// last. Parts without pages are left out.
pub fn organize(pages: Vec<Page>, config: &PartsConfig) -> Result<Vec<Part>, OrganizationError> {
    if pages.is_empty() {
        return Err(OrganizationError::Empty);
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, part) in config.parts.iter().enumerate() {
        for section in part.sections.iter() {
            // the first part to claim a section keeps it
            index.entry(normalise_section(section)).or_insert(i);
        }
    }

    let mut buckets: Vec<Vec<Page>> = vec![Vec::new(); config.parts.len() + 1];
    let other = config.parts.len();
    for page in pages {
        let slot = match index.get(&normalise_section(&page.section)) {
            Some(&i) => i,
            None => {
                log::debug!(
                    "Section `{}` of {} isn't mapped, placing it in {}",
                    page.section,
                    page.path.display(),
                    config.other
                );
                other
            }
        };
        buckets[slot].push(page);
    }

    let names = config
        .parts
        .iter()
        .map(|p| (p.name.clone(), p.subtitle.clone()))
        .chain(std::iter::once((config.other.clone(), None)));

    let parts = names
        .zip(buckets)
        .filter(|(_, pages)| !pages.is_empty())
        .map(|((name, subtitle), mut pages)| {
            pages.sort_by(compare_pages);
            Part {
                name,
                subtitle,
                pages,
            }
        })
        .collect();

    Ok(parts)
}

/// Lowercase, with spaces and underscores turned into dashes.
pub fn normalise_section(section: &str) -> String {
    section
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Keyed pages first by key, then title, then path.
fn compare_pages(a: &Page, b: &Page) -> Ordering {
    let by_key = match (a.order, b.order) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    by_key
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.path.cmp(&b.path))
}
