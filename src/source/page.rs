use super::frontmatter::{self, Block};
use crate::error::ParseError;
use crate::markdown::Renderer;
use std::path::{Component, Path, PathBuf};

/// Section given to pages at the top of the content root or in the navigation.
pub const CORE_SECTION: &str = "core";

/// One handbook page, parsed and rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Path relative to the content root
    pub path: PathBuf,
    pub title: String,
    /// Ordering key within the page's part; pages without one sort last
    pub order: Option<f64>,
    /// Section label used to pick the page's part
    pub section: String,
    /// Markdown body with the front-matter removed
    pub markdown: String,
    /// Rendered HTML fragment
    pub html: String,
}

impl Page {
    /// Parse and render the page at `root/relative`.
    ///
    /// Returns `Ok(None)` for files without a front-matter block; those aren't
    /// handbook pages (includes, drafts) and are skipped by the caller.
    /// `nav_position` is the page's position in the site navigation, if listed.
    pub fn load(
        root: &Path,
        relative: &Path,
        nav_position: Option<usize>,
        renderer: &dyn Renderer,
    ) -> Result<Option<Page>, ParseError> {
        let path = root.join(relative);
        let bytes = std::fs::read(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;
        let contents = String::from_utf8_lossy(&bytes);

        let (yaml, body) = match frontmatter::split(&contents) {
            Block::Found { yaml, body } => (yaml, body),
            Block::Missing => return Ok(None),
            Block::Unterminated => return Err(ParseError::Unterminated { path }),
        };
        let front_matter = frontmatter::parse(&path, yaml)?;

        let title = front_matter
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        let section = front_matter
            .section
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback_section(relative, nav_position.is_some()));
        let order = front_matter
            .order
            .or_else(|| nav_position.map(|p| p as f64));

        Ok(Some(Page {
            path: relative.to_path_buf(),
            title,
            order,
            section,
            html: renderer.render(body),
            markdown: body.to_string(),
        }))
    }

    /// Number of whitespace separated words in the markdown body.
    pub fn word_count(&self) -> usize {
        self.markdown.split_whitespace().count()
    }
}

/// Pages listed in the navigation are core chapters; others take the name of
/// their top-level directory, and loose files at the root are core chapters.
fn fallback_section(relative: &Path, in_navigation: bool) -> String {
    if in_navigation {
        return CORE_SECTION.to_string();
    }

    let mut components = relative.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name),
        _ => None,
    });
    let first = components.next();
    match (first, components.next()) {
        (Some(dir), Some(_)) => dir.to_string_lossy().to_string(),
        _ => CORE_SECTION.to_string(),
    }
}
