//! The website's handbook navigation, used to order the core chapters.
//!
//! The site keeps a JSON sidebar (`src/navs/handbook.json`) whose first group
//! lists the story-telling chapters in the order they should be read. Pages
//! named there are placed in the core part at their sidebar position unless
//! their own front-matter says otherwise.

use crate::error::ParseError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct NavGroup {
    #[serde(default)]
    links: Vec<NavLink>,
}

#[derive(Deserialize)]
struct NavLink {
    to: String,
}

/// Sidebar positions keyed by page path relative to the content root.
#[derive(Debug, Default)]
pub struct Navigation {
    positions: HashMap<PathBuf, usize>,
}

impl Navigation {
    /// Load the navigation file if there is one.
    pub fn load(path: &Path, content_root: &Path) -> Result<Navigation, ParseError> {
        if !path.is_file() {
            log::debug!("No navigation file at {}", path.display());
            return Ok(Navigation::default());
        }

        let json = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let groups: Vec<NavGroup> =
            serde_json::from_str(&json).map_err(|source| ParseError::Navigation {
                path: path.to_path_buf(),
                source,
            })?;

        let mut positions = HashMap::new();
        let links = groups.into_iter().next().map(|g| g.links).unwrap_or_default();
        for (i, link) in links.iter().enumerate() {
            match resolve(content_root, &link.to) {
                Some(page) => {
                    positions.entry(page).or_insert(i);
                }
                None => log::warn!("Could not find navigation entry {}", link.to),
            }
        }

        log::info!("Loaded {} core chapters from {}", positions.len(), path.display());
        Ok(Navigation { positions })
    }

    /// Position of the page in the sidebar, if it's listed.
    pub fn position(&self, relative: &Path) -> Option<usize> {
        self.positions.get(relative).copied()
    }
}

/// Map a site URL like `/handbook/company/values` onto a page file.
fn resolve(content_root: &Path, to: &str) -> Option<PathBuf> {
    let to = to.split(['#', '?']).next().unwrap_or_default();
    let slug = to.trim_matches('/');
    let slug = slug.strip_prefix("handbook/").unwrap_or(slug);
    if slug.is_empty() || slug == "handbook" {
        return None;
    }

    ["md", "mdx"]
        .iter()
        .flat_map(|ext| {
            [
                PathBuf::from(format!("{slug}.{ext}")),
                PathBuf::from(slug).join(format!("index.{ext}")),
            ]
        })
        .find(|candidate| content_root.join(candidate).is_file())
}
