//! Reading handbook pages out of a source repository.
//!
//! A [`SourceTree`] knows where the pages of a repository live, which files are
//! pages, and where the site navigation places the core chapters. Parsing each
//! file into a [`Page`] is left to the caller so it can report progress.

mod commit;
pub use commit::*;

mod frontmatter;
mod nav;

mod page;
pub use page::*;

mod walk;

use crate::config::ContentConfig;
use crate::error::ParseError;
use crate::markdown::Renderer;
use nav::Navigation;
use std::path::{Path, PathBuf};

/// The page files of a handbook checkout.
#[derive(Debug)]
pub struct SourceTree {
    /// The repository the build was pointed at
    pub repository: PathBuf,
    /// Directory the page paths are relative to
    pub content_root: PathBuf,
    /// Page files relative to `content_root`, sorted
    pub files: Vec<PathBuf>,
    navigation: Navigation,
}

impl SourceTree {
    pub fn load(repository: &Path, config: &ContentConfig) -> Result<SourceTree, ParseError> {
        if !repository.is_dir() {
            return Err(ParseError::MissingSource(repository.to_path_buf()));
        }

        let content_root = {
            let candidate = repository.join(&config.content_dir);
            if candidate.is_dir() {
                candidate
            } else {
                log::info!(
                    "No {} directory, reading pages from {}",
                    config.content_dir.display(),
                    repository.display()
                );
                repository.to_path_buf()
            }
        };

        let navigation = Navigation::load(&repository.join(&config.nav_file), &content_root)?;
        let files = walk::discover(&content_root, config)?;
        log::info!(
            "Found {} page files under {}",
            files.len(),
            content_root.display()
        );

        Ok(SourceTree {
            repository: repository.to_path_buf(),
            content_root,
            files,
            navigation,
        })
    }

    /// Parse one of this tree's files. `Ok(None)` means the file isn't a page.
    pub fn parse(&self, relative: &Path, renderer: &dyn Renderer) -> Result<Option<Page>, ParseError> {
        let position = self.navigation.position(relative);
        Page::load(&self.content_root, relative, position, renderer)
    }

    /// The repository's HEAD commit, when it is a git checkout.
    pub fn commit(&self) -> Option<Commit> {
        Commit::head(&self.repository)
    }
}
