use crate::config::ContentConfig;
use crate::error::ParseError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

fn exclusions(patterns: &[String]) -> Result<GlobSet, ParseError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ParseError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ParseError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Find every page file under `root`, returned relative to it and sorted.
///
/// Hidden files and anything ignored by `.gitignore` are skipped, as are paths
/// matching the configured exclude globs.
pub fn discover(root: &Path, config: &ContentConfig) -> Result<Vec<PathBuf>, ParseError> {
    let excluded = exclusions(&config.exclude)?;

    let mut files = Vec::new();
    for entry in WalkBuilder::new(root).build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let is_page = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                config
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            });
        if !is_page {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if excluded.is_match(relative) {
            log::debug!("Excluding {}", relative.display());
            continue;
        }
        files.push(relative.to_path_buf());
    }

    files.sort();
    Ok(files)
}
