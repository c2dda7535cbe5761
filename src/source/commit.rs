use chrono::prelude::*;
use std::path::Path;

/// The source repository's HEAD commit, recorded on the edition and colophon
/// pages so readers can tell which revision of the handbook they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full SHA-1 hash
    pub hash: String,
    /// First line of the commit message
    pub summary: Option<String>,
    pub date: DateTime<FixedOffset>,
}

impl From<&git2::Commit<'_>> for Commit {
    fn from(c: &git2::Commit) -> Self {
        let summary = c.summary().map(ToString::to_string);

        let time = c.time();
        let timezone =
            FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
        let date = DateTime::from_timestamp(time.seconds(), 0)
            .unwrap_or_default()
            .with_timezone(&timezone);

        let hash = c.id().to_string();

        Commit {
            hash,
            summary,
            date,
        }
    }
}

impl Commit {
    /// Look up the HEAD commit of the repository at `repository`.
    ///
    /// A source tree that isn't a git checkout is fine; the book just won't
    /// name a commit.
    pub fn head(repository: &Path) -> Option<Commit> {
        let repo = match git2::Repository::open(repository) {
            Ok(repo) => repo,
            Err(e) => {
                log::debug!(
                    "{} isn't a git repository, skipping commit info: {e}",
                    repository.display()
                );
                return None;
            }
        };

        let commit = repo.head().and_then(|head| head.peel_to_commit());
        match commit {
            Ok(commit) => Some(Commit::from(&commit)),
            Err(e) => {
                log::warn!("Failed to resolve HEAD of {}: {e}", repository.display());
                None
            }
        }
    }

    /// Abbreviated hash, as `git log --format=%h` would print it by default.
    pub fn short_hash(&self) -> &str {
        let end = self.hash.len().min(7);
        &self.hash[..end]
    }

    /// Human-readable commit date, e.g. `19 October 2026 at 14:05 UTC`.
    pub fn date_human(&self) -> String {
        self.date
            .with_timezone(&Utc)
            .format("%d %B %Y at %H:%M UTC")
            .to_string()
    }

    /// Link to the commit on a GitHub-style web host.
    pub fn url(&self, repository_url: &str) -> String {
        format!("{}/commit/{}", repository_url.trim_end_matches('/'), self.hash)
    }
}
