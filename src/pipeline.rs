//! Running a build from source tree to finished EPUB.
//!
//! The stages run strictly in order: parse every page, organize them into
//! parts, settle on a cover, then package. The package is built in memory and
//! only written once everything succeeded, through a temporary file renamed
//! into place, so a failed build never leaves a partial book behind.

use crate::config::Configuration;
use crate::cover::{self, CoverSource, CoverText};
use crate::edition::{self, EditionBuilder};
use crate::epub::{EpubPackager, Packager};
use crate::error::{AssemblyError, BuildError};
use crate::markdown::{CmarkRenderer, Renderer};
use crate::organize::organize;
use crate::source::{Commit, SourceTree};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What to build, from the command line.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub repository: PathBuf,
    pub output: PathBuf,
    pub cover: Option<PathBuf>,
    /// Overrides the `<Month Year> Edition` label
    pub edition: Option<String>,
}

/// What a successful build produced.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub label: String,
    pub parts: usize,
    pub chapters: usize,
    pub words: usize,
    /// Files without front-matter that were left out
    pub skipped: Vec<PathBuf>,
    pub cover: CoverSource,
    pub commit: Option<Commit>,
    /// Size of the written package
    pub bytes: u64,
}

/// Build with the standard renderer and packager.
pub fn run(
    options: &BuildOptions,
    config: &Configuration,
    progress: &ProgressBar,
) -> Result<BuildSummary, BuildError> {
    let renderer = CmarkRenderer::new(config.epub.theme);
    let packager = EpubPackager::new(config.epub.clone(), config.colophon.clone());
    build_with(options, config, &renderer, &packager, Utc::now(), progress)
}

pub fn build_with(
    options: &BuildOptions,
    config: &Configuration,
    renderer: &dyn Renderer,
    packager: &dyn Packager,
    now: DateTime<Utc>,
    progress: &ProgressBar,
) -> Result<BuildSummary, BuildError> {
    let tree = SourceTree::load(&options.repository, &config.content)?;
    let commit = tree.commit();
    match &commit {
        Some(commit) => log::info!(
            "Source commit {} ({})",
            commit.short_hash(),
            commit.date_human()
        ),
        None => log::info!("Source isn't a git checkout, building without commit details"),
    }

    progress.set_length(tree.files.len() as u64);
    progress.set_message("Parsing pages...");
    let mut pages = Vec::with_capacity(tree.files.len());
    let mut skipped = Vec::new();
    for relative in tree.files.iter() {
        progress.inc(1);
        match tree.parse(relative, renderer)? {
            Some(page) => pages.push(page),
            None => {
                log::warn!("Skipping {}: it has no front-matter", relative.display());
                skipped.push(relative.clone());
            }
        }
    }

    progress.set_message("Organizing chapters...");
    let parts = organize(pages, &config.parts)?;
    for part in parts.iter() {
        log::info!("{}: {} chapters", part.name, part.pages.len());
    }

    progress.set_message("Preparing cover...");
    let label = options
        .edition
        .clone()
        .unwrap_or_else(|| edition::label_for(&now));
    let text = CoverText {
        title: config.metadata.title.clone(),
        subtitle: config.cover.subtitle.clone(),
        edition: label.clone(),
        author: config.metadata.author.clone(),
        footer: format!("Auto-generated from source · {}", now.format("%B %Y")),
    };
    let cover = cover::provide(options.cover.as_deref(), &config.cover, &text)?;
    let cover_source = cover.source.clone();

    progress.set_message("Packaging EPUB...");
    let mut builder = EditionBuilder::default();
    builder
        .title(config.metadata.title.clone())
        .author(config.metadata.author.clone())
        .language(config.metadata.language.clone())
        .label(label.clone())
        .build_date(now)
        .parts(parts)
        .cover(cover);
    if let Some(commit) = commit.clone() {
        builder.commit(commit);
    }
    if let Some(url) = config.metadata.repository_url_opt() {
        builder.repository_url(url);
    }
    if let Some(url) = config.metadata.live_url_opt() {
        builder.live_url(url);
    }
    let edition = builder
        .build()
        .map_err(|e| AssemblyError::Package(e.to_string()))?;

    let bytes = packager.package(&edition)?;
    write_atomically(&options.output, &bytes)?;
    progress.finish_with_message("EPUB written");

    Ok(BuildSummary {
        output: options.output.clone(),
        label,
        parts: edition.parts.len(),
        chapters: edition.chapter_count(),
        words: edition.word_count(),
        skipped,
        cover: cover_source,
        commit,
        bytes: bytes.len() as u64,
    })
}

/// Write `bytes` to `path` through a temporary file in the same directory.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AssemblyError> {
    let write_error = |source: std::io::Error| AssemblyError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_error)?;

    let mut file = tempfile::NamedTempFile::new_in(&parent).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{CoverError, OrganizationError, Stage};
    use chrono::TimeZone;
    use std::fs;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn config(dir: &Path) -> Configuration {
        let mut config = Configuration::default();
        config.cover.bundled = dir.join("no-bundled-cover.png");
        config.cover.width = 80;
        config.cover.height = 120;
        config.cover.fonts = Vec::new();
        config
    }

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn build(options: &BuildOptions, config: &Configuration) -> Result<BuildSummary, BuildError> {
        let packager = EpubPackager::new(config.epub.clone(), config.colophon.clone());
        build_with(
            options,
            config,
            &CmarkRenderer::plain(),
            &packager,
            now(),
            &ProgressBar::hidden(),
        )
    }

    fn options(repository: &Path, output: PathBuf) -> BuildOptions {
        BuildOptions {
            repository: repository.to_path_buf(),
            output,
            cover: None,
            edition: None,
        }
    }

    #[test]
    fn builds_a_book_from_a_handbook_tree() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("site");
        let handbook = repo.join("contents/handbook");
        write(
            &handbook,
            "engineering/b.md",
            "---\ntitle: Engineering two\norder: 2\nsection: Engineering\n---\nSecond.\n",
        );
        write(
            &handbook,
            "engineering/a.md",
            "---\ntitle: Engineering one\norder: 1\nsection: Engineering\n---\nFirst.\n",
        );
        write(
            &handbook,
            "people/a.md",
            "---\ntitle: People one\norder: 1\nsection: People\n---\nThird.\n",
        );
        write(&handbook, "snippet.md", "Just a fragment.\n");

        let output = dir.path().join("out/nested/handbook.epub");
        let summary = build(&options(&repo, output.clone()), &config(dir.path()))
            .expect("can build");

        assert_eq!(summary.parts, 2);
        assert_eq!(summary.chapters, 3);
        assert_eq!(summary.skipped, vec![PathBuf::from("snippet.md")]);
        assert_eq!(summary.cover, CoverSource::Generated);
        assert_eq!(summary.label, "October 2026 Edition");
        assert!(summary.commit.is_none());

        let bytes = fs::read(&output).expect("output was written");
        assert_eq!(bytes.len() as u64, summary.bytes);

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut first = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("OEBPS/chapter-01-001.xhtml").unwrap(),
            &mut first,
        )
        .unwrap();
        assert!(first.contains("<h1>Engineering one</h1>"));
        let mut third = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("OEBPS/chapter-02-001.xhtml").unwrap(),
            &mut third,
        )
        .unwrap();
        assert!(third.contains("<h1>People one</h1>"));
    }

    #[test]
    fn empty_tree_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("site");
        fs::create_dir_all(repo.join("contents/handbook")).unwrap();
        let output = dir.path().join("handbook.epub");

        let err = build(&options(&repo, output.clone()), &config(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Organize(OrganizationError::Empty)
        ));
        assert_eq!(err.stage(), Stage::Organize);
        assert!(!output.exists());
    }

    #[test]
    fn corrupt_cover_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("site");
        write(&repo, "contents/handbook/a.md", "---\ntitle: A\n---\nHi.\n");
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, b"\xff\xd8\xff\xe0 definitely not a jpeg").unwrap();
        let output = dir.path().join("handbook.epub");

        let mut options = options(&repo, output.clone());
        options.cover = Some(cover);
        let err = build(&options, &config(dir.path())).unwrap_err();
        assert!(matches!(err, BuildError::Cover(CoverError::Corrupt { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn edition_label_can_be_overridden() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("site");
        write(&repo, "contents/handbook/a.md", "---\ntitle: A\n---\nHi.\n");

        let mut options = options(&repo, dir.path().join("handbook.epub"));
        options.edition = Some("Launch Edition".to_string());
        let summary = build(&options, &config(dir.path())).expect("can build");
        assert_eq!(summary.label, "Launch Edition");
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("book.epub");
        fs::write(&output, b"old").unwrap();
        write_atomically(&output, b"new").expect("can write");
        assert_eq!(fs::read(&output).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
