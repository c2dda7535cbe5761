//! Errors for each stage of a build.
//!
//! Every stage owns an error type so the driver can report exactly which part of
//! the pipeline gave up. None of these are retried: they all describe bad input
//! or an environment the build cannot work with.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Source directory {0} doesn't exist or isn't a directory")]
    MissingSource(PathBuf),
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed front-matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Front-matter in {path} is never closed with `---`")]
    Unterminated { path: PathBuf },
    #[error("Front-matter in {path} is missing required field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    #[error("Malformed navigation file {path}: {source}")]
    Navigation {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum OrganizationError {
    #[error("No handbook pages found")]
    Empty,
}

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Failed to read cover image {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cover image {path} is not a valid image: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Cover image {path} uses unsupported format {format}; use JPEG, PNG, GIF or WebP")]
    UnsupportedFormat { path: PathBuf, format: String },
    #[error("Failed to encode generated cover: {0}")]
    Encode(#[source] image::ImageError),
}

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("There are no parts or chapters to assemble")]
    Empty,
    #[error("Failed to serialize {resource}: {reason}")]
    Serialize { resource: String, reason: String },
    #[error("Failed to package EPUB: {0}")]
    Package(String),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The pipeline stage a build failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Organize,
    Cover,
    Assemble,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => write!(f, "parse"),
            Stage::Organize => write!(f, "organize"),
            Stage::Cover => write!(f, "cover"),
            Stage::Assemble => write!(f, "assemble"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{stage} stage failed: {0}", stage = Stage::Parse)]
    Parse(#[from] ParseError),
    #[error("{stage} stage failed: {0}", stage = Stage::Organize)]
    Organize(#[from] OrganizationError),
    #[error("{stage} stage failed: {0}", stage = Stage::Cover)]
    Cover(#[from] CoverError),
    #[error("{stage} stage failed: {0}", stage = Stage::Assemble)]
    Assemble(#[from] AssemblyError),
}

impl BuildError {
    pub fn stage(&self) -> Stage {
        match self {
            BuildError::Parse(_) => Stage::Parse,
            BuildError::Organize(_) => Stage::Organize,
            BuildError::Cover(_) => Stage::Cover,
            BuildError::Assemble(_) => Stage::Assemble,
        }
    }
}
