//! Cover art for the book.
//!
//! A cover comes from one of three places, in order of preference: an image
//! given on the command line, a bundled image checked into the working
//! directory, or a design generated on the spot. Only a bad explicit cover
//! stops the build; a bad bundled one is reported and replaced.

mod raster;
mod synth;
mod text;

use crate::config::CoverConfig;
use crate::error::CoverError;
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Text printed on a generated cover.
#[derive(Debug, Clone, Default)]
pub struct CoverText {
    pub title: String,
    pub subtitle: String,
    pub edition: String,
    pub author: String,
    pub footer: String,
}

/// Where a cover came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverSource {
    Explicit(PathBuf),
    Bundled(PathBuf),
    Generated,
}

impl std::fmt::Display for CoverSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverSource::Explicit(path) => write!(f, "{}", path.display()),
            CoverSource::Bundled(path) => write!(f, "{} (bundled)", path.display()),
            CoverSource::Generated => write!(f, "generated"),
        }
    }
}

/// Encoded cover image bytes, ready to be packaged.
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub source: CoverSource,
}

impl CoverImage {
    pub fn media_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Resource name inside the package.
    pub fn file_name(&self) -> String {
        let extension = self.format.extensions_str().first().copied().unwrap_or("img");
        format!("cover.{extension}")
    }
}

/// Pick or produce the cover for this build.
pub fn provide(
    explicit: Option<&Path>,
    config: &CoverConfig,
    text: &CoverText,
) -> Result<CoverImage, CoverError> {
    if let Some(path) = explicit {
        let (bytes, format) = read(path)?;
        log::info!("Using cover image {}", path.display());
        return Ok(CoverImage {
            bytes,
            format,
            source: CoverSource::Explicit(path.to_path_buf()),
        });
    }

    if config.bundled.is_file() {
        match read(&config.bundled) {
            Ok((bytes, format)) => {
                log::info!("Using bundled cover image {}", config.bundled.display());
                return Ok(CoverImage {
                    bytes,
                    format,
                    source: CoverSource::Bundled(config.bundled.clone()),
                });
            }
            Err(e) => log::warn!("Ignoring bundled cover: {e}"),
        }
    } else {
        log::debug!("No bundled cover at {}", config.bundled.display());
    }

    log::info!("Generating a {}x{} cover", config.width, config.height);
    Ok(CoverImage {
        bytes: synth::render(config, text)?,
        format: ImageFormat::Png,
        source: CoverSource::Generated,
    })
}

/// Read an image and make sure an e-reader could display it.
fn read(path: &Path) -> Result<(Vec<u8>, ImageFormat), CoverError> {
    let bytes = std::fs::read(path).map_err(|source| CoverError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let format = image::guess_format(&bytes).map_err(|source| CoverError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    if !matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP
    ) {
        return Err(CoverError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: format!("{format:?}"),
        });
    }

    image::load_from_memory_with_format(&bytes, format).map_err(|source| CoverError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((bytes, format))
}
