//! EPUB packaging.
//!
//! Turns an [`Edition`] into an EPUB 3 package with:
//! - a cover image and a cover page
//! - an optional "About This Edition" page
//! - a divider page per part, followed by one page per chapter
//! - an optional colophon
//!
//! The container, OPF manifest and spine, and NCX/nav documents are written by
//! `epub-builder`. Resources are added in reading order, so the spine is the
//! order they are added in, and only part dividers and chapters get titles,
//! which keeps the navigation document to exactly the part/chapter tree.

mod rendering;
mod sanitize;
mod styles;

use crate::config::{ColophonConfig, EpubConfig};
use crate::edition::Edition;
use crate::error::AssemblyError;
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};
use rendering::{chapter_file, part_file, COLOPHON_FILE, COVER_FILE, EDITION_FILE};
use uuid::Uuid;

/// Something that can turn an edition into a finished e-book.
pub trait Packager {
    fn package(&self, edition: &Edition) -> Result<Vec<u8>, AssemblyError>;
}

pub struct EpubPackager {
    epub: EpubConfig,
    colophon: ColophonConfig,
}

impl EpubPackager {
    pub fn new(epub: EpubConfig, colophon: ColophonConfig) -> EpubPackager {
        EpubPackager { epub, colophon }
    }
}

fn package_error(e: impl std::fmt::Display) -> AssemblyError {
    AssemblyError::Package(e.to_string())
}

/// Stable package identifier: the same edition of the same commit always gets
/// the same id.
fn package_uuid(edition: &Edition) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, edition.identifier().as_bytes())
}

/// Check a finished document before it goes into the package.
fn content<'a>(href: &'a str, xhtml: &'a str) -> Result<EpubContent<&'a [u8]>, AssemblyError> {
    sanitize::check_well_formed(href, xhtml)?;
    Ok(EpubContent::new(href, xhtml.as_bytes()))
}

impl Packager for EpubPackager {
    fn package(&self, edition: &Edition) -> Result<Vec<u8>, AssemblyError> {
        if edition.chapter_count() == 0 {
            return Err(AssemblyError::Empty);
        }
        let lang = edition.language.as_str();

        let zip = ZipLibrary::new().map_err(package_error)?;
        let mut builder = EpubBuilder::new(zip).map_err(package_error)?;
        builder.epub_version(EpubVersion::V30);

        builder
            .metadata("title", edition.full_title())
            .map_err(package_error)?;
        builder
            .metadata("author", &edition.author)
            .map_err(package_error)?;
        builder.metadata("lang", lang).map_err(package_error)?;
        builder
            .metadata("generator", env!("CARGO_PKG_NAME"))
            .map_err(package_error)?;
        builder
            .metadata("description", edition.description())
            .map_err(package_error)?;
        builder
            .metadata("subject", &edition.label)
            .map_err(package_error)?;
        builder.set_uuid(package_uuid(edition));
        builder.set_publication_date(edition.build_date);
        builder.set_modified_date(edition.build_date);

        let stylesheet = styles::generate_stylesheet(self.epub.theme);
        builder
            .stylesheet(stylesheet.as_bytes())
            .map_err(package_error)?;

        builder
            .add_cover_image(
                edition.cover.file_name(),
                edition.cover.bytes.as_slice(),
                edition.cover.media_type(),
            )
            .map_err(package_error)?;

        let cover = rendering::cover::render(edition);
        builder
            .add_content(content(COVER_FILE, &cover)?.reftype(ReferenceType::Cover))
            .map_err(package_error)?;

        if self.epub.edition_page {
            let page = rendering::edition::render(edition);
            builder
                .add_content(content(EDITION_FILE, &page)?.reftype(ReferenceType::TitlePage))
                .map_err(package_error)?;
        }

        for (p, part) in edition.parts.iter().enumerate() {
            let href = part_file(p);
            let divider = rendering::part::render(lang, p + 1, part);
            let mut divider_content = content(&href, &divider)?.title(&part.name).level(1);
            if p == 0 {
                divider_content = divider_content.reftype(ReferenceType::Text);
            }
            builder
                .add_content(divider_content)
                .map_err(package_error)?;

            for (c, page) in part.pages.iter().enumerate() {
                let href = chapter_file(p, c);
                log::debug!("Packaging {} as {href}", page.path.display());
                let xhtml = rendering::chapter::render(lang, &href, page)?;
                builder
                    .add_content(content(&href, &xhtml)?.title(&page.title).level(2))
                    .map_err(package_error)?;
            }
        }

        if !self.colophon.template.trim().is_empty() {
            let page = rendering::colophon::render(edition, &self.colophon.template);
            builder
                .add_content(content(COLOPHON_FILE, &page)?.reftype(ReferenceType::Colophon))
                .map_err(package_error)?;
        }

        let mut bytes = Vec::new();
        builder.generate(&mut bytes).map_err(package_error)?;
        Ok(bytes)
    }
}
