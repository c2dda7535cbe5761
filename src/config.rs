//! Build configuration.
//!
//! Everything that shapes a book but isn't content lives here: book metadata,
//! where to find pages in the source tree, how sections map to parts, what the
//! generated cover looks like, and how the EPUB is styled. The structure is
//! immutable once loaded and is handed to each stage by reference.
//!
//! Every field has a default, so a `handbook-epub.toml` only needs the values it
//! wants to override:
//!
//! ```toml
//! [metadata]
//! title = "The Example Handbook"
//!
//! [cover]
//! accent = "#1d4aff"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// File name looked up in the working directory when `--config` isn't given.
pub const DEFAULT_CONFIG_FILE: &str = "handbook-epub.toml";

/// Book-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Book title, also used on the generated cover
    pub title: String,
    /// Credited author
    pub author: String,
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "fr").
    /// Required for valid EPUB.
    pub language: String,
    /// Web URL of the source repository. Empty string for none.
    pub repository_url: String,
    /// Web URL of the live handbook. Empty string for none.
    pub live_url: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            title: "The PostHog Handbook".to_string(),
            author: "PostHog".to_string(),
            language: "en".to_string(),
            repository_url: "https://github.com/PostHog/posthog.com".to_string(),
            live_url: "https://posthog.com/handbook".to_string(),
        }
    }
}

impl MetadataConfig {
    pub fn repository_url_opt(&self) -> Option<&str> {
        if self.repository_url.is_empty() {
            None
        } else {
            Some(&self.repository_url)
        }
    }

    pub fn live_url_opt(&self) -> Option<&str> {
        if self.live_url.is_empty() {
            None
        } else {
            Some(&self.live_url)
        }
    }
}

/// Where pages live inside the source repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root relative to the repository. When it doesn't exist the
    /// repository path itself is used as the content root.
    pub content_dir: PathBuf,
    /// Navigation JSON relative to the repository, ordering the core chapters
    pub nav_file: PathBuf,
    /// File extensions treated as pages
    pub extensions: Vec<String>,
    /// Glob patterns (matched against paths relative to the content root) to skip
    pub exclude: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("contents/handbook"),
            nav_file: PathBuf::from("src/navs/handbook.json"),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            exclude: vec!["**/_snippets/**".to_string()],
        }
    }
}

/// One top-level part of the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDefinition {
    /// Heading shown on the part divider and in the table of contents
    pub name: String,
    /// Optional line shown under the name on the divider page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Section labels (case-insensitive) whose pages belong to this part
    pub sections: Vec<String>,
}

impl PartDefinition {
    fn new(name: &str, subtitle: Option<&str>, sections: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            subtitle: subtitle.map(ToString::to_string),
            sections: sections.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The section to part mapping, in canonical part order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsConfig {
    /// Name of the catch-all part for unmapped sections, always placed last
    pub other: String,
    /// Parts in reading order
    pub parts: Vec<PartDefinition>,
}

impl Default for PartsConfig {
    fn default() -> Self {
        Self {
            other: "Other".to_string(),
            parts: vec![
                PartDefinition::new(
                    "Core Handbook",
                    Some("Why we exist, how we work, and where we're going"),
                    &[
                        "core",
                        "handbook",
                        "company",
                        "getting-started",
                        "exec",
                        "strategy",
                    ],
                ),
                PartDefinition::new("Engineering", None, &["engineering", "docs-and-wizard"]),
                PartDefinition::new(
                    "Product",
                    None,
                    &["product", "support", "cs-and-onboarding"],
                ),
                PartDefinition::new(
                    "People",
                    None,
                    &["people", "onboarding", "hiring", "operations"],
                ),
                PartDefinition::new(
                    "Growth",
                    None,
                    &[
                        "growth",
                        "marketing",
                        "content",
                        "brand",
                        "community",
                        "sales",
                    ],
                ),
            ],
        }
    }
}

/// An sRGB colour written as `#rrggbb` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(pub [u8; 3]);

impl TryFrom<String> for Colour {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for Colour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("`{s}` isn't a colour of the form #rrggbb"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or_default();
        Ok(Colour([channel(0), channel(2), channel(4)]))
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

/// Cover image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Cover used when `--cover` isn't given. Ignored when the file doesn't exist.
    pub bundled: PathBuf,
    /// Size of a generated cover, in pixels
    pub width: u32,
    pub height: u32,
    /// Line printed under the title on a generated cover. Empty string for none.
    pub subtitle: String,
    pub background: Colour,
    pub grid: Colour,
    pub accent: Colour,
    pub text: Colour,
    pub muted: Colour,
    /// TrueType fonts tried in order for text on a generated cover
    pub fonts: Vec<PathBuf>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            bundled: PathBuf::from("assets/cover.png"),
            width: 1600,
            height: 2400,
            subtitle: "How we work".to_string(),
            background: Colour([0x15, 0x1a, 0x26]),
            grid: Colour([0x1a, 0x20, 0x30]),
            accent: Colour([0xf7, 0xa5, 0x01]),
            text: Colour([0xff, 0xff, 0xff]),
            muted: Colour([0x9c, 0xa3, 0xaf]),
            fonts: vec![
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf"),
                PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
                PathBuf::from("C:\\Windows\\Fonts\\arialbd.ttf"),
            ],
        }
    }
}

/// Syntax highlighting theme for fenced code blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxTheme {
    #[default]
    #[serde(rename = "InspiredGitHub")]
    InspiredGitHub,
    #[serde(rename = "Solarized (light)")]
    SolarizedLight,
    #[serde(rename = "base16-ocean.light")]
    OceanLight,
}

impl fmt::Display for SyntaxTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl SyntaxTheme {
    /// Name of the theme in syntect's default theme set.
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxTheme::InspiredGitHub => "InspiredGitHub",
            SyntaxTheme::SolarizedLight => "Solarized (light)",
            SyntaxTheme::OceanLight => "base16-ocean.light",
        }
    }
}

/// EPUB output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpubConfig {
    /// Syntax highlighting theme for code blocks
    pub theme: SyntaxTheme,
    /// Whether to add the "About This Edition" page after the cover
    pub edition_page: bool,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            theme: SyntaxTheme::default(),
            edition_page: true,
        }
    }
}

/// Colophon page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColophonConfig {
    /// Template with placeholders. Empty string disables the colophon page.
    /// Placeholders: {title}, {edition}, {commit}, {commit_date}, {generated_date},
    /// {tool_version}, {part_count}, {chapter_count}, {word_count},
    /// {repository_url}, {live_url}
    pub template: String,
}

impl Default for ColophonConfig {
    fn default() -> Self {
        Self {
            template: default_colophon_template(),
        }
    }
}

pub fn default_colophon_template() -> String {
    r#"{title}

{edition}

Built from commit {commit} ({commit_date})
Generated on {generated_date} by handbook-epub v{tool_version}

---

  {part_count} parts
  {chapter_count} chapters
  {word_count} words

---

Handbook content is © its authors and available under the source repository's licence.
Source: {repository_url}
For the live version, visit {live_url}

Some interactive elements, images, and embedded components from the web version
may not render in this format."#
        .to_string()
}

/// Everything that configures a build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub metadata: MetadataConfig,
    pub content: ContentConfig,
    pub parts: PartsConfig,
    pub cover: CoverConfig,
    pub epub: EpubConfig,
    pub colophon: ColophonConfig,
}
