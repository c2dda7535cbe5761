//! The generated cover design.
//!
//! Positions are laid out on a 1600×2400 design grid and scaled to the
//! configured size, so other sizes keep the same composition.

use super::raster::Shape;
use super::text::Font;
use super::CoverText;
use crate::config::{Colour, CoverConfig};
use crate::error::CoverError;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::f32::consts::PI;
use std::io::Cursor;

const DESIGN_WIDTH: f32 = 1600.0;
const DESIGN_HEIGHT: f32 = 2400.0;
const SPINES: usize = 24;

struct Layout {
    sx: f32,
    sy: f32,
}

impl Layout {
    fn x(&self, x: f32) -> f32 {
        x * self.sx
    }

    fn y(&self, y: f32) -> f32 {
        y * self.sy
    }

    /// Font sizes follow the width so text never outgrows the page.
    fn size(&self, size: f32) -> f32 {
        size * self.sx
    }
}

/// Draw the cover and encode it as PNG.
pub fn render(config: &CoverConfig, text: &CoverText) -> Result<Vec<u8>, CoverError> {
    let image = draw(config, text, Font::load(&config.fonts).as_ref());

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(CoverError::Encode)?;
    Ok(bytes)
}

fn draw(config: &CoverConfig, text: &CoverText, font: Option<&Font>) -> RgbImage {
    let (width, height) = (config.width.max(1), config.height.max(1));
    let layout = Layout {
        sx: width as f32 / DESIGN_WIDTH,
        sy: height as f32 / DESIGN_HEIGHT,
    };
    let mut image = RgbImage::from_pixel(width, height, image::Rgb(config.background.0));
    let w = width as f32;

    let mut grid = Shape::new();
    let mut y = 0.0;
    while y < DESIGN_HEIGHT {
        grid.rect(0.0, layout.y(y), w, layout.y(1.0).max(1.0));
        y += 80.0;
    }
    grid.fill(&mut image, config.grid.0);

    spines(&mut image, &layout, config);

    let mut rules = Shape::new();
    for y in [860.0, 1420.0] {
        rules.rect(layout.x(200.0), layout.y(y - 2.0), layout.x(1200.0), layout.y(4.0));
    }
    rules.rect(0.0, 0.0, w, layout.y(12.0));
    rules.rect(0.0, layout.y(DESIGN_HEIGHT - 12.0), w, layout.y(12.0));
    rules.fill(&mut image, config.accent.0);

    match font {
        Some(font) => lettering(&mut image, &layout, config, text, font),
        None => log::warn!("No usable font found for the cover; it will have no text"),
    }

    image
}

/// A fan of spines over a rounded body, after a hedgehog's back.
fn spines(image: &mut RgbImage, layout: &Layout, config: &CoverConfig) {
    let (cx, cy) = (800.0, 580.0);
    let radius = 280.0;
    let inner = radius * 0.45;
    let half = (SPINES / 2) as f32;

    // brightest in the middle, fading towards the ends
    let mut bands = [Shape::new(), Shape::new(), Shape::new()];
    for i in 0..SPINES {
        let angle = PI + PI * i as f32 / (SPINES - 1) as f32;
        let length = radius + if i % 2 == 0 { 40.0 } else { 0.0 };
        let from = (
            layout.x(cx + inner * angle.cos()),
            layout.y(cy + inner * angle.sin()),
        );
        let to = (
            layout.x(cx + length * angle.cos()),
            layout.y(cy + length * angle.sin()),
        );

        let distance = (i as f32 - half).abs() / half;
        let (band, width) = match distance {
            d if d < 0.3 => (0, 6.0),
            d if d < 0.6 => (1, 5.0),
            _ => (2, 4.0),
        };
        bands[band].line(from, to, layout.x(width));
    }
    for (band, fade) in bands.iter().zip([1.0, 0.85, 0.55]) {
        band.fill(image, mix(config.accent, config.background, fade));
    }

    let mut outline = Shape::new();
    let (bx, by) = (layout.x(cx), layout.y(cy + radius * 0.15));
    let (rx, ry) = (layout.x(radius * 0.5), layout.y(radius * 0.3));
    outline.ellipse(bx, by, rx + layout.x(2.0), ry + layout.y(2.0));
    outline.fill(image, mix(config.muted, config.background, 0.2));

    let mut body = Shape::new();
    body.ellipse(bx, by, rx, ry);
    body.fill(image, mix(config.text, config.background, 0.1));

    let mut eye = Shape::new();
    eye.ellipse(layout.x(cx - 22.5), layout.y(cy + 22.5), layout.x(12.5), layout.y(12.5));
    eye.fill(image, config.text.0);
    let mut pupil = Shape::new();
    pupil.ellipse(layout.x(cx - 22.5), layout.y(cy + 22.5), layout.x(7.5), layout.y(7.5));
    pupil.ellipse(layout.x(cx - 51.0), layout.y(cy + 29.0), layout.x(9.0), layout.y(9.0));
    pupil.fill(image, config.background.0);
}

fn lettering(
    image: &mut RgbImage,
    layout: &Layout,
    config: &CoverConfig,
    text: &CoverText,
    font: &Font,
) {
    let width = image.width() as f32;
    let centred = |shape: &mut Shape, line: &str, size: f32, top: f32| {
        let x = (width - font.measure(line, size)) / 2.0;
        // the design places the top of the line; glyphs hang from the ascent
        font.outline(shape, line, size, x, top + size * 0.8);
    };

    let mut bright = Shape::new();
    let title_size = layout.size(130.0);
    let lines = font.wrap(&text.title, title_size, layout.x(1360.0));
    // longer titles start higher so they stay between the rules
    let title_top = 940.0 - 80.0 * (lines.len().saturating_sub(2)) as f32;
    for (i, line) in lines.iter().enumerate() {
        centred(
            &mut bright,
            line,
            title_size,
            layout.y(title_top.max(880.0) + 160.0 * i as f32),
        );
    }
    if !text.author.is_empty() {
        centred(&mut bright, &text.author, layout.size(48.0), layout.y(1850.0));
    }
    bright.fill(image, config.text.0);

    let mut muted = Shape::new();
    if !text.subtitle.is_empty() {
        centred(&mut muted, &text.subtitle, layout.size(56.0), layout.y(1310.0));
    }
    muted.fill(image, config.muted.0);

    let mut accent = Shape::new();
    if !text.edition.is_empty() {
        centred(&mut accent, &text.edition, layout.size(44.0), layout.y(1520.0));
    }
    accent.fill(image, config.accent.0);

    let mut faint = Shape::new();
    if !text.footer.is_empty() {
        centred(&mut faint, &text.footer, layout.size(28.0), layout.y(2280.0));
    }
    faint.fill(image, mix(config.muted, config.background, 0.5));
}

/// `amount` of `a` over `b`.
fn mix(a: Colour, b: Colour, amount: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let value = a.0[i] as f32 * amount + b.0[i] as f32 * (1.0 - amount);
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}
