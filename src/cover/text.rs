use super::raster::Shape;
use owned_ttf_parser::{AsFaceRef, OutlineBuilder, OwnedFace};
use std::path::PathBuf;

/// A TrueType font used to lay out and draw cover text.
pub struct Font {
    face: OwnedFace,
}

impl Font {
    /// Load the first readable font among `candidates`.
    pub fn load(candidates: &[PathBuf]) -> Option<Font> {
        candidates.iter().find_map(|path| {
            let data = std::fs::read(path).ok()?;
            match OwnedFace::from_vec(data, 0) {
                Ok(face) => {
                    log::debug!("Using font {} for the cover", path.display());
                    Some(Font { face })
                }
                Err(e) => {
                    log::debug!("Skipping font {}: {e}", path.display());
                    None
                }
            }
        })
    }

    fn scale(&self, size: f32) -> f32 {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Width of `text` in pixels at `size` pixels per em.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let face = self.face.as_face_ref();
        let units: f32 = text
            .chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|g| face.glyph_hor_advance(g))
            .map(|advance| advance as f32)
            .sum();
        units * self.scale(size)
    }

    /// Add the outlines of `text` to `shape`, starting at `x` on `baseline`.
    pub fn outline(&self, shape: &mut Shape, text: &str, size: f32, x: f32, baseline: f32) {
        let face = self.face.as_face_ref();
        let scale = self.scale(size);
        let mut pen = Pen {
            shape,
            scale,
            x,
            baseline,
        };

        for c in text.chars() {
            let Some(glyph) = face.glyph_index(c) else {
                continue;
            };
            face.outline_glyph(glyph, &mut pen);
            pen.shape.close();
            let advance = face.glyph_hor_advance(glyph).unwrap_or_default();
            pen.x += advance as f32 * scale;
        }
    }

    /// Break `text` into lines no wider than `max_width`. Single words wider
    /// than the limit get a line of their own.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut line = String::new();

        for word in text.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if self.measure(&candidate, size) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

/// Maps font units (y up) onto the cover (y down).
struct Pen<'a> {
    shape: &'a mut Shape,
    scale: f32,
    x: f32,
    baseline: f32,
}

impl Pen<'_> {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for Pen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.shape.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.shape.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.shape.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.shape.curve_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.shape.close();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::CoverConfig;

    #[test]
    fn missing_fonts_load_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(Font::load(&[dir.path().join("nope.ttf"), bogus]).is_none());
    }

    #[test]
    fn wraps_and_draws_with_a_system_font() {
        // only meaningful where one of the default fonts is installed
        let Some(font) = Font::load(&CoverConfig::default().fonts) else {
            return;
        };

        let one = font.measure("Handbook", 100.0);
        assert!(one > 0.0);
        assert!((font.measure("Handbook", 200.0) - one * 2.0).abs() < 0.01);

        let lines = font.wrap("The Example Company Handbook", 100.0, one * 1.5);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "The Example Company Handbook");

        let mut shape = Shape::new();
        font.outline(&mut shape, "H", 100.0, 0.0, 100.0);
        assert!(!shape.is_empty());
    }
}
