//! A small anti-aliased polygon filler.
//!
//! Shapes are flattened into straight edges and filled with the nonzero winding
//! rule, sampling each pixel row several times vertically and computing exact
//! horizontal coverage per sample. That is plenty for flat cover artwork and
//! glyph outlines at display sizes.

use image::{Rgb, RgbImage};
use std::f32::consts::PI;

const SAMPLES: usize = 4;
const CURVE_STEPS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    winding: i32,
}

impl Edge {
    fn new(from: (f32, f32), to: (f32, f32)) -> Option<Edge> {
        if from.1 == to.1 {
            return None;
        }
        let (a, b, winding) = if from.1 < to.1 {
            (from, to, 1)
        } else {
            (to, from, -1)
        };
        Some(Edge {
            x0: a.0,
            y0: a.1,
            x1: b.0,
            y1: b.1,
            winding,
        })
    }

    fn crossing(&self, y: f32) -> Option<f32> {
        if y < self.y0 || y >= self.y1 {
            return None;
        }
        let t = (y - self.y0) / (self.y1 - self.y0);
        Some(self.x0 + t * (self.x1 - self.x0))
    }
}

/// A set of closed contours in pixel coordinates, y pointing down.
#[derive(Debug, Default, Clone)]
pub struct Shape {
    edges: Vec<Edge>,
    start: (f32, f32),
    current: (f32, f32),
}

impl Shape {
    pub fn new() -> Shape {
        Shape::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.close();
        self.start = (x, y);
        self.current = (x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if let Some(edge) = Edge::new(self.current, (x, y)) {
            self.edges.push(edge);
        }
        self.current = (x, y);
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let (sx, sy) = self.current;
        for step in 1..=CURVE_STEPS {
            let t = step as f32 / CURVE_STEPS as f32;
            let u = 1.0 - t;
            self.line_to(
                u * u * sx + 2.0 * u * t * cx + t * t * x,
                u * u * sy + 2.0 * u * t * cy + t * t * y,
            );
        }
    }

    pub fn curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let (sx, sy) = self.current;
        for step in 1..=CURVE_STEPS {
            let t = step as f32 / CURVE_STEPS as f32;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            self.line_to(
                a * sx + b * c1x + c * c2x + d * x,
                a * sy + b * c1y + c * c2y + d * y,
            );
        }
    }

    pub fn close(&mut self) {
        if self.current != self.start {
            let (x, y) = self.start;
            self.line_to(x, y);
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close();
    }

    /// A straight stroke of `width` with square ends.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return;
        }
        let (nx, ny) = (-dy / length * width / 2.0, dx / length * width / 2.0);
        self.move_to(from.0 + nx, from.1 + ny);
        self.line_to(to.0 + nx, to.1 + ny);
        self.line_to(to.0 - nx, to.1 - ny);
        self.line_to(from.0 - nx, from.1 - ny);
        self.close();
    }

    pub fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let steps = 64;
        self.move_to(cx + rx, cy);
        for step in 1..steps {
            let angle = 2.0 * PI * step as f32 / steps as f32;
            self.line_to(cx + rx * angle.cos(), cy + ry * angle.sin());
        }
        self.close();
    }

    fn vertical_bounds(&self) -> Option<(f32, f32)> {
        let top = self.edges.iter().map(|e| e.y0).reduce(f32::min)?;
        let bottom = self.edges.iter().map(|e| e.y1).reduce(f32::max)?;
        Some((top, bottom))
    }

    /// Paint the shape onto `image` in `colour`.
    pub fn fill(&self, image: &mut RgbImage, colour: [u8; 3]) {
        let Some((top, bottom)) = self.vertical_bounds() else {
            return;
        };
        let (width, height) = image.dimensions();
        let first = top.floor().max(0.0) as u32;
        let last = (bottom.ceil().max(0.0) as u32).min(height);

        let mut coverage = vec![0f32; width as usize];
        let mut crossings: Vec<(f32, i32)> = Vec::new();
        let weight = 1.0 / SAMPLES as f32;

        for row in first..last {
            coverage.iter_mut().for_each(|c| *c = 0.0);
            for sample in 0..SAMPLES {
                let y = row as f32 + (sample as f32 + 0.5) * weight;
                crossings.clear();
                crossings.extend(
                    self.edges
                        .iter()
                        .filter_map(|e| e.crossing(y).map(|x| (x, e.winding))),
                );
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, direction) in crossings.iter() {
                    let before = winding;
                    winding += direction;
                    if before == 0 && winding != 0 {
                        span_start = x;
                    } else if before != 0 && winding == 0 {
                        add_span(&mut coverage, span_start, x, weight);
                    }
                }
            }

            for (x, &c) in coverage.iter().enumerate() {
                if c > 0.0 {
                    let pixel = image.get_pixel_mut(x as u32, row);
                    *pixel = blend(*pixel, colour, c.min(1.0));
                }
            }
        }
    }
}

/// Add `weight` of coverage to every pixel in `[x0, x1)`, partially at the ends.
fn add_span(coverage: &mut [f32], x0: f32, x1: f32, weight: f32) {
    let limit = coverage.len() as f32;
    let (x0, x1) = (x0.clamp(0.0, limit), x1.clamp(0.0, limit));
    if x1 <= x0 {
        return;
    }

    let (i0, i1) = (x0.floor() as usize, x1.floor() as usize);
    if i0 == i1 {
        coverage[i0] += (x1 - x0) * weight;
        return;
    }
    coverage[i0] += (i0 as f32 + 1.0 - x0) * weight;
    for c in coverage.iter_mut().take(i1).skip(i0 + 1) {
        *c += weight;
    }
    if i1 < coverage.len() {
        coverage[i1] += (x1 - i1 as f32) * weight;
    }
}

fn blend(under: Rgb<u8>, over: [u8; 3], alpha: f32) -> Rgb<u8> {
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let value = under.0[i] as f32 * (1.0 - alpha) + over[i] as f32 * alpha;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn canvas() -> RgbImage {
        RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]))
    }

    #[test]
    fn fills_pixel_aligned_rectangles_solidly() {
        let mut image = canvas();
        let mut shape = Shape::new();
        shape.rect(2.0, 2.0, 4.0, 3.0);
        shape.fill(&mut image, [255, 255, 255]);

        assert_eq!(image.get_pixel(2, 2), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(5, 4), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(6, 4), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(2, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn antialiases_partial_pixels() {
        let mut image = canvas();
        let mut shape = Shape::new();
        shape.rect(1.5, 0.0, 2.0, 10.0);
        shape.fill(&mut image, [200, 200, 200]);

        assert_eq!(image.get_pixel(1, 5), &Rgb([100, 100, 100]));
        assert_eq!(image.get_pixel(2, 5), &Rgb([200, 200, 200]));
        assert_eq!(image.get_pixel(3, 5), &Rgb([100, 100, 100]));
    }

    #[test]
    fn nonzero_winding_keeps_holes_open() {
        let mut image = canvas();
        let mut shape = Shape::new();
        // outer clockwise, inner counter-clockwise
        shape.rect(0.0, 0.0, 10.0, 10.0);
        shape.move_to(3.0, 3.0);
        shape.line_to(3.0, 7.0);
        shape.line_to(7.0, 7.0);
        shape.line_to(7.0, 3.0);
        shape.close();
        shape.fill(&mut image, [255, 0, 0]);

        assert_eq!(image.get_pixel(1, 1), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(5, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn shapes_outside_the_canvas_are_clipped() {
        let mut image = canvas();
        let mut shape = Shape::new();
        shape.rect(-5.0, -5.0, 30.0, 7.0);
        shape.ellipse(50.0, 50.0, 4.0, 4.0);
        shape.fill(&mut image, [0, 255, 0]);

        assert_eq!(image.get_pixel(9, 1), &Rgb([0, 255, 0]));
        assert_eq!(image.get_pixel(9, 2), &Rgb([0, 0, 0]));
    }

    #[test]
    fn empty_shapes_paint_nothing() {
        let mut image = canvas();
        let mut shape = Shape::new();
        shape.line((1.0, 1.0), (1.0, 1.0), 3.0);
        assert!(shape.is_empty());
        shape.fill(&mut image, [255, 255, 255]);
        assert!(image.pixels().all(|p| p == &Rgb([0, 0, 0])));
    }
}
