//! Software canvas
//!
//! [`PixelCanvas`] rasterizes paint operations into an RGBA image at the
//! game's internal resolution. Shapes get one pixel of anti-aliasing from
//! their signed distance; colors blend source-over with straight alpha.

mod font;
mod raster;


use glam::Vec2;
use image::{Rgba as Pixel, RgbaImage};

use towerd_core::{Canvas2d, PaintOp, PaintStyle, Rgba};

pub use font::{GLYPH_ADVANCE, GLYPH_COLUMNS, GLYPH_ROWS, glyph};

/// Font units per em: the seven glyph rows cover 0.7 of the font size
const FONT_UNITS_PER_EM: f32 = 10.0;

const TRANSPARENT: Pixel<u8> = Pixel([0, 0, 0, 0]);

/// RGBA raster target implementing [`Canvas2d`]
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    /// A fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, TRANSPARENT),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel at (x, y), if inside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    /// Cover every pixel within `[min, max]` whose center is inside `shape`
    fn fill_shape(&mut self, min: Vec2, max: Vec2, color: Rgba, shape: impl Fn(Vec2) -> f32) {
        if color.a.is_nan() || color.a <= 0.0 || !min.is_finite() || !max.is_finite() {
            return;
        }
        let (width, height) = self.image.dimensions();
        let x0 = (min.x - 1.0).floor().max(0.0) as u32;
        let y0 = (min.y - 1.0).floor().max(0.0) as u32;
        let x1 = ((max.x + 1.0).ceil().max(0.0) as u32).min(width);
        let y1 = ((max.y + 1.0).ceil().max(0.0) as u32).min(height);

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = raster::coverage(shape(center));
                if coverage > 0.0 {
                    blend(self.image.get_pixel_mut(x, y), color, coverage);
                }
            }
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let min = origin.min(origin + size);
        let max = origin.max(origin + size);
        self.fill_shape(min, max, color, |p| raster::rect(p, min, max));
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Rgba, style: PaintStyle) {
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        match style {
            PaintStyle::Fill => {
                let extent = Vec2::splat(radius);
                self.fill_shape(center - extent, center + extent, color, |p| {
                    raster::circle(p, center, radius)
                });
            }
            PaintStyle::Stroke { width } => {
                let extent = Vec2::splat(radius + width * 0.5);
                self.fill_shape(center - extent, center + extent, color, |p| {
                    raster::ring(p, center, radius, width)
                });
            }
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let pad = Vec2::splat(width * 0.5);
        self.fill_shape(from.min(to) - pad, from.max(to) + pad, color, |p| {
            raster::segment(p, from, to, width)
        });
    }

    fn triangle(&mut self, points: [Vec2; 3], color: Rgba, style: PaintStyle) {
        let min = points[0].min(points[1]).min(points[2]);
        let max = points[0].max(points[1]).max(points[2]);
        match style {
            PaintStyle::Fill => {
                self.fill_shape(min, max, color, |p| raster::triangle(p, &points));
            }
            PaintStyle::Stroke { width } => {
                let pad = Vec2::splat(width * 0.5);
                self.fill_shape(min - pad, max + pad, color, |p| {
                    raster::triangle_outline(p, &points, width)
                });
            }
        }
    }

    /// Bitmap text with its left baseline end at `origin`
    fn text(&mut self, text: &str, origin: Vec2, size: f32, color: Rgba) {
        if size.is_nan() || size <= 0.0 {
            return;
        }
        let unit = size / FONT_UNITS_PER_EM;
        let top = origin.y - GLYPH_ROWS as f32 * unit;

        for (index, c) in text.chars().enumerate() {
            let left = origin.x + (index as u32 * GLYPH_ADVANCE) as f32 * unit;
            for (row, bits) in glyph(c).iter().enumerate() {
                for column in 0..GLYPH_COLUMNS {
                    if bits & (1 << (GLYPH_COLUMNS - 1 - column)) == 0 {
                        continue;
                    }
                    let cell = Vec2::new(left + column as f32 * unit, top + row as f32 * unit);
                    self.fill_rect(cell, Vec2::splat(unit), color);
                }
            }
        }
    }
}

impl Canvas2d for PixelCanvas {
    fn resolution(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn paint(&mut self, op: PaintOp) {
        match op {
            PaintOp::Clear => self.clear(),
            PaintOp::FillRect {
                origin,
                size,
                color,
            } => self.fill_rect(origin, size, color),
            PaintOp::Circle {
                center,
                radius,
                color,
                style,
            } => self.circle(center, radius, color, style),
            PaintOp::Line {
                from,
                to,
                width,
                color,
            } => self.line(from, to, width, color),
            PaintOp::Triangle {
                points,
                color,
                style,
            } => self.triangle(points, color, style),
            PaintOp::Text {
                text,
                origin,
                size,
                color,
            } => self.text(&text, origin, size, color),
        }
    }
}

/// Source-over blend of `color` at `coverage` onto a straight-alpha pixel
fn blend(dst: &mut Pixel<u8>, color: Rgba, coverage: f32) {
    let src_a = color.a.clamp(0.0, 1.0) * coverage;
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        *dst = TRANSPARENT;
        return;
    }

    let src = [color.r, color.g, color.b];
    for (channel, &s) in dst.0[..3].iter_mut().zip(src.iter()) {
        let mixed = (s as f32 * src_a + *channel as f32 * dst_a * (1.0 - src_a)) / out_a;
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}
