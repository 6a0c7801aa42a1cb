//! Drawing primitives callable from the game module
//!
//! [`RenderCallSurface`] is the host half of the `draw*` imports. Each call
//! turns into exactly one [`PaintOp`] on the underlying [`Canvas2d`], in call
//! order. There is no display list and no batching; the module is expected
//! to start every frame with [`RenderCallSurface::clear`].

mod command;
mod preview;


use glam::Vec2;

pub use command::{Canvas2d, PaintOp, PaintStyle, RecordingCanvas};
pub use preview::{CROSS_HALF_EXTENT, PREVIEW_RADIUS};

/// Line width for stroked circles and triangles
pub const OUTLINE_WIDTH: f32 = 2.0;

/// 8-bit RGB color as passed by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from untyped numbers, rounding and clamping to 0..=255
    pub fn from_numbers(r: f64, g: f64, b: f64) -> Self {
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Fully opaque version of this color
    pub const fn opaque(self) -> Rgba {
        Rgba::new(self.r, self.g, self.b, 1.0)
    }
}

fn channel(v: f64) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}

/// RGB color with a straight (non-premultiplied) alpha in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Host implementation of the module's drawing imports
pub struct RenderCallSurface<C: Canvas2d> {
    canvas: C,
}

impl<C: Canvas2d> RenderCallSurface<C> {
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    /// Fixed internal resolution of the underlying canvas
    pub fn resolution(&self) -> (u32, u32) {
        self.canvas.resolution()
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Reset the surface to a blank state
    pub fn clear(&mut self) {
        self.canvas.paint(PaintOp::Clear);
    }

    /// Filled rectangle
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.canvas.paint(PaintOp::FillRect {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
            color: color.opaque(),
        });
    }

    /// Filled or outlined circle
    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgb, fill: bool) {
        self.canvas.paint(PaintOp::Circle {
            center: Vec2::new(x, y),
            radius,
            color: color.opaque(),
            style: outline_or_fill(fill),
        });
    }

    /// Line segment of the given thickness
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Rgb) {
        self.canvas.paint(PaintOp::Line {
            from,
            to,
            width: thickness,
            color: color.opaque(),
        });
    }

    /// Filled or outlined triangle
    pub fn draw_triangle(&mut self, points: [Vec2; 3], color: Rgb, fill: bool) {
        self.canvas.paint(PaintOp::Triangle {
            points,
            color: color.opaque(),
            style: outline_or_fill(fill),
        });
    }

    /// Text at a pixel size, anchored at the baseline start
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, size: f32, color: Rgb) {
        self.canvas.paint(PaintOp::Text {
            text: text.to_owned(),
            origin: Vec2::new(x, y),
            size,
            color: color.opaque(),
        });
    }
}

fn outline_or_fill(fill: bool) -> PaintStyle {
    if fill {
        PaintStyle::Fill
    } else {
        PaintStyle::Stroke {
            width: OUTLINE_WIDTH,
        }
    }
}
