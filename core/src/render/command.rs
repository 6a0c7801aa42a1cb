//! Paint operations and the drawing surface they are executed against

use glam::Vec2;

use super::Rgba;

/// How a closed shape is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStyle {
    /// Fill the interior
    Fill,
    /// Stroke the outline with the given line width (pixels)
    Stroke { width: f32 },
}

/// A single immediate paint operation
///
/// Every operation carries its full paint state; the surface keeps nothing
/// between calls besides the pixels themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    /// Reset the whole surface to transparent
    Clear,
    /// Axis-aligned filled rectangle
    FillRect {
        /// Top-left corner (pixels)
        origin: Vec2,
        /// Width and height (pixels, may be negative)
        size: Vec2,
        color: Rgba,
    },
    /// Full circle
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        style: PaintStyle,
    },
    /// Line segment with butt caps
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    /// Closed triangle
    Triangle {
        points: [Vec2; 3],
        color: Rgba,
        style: PaintStyle,
    },
    /// Text anchored at its alphabetic baseline
    Text {
        /// UTF-8 text string
        text: String,
        /// Left end of the baseline (pixels)
        origin: Vec2,
        /// Font size (pixels, sans-serif)
        size: f32,
        color: Rgba,
    },
}

/// A 2D drawing surface with a fixed internal resolution
pub trait Canvas2d {
    /// Internal pixel resolution (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Execute one paint operation immediately
    fn paint(&mut self, op: PaintOp);
}

/// Canvas that keeps every operation in call order
///
/// Used by tests and by tooling that inspects what the module drew.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    ops: Vec<PaintOp>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// All operations recorded so far
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Operations issued after the most recent [`PaintOp::Clear`]
    pub fn visible_ops(&self) -> &[PaintOp] {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, PaintOp::Clear))
            .map_or(0, |i| i + 1);
        &self.ops[start..]
    }

    /// Drain the recorded operations
    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Canvas2d for RecordingCanvas {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn paint(&mut self, op: PaintOp) {
        self.ops.push(op);
    }
}
