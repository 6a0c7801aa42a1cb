//! Host-drawn tower placement preview
//!
//! Painted on top of the module's frame while a hover cell is active.

use glam::Vec2;

use super::{Canvas2d, OUTLINE_WIDTH, PaintOp, PaintStyle, RenderCallSurface, Rgba};

/// Radius of the placement ring
pub const PREVIEW_RADIUS: f32 = 20.0;

/// Half extent of the "cannot place" cross
pub const CROSS_HALF_EXTENT: f32 = 15.0;

const PLACEABLE: Rgba = Rgba::new(0, 255, 238, 0.5);
const BLOCKED: Rgba = Rgba::new(255, 0, 0, 0.5);
const RANGE: Rgba = Rgba::new(0, 255, 238, 0.2);
const RANGE_WIDTH: f32 = 1.0;

impl<C: Canvas2d> RenderCallSurface<C> {
    /// Draw the placement indicator for the cell centered at `at`
    ///
    /// A placeable cell also shows the selected tower's range when it is
    /// positive; a blocked cell gets a red cross instead.
    pub fn draw_placement_preview(&mut self, at: Vec2, can_place: bool, range: f32) {
        let canvas = self.canvas_mut();
        canvas.paint(PaintOp::Circle {
            center: at,
            radius: PREVIEW_RADIUS,
            color: if can_place { PLACEABLE } else { BLOCKED },
            style: PaintStyle::Stroke {
                width: OUTLINE_WIDTH,
            },
        });

        if can_place && range > 0.0 {
            canvas.paint(PaintOp::Circle {
                center: at,
                radius: range,
                color: RANGE,
                style: PaintStyle::Stroke { width: RANGE_WIDTH },
            });
        }

        if !can_place {
            let d = CROSS_HALF_EXTENT;
            for (from, to) in [
                (Vec2::new(-d, -d), Vec2::new(d, d)),
                (Vec2::new(d, -d), Vec2::new(-d, d)),
            ] {
                canvas.paint(PaintOp::Line {
                    from: at + from,
                    to: at + to,
                    width: OUTLINE_WIDTH,
                    color: BLOCKED,
                });
            }
        }
    }
}
