//! Screen-space to module-space coordinate transform
//!
//! The module always sees a fixed internal resolution. Only the on-screen
//! display size changes with the container; scale factors are measured from
//! the surface's live bounding box, which may be rounded to device pixels.

use glam::DVec2;

/// Axis-aligned box in screen (CSS pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

/// The on-screen element the game is displayed in
pub trait SurfaceLayout {
    /// Request a new display size in screen pixels
    fn set_display_size(&mut self, width: f64, height: f64);

    /// Box the surface actually occupies after layout
    fn bounding_box(&self) -> Rect;
}

/// Layout without a window: a box at a fixed origin snapped to device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualSurface {
    origin: DVec2,
    size: DVec2,
    device_pixel_ratio: f64,
}

impl VirtualSurface {
    pub fn new(origin: DVec2, device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            origin,
            size: DVec2::ZERO,
            device_pixel_ratio,
        }
    }

    /// Move the surface (e.g. after the page scrolled)
    pub fn set_origin(&mut self, origin: DVec2) {
        self.origin = origin;
    }
}

impl SurfaceLayout for VirtualSurface {
    fn set_display_size(&mut self, width: f64, height: f64) {
        let dpr = self.device_pixel_ratio;
        self.size = DVec2::new((width * dpr).round() / dpr, (height * dpr).round() / dpr);
    }

    fn bounding_box(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y,
            width: self.size.x,
            height: self.size.y,
        }
    }
}

/// Internal resolution and the current screen-to-module scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    internal_width: u32,
    internal_height: u32,
    scale: DVec2,
}

impl DisplayTransform {
    pub fn new(internal_width: u32, internal_height: u32) -> Self {
        Self {
            internal_width: internal_width.max(1),
            internal_height: internal_height.max(1),
            scale: DVec2::ONE,
        }
    }

    pub fn internal_size(&self) -> (u32, u32) {
        (self.internal_width, self.internal_height)
    }

    fn internal(&self) -> DVec2 {
        DVec2::new(self.internal_width as f64, self.internal_height as f64)
    }

    /// Scale factors from the last successful recompute
    pub fn scale(&self) -> DVec2 {
        self.scale
    }

    /// Fit the surface to a new container width, keeping the aspect ratio
    ///
    /// Returns the new scale factors, or `None` when the width is unusable
    /// and nothing changed.
    pub fn recompute(&mut self, container_width: f64, layout: &mut dyn SurfaceLayout) -> Option<DVec2> {
        if !container_width.is_finite() || container_width <= 0.0 {
            tracing::debug!("Ignoring resize to container width {}", container_width);
            return None;
        }

        let height = container_width * self.internal_height as f64 / self.internal_width as f64;
        layout.set_display_size(container_width, height);

        let scale = self.live_scale(&layout.bounding_box())?;
        self.scale = scale;
        tracing::debug!(
            "Display {}x{} -> scale ({:.4}, {:.4})",
            container_width,
            height,
            scale.x,
            scale.y
        );
        Some(scale)
    }

    /// Convert a client-space point into module coordinates
    ///
    /// Uses the live bounding box so layout changes since the last recompute
    /// are honored.
    pub fn screen_to_world(&self, client: DVec2, layout: &dyn SurfaceLayout) -> DVec2 {
        let rect = layout.bounding_box();
        let scale = self.live_scale(&rect).unwrap_or(self.scale);
        (client - rect.origin()) * scale
    }

    fn live_scale(&self, rect: &Rect) -> Option<DVec2> {
        let size = rect.size();
        if size.x > 0.0 && size.y > 0.0 && size.is_finite() {
            Some(self.internal() / size)
        } else {
            None
        }
    }
}
