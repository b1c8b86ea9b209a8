// ---------------------------------------------------------------------------
// Per-image pan/zoom transform
// ---------------------------------------------------------------------------

/// Wheel units per e-fold of zoom. One notch (120) zooms by exp(0.25).
pub const DEFAULT_ZOOM_DIVISOR: f32 = 480.0;

/// Zoom range. Outside it the offset correction overflows f32.
pub const MIN_ZOOM: f32 = 1e-4;
pub const MAX_ZOOM: f32 = 1e4;

/// Pan offset and zoom of one image.
///
/// The offset lives in image-local (pre-zoom) units and is relative to the
/// centered anchor, which is recomputed from the viewport and bitmap size on
/// every frame. An image therefore stays centered across window resizes
/// unless the user has panned it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub offset_x: f32,
    pub offset_y: f32,
    zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Zoom multiplier for an accumulated wheel delta.
pub fn zoom_factor(wheel_delta: i32, divisor: f32) -> f32 {
    (wheel_delta as f32 / divisor).exp()
}

/// Top-left screen position of an unpanned, unzoomed image centered in the viewport.
pub fn screen_anchor(viewport: (f32, f32), image: (u32, u32)) -> (f32, f32) {
    (
        viewport.0 / 2.0 - image.0 as f32 / 2.0,
        viewport.1 / 2.0 - image.1 as f32 / 2.0,
    )
}

impl ViewTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Multiply the zoom by `factor`, keeping the image point under the screen
    /// position `pivot` fixed. `anchor` comes from [`screen_anchor`].
    ///
    /// The resulting zoom is clamped to [`MIN_ZOOM`, `MAX_ZOOM`]; the pivot
    /// stays fixed for the factor actually applied.
    ///
    /// The offset correction divides by the already-updated zoom; dividing by
    /// the old one makes the image drift away from the cursor.
    pub fn zoom_by(&mut self, factor: f32, pivot: (f32, f32), anchor: (f32, f32)) {
        if factor == 1.0 {
            return;
        }
        if !(factor > 0.0) {
            log::debug!("[view] zoom factor {} rejected at zoom {}", factor, self.zoom);
            return;
        }
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if new_zoom == self.zoom {
            return;
        }
        let applied = new_zoom / self.zoom;

        let px = pivot.0 - anchor.0;
        let py = pivot.1 - anchor.1;
        let offset_x = self.offset_x + (px - applied * px) / new_zoom;
        let offset_y = self.offset_y + (py - applied * py) / new_zoom;
        if !(offset_x.is_finite() && offset_y.is_finite()) {
            log::debug!("[view] zoom to {} would lose the offset, ignored", new_zoom);
            return;
        }
        self.zoom = new_zoom;
        self.offset_x = offset_x;
        self.offset_y = offset_y;
    }

    /// Pan by a screen-space distance. Stored in image units, so the
    /// on-screen speed does not depend on the zoom level.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.offset_x += dx / self.zoom;
        self.offset_y += dy / self.zoom;
    }

    /// Position to draw the bitmap at under a `(zoom, zoom)` scale transform
    /// about the screen origin.
    pub fn draw_origin(&self, anchor: (f32, f32)) -> (f32, f32) {
        (
            anchor.0 / self.zoom + self.offset_x,
            anchor.1 / self.zoom + self.offset_y,
        )
    }
}
