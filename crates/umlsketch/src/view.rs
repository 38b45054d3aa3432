//! Zoom and pan of the canvas.
//!
//! [`ViewTransform`] maps logical canvas coordinates to screen coordinates
//! as `screen = logical * zoom + pan`. It is purely presentational: node
//! positions stay in logical units whatever the zoom level.

use log::trace;

use umlsketch_core::geometry::{Bounds, Point, Size};

use crate::config::ViewConfig;

/// Lowest zoom any transform accepts, whatever its configured limits.
pub const ZOOM_FLOOR: f32 = 0.01;

/// Zoom level and pan offset of the canvas.
///
/// Every mutation clamps the zoom into the configured limits; out-of-range
/// requests are clipped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    pan: Point,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}

impl ViewTransform {
    /// Creates an identity transform with the limits from `config`.
    pub fn new(config: &ViewConfig) -> Self {
        Self::with_limits(config.min_zoom(), config.max_zoom())
    }

    /// Creates an identity transform with explicit zoom limits.
    ///
    /// Swapped limits are reordered. Both limits are raised to at least
    /// [`ZOOM_FLOOR`], a non-finite lower limit becomes the floor and a NaN
    /// upper limit collapses onto the lower one.
    pub fn with_limits(min_zoom: f32, max_zoom: f32) -> Self {
        let min_zoom = if min_zoom.is_finite() {
            min_zoom.max(ZOOM_FLOOR)
        } else {
            ZOOM_FLOOR
        };
        let max_zoom = if max_zoom.is_nan() {
            min_zoom
        } else {
            max_zoom.max(ZOOM_FLOOR)
        };
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        Self {
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            pan: Point::default(),
            min_zoom,
            max_zoom,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan_offset(&self) -> Point {
        self.pan
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        // NaN collapses to the lower limit
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Changes the zoom by `delta` without moving the pan offset.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = self.clamp_zoom(self.zoom + delta);
    }

    /// Changes the zoom by `delta`, keeping the logical point under
    /// `screen` fixed on screen.
    pub fn zoom_at_point(&mut self, delta: f32, screen: Point) {
        let anchor = self.to_logical(screen);
        self.zoom = self.clamp_zoom(self.zoom + delta);
        self.pan = screen.sub_point(anchor.scale(self.zoom));
        trace!(zoom = self.zoom; "Zoomed at point");
    }

    /// Moves the canvas by a screen-space displacement.
    pub fn pan(&mut self, delta: Point) {
        self.pan = self.pan.add_point(delta);
    }

    /// Back to zoom 1 and no pan.
    pub fn reset(&mut self) {
        self.zoom = self.clamp_zoom(1.0);
        self.pan = Point::default();
    }

    /// Zooms and pans so that `content` fills `viewport` and is centered.
    ///
    /// A zero-extent axis does not constrain the zoom; when both axes are
    /// degenerate the zoom is reset to 1 and the content is centered.
    pub fn fit_to_content(&mut self, content: Bounds, viewport: Size) {
        let mut zoom = self.max_zoom;
        let mut constrained = false;
        if content.width() > 0.0 {
            zoom = zoom.min(viewport.width() / content.width());
            constrained = true;
        }
        if content.height() > 0.0 {
            zoom = zoom.min(viewport.height() / content.height());
            constrained = true;
        }
        if !constrained {
            zoom = 1.0;
        }
        self.zoom = self.clamp_zoom(zoom);

        self.pan = Point::new(
            (viewport.width() - content.width() * self.zoom) / 2.0
                - content.min_x() * self.zoom,
            (viewport.height() - content.height() * self.zoom) / 2.0
                - content.min_y() * self.zoom,
        );
        trace!(zoom = self.zoom, pan:? = self.pan; "Fitted view to content");
    }

    /// Maps a logical point to screen space.
    pub fn to_screen(&self, logical: Point) -> Point {
        logical.scale(self.zoom).add_point(self.pan)
    }

    /// Maps a screen point to logical space.
    pub fn to_logical(&self, screen: Point) -> Point {
        screen.sub_point(self.pan).scale(1.0 / self.zoom)
    }

    /// Converts a screen-space displacement (e.g. a mouse drag) to a
    /// logical displacement.
    pub fn screen_delta_to_logical(&self, delta: Point) -> Point {
        delta.scale(1.0 / self.zoom)
    }
}
