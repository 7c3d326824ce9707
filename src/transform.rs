//! Rotation-aware mapping between device pixels and percent coordinates.
//!
//! The interactive host lays the image container out at its zoomed pixel size
//! and applies rotation visually about the container center. Because zoom
//! physically resizes the container (instead of scaling it with a transform),
//! the mapping needs no zoom-correction term: the current rendered width and
//! height already absorb it. Rotation is undone analytically.

/// On-screen geometry of the image container.
///
/// `center_x`/`center_y` locate the container center in device pixels;
/// `width`/`height` are its current rendered size (zoom included);
/// `rotation_deg` is the visual rotation applied about the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_deg: f64,
}

impl Viewport {
    pub fn new(center_x: f64, center_y: f64, width: f64, height: f64, rotation_deg: f64) -> Self {
        Self {
            center_x,
            center_y,
            width,
            height,
            rotation_deg,
        }
    }

    /// Maps a device-pixel pointer position into percent coordinates of the
    /// unrotated base image.
    ///
    /// The pointer vector from the container center is rotated by `-θ` to
    /// undo the visual rotation, re-centered into the container's own pixel
    /// box, and normalized to [0, 100] per axis. Results outside that range
    /// are returned as-is; gesture edge policy (reject vs clamp) belongs to
    /// the caller.
    pub fn to_percent(&self, pointer_x: f64, pointer_y: f64) -> (f64, f64) {
        let dx = pointer_x - self.center_x;
        let dy = pointer_y - self.center_y;

        let radians = -self.rotation_deg.to_radians();
        let cos = radians.cos();
        let sin = radians.sin();

        let rotated_dx = dx * cos - dy * sin;
        let rotated_dy = dx * sin + dy * cos;

        let local_x = rotated_dx + self.width / 2.0;
        let local_y = rotated_dy + self.height / 2.0;

        (local_x / self.width * 100.0, local_y / self.height * 100.0)
    }

    /// Inverse of [`to_percent`](Self::to_percent): maps percent coordinates
    /// back to a device-pixel position.
    pub fn to_screen(&self, x_percent: f64, y_percent: f64) -> (f64, f64) {
        let local_x = x_percent / 100.0 * self.width;
        let local_y = y_percent / 100.0 * self.height;

        let dx = local_x - self.width / 2.0;
        let dy = local_y - self.height / 2.0;

        let radians = self.rotation_deg.to_radians();
        let cos = radians.cos();
        let sin = radians.sin();

        let rotated_dx = dx * cos - dy * sin;
        let rotated_dy = dx * sin + dy * cos;

        (self.center_x + rotated_dx, self.center_y + rotated_dy)
    }
}

/// Whether a percent coordinate pair lies inside the image bounds.
pub fn in_bounds(x: f64, y: f64) -> bool {
    (0.0..=100.0).contains(&x) && (0.0..=100.0).contains(&y)
}

/// Clamps a percent coordinate pair into the image bounds.
pub fn clamp_to_bounds(x: f64, y: f64) -> (f64, f64) {
    (x.clamp(0.0, 100.0), y.clamp(0.0, 100.0))
}
