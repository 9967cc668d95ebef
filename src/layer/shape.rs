//! Shape masks that clip a layer's fill to a silhouette.
//!
//! Coverage is computed from a signed distance evaluated in the shape's
//! local frame (origin at the shape centre), which gives a one-pixel
//! antialiased edge without supersampling.

use crate::rng::Pcg32;

/// Smallest randomized extent of a mask, per axis.
pub const MIN_MASK_EXTENT: f32 = 100.0;
/// Largest randomized extent of a mask, per axis.
pub const MAX_MASK_EXTENT: f32 = 1024.0;

/// The silhouette kinds a mask can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Ellipse,
    Capsule,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Capsule,
    ];
}

/// A shape silhouette sized to a frame, positioned at its owning layer.
///
/// Frame semantics match the preview renderer the sizes were tuned on: a
/// circle takes the largest diameter that fits the frame, an ellipse and a
/// rectangle fill it, a capsule is the rectangle rounded by half its
/// shorter side.
#[derive(Debug, Clone, Copy)]
pub struct Mask {
    pub kind: ShapeKind,
    pub width: f32,
    pub height: f32,
}

impl Mask {
    pub fn new(kind: ShapeKind, width: f32, height: f32) -> Self {
        Self { kind, width, height }
    }

    /// Samples a random kind and a random frame in
    /// [`MIN_MASK_EXTENT`, `MAX_MASK_EXTENT`) per axis.
    pub fn random(rng: &mut Pcg32) -> Self {
        let kind = *rng.choose(&ShapeKind::ALL);
        let width = rng.range_f32(MIN_MASK_EXTENT, MAX_MASK_EXTENT);
        let height = rng.range_f32(MIN_MASK_EXTENT, MAX_MASK_EXTENT);
        Self { kind, width, height }
    }

    /// Antialiased coverage in `[0, 1]` at a point in the shape's local
    /// frame (origin at the centre).
    pub fn coverage(&self, x: f32, y: f32) -> f32 {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let d = match self.kind {
            ShapeKind::Circle => sd_circle(x, y, hw.min(hh)),
            ShapeKind::Rectangle => sd_box(x, y, hw, hh),
            ShapeKind::Ellipse => sd_ellipse(x, y, hw, hh),
            ShapeKind::Capsule => sd_round_box(x, y, hw, hh, hw.min(hh)),
        };
        (0.5 - d).clamp(0.0, 1.0)
    }

    /// Radius of a disc guaranteed to contain the shape, used for paint
    /// bounding boxes under arbitrary rotation.
    pub fn bounding_radius(&self) -> f32 {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        (hw * hw + hh * hh).sqrt()
    }
}

fn sd_circle(x: f32, y: f32, r: f32) -> f32 {
    (x * x + y * y).sqrt() - r
}

fn sd_box(x: f32, y: f32, hw: f32, hh: f32) -> f32 {
    let dx = x.abs() - hw;
    let dy = y.abs() - hh;
    let ox = dx.max(0.0);
    let oy = dy.max(0.0);
    (ox * ox + oy * oy).sqrt() + dx.max(dy).min(0.0)
}

fn sd_round_box(x: f32, y: f32, hw: f32, hh: f32, r: f32) -> f32 {
    sd_box(x, y, hw - r, hh - r) - r
}

// Scaled-distance approximation; exact ellipse distance is not worth the
// iteration for a one-pixel antialiasing band.
fn sd_ellipse(x: f32, y: f32, hw: f32, hh: f32) -> f32 {
    let k = ((x / hw) * (x / hw) + (y / hh) * (y / hh)).sqrt();
    (k - 1.0) * hw.min(hh)
}
