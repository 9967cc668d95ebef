//! Layer model: the randomized, shape-masked fill elements of a composition.
//!
//! A [`Layer`] is one visual element: a gradient or solid fill clipped to a
//! randomly chosen shape, with its own rotation, position and opacity. The
//! [`LayerStack`] owns the ordered collection and regenerates it wholesale
//! whenever layer count, fill kind, or canvas bounds change.

pub mod shape;

pub use shape::{Mask, ShapeKind};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::colour::{Colour, Palette};
use crate::geom::{Anchor, SizePx};
use crate::rng::Pcg32;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// Identity
// ============================================================================

/// Stable unique identity of a layer, used for diffing and visibility
/// toggles. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

impl LayerId {
    fn next() -> Self {
        Self(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ============================================================================
// Fill
// ============================================================================

/// Which fill constructor a regeneration uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    Gradient,
    Solid,
}

impl FillKind {
    /// Practical upper bound on layer count, enforced by the caller.
    ///
    /// Solid layers are visually heavier per layer, so their cap is much
    /// lower than the gradient cap.
    pub fn max_layers(self) -> usize {
        match self {
            FillKind::Gradient => 300,
            FillKind::Solid => 20,
        }
    }
}

/// A layer's fill: a linear gradient over the full palette, or a solid
/// fill using the primary colour only.
#[derive(Debug, Clone)]
pub enum Fill {
    Gradient(Vec<Colour>),
    Solid(Colour),
}

impl Fill {
    fn from_palette(kind: FillKind, palette: &Palette) -> Self {
        match kind {
            FillKind::Gradient => Fill::Gradient(palette.colours().to_vec()),
            FillKind::Solid => Fill::Solid(palette.primary()),
        }
    }

    pub fn kind(&self) -> FillKind {
        match self {
            Fill::Gradient(_) => FillKind::Gradient,
            Fill::Solid(_) => FillKind::Solid,
        }
    }
}

// ============================================================================
// Layer
// ============================================================================

/// One shape-masked fill element in the composite image.
///
/// All randomized fields are resampled together by
/// [`randomize`](Self::randomize); a layer never carries a mask from one
/// randomize call paired with geometry from another.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub index: usize,
    /// Gradient start anchor.
    pub start: Anchor,
    /// Gradient end anchor.
    pub end: Anchor,
    pub fill: Fill,
    /// Rotation about the layer's own centre, in degrees.
    pub rotation: f32,
    /// Position of the mask centre, in canvas coordinates.
    pub x: f32,
    pub y: f32,
    /// Alpha applied to the whole layer, in `[0.1, 1.0]`.
    pub opacity: f32,
    pub mask: Mask,
    pub visible: bool,
}

impl Layer {
    /// Constructs a gradient-filled layer and randomizes it.
    pub fn gradient(palette: &Palette, bounds: SizePx, rng: &mut Pcg32) -> Self {
        Self::with_fill(Fill::from_palette(FillKind::Gradient, palette), bounds, rng)
    }

    /// Constructs a solid layer (primary colour only) and randomizes it.
    pub fn solid(palette: &Palette, bounds: SizePx, rng: &mut Pcg32) -> Self {
        Self::with_fill(Fill::from_palette(FillKind::Solid, palette), bounds, rng)
    }

    fn with_fill(fill: Fill, bounds: SizePx, rng: &mut Pcg32) -> Self {
        let mut layer = Self {
            id: LayerId::next(),
            index: 0,
            start: Anchor::Top,
            end: Anchor::Bottom,
            fill,
            rotation: 0.0,
            x: 0.0,
            y: 0.0,
            opacity: 1.0,
            mask: Mask::new(ShapeKind::Circle, shape::MIN_MASK_EXTENT, shape::MIN_MASK_EXTENT),
            visible: true,
        };
        layer.randomize(bounds, rng);
        layer
    }

    /// Fully resamples the layer's randomized state.
    ///
    /// Anchors, rotation, position, opacity, and the mask are all drawn
    /// fresh; nothing from the previous sample survives. Position is
    /// uniform over the CURRENT canvas bounds, which differ between icon
    /// and wallpaper modes.
    pub fn randomize(&mut self, bounds: SizePx, rng: &mut Pcg32) {
        self.start = *rng.choose(&Anchor::ALL);
        self.end = *rng.choose(&Anchor::ALL);
        self.rotation = rng.range_f32(1.0, 360.0);
        self.x = rng.range_f32(1.0, bounds.width as f32);
        self.y = rng.range_f32(1.0, bounds.height as f32);
        self.opacity = rng.range_f32(0.1, 1.0);
        self.mask = Mask::random(rng);
    }

    /// Rebuilds the fill colours from the palette, leaving geometry alone.
    ///
    /// This is the palette-change path: already-placed layers keep their
    /// shape and position and only pick up the new colours.
    pub fn refill(&mut self, palette: &Palette) {
        self.fill = Fill::from_palette(self.fill.kind(), palette);
    }

    /// Flips the visible flag. Geometry and fill are untouched.
    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }
}

// ============================================================================
// LayerStack
// ============================================================================

/// The ordered, regenerable collection of layers.
///
/// Order is compositing order: index 0 is painted first, the last layer
/// lands on top.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all existing layers and constructs exactly `desired_count`
    /// fresh, randomized ones.
    ///
    /// Regeneration is deliberately wholesale rather than an in-place
    /// patch: shrinking a stack in place invites stale indices, and
    /// appending on every trigger grows without bound. Call this whenever
    /// the desired count, the fill kind, or the canvas bounds change.
    ///
    /// A `desired_count` of 0 yields a valid empty stack (background-only
    /// render). The caller enforces the upper bound, see
    /// [`FillKind::max_layers`].
    ///
    /// # Panics
    ///
    /// Panics if the palette is empty; that is a caller bug the core does
    /// not try to recover from.
    pub fn regenerate(
        &mut self,
        palette: &Palette,
        fill_kind: FillKind,
        desired_count: usize,
        bounds: SizePx,
        rng: &mut Pcg32,
    ) {
        assert!(!palette.is_empty(), "palette must contain at least one colour");
        self.layers.clear();
        self.layers.reserve(desired_count);
        for index in 0..desired_count {
            let mut layer = match fill_kind {
                FillKind::Gradient => Layer::gradient(palette, bounds, rng),
                FillKind::Solid => Layer::solid(palette, bounds, rng),
            };
            layer.index = index;
            self.layers.push(layer);
        }
    }

    /// Re-derives every layer's fill from the palette, in place.
    ///
    /// Bounded by the current stack length; geometry is untouched.
    pub fn refill(&mut self, palette: &Palette) {
        assert!(!palette.is_empty(), "palette must contain at least one colour");
        for layer in &mut self.layers {
            layer.refill(palette);
        }
    }

    /// Sets the visibility of the layer with the given id.
    ///
    /// Returns false if no such layer exists (e.g. the stack has been
    /// regenerated since the id was taken).
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Iterates layers in compositing order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Mutable iteration, for shells that adjust individual layers.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer> {
        self.layers.iter_mut()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    fn test_palette() -> Palette {
        Palette::new(vec![
            Srgb::new(0.8, 0.1, 0.1),
            Srgb::new(0.1, 0.8, 0.1),
            Srgb::new(0.1, 0.1, 0.8),
        ])
    }

    #[test]
    fn regenerate_produces_exact_count() {
        let palette = test_palette();
        let bounds = SizePx::new(1000, 1000);
        let mut rng = Pcg32::new(1);
        let mut stack = LayerStack::new();

        for count in [5usize, 17, 2, 0, 300] {
            stack.regenerate(&palette, FillKind::Gradient, count, bounds, &mut rng);
            assert_eq!(stack.len(), count);
        }
    }

    #[test]
    fn regenerate_zero_yields_empty_stack() {
        let palette = test_palette();
        let mut rng = Pcg32::new(2);
        let mut stack = LayerStack::new();
        stack.regenerate(&palette, FillKind::Solid, 0, SizePx::new(100, 100), &mut rng);
        assert!(stack.is_empty());
    }

    #[test]
    fn regenerate_twice_yields_fresh_ids() {
        let palette = test_palette();
        let bounds = SizePx::new(500, 500);
        let mut rng = Pcg32::new(3);
        let mut stack = LayerStack::new();

        stack.regenerate(&palette, FillKind::Gradient, 8, bounds, &mut rng);
        let first_ids: Vec<LayerId> = stack.iter().map(|l| l.id).collect();

        stack.regenerate(&palette, FillKind::Gradient, 8, bounds, &mut rng);
        let second_ids: Vec<LayerId> = stack.iter().map(|l| l.id).collect();

        for id in &second_ids {
            assert!(!first_ids.contains(id), "no stale layer survives regeneration");
        }
    }

    #[test]
    fn randomize_respects_ranges() {
        let palette = test_palette();
        let bounds = SizePx::new(2560, 1440);
        let mut rng = Pcg32::new(4);

        for _ in 0..200 {
            let layer = Layer::gradient(&palette, bounds, &mut rng);
            assert!((1.0..=bounds.width as f32).contains(&layer.x));
            assert!((1.0..=bounds.height as f32).contains(&layer.y));
            assert!((0.1..=1.0).contains(&layer.opacity));
            assert!((0.0..360.0).contains(&layer.rotation));
        }
    }

    #[test]
    fn position_follows_canvas_bounds() {
        let palette = test_palette();
        let mut rng = Pcg32::new(5);
        let small = SizePx::new(64, 48);

        for _ in 0..100 {
            let layer = Layer::solid(&palette, small, &mut rng);
            assert!(layer.x <= 64.0);
            assert!(layer.y <= 48.0);
        }
    }

    #[test]
    fn solid_fill_uses_primary_only() {
        let palette = test_palette();
        let mut rng = Pcg32::new(6);
        let layer = Layer::solid(&palette, SizePx::new(100, 100), &mut rng);
        match layer.fill {
            Fill::Solid(c) => assert_eq!(c.red, 0.8),
            Fill::Gradient(_) => panic!("solid layer must carry a solid fill"),
        }
    }

    #[test]
    fn gradient_fill_carries_full_palette() {
        let palette = test_palette();
        let mut rng = Pcg32::new(7);
        let layer = Layer::gradient(&palette, SizePx::new(100, 100), &mut rng);
        match &layer.fill {
            Fill::Gradient(stops) => assert_eq!(stops.len(), 3),
            Fill::Solid(_) => panic!("gradient layer must carry a gradient fill"),
        }
    }

    #[test]
    fn refill_keeps_geometry() {
        let palette = test_palette();
        let mut rng = Pcg32::new(8);
        let mut stack = LayerStack::new();
        stack.regenerate(&palette, FillKind::Gradient, 4, SizePx::new(800, 600), &mut rng);

        let before: Vec<(f32, f32, f32)> =
            stack.iter().map(|l| (l.x, l.y, l.rotation)).collect();

        let other = Palette::new(vec![Srgb::new(0.5, 0.5, 0.0)]);
        stack.refill(&other);

        let after: Vec<(f32, f32, f32)> =
            stack.iter().map(|l| (l.x, l.y, l.rotation)).collect();
        assert_eq!(before, after);
        for layer in stack.iter() {
            match &layer.fill {
                Fill::Gradient(stops) => assert_eq!(stops.len(), 1),
                Fill::Solid(_) => panic!("fill kind must survive a refill"),
            }
        }
    }

    #[test]
    fn set_visible_by_id() {
        let palette = test_palette();
        let mut rng = Pcg32::new(9);
        let mut stack = LayerStack::new();
        stack.regenerate(&palette, FillKind::Gradient, 3, SizePx::new(100, 100), &mut rng);

        let id = stack.get(1).unwrap().id;
        assert!(stack.set_visible(id, false));
        assert!(!stack.get(1).unwrap().visible);
        assert!(stack.get(0).unwrap().visible);

        // ids from a discarded generation no longer resolve
        stack.regenerate(&palette, FillKind::Gradient, 3, SizePx::new(100, 100), &mut rng);
        assert!(!stack.set_visible(id, true));
    }

    #[test]
    fn toggle_visibility_flips_only_the_flag() {
        let palette = test_palette();
        let mut rng = Pcg32::new(10);
        let mut layer = Layer::gradient(&palette, SizePx::new(100, 100), &mut rng);
        let (x, y, rot) = (layer.x, layer.y, layer.rotation);

        layer.toggle_visibility();
        assert!(!layer.visible);
        layer.toggle_visibility();
        assert!(layer.visible);
        assert_eq!((x, y, rot), (layer.x, layer.y, layer.rotation));
    }

    #[test]
    #[should_panic(expected = "palette must contain at least one colour")]
    fn regenerate_with_empty_palette_fails_fast() {
        let empty = Palette::new(Vec::new());
        let mut rng = Pcg32::new(11);
        let mut stack = LayerStack::new();
        stack.regenerate(&empty, FillKind::Gradient, 1, SizePx::new(10, 10), &mut rng);
    }
}
