//! Palette and colour helpers.
//!
//! The palette is the single externally mutable "seed" of visual variety:
//! every fill in the composition is derived from it. The first colour is the
//! primary colour, used for solid fills and foreground-glyph contrast.

use palette::Srgb;

use crate::rng::Pcg32;

/// A colour in non-linear sRGB with components in `[0, 1]`.
pub type Colour = Srgb<f32>;

/// The active set of colours driving all fills.
///
/// Usually holds 2 or 3 colours. The compositor treats an empty palette as a
/// precondition violation, see [`RenderError`](crate::error::RenderError).
#[derive(Debug, Clone)]
pub struct Palette {
    colours: Vec<Colour>,
}

impl Palette {
    /// Creates a palette from an ordered list of colours.
    ///
    /// Callers are expected to pass 2 or 3 colours; the first one becomes
    /// the primary colour.
    pub fn new(colours: Vec<Colour>) -> Self {
        Self { colours }
    }

    /// Generates a fresh palette of three uniformly random colours.
    pub fn random(rng: &mut Pcg32) -> Self {
        let colours = (0..3)
            .map(|_| Srgb::new(rng.next_f32(), rng.next_f32(), rng.next_f32()))
            .collect();
        Self { colours }
    }

    /// The primary colour (first in the set).
    ///
    /// # Panics
    ///
    /// Panics if the palette is empty. Check [`is_empty`](Self::is_empty)
    /// first on untrusted input.
    pub fn primary(&self) -> Colour {
        self.colours[0]
    }

    /// All colours, in order.
    pub fn colours(&self) -> &[Colour] {
        &self.colours
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

/// Perceived brightness of a colour, in `[0, 1]`.
///
/// Rec. 601 weighting: `0.299 R + 0.587 G + 0.114 B`.
pub fn luma(colour: Colour) -> f32 {
    0.299 * colour.red + 0.587 * colour.green + 0.114 * colour.blue
}

/// Returns true if the colour reads as bright (luma above 0.5).
pub fn is_bright(colour: Colour) -> bool {
    luma(colour) > 0.5
}

/// Converts a colour and alpha to 8-bit RGBA components.
pub fn to_rgba8(colour: Colour, alpha: f32) -> [u8; 4] {
    [
        (colour.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (colour.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (colour.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

/// Linear interpolation between two colours, component-wise in sRGB.
pub fn lerp(a: Colour, b: Colour, t: f32) -> Colour {
    let t = t.clamp(0.0, 1.0);
    Srgb::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}
