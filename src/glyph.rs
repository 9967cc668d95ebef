//! Foreground glyph rendering via resvg.
//!
//! An icon composition can carry one optional glyph painted centred on top
//! of the layer stack. Glyphs are monochrome SVG silhouettes: at render time
//! every fill and stroke is replaced with a tint chosen for contrast against
//! the palette's primary colour.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::colour::{self, Colour};

// ============================================================================
// GlyphSource
// ============================================================================

/// A source for the foreground glyph.
///
/// `Named` identifiers resolve against a small built-in catalog; `Raw`
/// carries SVG markup supplied by the shell (e.g. from a file picker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphSource {
    /// A catalog identifier such as `"star"` or `"bolt"`.
    Named(String),
    /// Raw SVG markup.
    Raw(String),
}

impl GlyphSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn raw(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Resolves this source to SVG markup.
    ///
    /// Unknown catalog names resolve to `None` and the glyph simply does
    /// not render, matching how the original shell treats an unrecognized
    /// symbol identifier.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Raw(svg) => Some(svg.as_str()),
            Self::Named(name) => GLYPH_CATALOG
                .iter()
                .find(|(id, _)| id == name)
                .map(|(_, svg)| *svg),
        }
    }

    /// The identifiers available through [`GlyphSource::Named`].
    pub fn catalog_names() -> impl Iterator<Item = &'static str> {
        GLYPH_CATALOG.iter().map(|(id, _)| *id)
    }
}

const GLYPH_CATALOG: &[(&str, &str)] = &[
    (
        "star",
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><polygon fill="#000000" points="12,1.6 15.1,8.6 22.6,9.3 16.9,14.3 18.6,21.8 12,17.9 5.4,21.8 7.1,14.3 1.4,9.3 8.9,8.6"/></svg>"##,
    ),
    (
        "bolt",
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><polygon fill="#000000" points="13,1 3,14 10,14 9,23 21,9 13.5,9"/></svg>"##,
    ),
    (
        "heart",
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="#000000" d="M12 21 C5 14 2 10.5 2 7 a5 5 0 0 1 10 -0.5 a5 5 0 0 1 10 0.5 c0 3.5 -3 7 -10 14 Z"/></svg>"##,
    ),
    (
        "ring",
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="9" fill="none" stroke="#000000" stroke-width="3"/></svg>"##,
    ),
];

// ============================================================================
// Tint
// ============================================================================

/// The two glyph tints, picked for contrast against the primary colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphTint {
    Dark,
    Light,
}

impl GlyphTint {
    pub fn rgba(self) -> (u8, u8, u8, u8) {
        match self {
            GlyphTint::Dark => (0, 0, 0, 255),
            GlyphTint::Light => (255, 255, 255, 255),
        }
    }
}

/// Chooses the glyph tint for a primary colour.
///
/// A bright primary (luma above 0.5) gets a dark glyph, a dark primary a
/// light one. The inversion flag flips whichever choice was made.
pub fn tint_for(primary: Colour, invert: bool) -> GlyphTint {
    let tint = if colour::is_bright(primary) {
        GlyphTint::Dark
    } else {
        GlyphTint::Light
    };
    match (tint, invert) {
        (t, false) => t,
        (GlyphTint::Dark, true) => GlyphTint::Light,
        (GlyphTint::Light, true) => GlyphTint::Dark,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Renders a glyph source to an RGBA image fitting `size x size` pixels,
/// with all fills and strokes replaced by the tint colour.
///
/// Returns `None` if the source does not resolve or the SVG cannot be
/// parsed.
pub fn render_glyph(source: &GlyphSource, size: u32, tint: GlyphTint) -> Option<RgbaImage> {
    let svg_data = source.resolve()?;
    let (r, g, b, _) = tint.rgba();
    let tinted = replace_svg_colours(svg_data, r, g, b);

    let opts = Options::default();
    let tree = Tree::from_str(&tinted, &opts).ok()?;

    // Scale to fit within size x size, preserving aspect ratio
    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).ceil() as u32;
    let height = (svg_size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Replaces fill and stroke colours in SVG markup, preserving `none` and
/// `transparent` values.
fn replace_svg_colours(svg_data: &str, r: u8, g: u8, b: u8) -> String {
    let hex_colour = format!("#{:02x}{:02x}{:02x}", r, g, b);
    let mut result = svg_data.to_string();
    result = replace_colour_attr(&result, "fill", &hex_colour);
    result = replace_colour_attr(&result, "stroke", &hex_colour);
    result
}

fn replace_colour_attr(svg: &str, attr: &str, new_colour: &str) -> String {
    let mut result = String::with_capacity(svg.len());
    let pattern = format!("{}=\"", attr);
    let mut remaining = svg;

    while let Some(start) = remaining.find(&pattern) {
        result.push_str(&remaining[..start + pattern.len()]);
        remaining = &remaining[start + pattern.len()..];

        if let Some(end) = remaining.find('"') {
            let value = &remaining[..end];
            if value == "none" || value == "transparent" {
                result.push_str(value);
            } else {
                result.push_str(new_colour);
            }
            remaining = &remaining[end..];
        }
    }

    result.push_str(remaining);
    result
}

fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel = pixmap.pixel(x, y).unwrap();
            // tiny_skia stores premultiplied alpha
            let (r, g, b, a) =
                unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
            img.put_pixel(x, y, Rgba([r, g, b, a]));
        }
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `src` onto `dest` at the given position, scaling the source
/// alpha by `opacity`. Standard source-over blending.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32, opacity: f32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;
    let opacity = opacity.clamp(0.0, 1.0);

    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let dx = x + sx as i32;
            let dy = y + sy as i32;

            if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
                continue;
            }

            let mut src_pixel = *src.get_pixel(sx, sy);
            src_pixel[3] = (src_pixel[3] as f32 * opacity).round() as u8;
            let dst_pixel = dest.get_pixel(dx as u32, dy as u32);

            let blended = alpha_blend(src_pixel, *dst_pixel);
            dest.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
pub(crate) fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================
