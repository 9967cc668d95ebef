//! Canvas compositing: background, layer stack, foreground glyph.
//!
//! [`Canvas::render`] turns a [`CanvasConfig`] and a [`LayerStack`] into a
//! flat RGBA surface. Compositing order is fixed: background first, then
//! each visible layer in stack order, then the optional foreground glyph,
//! and finally (icon mode only) the rounded-rectangle clip and drop shadow.
//!
//! Rendering is fully deterministic: the same palette, stack, and config
//! produce pixel-identical output on every call.

use image::{Rgba, RgbaImage};

use crate::colour::{self, Colour, Palette};
use crate::error::RenderError;
use crate::geom::{Anchor, SizePx};
use crate::glyph::{self, GlyphSource};
use crate::layer::{Fill, FillKind, Layer, LayerStack};

/// Side of the square icon working canvas, in pixels.
pub const ICON_CANVAS_SIZE: u32 = 1124;
/// Side of the rounded-rectangle clip inscribed in the icon canvas.
pub const ICON_CLIP_SIZE: u32 = 1016;
/// Default mask corner roundness for new icon configs.
pub const DEFAULT_CORNER_RADIUS: f32 = 300.0;

const GLYPH_OPACITY: f32 = 0.8;
// Sized to match a 700pt symbol on the 1124pt working canvas
const GLYPH_SCALE: f32 = 0.62;

const SHADOW_ALPHA: f32 = 0.3;
const SHADOW_RADIUS: usize = 8;
const SHADOW_OFFSET: (i32, i32) = (10, -10);

// ============================================================================
// Configuration
// ============================================================================

/// What the canvas is being composed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasMode {
    /// Fixed square working canvas, clipped to a rounded rectangle and
    /// shadowed.
    Icon,
    /// Screen-sized canvas, unclipped, no shadow.
    Wallpaper,
}

impl CanvasMode {
    /// Short tag used in export directory names.
    pub fn tag(self) -> &'static str {
        match self {
            CanvasMode::Icon => "icon",
            CanvasMode::Wallpaper => "wallpaper",
        }
    }
}

/// How the bottom-most paint of the canvas is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    /// The palette's primary colour.
    Primary,
    White,
    Black,
    /// A top-to-bottom linear gradient over the full palette.
    PaletteGradient,
}

/// Immutable-per-render snapshot of everything the compositor needs.
///
/// Owned by the surrounding shell; the core only reads it.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    pub palette: Palette,
    /// Desired stack size, used by the shell when triggering regeneration.
    pub layer_count: usize,
    pub fill_kind: FillKind,
    pub background: BackgroundMode,
    /// Corner roundness of the icon clip, in pixels.
    pub corner_radius: f32,
    pub mode: CanvasMode,
    pub bounds: SizePx,
    pub glyph: Option<GlyphSource>,
    /// Flips the dark/light contrast choice for the glyph.
    pub invert_glyph: bool,
}

impl CanvasConfig {
    /// Config for icon mode on the fixed square working canvas.
    pub fn icon(palette: Palette) -> Self {
        Self {
            palette,
            layer_count: 1,
            fill_kind: FillKind::Gradient,
            background: BackgroundMode::Primary,
            corner_radius: DEFAULT_CORNER_RADIUS,
            mode: CanvasMode::Icon,
            bounds: SizePx::square(ICON_CANVAS_SIZE),
            glyph: None,
            invert_glyph: false,
        }
    }

    /// Config for wallpaper mode at the given screen resolution.
    pub fn wallpaper(palette: Palette, screen: SizePx) -> Self {
        Self {
            palette,
            layer_count: 1,
            fill_kind: FillKind::Gradient,
            background: BackgroundMode::Primary,
            corner_radius: 0.0,
            mode: CanvasMode::Wallpaper,
            bounds: screen,
            glyph: None,
            invert_glyph: false,
        }
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// The compositor. Stateless; everything comes in through the arguments.
pub struct Canvas;

impl Canvas {
    /// Composites the configured background, the visible layers, and the
    /// optional foreground glyph into one RGBA surface.
    ///
    /// Fails fast with [`RenderError::EmptyPalette`] if the palette holds
    /// no colours; the shell is expected to prevent that.
    pub fn render(config: &CanvasConfig, stack: &LayerStack) -> Result<RgbaImage, RenderError> {
        if config.palette.is_empty() {
            return Err(RenderError::EmptyPalette);
        }

        let mut img = RgbaImage::new(config.bounds.width, config.bounds.height);

        paint_background(&mut img, config);

        for layer in stack.iter().filter(|l| l.visible) {
            paint_layer(&mut img, layer, config.bounds);
        }

        if config.mode == CanvasMode::Icon {
            if let Some(source) = &config.glyph {
                paint_glyph(&mut img, source, config);
            }
            clip_rounded_rect(&mut img, config.corner_radius);
            img = apply_drop_shadow(&img);
        }

        Ok(img)
    }
}

// ============================================================================
// Background
// ============================================================================

fn paint_background(img: &mut RgbaImage, config: &CanvasConfig) {
    let height = img.height();
    match config.background {
        BackgroundMode::Primary => {
            let px = Rgba(colour::to_rgba8(config.palette.primary(), 1.0));
            fill_all(img, px);
        }
        BackgroundMode::White => fill_all(img, Rgba([255, 255, 255, 255])),
        BackgroundMode::Black => fill_all(img, Rgba([0, 0, 0, 255])),
        BackgroundMode::PaletteGradient => {
            let stops = config.palette.colours();
            for y in 0..height {
                let t = if height > 1 {
                    y as f32 / (height - 1) as f32
                } else {
                    0.0
                };
                let px = Rgba(colour::to_rgba8(sample_gradient(stops, t), 1.0));
                for x in 0..img.width() {
                    img.put_pixel(x, y, px);
                }
            }
        }
    }
}

fn fill_all(img: &mut RgbaImage, px: Rgba<u8>) {
    for pixel in img.pixels_mut() {
        *pixel = px;
    }
}

// ============================================================================
// Layers
// ============================================================================

/// Paints one layer: mask coverage in the shape's local frame, fill colour
/// from the (unrotated) canvas-space gradient, source-over blend at the
/// layer's opacity.
fn paint_layer(img: &mut RgbaImage, layer: &Layer, bounds: SizePx) {
    let reach = layer.mask.bounding_radius() + 1.0;
    let x0 = (layer.x - reach).floor().max(0.0) as u32;
    let y0 = (layer.y - reach).floor().max(0.0) as u32;
    let x1 = ((layer.x + reach).ceil() as u32).min(img.width());
    let y1 = ((layer.y + reach).ceil() as u32).min(img.height());
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let theta = layer.rotation.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();

    for py in y0..y1 {
        for px in x0..x1 {
            let dx = px as f32 + 0.5 - layer.x;
            let dy = py as f32 + 0.5 - layer.y;

            // inverse-rotate into the shape's local frame
            let lx = dx * cos_t + dy * sin_t;
            let ly = -dx * sin_t + dy * cos_t;

            let cov = layer.mask.coverage(lx, ly);
            if cov <= 0.0 {
                continue;
            }

            let fill_colour = match &layer.fill {
                Fill::Solid(c) => *c,
                Fill::Gradient(stops) => gradient_at(
                    stops,
                    layer.start,
                    layer.end,
                    bounds,
                    lx + layer.x,
                    ly + layer.y,
                ),
            };

            blend_pixel(img, px, py, fill_colour, cov * layer.opacity);
        }
    }
}

fn blend_pixel(img: &mut RgbaImage, x: u32, y: u32, src: Colour, alpha: f32) {
    let dst = *img.get_pixel(x, y);
    let sa = alpha.clamp(0.0, 1.0);
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        return;
    }

    let blend = |s: f32, d: u8| -> u8 {
        let df = d as f32 / 255.0;
        let out = (s.clamp(0.0, 1.0) * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    img.put_pixel(
        x,
        y,
        Rgba([
            blend(src.red, dst[0]),
            blend(src.green, dst[1]),
            blend(src.blue, dst[2]),
            (out_a * 255.0).round() as u8,
        ]),
    );
}

// ============================================================================
// Gradients
// ============================================================================

/// Samples an evenly spaced multi-stop gradient at `t` in `[0, 1]`.
fn sample_gradient(stops: &[Colour], t: f32) -> Colour {
    match stops.len() {
        0 => Colour::new(0.0, 0.0, 0.0),
        1 => stops[0],
        n => {
            let scaled = t.clamp(0.0, 1.0) * (n - 1) as f32;
            let i = (scaled.floor() as usize).min(n - 2);
            colour::lerp(stops[i], stops[i + 1], scaled - i as f32)
        }
    }
}

/// Evaluates a linear gradient spanning the canvas between two anchors at a
/// canvas-space point. Degenerate anchor pairs (start == end) paint the
/// first stop.
fn gradient_at(
    stops: &[Colour],
    start: Anchor,
    end: Anchor,
    bounds: SizePx,
    px: f32,
    py: f32,
) -> Colour {
    let (sx, sy) = start.resolve(bounds);
    let (ex, ey) = end.resolve(bounds);
    let dx = ex - sx;
    let dy = ey - sy;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return sample_gradient(stops, 0.0);
    }
    let t = ((px - sx) * dx + (py - sy) * dy) / len2;
    sample_gradient(stops, t)
}

// ============================================================================
// Glyph
// ============================================================================

fn paint_glyph(img: &mut RgbaImage, source: &GlyphSource, config: &CanvasConfig) {
    let tint = glyph::tint_for(config.palette.primary(), config.invert_glyph);
    let size = (config.bounds.min_dim() as f32 * GLYPH_SCALE) as u32;
    let Some(rendered) = glyph::render_glyph(source, size, tint) else {
        return;
    };

    let x = (img.width() as i32 - rendered.width() as i32) / 2;
    let y = (img.height() as i32 - rendered.height() as i32) / 2;
    glyph::composite_over(img, &rendered, x, y, GLYPH_OPACITY);
}

// ============================================================================
// Icon clip and shadow
// ============================================================================

/// Multiplies pixel alpha by the coverage of a rounded rectangle of
/// [`ICON_CLIP_SIZE`] centred in the canvas.
fn clip_rounded_rect(img: &mut RgbaImage, corner_radius: f32) {
    let half = ICON_CLIP_SIZE as f32 / 2.0;
    let r = corner_radius.clamp(0.0, half);
    let cx = img.width() as f32 / 2.0;
    let cy = img.height() as f32 / 2.0;

    for y in 0..img.height() {
        for x in 0..img.width() {
            let lx = (x as f32 + 0.5 - cx).abs() - (half - r);
            let ly = (y as f32 + 0.5 - cy).abs() - (half - r);
            let ox = lx.max(0.0);
            let oy = ly.max(0.0);
            let d = (ox * ox + oy * oy).sqrt() + lx.max(ly).min(0.0) - r;
            let cov = (0.5 - d).clamp(0.0, 1.0);
            if cov < 1.0 {
                let px = img.get_pixel_mut(x, y);
                px[3] = (px[3] as f32 * cov).round() as u8;
            }
        }
    }
}

/// Lays a blurred, offset silhouette of the composite under it.
fn apply_drop_shadow(img: &RgbaImage) -> RgbaImage {
    let w = img.width() as usize;
    let h = img.height() as usize;

    let alpha: Vec<f32> = img.pixels().map(|p| p[3] as f32 / 255.0).collect();
    let alpha = box_blur(&alpha, w, h, SHADOW_RADIUS, true);
    let alpha = box_blur(&alpha, w, h, SHADOW_RADIUS, false);

    let (ox, oy) = SHADOW_OFFSET;
    let mut out = RgbaImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let sx = x as i32 - ox;
            let sy = y as i32 - oy;
            let a = if sx >= 0 && sy >= 0 && (sx as usize) < w && (sy as usize) < h {
                alpha[sy as usize * w + sx as usize]
            } else {
                0.0
            };
            let shadow = (a * SHADOW_ALPHA * 255.0).round() as u8;
            out.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, shadow]));
        }
    }

    glyph::composite_over(&mut out, img, 0, 0, 1.0);
    out
}

fn box_blur(src: &[f32], w: usize, h: usize, radius: usize, horizontal: bool) -> Vec<f32> {
    let mut out = vec![0.0f32; src.len()];
    let norm = 1.0 / (2 * radius + 1) as f32;
    let r = radius as i32;

    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for k in -r..=r {
                let (sx, sy) = if horizontal {
                    (x as i32 + k, y as i32)
                } else {
                    (x as i32, y as i32 + k)
                };
                if sx >= 0 && sy >= 0 && (sx as usize) < w && (sy as usize) < h {
                    acc += src[sy as usize * w + sx as usize];
                }
            }
            out[y * w + x] = acc * norm;
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Mask, ShapeKind};
    use crate::rng::Pcg32;
    use palette::Srgb;

    fn test_palette() -> Palette {
        Palette::new(vec![
            Srgb::new(0.9, 0.2, 0.1),
            Srgb::new(0.1, 0.7, 0.3),
            Srgb::new(0.2, 0.2, 0.9),
        ])
    }

    #[test]
    fn render_is_deterministic() {
        let palette = test_palette();
        let mut rng = Pcg32::new(100);
        let config = CanvasConfig::wallpaper(palette.clone(), SizePx::new(64, 48));
        let mut stack = LayerStack::new();
        stack.regenerate(&palette, FillKind::Gradient, 3, config.bounds, &mut rng);

        let first = Canvas::render(&config, &stack).unwrap();
        let second = Canvas::render(&config, &stack).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn empty_palette_is_rejected() {
        let config = CanvasConfig::wallpaper(Palette::new(Vec::new()), SizePx::new(8, 8));
        let result = Canvas::render(&config, &LayerStack::new());
        assert!(matches!(result, Err(RenderError::EmptyPalette)));
    }

    #[test]
    fn background_modes_paint_expected_colours() {
        let palette = test_palette();
        let stack = LayerStack::new();
        let mut config = CanvasConfig::wallpaper(palette.clone(), SizePx::new(16, 16));

        config.background = BackgroundMode::Primary;
        let img = Canvas::render(&config, &stack).unwrap();
        assert_eq!(img.get_pixel(8, 8).0, colour::to_rgba8(palette.primary(), 1.0));

        config.background = BackgroundMode::White;
        let img = Canvas::render(&config, &stack).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);

        config.background = BackgroundMode::Black;
        let img = Canvas::render(&config, &stack).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn gradient_background_runs_top_to_bottom() {
        let palette = test_palette();
        let mut config = CanvasConfig::wallpaper(palette.clone(), SizePx::new(8, 64));
        config.background = BackgroundMode::PaletteGradient;

        let img = Canvas::render(&config, &LayerStack::new()).unwrap();
        let top = img.get_pixel(4, 0).0;
        let bottom = img.get_pixel(4, 63).0;
        assert_eq!(top, colour::to_rgba8(palette.colours()[0], 1.0));
        let expected = colour::to_rgba8(palette.colours()[2], 1.0);
        for ch in 0..3 {
            let diff = (i16::from(bottom[ch]) - i16::from(expected[ch])).abs();
            assert!(diff <= 1, "bottom row should land on the last stop, got {:?}", bottom);
        }
    }

    #[test]
    fn layer_opacity_blends_with_background() {
        let white = Palette::new(vec![Srgb::new(1.0, 1.0, 1.0)]);
        let mut rng = Pcg32::new(200);
        let mut config = CanvasConfig::wallpaper(white.clone(), SizePx::new(32, 32));
        config.background = BackgroundMode::Black;

        let mut stack = LayerStack::new();
        stack.regenerate(&white, FillKind::Solid, 1, config.bounds, &mut rng);
        for layer in stack.iter_mut() {
            layer.x = 16.0;
            layer.y = 16.0;
            layer.rotation = 0.0;
            layer.opacity = 0.5;
            layer.mask = Mask::new(ShapeKind::Rectangle, 100.0, 100.0);
        }

        let img = Canvas::render(&config, &stack).unwrap();
        let px = img.get_pixel(16, 16);
        assert!((120..=135).contains(&px[0]), "half-opacity white over black, got {:?}", px);
    }

    #[test]
    fn invisible_layers_are_skipped() {
        let palette = test_palette();
        let mut rng = Pcg32::new(300);
        let mut config = CanvasConfig::wallpaper(palette.clone(), SizePx::new(32, 32));
        config.background = BackgroundMode::Black;

        let mut stack = LayerStack::new();
        stack.regenerate(&palette, FillKind::Solid, 1, config.bounds, &mut rng);
        let id = stack.get(0).unwrap().id;
        stack.set_visible(id, false);

        let img = Canvas::render(&config, &stack).unwrap();
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn icon_mode_clips_corners() {
        let palette = test_palette();
        let mut config = CanvasConfig::icon(palette);
        config.background = BackgroundMode::White;

        let img = Canvas::render(&config, &LayerStack::new()).unwrap();
        assert_eq!(img.width(), ICON_CANVAS_SIZE);
        assert_eq!(img.height(), ICON_CANVAS_SIZE);

        // outside the inscribed clip: fully transparent (no shadow reaches
        // the top-left corner, which lies opposite the offset direction)
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        // centre stays opaque
        let c = img.get_pixel(ICON_CANVAS_SIZE / 2, ICON_CANVAS_SIZE / 2);
        assert_eq!(c.0, [255, 255, 255, 255]);
    }

    #[test]
    fn icon_mode_paints_glyph_for_contrast() {
        let black = Palette::new(vec![Srgb::new(0.0, 0.0, 0.0)]);
        let mut config = CanvasConfig::icon(black);
        config.background = BackgroundMode::Primary;
        config.glyph = Some(GlyphSource::named("star"));

        let img = Canvas::render(&config, &LayerStack::new()).unwrap();
        // dark primary chooses a light glyph at 0.8 opacity over black
        let c = img.get_pixel(ICON_CANVAS_SIZE / 2, ICON_CANVAS_SIZE / 2);
        assert!(c[0] > 150, "expected light glyph pixels at centre, got {:?}", c);
    }

    #[test]
    fn wallpaper_mode_spans_full_bounds() {
        let palette = test_palette();
        let config = CanvasConfig::wallpaper(palette, SizePx::new(120, 80));
        let img = Canvas::render(&config, &LayerStack::new()).unwrap();
        assert_eq!((img.width(), img.height()), (120, 80));
        // unclipped: corners keep full alpha
        assert_eq!(img.get_pixel(0, 0)[3], 255);
        assert_eq!(img.get_pixel(119, 79)[3], 255);
    }

    #[test]
    fn gradient_sampling_hits_stops() {
        let stops = [
            Srgb::new(1.0, 0.0, 0.0),
            Srgb::new(0.0, 1.0, 0.0),
            Srgb::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(sample_gradient(&stops, 0.0).red, 1.0);
        assert_eq!(sample_gradient(&stops, 0.5).green, 1.0);
        assert_eq!(sample_gradient(&stops, 1.0).blue, 1.0);
    }

    #[test]
    fn degenerate_anchor_pair_paints_first_stop() {
        let stops = [Srgb::new(1.0, 0.0, 0.0), Srgb::new(0.0, 0.0, 1.0)];
        let bounds = SizePx::new(100, 100);
        let c = gradient_at(&stops, Anchor::Top, Anchor::Top, bounds, 50.0, 99.0);
        assert_eq!(c.red, 1.0);
        assert_eq!(c.blue, 0.0);
    }

    #[test]
    fn gradient_follows_anchor_axis() {
        let stops = [Srgb::new(1.0, 0.0, 0.0), Srgb::new(0.0, 0.0, 1.0)];
        let bounds = SizePx::new(100, 100);
        let near_start = gradient_at(&stops, Anchor::Leading, Anchor::Trailing, bounds, 0.0, 50.0);
        let near_end = gradient_at(&stops, Anchor::Leading, Anchor::Trailing, bounds, 100.0, 50.0);
        assert!(near_start.red > 0.9);
        assert!(near_end.blue > 0.9);
    }
}
