//! layerscape: procedural layered icon and wallpaper composer
//!
//! This crate generates randomized layered graphics from a small colour
//! palette, composites them into a single RGBA surface, and exports the
//! result as PNG files at multiple resolutions.
//!
//! The pipeline: a [`Palette`] seeds the visual variety, a [`LayerStack`]
//! regenerates randomized shape-masked [`Layer`]s, [`Canvas`] composites
//! background, layers, and an optional foreground glyph, and [`Exporter`]
//! rasterizes the result at each target resolution.
//!
//! # Example
//!
//! ```
//! use layerscape::{Canvas, CanvasConfig, FillKind, LayerStack, Palette, Pcg32};
//!
//! let mut rng = Pcg32::new(7);
//! let palette = Palette::random(&mut rng);
//!
//! let config = CanvasConfig::icon(palette.clone());
//! let mut stack = LayerStack::new();
//! stack.regenerate(&palette, FillKind::Gradient, 3, config.bounds, &mut rng);
//!
//! let surface = Canvas::render(&config, &stack).unwrap();
//! assert_eq!(surface.width(), layerscape::ICON_CANVAS_SIZE);
//! ```
//!
//! # Exporting
//!
//! ```no_run
//! use std::path::Path;
//! use layerscape::{Canvas, CanvasConfig, Exporter, ExportJob, LayerStack, Palette, Pcg32};
//!
//! let mut rng = Pcg32::from_entropy();
//! let palette = Palette::random(&mut rng);
//! let config = CanvasConfig::icon(palette);
//!
//! let surface = Canvas::render(&config, &LayerStack::new()).unwrap();
//! let job = ExportJob::icon(Path::new("out"), &mut rng);
//! let written = Exporter::export(&surface, &job).unwrap();
//! assert_eq!(written.len(), 7);
//! ```
//!
//! Rendering is deterministic: the same palette, stack, and config produce
//! pixel-identical output, and every randomized operation draws from an
//! injectable [`Pcg32`] so callers control reproducibility.

mod canvas;
mod colour;
mod error;
mod export;
mod geom;
mod glyph;
mod host;
mod layer;
mod profile;
mod rng;

pub use canvas::{
    BackgroundMode, Canvas, CanvasConfig, CanvasMode, DEFAULT_CORNER_RADIUS, ICON_CANVAS_SIZE,
    ICON_CLIP_SIZE,
};
pub use colour::{is_bright, luma, to_rgba8, Colour, Palette};
pub use error::{ExportError, RenderError};
pub use export::{ExportJob, Exporter, ICON_SIZES};
pub use geom::{Anchor, SizePx};
pub use glyph::{render_glyph, tint_for, GlyphSource, GlyphTint};
pub use host::{install_wallpaper, ScreenGeometry, WallpaperSetter};
pub use layer::{Fill, FillKind, Layer, LayerId, LayerStack, Mask, ShapeKind};
pub use profile::{
    CompositionProfile, SerializableBackground, SerializableFillKind, SerializableGlyph,
    SerializableMode,
};
pub use rng::Pcg32;
