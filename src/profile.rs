//! Serializable composition profile for cross-process communication.
//!
//! A [`CompositionProfile`] captures the full canvas configuration in a
//! format that can be serialized to JSON and sent between a frontend shell
//! and the rendering core, or stashed by the shell between sessions. Layer
//! geometry is deliberately not serialized: stacks are regenerated, not
//! persisted.
//!
//! # Example
//!
//! ```
//! use layerscape::{CompositionProfile, CanvasConfig, Palette, Pcg32};
//!
//! let mut rng = Pcg32::new(1);
//! let config = CanvasConfig::icon(Palette::random(&mut rng));
//!
//! let profile = CompositionProfile::from_config(&config);
//! let json = profile.to_json().unwrap();
//!
//! let restored = CompositionProfile::from_json(&json).unwrap();
//! let config_again = restored.into_config();
//! assert_eq!(config_again.bounds, config.bounds);
//! ```

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::canvas::{BackgroundMode, CanvasConfig, CanvasMode};
use crate::colour::Palette;
use crate::geom::SizePx;
use crate::glyph::GlyphSource;
use crate::layer::FillKind;

// ============================================================================
// Serializable glyph source
// ============================================================================

/// Serializable representation of a glyph source.
///
/// Serializes to a flat structure with either a `name` or a `svgData`
/// field:
///
/// ```json
/// { "name": "star" }
/// // or
/// { "svgData": "<svg>...</svg>" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SerializableGlyph {
    /// Catalog identifier (mutually exclusive with `svg_data`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw SVG markup (mutually exclusive with `name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg_data: Option<String>,
}

impl From<&GlyphSource> for SerializableGlyph {
    fn from(source: &GlyphSource) -> Self {
        match source {
            GlyphSource::Named(name) => Self {
                name: Some(name.clone()),
                svg_data: None,
            },
            GlyphSource::Raw(svg) => Self {
                name: None,
                svg_data: Some(svg.clone()),
            },
        }
    }
}

impl From<SerializableGlyph> for GlyphSource {
    fn from(glyph: SerializableGlyph) -> Self {
        if let Some(name) = glyph.name {
            GlyphSource::Named(name)
        } else if let Some(svg) = glyph.svg_data {
            GlyphSource::Raw(svg)
        } else {
            GlyphSource::Raw(String::new())
        }
    }
}

// ============================================================================
// Serializable enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializableFillKind {
    Gradient,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializableBackground {
    Primary,
    White,
    Black,
    PaletteGradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializableMode {
    Icon,
    Wallpaper,
}

impl From<FillKind> for SerializableFillKind {
    fn from(kind: FillKind) -> Self {
        match kind {
            FillKind::Gradient => Self::Gradient,
            FillKind::Solid => Self::Solid,
        }
    }
}

impl From<SerializableFillKind> for FillKind {
    fn from(kind: SerializableFillKind) -> Self {
        match kind {
            SerializableFillKind::Gradient => Self::Gradient,
            SerializableFillKind::Solid => Self::Solid,
        }
    }
}

impl From<BackgroundMode> for SerializableBackground {
    fn from(mode: BackgroundMode) -> Self {
        match mode {
            BackgroundMode::Primary => Self::Primary,
            BackgroundMode::White => Self::White,
            BackgroundMode::Black => Self::Black,
            BackgroundMode::PaletteGradient => Self::PaletteGradient,
        }
    }
}

impl From<SerializableBackground> for BackgroundMode {
    fn from(mode: SerializableBackground) -> Self {
        match mode {
            SerializableBackground::Primary => Self::Primary,
            SerializableBackground::White => Self::White,
            SerializableBackground::Black => Self::Black,
            SerializableBackground::PaletteGradient => Self::PaletteGradient,
        }
    }
}

impl From<CanvasMode> for SerializableMode {
    fn from(mode: CanvasMode) -> Self {
        match mode {
            CanvasMode::Icon => Self::Icon,
            CanvasMode::Wallpaper => Self::Wallpaper,
        }
    }
}

impl From<SerializableMode> for CanvasMode {
    fn from(mode: SerializableMode) -> Self {
        match mode {
            SerializableMode::Icon => Self::Icon,
            SerializableMode::Wallpaper => Self::Wallpaper,
        }
    }
}

// ============================================================================
// CompositionProfile
// ============================================================================

/// Serializable snapshot of a [`CanvasConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionProfile {
    /// Palette colours as `[r, g, b]` triples in `[0, 1]`.
    pub colours: Vec<[f32; 3]>,
    pub layer_count: usize,
    pub fill_kind: SerializableFillKind,
    pub background: SerializableBackground,
    pub corner_radius: f32,
    pub mode: SerializableMode,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glyph: Option<SerializableGlyph>,
    #[serde(default)]
    pub invert_glyph: bool,
}

impl CompositionProfile {
    /// Captures the current canvas configuration.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            colours: config
                .palette
                .colours()
                .iter()
                .map(|c| [c.red, c.green, c.blue])
                .collect(),
            layer_count: config.layer_count,
            fill_kind: config.fill_kind.into(),
            background: config.background.into(),
            corner_radius: config.corner_radius,
            mode: config.mode.into(),
            width: config.bounds.width,
            height: config.bounds.height,
            glyph: config.glyph.as_ref().map(SerializableGlyph::from),
            invert_glyph: config.invert_glyph,
        }
    }

    /// Rebuilds a canvas configuration from this profile.
    pub fn into_config(self) -> CanvasConfig {
        CanvasConfig {
            palette: Palette::new(
                self.colours
                    .iter()
                    .map(|[r, g, b]| Srgb::new(*r, *g, *b))
                    .collect(),
            ),
            layer_count: self.layer_count,
            fill_kind: self.fill_kind.into(),
            background: self.background.into(),
            corner_radius: self.corner_radius,
            mode: self.mode.into(),
            bounds: SizePx::new(self.width, self.height),
            glyph: self.glyph.map(GlyphSource::from),
            invert_glyph: self.invert_glyph,
        }
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserializes from a JSON string.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Pcg32;

    #[test]
    fn json_round_trip_preserves_profile() {
        let mut rng = Pcg32::new(12);
        let mut config = CanvasConfig::icon(Palette::random(&mut rng));
        config.layer_count = 42;
        config.glyph = Some(GlyphSource::named("bolt"));
        config.invert_glyph = true;

        let profile = CompositionProfile::from_config(&config);
        let json = profile.to_json().unwrap();
        let restored = CompositionProfile::from_json(&json).unwrap();
        assert_eq!(profile, restored);
    }

    #[test]
    fn profile_serializes_camel_case() {
        let mut rng = Pcg32::new(13);
        let config = CanvasConfig::icon(Palette::random(&mut rng));
        let json = CompositionProfile::from_config(&config).to_json().unwrap();

        assert!(json.contains("\"layerCount\""));
        assert!(json.contains("\"fillKind\""));
        assert!(json.contains("\"cornerRadius\""));
        // no glyph set: key omitted entirely
        assert!(!json.contains("\"glyph\""));
    }

    #[test]
    fn config_round_trip_preserves_fields() {
        let mut rng = Pcg32::new(14);
        let mut config = CanvasConfig::wallpaper(Palette::random(&mut rng), SizePx::new(2560, 1440));
        config.background = BackgroundMode::PaletteGradient;
        config.fill_kind = FillKind::Solid;

        let rebuilt = CompositionProfile::from_config(&config).into_config();
        assert_eq!(rebuilt.bounds, config.bounds);
        assert_eq!(rebuilt.mode, config.mode);
        assert_eq!(rebuilt.background, config.background);
        assert_eq!(rebuilt.fill_kind, config.fill_kind);
        assert_eq!(rebuilt.palette.len(), config.palette.len());
    }

    #[test]
    fn glyph_source_survives_both_forms() {
        let named: GlyphSource = SerializableGlyph::from(&GlyphSource::named("star")).into();
        assert_eq!(named, GlyphSource::named("star"));

        let raw: GlyphSource = SerializableGlyph::from(&GlyphSource::raw("<svg/>")).into();
        assert_eq!(raw, GlyphSource::raw("<svg/>"));
    }
}
