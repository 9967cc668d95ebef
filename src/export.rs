//! Multi-resolution raster export.
//!
//! An [`ExportJob`] describes one export: the mode, the freshly named
//! output directory, and the list of target resolutions. [`Exporter`]
//! consumes it synchronously, resizing the rendered surface once per target
//! and writing one PNG per resolution.
//!
//! Export is best-effort per file: a failed write is reported and skipped
//! so the remaining sizes still land on disk. Only a failure to create the
//! output directory aborts the export, since there is nowhere to write.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::canvas::CanvasMode;
use crate::error::ExportError;
use crate::geom::SizePx;
use crate::rng::Pcg32;

/// The fixed icon target sizes, largest first. Every icon export writes
/// exactly one square PNG per entry.
pub const ICON_SIZES: [u32; 7] = [1024, 512, 256, 128, 64, 32, 16];

const TOKEN_MIN: u32 = 99_999;
const TOKEN_MAX: u32 = 9_999_999;

// ============================================================================
// ExportJob
// ============================================================================

/// A single export operation: created on a save action, consumed
/// synchronously, discarded after the files are written.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub mode: CanvasMode,
    /// The per-export leaf directory. Its name embeds a random numeric
    /// token so repeated saves never collide.
    pub out_dir: PathBuf,
    pub targets: Vec<SizePx>,
}

impl ExportJob {
    /// An icon export into `root`, targeting the seven fixed sizes.
    pub fn icon(root: &Path, rng: &mut Pcg32) -> Self {
        Self::with_targets(
            CanvasMode::Icon,
            root,
            ICON_SIZES.iter().map(|&s| SizePx::square(s)).collect(),
            rng,
        )
    }

    /// A wallpaper export into `root`, targeting the detected screen
    /// resolution.
    pub fn wallpaper(root: &Path, screen: SizePx, rng: &mut Pcg32) -> Self {
        Self::with_targets(CanvasMode::Wallpaper, root, vec![screen], rng)
    }

    fn with_targets(mode: CanvasMode, root: &Path, targets: Vec<SizePx>, rng: &mut Pcg32) -> Self {
        let token = rng.range_u32(TOKEN_MIN, TOKEN_MAX);
        let out_dir = root.join(format!("export-{}-{}", mode.tag(), token));
        Self { mode, out_dir, targets }
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Rasterizes a rendered canvas at each of a job's target resolutions.
pub struct Exporter;

impl Exporter {
    /// Creates the job's output directory and writes one PNG per target.
    ///
    /// The shared parent is created with intermediate directories,
    /// tolerating "already exists"; the leaf directory is expected to be
    /// fresh (its name carries the collision-avoiding token). A failure to
    /// create either aborts the export. Returns the paths actually
    /// written, which may be fewer than the targets if individual encodes
    /// fail.
    pub fn export(surface: &RgbaImage, job: &ExportJob) -> Result<Vec<PathBuf>, ExportError> {
        if let Some(parent) = job.out_dir.parent() {
            fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::create_dir(&job.out_dir).map_err(|source| ExportError::CreateDir {
            path: job.out_dir.clone(),
            source,
        })?;

        Ok(Self::write_targets(surface, job))
    }

    /// Writes each target into the job's (existing) output directory.
    ///
    /// Files are named `{height}x{width}.png`. A write failure for one
    /// size is reported and does not prevent the remaining sizes from
    /// being attempted.
    pub fn write_targets(surface: &RgbaImage, job: &ExportJob) -> Vec<PathBuf> {
        let mut written = Vec::with_capacity(job.targets.len());

        for target in &job.targets {
            let resized =
                imageops::resize(surface, target.width, target.height, FilterType::Lanczos3);
            let path = job
                .out_dir
                .join(format!("{}x{}.png", target.height, target.width));

            match resized.save(&path) {
                Ok(()) => written.push(path),
                Err(err) => {
                    eprintln!("failed to write {}: {}", path.display(), err);
                }
            }
        }

        written
    }
}

// ============================================================================
// Tests
// ============================================================================
