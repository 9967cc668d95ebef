//! Error types for rendering and export.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while compositing a canvas.
///
/// These are precondition violations: the surrounding shell is expected to
/// prevent them, and the core fails fast instead of guessing intent.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The palette passed to the compositor contained no colours.
    #[error("palette must contain at least one colour")]
    EmptyPalette,
}

/// Errors raised while exporting rasterized images.
///
/// A failure to create the per-export output directory aborts the whole
/// export (there is nowhere to write into). Per-file encoding failures are
/// NOT represented here: they are reported and skipped so the remaining
/// sizes still get written.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The per-export output directory could not be created.
    #[error("could not create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
