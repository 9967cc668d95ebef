//! Seams to the host environment.
//!
//! The core never talks to the OS directly for screen geometry or desktop
//! backgrounds; the shell implements these traits and passes them in per
//! operation. Nothing here is process-wide state.

use std::io;
use std::path::Path;

use crate::geom::SizePx;

/// Supplies the current display resolution.
///
/// Queried once when switching into wallpaper mode; the result becomes the
/// wallpaper canvas bounds.
pub trait ScreenGeometry {
    /// The main display's resolution, or `None` if it cannot be
    /// determined.
    fn screen_size(&self) -> Option<SizePx>;
}

/// Installs a written image file as the desktop background.
pub trait WallpaperSetter {
    fn set_wallpaper(&self, path: &Path) -> io::Result<()>;
}

/// Installs `path` as the desktop background, reporting failure instead of
/// propagating it. Returns whether the installation succeeded.
pub fn install_wallpaper(setter: &dyn WallpaperSetter, path: &Path) -> bool {
    match setter.set_wallpaper(path) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("unable to set desktop background: {}", err);
            false
        }
    }
}
