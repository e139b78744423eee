//! UFO file I/O operations

use crate::core::errors::SourceError;
use norad::Font;
use std::path::Path;
use tracing::debug;

/// A UFO is a directory carrying a `metainfo.plist`
pub fn is_ufo_directory(path: &Path) -> bool {
    path.is_dir() && path.join("metainfo.plist").is_file()
}

/// Load a UFO font from disk
pub fn load_ufo_from_path(path: impl AsRef<Path>) -> Result<Font, SourceError> {
    let path = path.as_ref();
    let font = Font::load(path)?;
    debug!(
        "Loaded UFO {:?} with {} glyphs in the default layer",
        path,
        font.default_layer().len()
    );
    Ok(font)
}

/// Write a UFO font to disk, replacing any existing directory
pub fn save_ufo_to_path(font: &Font, path: impl AsRef<Path>) -> Result<(), SourceError> {
    let path = path.as_ref();
    font.save(path)?;
    debug!("Saved UFO {:?}", path);
    Ok(())
}
