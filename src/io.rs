//! I/O helpers for the demo tool.
//!
//! - `read_image_size`: dimensions of a PNG/JPEG on disk without decoding it.
//! - `write_json_file`: pretty-print a serializable value to disk.
use crate::geometry::ImageSize;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Reads the image header at `path` and returns its size.
pub fn read_image_size(path: &Path) -> Result<ImageSize, String> {
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| format!("Failed to read image header {}: {e}", path.display()))?;
    Ok(ImageSize::new(width as usize, height as usize))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
