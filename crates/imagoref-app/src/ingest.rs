//! Image file ingestion.
//!
//! Decodes files into RGBA bitmaps for the canvas. The core never sees bytes.

use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions accepted for dropping, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Ingestion errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Canvas(#[from] imagoref_core::IngestError),
}

/// Check the extension against [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<RgbaImage, IngestError> {
    if !is_supported(path) {
        return Err(IngestError::UnsupportedFormat(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|e| IngestError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| IngestError::Decode(format!("Failed to decode {}: {}", path.display(), e)))?;
    log::debug!("Decoded {} ({}x{})", path.display(), decoded.width(), decoded.height());
    Ok(decoded.to_rgba8())
}
