// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Photo upload model: type/size gate, decoding, and normalization to PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use crate::utils::format_bytes;

/// Longest edge kept after normalizing an upload.
const MAX_EDGE: u32 = 1024;

/// Accepted profile photo, re-encoded as PNG so every renderer can embed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo {
    /// Original file name, for display only.
    pub file_name: String,
    /// MIME type reported for the original upload.
    pub mime: String,
    pub width: u32,
    pub height: u32,
    /// Encoded once on acceptance; the card embeds it on every render.
    data_uri: Arc<str>,
}

impl Photo {
    pub fn new(file_name: String, mime: String, width: u32, height: u32, png: &[u8]) -> Self {
        let data_uri = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        );
        Self {
            file_name,
            mime,
            width,
            height,
            data_uri: data_uri.into(),
        }
    }

    /// `data:` URI suitable for an SVG `<image href>`.
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Reasons an upload is refused. The form state is never touched when one is returned.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload an image file (got {mime}).")]
    NotAnImage { mime: String },
    #[error("Image size should be less than {} (file is {}).", format_bytes(*.limit), format_bytes(*.size))]
    TooLarge { size: u64, limit: u64 },
    #[error("The selected file could not be read as an image: {0}")]
    Undecodable(String),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Check MIME type and size before any bytes are read.
///
/// Files exactly at `limit` are accepted.
pub fn check_upload(mime: &str, size: u64, limit: u64) -> Result<(), UploadError> {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if !essence.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            mime: mime.to_string(),
        });
    }
    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }
    Ok(())
}

/// Validate and decode an in-memory upload into a [`Photo`].
pub fn accept_upload(
    file_name: &str,
    mime: &str,
    bytes: &[u8],
    limit: u64,
) -> Result<Photo, UploadError> {
    check_upload(mime, bytes.len() as u64, limit)?;
    let decoded =
        image::load_from_memory(bytes).map_err(|e| UploadError::Undecodable(e.to_string()))?;
    let normalized = shrink_to_fit(decoded);
    let png = encode_png(&normalized)?;
    Ok(Photo::new(
        file_name.to_string(),
        mime.to_string(),
        normalized.width(),
        normalized.height(),
        &png,
    ))
}

/// Load a user-selected file from disk, gating on type and size before reading it.
pub fn load_photo(path: &Path, limit: u64) -> Result<Photo, UploadError> {
    let mime = guess_mime(path);
    let size = path
        .metadata()
        .map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    check_upload(&mime, size, limit)?;

    let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    accept_upload(&file_name, &mime, &bytes, limit)
}

/// MIME type guessed from the file extension.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn shrink_to_fit(img: DynamicImage) -> DynamicImage {
    if img.width() > MAX_EDGE || img.height() > MAX_EDGE {
        img.thumbnail(MAX_EDGE, MAX_EDGE)
    } else {
        img
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, UploadError> {
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let mut buf = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| UploadError::Undecodable(e.to_string()))?;
    Ok(buf)
}
