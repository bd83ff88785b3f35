//! Input adapters that turn raw user input into form values.
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokio::fs;

use crate::encoding::{parse_data_url, to_data_url};
use crate::model::ImageSource;

/// Read a local image and encode it the way a file input would.
pub async fn image_from_file<P: AsRef<Path>>(file_path: P) -> Result<ImageSource> {
    let file_path = file_path.as_ref();
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("invalid file name"))?;
    let bytes = fs::read(file_path)
        .await
        .with_context(|| format!("failed to read file: {}", file_path.display()))?;
    Ok(ImageSource::DataUrl(to_data_url(
        content_type(file_path),
        file_name,
        &bytes,
    )))
}

pub fn content_type(file_path: &Path) -> &'static str {
    match file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        Some(ext) if ext == "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Short human label for the image field.
pub fn image_preview(image: &ImageSource) -> String {
    match image {
        ImageSource::None => "no image".to_string(),
        ImageSource::Existing(path) => format!("current image: {path}"),
        ImageSource::DataUrl(url) => match parse_data_url(url) {
            Ok(data) => format!(
                "{} ({}, {} bytes)",
                data.file_name.as_deref().unwrap_or("image"),
                data.mime,
                data.bytes.len()
            ),
            Err(_) => "unreadable image".to_string(),
        },
    }
}

/// Join loose tag words into the `#a, #b` form the tags field expects.
pub fn tags_from_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| w.as_ref().trim())
        .filter(|w| !w.is_empty() && *w != "#")
        .map(|w| {
            if w.starts_with('#') {
                w.to_string()
            } else {
                format!("#{w}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
