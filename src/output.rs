//! Saving generated images to disk.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::data_uri::DataUri;
use crate::error::GenerationError;
use crate::params::{format_extension, format_for_mime};

/// Longest prompt fragment kept in an auto-generated filename.
const SLUG_LEN: usize = 40;

/// Build a download name like `neongen-neon-robot-1760870400.png`.
#[must_use]
pub fn auto_filename(prompt: &str, format: &str) -> String {
    let slug = slugify(prompt, SLUG_LEN);
    let ext = format_extension(format);
    let ts = Utc::now().timestamp();
    if slug.is_empty() {
        format!("neongen-{ts}.{ext}")
    } else {
        format!("neongen-{slug}-{ts}.{ext}")
    }
}

/// Lowercase ASCII words of `input` joined by hyphens, cut at `max_len`.
#[must_use]
pub fn slugify(input: &str, max_len: usize) -> String {
    let mut slug = String::new();
    for word in input.split(|c: char| !c.is_ascii_alphanumeric()).filter(|w| !w.is_empty()) {
        let sep = usize::from(!slug.is_empty());
        if slug.len() + sep + word.len() > max_len {
            if slug.is_empty() {
                slug.extend(word.chars().take(max_len).map(|c| c.to_ascii_lowercase()));
            }
            break;
        }
        if sep == 1 {
            slug.push('-');
        }
        slug.extend(word.chars().map(|c| c.to_ascii_lowercase()));
    }
    slug
}

/// Format the saved file should have: the requested one, else the image's own.
#[must_use]
pub fn target_format<'a>(requested: Option<&'a str>, image: &DataUri) -> &'a str {
    requested.or_else(|| format_for_mime(image.mime_type())).unwrap_or("png")
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, prompt: &str, format: &str) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(auto_filename(prompt, format)), PathBuf::from)
}

/// Decode a generated image and write it, converting if the format differs.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64, conversion fails, or
/// the file cannot be written.
pub fn save_image(image: &DataUri, format: &str, path: &Path) -> Result<(), GenerationError> {
    let bytes = image
        .decode()
        .map_err(|e| GenerationError::ImageConversion(format!("Invalid base64 payload: {e}")))?;

    if format_for_mime(image.mime_type()) == Some(format) {
        std::fs::write(path, bytes)?;
        return Ok(());
    }

    tracing::debug!(from = image.mime_type(), to = format, "converting image");
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| GenerationError::ImageConversion(format!("Failed to decode image: {e}")))?;
    let image_format = match format {
        "jpeg" => image::ImageFormat::Jpeg,
        "png" => image::ImageFormat::Png,
        "webp" => image::ImageFormat::WebP,
        other => {
            return Err(GenerationError::ImageConversion(format!("Unsupported format: {other}")));
        }
    };
    let decoded = if image_format == image::ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(decoded.to_rgb8())
    } else {
        decoded
    };
    decoded
        .save_with_format(path, image_format)
        .map_err(|e| GenerationError::ImageConversion(format!("Failed to save as {format}: {e}")))
}
