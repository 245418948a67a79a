//! Photo attachment constraints.
//!
//! Every project carries at most [`MAX_PHOTOS_PER_PROJECT`] photos. Files
//! are checked before any byte reaches the object store: declared content
//! type, size cap, and the actual magic bytes must all agree. A batch that
//! would exceed the cap is rejected whole, never partially appended.

use image::ImageFormat;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of photos a single project may carry.
pub const MAX_PHOTOS_PER_PROJECT: usize = 5;

/// Maximum size of a single uploaded photo (2 MiB).
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

/// Content types accepted for photo uploads.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a single uploaded file: content type, size, and magic bytes.
pub fn validate_photo_file(
    filename: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<(), CoreError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(CoreError::Validation(format!(
            "File '{filename}' has unsupported type '{content_type}'. \
             Allowed: image/jpeg, image/png, image/webp"
        )));
    }

    if bytes.is_empty() {
        return Err(CoreError::Validation(format!("File '{filename}' is empty")));
    }

    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(CoreError::Validation(format!(
            "File '{filename}' exceeds the {} MB size limit",
            MAX_PHOTO_BYTES / (1024 * 1024)
        )));
    }

    // The declared type is client-controlled; the header bytes are not.
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP) => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "File '{filename}' is not a recognized JPEG, PNG, or WebP image"
        ))),
    }
}

/// Reject a batch outright when it would push a project past the photo cap.
pub fn validate_batch_capacity(existing: usize, incoming: usize) -> Result<(), CoreError> {
    if incoming == 0 {
        return Err(CoreError::Validation("No photo files provided".into()));
    }
    if existing + incoming > MAX_PHOTOS_PER_PROJECT {
        return Err(CoreError::Validation(format!(
            "Photo limit exceeded: {existing} stored + {incoming} new would pass \
             the {MAX_PHOTOS_PER_PROJECT}-photo cap"
        )));
    }
    Ok(())
}

/// File extension used in generated storage keys for a content type.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}
