//! Custom field validators
//!
//! Plugged into `#[derive(Validate)]` forms with
//! `#[validate(custom(function = "..."))]`.

use crate::core::field::is_valid_phone;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::ValidationError;

/// Largest accepted image upload
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted image content types
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Metadata of a file picked for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

pub(crate) fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validator: phone must be `+998` followed by nine digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(error(
            "phone",
            "Phone number must look like +998XXXXXXXXX",
        ))
    }
}

/// Validator: image type and size
pub fn validate_image(image: &ImageUpload) -> Result<(), ValidationError> {
    if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
        return Err(error(
            "image_type",
            format!(
                "Only JPEG, PNG or WebP images are allowed (got {})",
                image.content_type
            ),
        ));
    }
    if image.size_bytes > MAX_IMAGE_BYTES {
        return Err(error(
            "image_size",
            format!(
                "Image must not exceed {} MB",
                MAX_IMAGE_BYTES / (1024 * 1024)
            ),
        ));
    }
    Ok(())
}
