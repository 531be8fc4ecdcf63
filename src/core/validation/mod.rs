//! Client-side form validation
//!
//! Forms are checked synchronously before submission. A failing form never
//! reaches the entity service: its errors come back grouped by field for
//! inline rendering.

pub mod filters;
pub mod forms;
pub mod validators;

pub use forms::{FormMode, FormModel, prepare};
pub use validators::{ImageUpload, validate_image, validate_phone};
