//! Form model trait and submission preparation

use crate::core::error::ValidationError;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

/// Whether a form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// A modal form backed by a `#[derive(Validate)]` struct
pub trait FormModel: Validate {
    /// Apply input filters (trimming, separator stripping, rounding)
    fn normalize(&mut self);

    /// Run the derived rules plus any cross-field rules
    fn check(&self) -> Result<(), ValidationErrors> {
        self.validate()
    }

    /// JSON payload for the entity service, using local field names
    fn to_payload(&self) -> Value;
}

/// Normalize and validate a form, returning the payload to submit
///
/// Nothing is sent when this fails; the error carries messages per field.
pub fn prepare<F: FormModel>(form: &mut F) -> Result<Value, ValidationError> {
    form.normalize();
    form.check()?;
    Ok(form.to_payload())
}

/// Add an error to a (possibly empty) error set
pub(crate) fn push_error(
    result: Result<(), ValidationErrors>,
    field: &'static str,
    error: validator::ValidationError,
) -> Result<(), ValidationErrors> {
    let mut errors = match result {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };
    errors.add(field, error);
    Err(errors)
}
