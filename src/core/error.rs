//! Typed error handling for storedesk
//!
//! Every failure a list screen can run into is scoped to the triggering
//! action: it is caught, turned into a [`Notice`] and discarded. The types
//! here keep enough structure for callers that want to match on specific
//! cases instead of showing a toast.
//!
//! # Error Categories
//!
//! - [`FetchError`]: network, HTTP status and decoding failures of the entity fetcher
//! - [`AuthError`]: missing or rejected session token
//! - [`ValidationError`]: client-side form validation
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ExportError`]: CSV / workbook / print serialization
//! - [`StorageError`]: local stores (token file, in-memory services)
//!
//! # Example
//!
//! ```rust,ignore
//! match screen.delete("42").await {
//!     Ok(()) => {}
//!     Err(DashboardError::Auth(AuthError::Unauthorized)) => redirect_to_login(),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use crate::core::notice::{Notice, NoticeDurations};
use reqwest::StatusCode;
use std::collections::BTreeMap;
use thiserror::Error;

/// Convenience alias used across the crate
pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

/// The main error type for storedesk
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Entity fetcher errors (list/get/create/update/delete)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Session / token errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Client-side validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Export errors
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Local storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// HTTP status associated with this error, when there is one
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            DashboardError::Fetch(e) => e.status_code(),
            DashboardError::Auth(AuthError::Unauthorized) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    /// Error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DashboardError::Fetch(e) => e.error_code(),
            DashboardError::Auth(e) => e.error_code(),
            DashboardError::Validation(_) => "VALIDATION_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::Export(_) => "EXPORT_ERROR",
            DashboardError::Storage(_) => "STORAGE_ERROR",
            DashboardError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the session must be dropped and the user sent to the login view
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            DashboardError::Auth(AuthError::Unauthorized | AuthError::MissingToken)
        )
    }

    /// Field errors for inline rendering, if this is a validation failure
    pub fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        match self {
            DashboardError::Validation(e) => Some(e.by_field()),
            _ => None,
        }
    }

    /// Convert to an error toast
    pub fn to_notice(&self, durations: &NoticeDurations) -> Notice {
        Notice::error(self.to_string(), durations)
    }
}

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors raised by entity fetchers
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("Network error while calling {url}: {message}")]
    Network { url: String, message: String },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded into records
    #[error("Failed to decode {entity_type}: {message}")]
    Decode {
        entity_type: String,
        message: String,
    },

    /// A record was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },
}

impl FetchError {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => StatusCode::from_u16(*status).ok(),
            FetchError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Network { .. } => "NETWORK_ERROR",
            FetchError::Status { .. } => "HTTP_ERROR",
            FetchError::Decode { .. } => "DECODE_ERROR",
            FetchError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to the session token
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token is stored; protected views must redirect to login
    #[error("Not signed in")]
    MissingToken,

    /// The backend rejected the token (401); the token has been cleared
    #[error("Session expired, please sign in again")]
    Unauthorized,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::Unauthorized => "UNAUTHORIZED",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to client-side validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation failed for '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation failed for {} field(s)", .0.len())]
    FieldErrors(BTreeMap<String, Vec<String>>),
}

impl ValidationError {
    /// Messages grouped by field
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            ValidationError::FieldError { field, message } => {
                BTreeMap::from([(field.clone(), vec![message.clone()])])
            }
            ValidationError::FieldErrors(errors) => errors.clone(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut by_field: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, field_errors) in errors.field_errors() {
            let messages = field_errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code))
                })
                .collect();
            by_field.insert(field.to_string(), messages);
        }
        ValidationError::FieldErrors(by_field)
    }
}

impl From<validator::ValidationErrors> for DashboardError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DashboardError::Validation(errors.into())
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors raised while serializing rows for download or print
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(String),

    #[error("Workbook export failed: {0}")]
    Workbook(String),

    #[error("Print rendering failed: {0}")]
    Template(String),

    #[error("Failed to write export file: {0}")]
    Io(String),
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to local stores
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to acquire lock: {0}")]
    Lock(String),

    #[error("Token storage error: {0}")]
    Token(String),
}

// =============================================================================
// Conversions from common error types
// =============================================================================

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Fetch(FetchError::Decode {
            entity_type: "json".to_string(),
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Storage(StorageError::Token(err.to_string()))
    }
}

impl From<serde_yaml::Error> for DashboardError {
    fn from(err: serde_yaml::Error) -> Self {
        DashboardError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_decode() {
            DashboardError::Fetch(FetchError::Decode {
                entity_type: url,
                message: err.to_string(),
            })
        } else {
            DashboardError::Fetch(FetchError::Network {
                url,
                message: err.to_string(),
            })
        }
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to DashboardError first
        match err.downcast::<DashboardError>() {
            Ok(e) => e,
            Err(err) => DashboardError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notice::NoticeLevel;

    #[test]
    fn test_status_error_display_is_backend_message() {
        let err = DashboardError::Fetch(FetchError::Status {
            status: 422,
            message: "Telefon raqami band".to_string(),
        });
        assert_eq!(err.to_string(), "Telefon raqami band");
        assert_eq!(err.status_code(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(err.error_code(), "HTTP_ERROR");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = DashboardError::Fetch(FetchError::NotFound {
            entity_type: "order".to_string(),
            id: "17".to_string(),
        });
        assert_eq!(err.status_code(), Some(StatusCode::NOT_FOUND));
        assert!(err.to_string().contains("'17'"));
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(DashboardError::Auth(AuthError::Unauthorized).is_unauthorized());
        assert!(DashboardError::Auth(AuthError::MissingToken).is_unauthorized());
        assert!(!DashboardError::Internal("x".into()).is_unauthorized());
    }

    #[test]
    fn test_validation_error_groups_fields() {
        let err = DashboardError::Validation(ValidationError::FieldError {
            field: "phone".to_string(),
            message: "bad format".to_string(),
        });
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["phone"], vec!["bad format".to_string()]);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_to_notice_uses_error_duration() {
        let durations = NoticeDurations::default();
        let notice = DashboardError::Internal("boom".into()).to_notice(&durations);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.duration, durations.error());
        assert!(notice.message.contains("boom"));
    }

    #[test]
    fn test_anyhow_roundtrip_keeps_variant() {
        let original = DashboardError::Auth(AuthError::Unauthorized);
        let wrapped: anyhow::Error = original.into();
        let back: DashboardError = wrapped.into();
        assert!(matches!(back, DashboardError::Auth(AuthError::Unauthorized)));
    }

    #[test]
    fn test_config_parse_error_mentions_file() {
        let err = ConfigError::ParseError {
            file: Some("dashboard.yaml".into()),
            message: "bad indent".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'dashboard.yaml': bad indent"
        );
    }
}
