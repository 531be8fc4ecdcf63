//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors map to the right HTTP status and error code
//! - Display strings are what the error toasts show
//! - Error conversions work correctly
//! - Error matching allows screens to handle specific cases

use reqwest::StatusCode;
use storedesk::core::error::StorageError;
use storedesk::prelude::*;
use validator::Validate;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_not_found_returns_404() {
        let err = DashboardError::Fetch(FetchError::NotFound {
            entity_type: "order".to_string(),
            id: "42".to_string(),
        });
        assert_eq!(err.status_code(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_status_error_keeps_backend_status() {
        let err = DashboardError::Fetch(FetchError::Status {
            status: 409,
            message: "Phone already registered".to_string(),
        });
        assert_eq!(err.status_code(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn test_unauthorized_returns_401() {
        let err = DashboardError::Auth(AuthError::Unauthorized);
        assert_eq!(err.status_code(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_local_errors_have_no_status() {
        let errors = [
            DashboardError::Auth(AuthError::MissingToken),
            DashboardError::Fetch(FetchError::Network {
                url: "http://localhost:8000/api/orders".to_string(),
                message: "connection refused".to_string(),
            }),
            DashboardError::Export(ExportError::Csv("bad record".to_string())),
            DashboardError::Internal("oops".to_string()),
        ];
        for err in errors {
            assert_eq!(err.status_code(), None, "{:?}", err);
        }
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let cases: Vec<(DashboardError, &str)> = vec![
            (
                FetchError::Network {
                    url: String::new(),
                    message: String::new(),
                }
                .into(),
                "NETWORK_ERROR",
            ),
            (
                FetchError::Status {
                    status: 500,
                    message: String::new(),
                }
                .into(),
                "HTTP_ERROR",
            ),
            (
                FetchError::Decode {
                    entity_type: "orders".to_string(),
                    message: String::new(),
                }
                .into(),
                "DECODE_ERROR",
            ),
            (
                FetchError::NotFound {
                    entity_type: "orders".to_string(),
                    id: "1".to_string(),
                }
                .into(),
                "ENTITY_NOT_FOUND",
            ),
            (AuthError::MissingToken.into(), "MISSING_TOKEN"),
            (AuthError::Unauthorized.into(), "UNAUTHORIZED"),
            (
                ValidationError::FieldError {
                    field: "phone".to_string(),
                    message: "bad".to_string(),
                }
                .into(),
                "VALIDATION_ERROR",
            ),
            (
                ConfigError::FileNotFound {
                    path: "dashboard.yaml".to_string(),
                }
                .into(),
                "CONFIG_ERROR",
            ),
            (ExportError::Io("disk full".to_string()).into(), "EXPORT_ERROR"),
            (StorageError::Lock("poisoned".to_string()).into(), "STORAGE_ERROR"),
            (DashboardError::Internal("x".to_string()), "INTERNAL_ERROR"),
        ];

        for (err, code) in cases {
            assert_eq!(err.error_code(), code, "{:?}", err);
        }
    }
}

// =============================================================================
// Display / Notice Tests
// =============================================================================

mod display_tests {
    use super::*;

    #[test]
    fn test_status_error_shows_backend_message() {
        let err: DashboardError = FetchError::Status {
            status: 400,
            message: "Insufficient stock".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Insufficient stock");
    }

    #[test]
    fn test_not_found_message() {
        let err: DashboardError = FetchError::NotFound {
            entity_type: "employees".to_string(),
            id: "7".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "employees with id '7' not found");
    }

    #[test]
    fn test_config_parse_error_names_file() {
        let with_file = ConfigError::ParseError {
            file: Some("dashboard.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            with_file.to_string(),
            "Failed to parse config file 'dashboard.yaml': bad indent"
        );

        let without_file = ConfigError::ParseError {
            file: None,
            message: "bad indent".to_string(),
        };
        assert_eq!(without_file.to_string(), "Failed to parse config: bad indent");
    }

    #[test]
    fn test_error_notice_uses_error_duration() {
        let durations = NoticeDurations {
            error_ms: 6_000,
            ..NoticeDurations::default()
        };
        let notice = DashboardError::Auth(AuthError::Unauthorized).to_notice(&durations);

        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Session expired, please sign in again");
        assert_eq!(notice.duration, std::time::Duration::from_secs(6));
    }
}

// =============================================================================
// Conversion Tests
// =============================================================================

mod conversion_tests {
    use super::*;

    #[derive(Debug, Validate)]
    struct LoginForm {
        #[validate(length(min = 1, message = "Login is required"))]
        login: String,
        #[validate(length(min = 6, message = "Password is too short"))]
        password: String,
    }

    #[test]
    fn test_from_validator_errors() {
        let form = LoginForm {
            login: String::new(),
            password: "123".to_string(),
        };
        let err: DashboardError = form.validate().unwrap_err().into();

        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["login"], vec!["Login is required"]);
        assert_eq!(fields["password"], vec!["Password is too short"]);
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse: std::result::Result<Value, _> = serde_json::from_str("{ not json");
        let err: DashboardError = parse.unwrap_err().into();
        assert_eq!(err.error_code(), "DECODE_ERROR");
    }

    #[test]
    fn test_from_yaml_error() {
        let parse: std::result::Result<DashboardConfig, _> = serde_yaml::from_str("api: [");
        let err: DashboardError = parse.unwrap_err().into();
        assert!(matches!(
            err,
            DashboardError::Config(ConfigError::ParseError { file: None, .. })
        ));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: DashboardError = io.into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_from_anyhow_roundtrips_dashboard_error() {
        let original = DashboardError::Auth(AuthError::MissingToken);
        let wrapped = anyhow::Error::new(original);
        let err: DashboardError = wrapped.into();
        assert!(matches!(err, DashboardError::Auth(AuthError::MissingToken)));

        let other: DashboardError = anyhow::anyhow!("something else").into();
        assert!(matches!(other, DashboardError::Internal(ref m) if m == "something else"));
    }

    #[test]
    fn test_field_errors_only_for_validation() {
        let err = DashboardError::Internal("x".to_string());
        assert!(err.field_errors().is_none());

        let single: DashboardError = ValidationError::FieldError {
            field: "price".to_string(),
            message: "Price must be greater than 0".to_string(),
        }
        .into();
        assert_eq!(
            single.field_errors().unwrap()["price"],
            vec!["Price must be greater than 0"]
        );
    }
}

// =============================================================================
// Matching Tests
// =============================================================================

mod matching_tests {
    use super::*;

    fn describe(err: &DashboardError) -> &'static str {
        match err {
            e if e.is_unauthorized() => "redirect to login",
            DashboardError::Fetch(FetchError::NotFound { .. }) => "show not found",
            DashboardError::Validation(_) => "show inline errors",
            _ => "show toast",
        }
    }

    #[test]
    fn test_screen_can_branch_on_errors() {
        assert_eq!(
            describe(&AuthError::Unauthorized.into()),
            "redirect to login"
        );
        assert_eq!(
            describe(&AuthError::MissingToken.into()),
            "redirect to login"
        );
        assert_eq!(
            describe(
                &FetchError::NotFound {
                    entity_type: "orders".to_string(),
                    id: "9".to_string()
                }
                .into()
            ),
            "show not found"
        );
        assert_eq!(
            describe(&ValidationError::FieldErrors(Default::default()).into()),
            "show inline errors"
        );
        assert_eq!(
            describe(&ExportError::Template("bad".to_string()).into()),
            "show toast"
        );
    }
}
