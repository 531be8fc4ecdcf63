//! Toast notices and screen load state

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// How long notices stay on screen
///
/// Defaults follow the dashboard's toasts: 2.5 s for confirmations,
/// 4 s for failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NoticeDurations {
    pub success_ms: u64,
    pub info_ms: u64,
    pub error_ms: u64,
}

impl Default for NoticeDurations {
    fn default() -> Self {
        Self {
            success_ms: 2_500,
            info_ms: 3_000,
            error_ms: 4_000,
        }
    }
}

impl NoticeDurations {
    pub fn success(&self) -> Duration {
        Duration::from_millis(self.success_ms)
    }

    pub fn info(&self) -> Duration {
        Duration::from_millis(self.info_ms)
    }

    pub fn error(&self) -> Duration {
        Duration::from_millis(self.error_ms)
    }
}

/// A timed toast message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    /// Identifier used to dismiss the notice early
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            duration,
        }
    }

    pub fn success(message: impl Into<String>, durations: &NoticeDurations) -> Self {
        Self::new(NoticeLevel::Success, message, durations.success())
    }

    pub fn info(message: impl Into<String>, durations: &NoticeDurations) -> Self {
        Self::new(NoticeLevel::Info, message, durations.info())
    }

    pub fn error(message: impl Into<String>, durations: &NoticeDurations) -> Self {
        Self::new(NoticeLevel::Error, message, durations.error())
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Fetch-on-mount state of a list screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// The fetch failed; the message is shown in place of the list
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
