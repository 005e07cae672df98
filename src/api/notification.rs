// ==========================================
// Campus Administration Platform - Notification Boundary
// ==========================================
// Outcome messages for the caller's notification surface (toasts,
// activity feed). No logic lives behind this boundary; the default
// sink just logs through tracing.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info, warn};

/// Outcome category attached to every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeLevel {
    Success,
    Warning,
    Error,
}

impl fmt::Display for OutcomeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeLevel::Success => write!(f, "success"),
            OutcomeLevel::Warning => write!(f, "warning"),
            OutcomeLevel::Error => write!(f, "error"),
        }
    }
}

/// Structured counts for bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCounts {
    pub eligible: u32,
    pub assigned: u32,
    pub remaining: u32,
}

/// One outcome message: category, human-readable text, and structured
/// counts when the operation was a bulk run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: OutcomeLevel,
    pub message: String,
    pub counts: Option<BulkCounts>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: OutcomeLevel::Success,
            message: message.into(),
            counts: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: OutcomeLevel::Warning,
            message: message.into(),
            counts: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: OutcomeLevel::Error,
            message: message.into(),
            counts: None,
        }
    }

    pub fn with_counts(mut self, counts: BulkCounts) -> Self {
        self.counts = Some(counts);
        self
    }
}

// ==========================================
// NotificationSink trait
// ==========================================
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default sink: logs at the level matching the outcome category.
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            OutcomeLevel::Success => {
                info!(counts = ?notification.counts, "{}", notification.message)
            }
            OutcomeLevel::Warning => {
                warn!(counts = ?notification.counts, "{}", notification.message)
            }
            OutcomeLevel::Error => {
                error!(counts = ?notification.counts, "{}", notification.message)
            }
        }
    }
}
