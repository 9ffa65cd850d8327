//! Notification gateway trait and implementations.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use alert_core::HazardType;

/// Outcome of a permission request against the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Errors that can occur while handing a notification to the platform.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The user or OS denied notification permission.
    #[error("notification permission denied")]
    Denied,

    /// The platform refused or dropped the notification.
    #[error("notification dispatch failed: {0}")]
    Failed(String),
}

/// Platform identifier of a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationId(pub String);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Data payload attached to a notification, consumed by the tap handler to
/// deep-link into the right screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, rename_all = "camelCase")]
pub enum NotificationPayload {
    /// One alert: deep-links into its detail view.
    #[serde(rename_all = "camelCase")]
    Single { alert_id: String },
    /// A burst of alerts of one hazard type: deep-links into the list.
    #[serde(rename_all = "camelCase")]
    Grouped { alert_type: HazardType, count: usize },
}

/// A notification ready for the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub payload: NotificationPayload,
}

/// Trait for raising local notifications.
///
/// Abstracted so the core never touches a platform SDK directly and the
/// test suite can substitute a recording double.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Ask the platform for notification permission.
    async fn request_permission(&self) -> Permission;

    /// Hand one notification to the platform.
    async fn send(&self, notification: Notification) -> Result<NotificationId, DispatchError>;
}

/// A no-op gateway for testing that accepts and discards everything.
#[derive(Debug, Default)]
pub struct NoOpGateway {
    counter: AtomicU64,
}

impl NoOpGateway {
    /// Create a new no-op gateway.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationGateway for NoOpGateway {
    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn send(&self, _notification: Notification) -> Result<NotificationId, DispatchError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(NotificationId(format!("noop-{}", n)))
    }
}

/// A logging gateway for debugging that logs every operation.
#[derive(Debug, Default)]
pub struct LoggingGateway {
    counter: AtomicU64,
}

impl LoggingGateway {
    /// Create a new logging gateway.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationGateway for LoggingGateway {
    async fn request_permission(&self) -> Permission {
        tracing::info!("Notification permission requested (auto-granted)");
        Permission::Granted
    }

    async fn send(&self, notification: Notification) -> Result<NotificationId, DispatchError> {
        tracing::info!(
            "Notification: {} - {} ({:?})",
            notification.title,
            notification.body,
            notification.payload
        );
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(NotificationId(format!("log-{}", n)))
    }
}
