//! Submission backends
//!
//! The submission flow only knows the [`SubmissionBackend`] trait, so the
//! simulated backend shipped here can be replaced with one that stores the
//! report and notifies maintainers for real.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

#[cfg(test)]
use mockall::automock;

use crate::config::SubmissionConfig;
use crate::wizard::BugReport;

/// Persists a report and notifies the maintainer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    async fn submit(&self, report: &BugReport) -> Result<()>;
}

/// A maintainer notification produced for a submitted report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn for_report(recipient: &str, report: &BugReport) -> Self {
        Self {
            recipient: recipient.to_string(),
            message: format!(
                "Would notify {} about new {} bug report: {}",
                recipient,
                report.severity(),
                report.title()
            ),
            created_at: Utc::now(),
        }
    }
}

/// Backend that waits a fixed delay instead of calling a real API.
///
/// Notifications are kept in an in-memory outbox rather than delivered.
#[derive(Debug)]
pub struct SimulatedBackend {
    delay: Duration,
    notify_handle: String,
    fail_with: Option<String>,
    outbox: Mutex<Vec<Notification>>,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, notify_handle: impl Into<String>) -> Self {
        Self {
            delay,
            notify_handle: notify_handle.into(),
            fail_with: None,
            outbox: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self::new(
            Duration::from_millis(config.delay_ms),
            config.notify_handle.clone(),
        )
    }

    /// Make every submission fail with `reason` once the delay has elapsed.
    pub fn failing_with(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn notify_handle(&self) -> &str {
        &self.notify_handle
    }

    /// Notifications recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmissionBackend for SimulatedBackend {
    async fn submit(&self, report: &BugReport) -> Result<()> {
        let payload = serde_json::to_string(report)?;
        info!(report = %payload, "Bug report submitted");

        tokio::time::sleep(self.delay).await;

        if let Some(reason) = &self.fail_with {
            return Err(anyhow!("{reason}"));
        }

        let notification = Notification::for_report(&self.notify_handle, report);
        info!(
            recipient = %notification.recipient,
            severity = %report.severity(),
            "{}",
            notification.message
        );
        self.outbox
            .lock()
            .map_err(|_| anyhow!("Notification outbox lock poisoned"))?
            .push(notification);

        Ok(())
    }
}
