use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

use super::backend::SubmissionBackend;
use super::errors::SubmissionError;
use crate::observability::{submission_metrics, OperationTimer, SubmissionMetrics};
use crate::telemetry::{create_submission_span, generate_correlation_id};
use crate::wizard::BugReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed(_))
    }
}

/// Result of running a [`PendingSubmission`], fed back into
/// [`SubmissionFlow::complete`].
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub correlation_id: String,
    pub result: Result<(), SubmissionError>,
}

/// A submission that has been started but not yet awaited.
///
/// Produced by [`SubmissionFlow::begin`]. Running it is the single
/// suspension point of the frame; there is no timeout or cancellation.
pub struct PendingSubmission {
    correlation_id: String,
    report: BugReport,
    backend: Arc<dyn SubmissionBackend>,
}

impl std::fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("correlation_id", &self.correlation_id)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl PendingSubmission {
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn report(&self) -> &BugReport {
        &self.report
    }

    pub async fn run(self) -> SubmissionOutcome {
        let span = create_submission_span(&self.correlation_id, self.report.severity());
        async move {
            let timer = OperationTimer::new("submit_bug_report");
            let result = match self.backend.submit(&self.report).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!(error = ?e, "Error submitting bug report");
                    Err(SubmissionError::failed())
                }
            };
            timer.finish();
            SubmissionOutcome {
                correlation_id: self.correlation_id,
                result,
            }
        }
        .instrument(span)
        .await
    }
}

/// Turns a finished report into a submission and tracks how it went.
///
/// At most one submission is outstanding at a time: `begin` refuses to start
/// another while the flow is `Submitting`.
pub struct SubmissionFlow {
    backend: Arc<dyn SubmissionBackend>,
    metrics: Arc<SubmissionMetrics>,
    state: SubmissionState,
    in_flight: Option<String>,
}

impl std::fmt::Debug for SubmissionFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionFlow")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl SubmissionFlow {
    pub fn new(backend: Arc<dyn SubmissionBackend>) -> Self {
        Self::with_metrics(backend, submission_metrics())
    }

    pub fn with_metrics(backend: Arc<dyn SubmissionBackend>, metrics: Arc<SubmissionMetrics>) -> Self {
        Self {
            backend,
            metrics,
            state: SubmissionState::Idle,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// User-facing error message, if the last submission failed
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn metrics(&self) -> &SubmissionMetrics {
        &self.metrics
    }

    /// Enter `Submitting` and hand back the work to await.
    ///
    /// Returns `None` while another submission is outstanding or after a
    /// success that has not been reset. Starting from `Failed` clears the
    /// previous error.
    pub fn begin(&mut self, report: BugReport) -> Option<PendingSubmission> {
        match self.state {
            SubmissionState::Submitting => {
                self.metrics.record_rejected();
                warn!(
                    in_flight = ?self.in_flight,
                    "Submission already in progress, ignoring submit"
                );
                None
            }
            SubmissionState::Succeeded => {
                debug!("Report already submitted, ignoring submit until reset");
                None
            }
            SubmissionState::Idle | SubmissionState::Failed(_) => {
                let correlation_id = generate_correlation_id();
                self.metrics.record_attempt();
                info!(
                    correlation_id = %correlation_id,
                    title = %report.title(),
                    severity = %report.severity(),
                    "Submitting bug report"
                );
                self.state = SubmissionState::Submitting;
                self.in_flight = Some(correlation_id.clone());
                Some(PendingSubmission {
                    correlation_id,
                    report,
                    backend: Arc::clone(&self.backend),
                })
            }
        }
    }

    /// Apply the outcome of the outstanding submission.
    ///
    /// Outcomes that don't belong to the outstanding submission are dropped.
    pub fn complete(&mut self, outcome: SubmissionOutcome) -> &SubmissionState {
        if self.in_flight.as_deref() != Some(outcome.correlation_id.as_str()) {
            warn!(
                correlation_id = %outcome.correlation_id,
                in_flight = ?self.in_flight,
                "Dropping outcome for a submission that is not in flight"
            );
            return &self.state;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(()) => {
                self.metrics.record_success();
                info!(correlation_id = %outcome.correlation_id, "Bug report submission succeeded");
                self.state = SubmissionState::Succeeded;
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(correlation_id = %outcome.correlation_id, "Bug report submission failed");
                self.state = SubmissionState::Failed(e.user_message().to_string());
            }
        }
        &self.state
    }

    /// Begin, await and complete a submission in one go.
    pub async fn submit(&mut self, report: BugReport) -> &SubmissionState {
        if let Some(pending) = self.begin(report) {
            let outcome = pending.run().await;
            self.complete(outcome);
        }
        &self.state
    }

    /// Return to `Idle` after a success or failure. Returns whether the
    /// state changed.
    pub fn reset(&mut self) -> bool {
        if !self.state.is_terminal() {
            debug!(state = ?self.state, "Ignoring reset");
            return false;
        }
        self.state = SubmissionState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::backend::MockSubmissionBackend;
    use crate::submission::errors::SUBMISSION_FAILED_MESSAGE;
    use crate::wizard::Severity;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use tokio_test::{assert_pending, task};

    fn report() -> BugReport {
        BugReport::new(
            "Button broken".to_string(),
            "Click does nothing on mobile".to_string(),
            Severity::High,
        )
    }

    fn flow_with(backend: MockSubmissionBackend) -> SubmissionFlow {
        SubmissionFlow::with_metrics(Arc::new(backend), Arc::new(SubmissionMetrics::new()))
    }

    struct NeverResolves;

    #[async_trait]
    impl SubmissionBackend for NeverResolves {
        async fn submit(&self, _report: &BugReport) -> anyhow::Result<()> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_success_goes_idle_submitting_succeeded() {
        let mut backend = MockSubmissionBackend::new();
        backend
            .expect_submit()
            .withf(|r| r.title() == "Button broken" && r.severity() == Severity::High)
            .times(1)
            .returning(|_| Ok(()));
        let mut flow = flow_with(backend);
        assert_eq!(flow.state(), &SubmissionState::Idle);

        let pending = flow.begin(report()).expect("idle flow should start");
        assert_eq!(flow.state(), &SubmissionState::Submitting);
        assert!(flow.error().is_none());

        let outcome = pending.run().await;
        assert_eq!(flow.complete(outcome), &SubmissionState::Succeeded);

        let stats = flow.metrics().get_stats();
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.failures, 0);
    }

    #[tokio::test]
    async fn test_failure_shows_fixed_message() {
        let mut backend = MockSubmissionBackend::new();
        backend
            .expect_submit()
            .times(1)
            .returning(|_| Err(anyhow!("connection reset by peer")));
        let mut flow = flow_with(backend);

        let pending = flow.begin(report()).unwrap();
        assert_eq!(flow.state(), &SubmissionState::Submitting);

        let outcome = pending.run().await;
        assert!(matches!(
            &outcome.result,
            Err(SubmissionError::SubmissionFailed(message)) if message == SUBMISSION_FAILED_MESSAGE
        ));
        flow.complete(outcome);

        assert_eq!(
            flow.state(),
            &SubmissionState::Failed(SUBMISSION_FAILED_MESSAGE.to_string())
        );
        assert_eq!(flow.error(), Some("Failed to submit bug report. Please try again."));
        assert_eq!(flow.metrics().get_stats().failures, 1);
    }

    #[tokio::test]
    async fn test_begin_while_submitting_is_ignored() {
        let mut backend = MockSubmissionBackend::new();
        backend.expect_submit().times(1).returning(|_| Ok(()));
        let mut flow = flow_with(backend);

        let pending = flow.begin(report()).unwrap();
        assert!(flow.begin(report()).is_none());
        assert!(flow.begin(report()).is_none());
        assert!(flow.is_submitting());

        flow.complete(pending.run().await);
        assert_eq!(flow.state(), &SubmissionState::Succeeded);
        assert_eq!(flow.metrics().get_stats().rejected, 2);
        assert_eq!(flow.metrics().get_stats().attempts, 1);
    }

    #[tokio::test]
    async fn test_retry_after_failure_clears_error() {
        let mut backend = MockSubmissionBackend::new();
        let mut calls = 0;
        backend.expect_submit().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(anyhow!("flaky"))
            } else {
                Ok(())
            }
        });
        let mut flow = flow_with(backend);

        flow.submit(report()).await;
        assert!(flow.error().is_some());

        let pending = flow.begin(report()).expect("failed flow accepts a resubmit");
        assert!(flow.error().is_none());
        flow.complete(pending.run().await);
        assert_eq!(flow.state(), &SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn test_begin_after_success_is_ignored_until_reset() {
        let mut backend = MockSubmissionBackend::new();
        backend.expect_submit().times(2).returning(|_| Ok(()));
        let mut flow = flow_with(backend);

        flow.submit(report()).await;
        assert!(flow.begin(report()).is_none());

        assert!(flow.reset());
        assert_eq!(flow.state(), &SubmissionState::Idle);
        assert_eq!(flow.submit(report()).await, &SubmissionState::Succeeded);
    }

    #[tokio::test]
    async fn test_stale_outcome_is_dropped() {
        let mut backend = MockSubmissionBackend::new();
        backend.expect_submit().times(0);
        let mut flow = flow_with(backend);

        let _pending = flow.begin(report()).unwrap();
        flow.complete(SubmissionOutcome {
            correlation_id: "not-the-one".to_string(),
            result: Ok(()),
        });

        assert_eq!(flow.state(), &SubmissionState::Submitting);
    }

    #[test]
    fn test_reset_only_from_terminal_states() {
        let mut flow = flow_with(MockSubmissionBackend::new());
        assert!(!flow.reset());

        let _pending = flow.begin(report()).unwrap();
        assert!(!flow.reset());
        assert!(flow.is_submitting());
    }

    #[test]
    fn test_never_resolving_backend_stays_submitting() {
        let mut flow = SubmissionFlow::with_metrics(
            Arc::new(NeverResolves),
            Arc::new(SubmissionMetrics::new()),
        );

        let pending = flow.begin(report()).unwrap();
        let mut run = task::spawn(pending.run());

        assert_pending!(run.poll());
        assert_pending!(run.poll());
        assert_eq!(flow.state(), &SubmissionState::Submitting);
        assert!(flow.begin(report()).is_none());
    }
}
