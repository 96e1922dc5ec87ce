use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Bug report submission counters
#[derive(Debug, Default)]
pub struct SubmissionMetrics {
    pub attempts: AtomicU64,
    pub successes: AtomicU64,
    pub failures: AtomicU64,
    pub rejected: AtomicU64,
}

impl SubmissionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A submit arrived while another submission was outstanding
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> SubmissionStats {
        SubmissionStats {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Submission metrics: attempts={}, successes={}, failures={}, rejected={}",
            stats.attempts, stats.successes, stats.failures, stats.rejected
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionStats {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub rejected: u64,
}

/// Global metrics instance
static SUBMISSION_METRICS: std::sync::LazyLock<Arc<SubmissionMetrics>> =
    std::sync::LazyLock::new(|| Arc::new(SubmissionMetrics::new()));

pub fn submission_metrics() -> Arc<SubmissionMetrics> {
    Arc::clone(&SUBMISSION_METRICS)
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
