// Bug Report Frame Library - Embeddable three-step bug report widget
// This exposes the core components for hosts, the demo CLI and testing

pub mod wizard;
pub mod submission;
pub mod host;
pub mod frame;
pub mod telemetry;
pub mod observability;
pub mod config;

// Re-export key types for easy access
pub use wizard::{BugReport, Draft, ReviewSummary, Severity, Step, Wizard, WizardEvent};
pub use submission::{
    Notification,
    PendingSubmission,
    SimulatedBackend,
    SubmissionBackend,
    SubmissionError,
    SubmissionFlow,
    SubmissionOutcome,
    SubmissionState,
    SUBMISSION_FAILED_MESSAGE,
};
pub use host::{HostHandle, LoggingHost};
pub use frame::{Frame, FrameView, FormCard, FormField, PrimaryAction, SuccessCard};
pub use telemetry::{init_telemetry, generate_correlation_id, create_submission_span};
pub use observability::{SubmissionMetrics, SubmissionStats, submission_metrics, OperationTimer};
pub use crate::config::{FrameConfig, config, init_config};
