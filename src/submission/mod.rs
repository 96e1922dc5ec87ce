//! Submission flow
//!
//! Takes the report produced by the wizard, runs it through an injected
//! [`SubmissionBackend`] and tracks the outcome for the frame view.

pub mod backend;
pub mod errors;
pub mod flow;

pub use backend::{Notification, SimulatedBackend, SubmissionBackend};
pub use errors::{SubmissionError, SUBMISSION_FAILED_MESSAGE};
pub use flow::{PendingSubmission, SubmissionFlow, SubmissionOutcome, SubmissionState};
