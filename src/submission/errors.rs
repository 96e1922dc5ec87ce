use thiserror::Error;

/// Message shown to the user whenever a submission fails. The underlying
/// cause only goes to the diagnostic log.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Failed to submit bug report. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    SubmissionFailed(String),
}

impl SubmissionError {
    pub fn failed() -> Self {
        SubmissionError::SubmissionFailed(SUBMISSION_FAILED_MESSAGE.to_string())
    }

    pub fn user_message(&self) -> &str {
        match self {
            SubmissionError::SubmissionFailed(message) => message,
        }
    }
}
