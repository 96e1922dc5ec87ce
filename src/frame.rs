//! The bug report frame
//!
//! [`Frame`] owns one wizard, one submission flow and the host handle. User
//! actions come in as method calls; [`Frame::view`] describes what the
//! widget should currently show.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::FrameConfig;
use crate::host::HostHandle;
use crate::submission::{
    PendingSubmission, SubmissionBackend, SubmissionFlow, SubmissionOutcome, SubmissionState,
};
use crate::wizard::{ReviewSummary, Severity, Step, Wizard};

/// Text on the submit button while a submission is outstanding
pub const SUBMITTING_LABEL: &str = "Submitting...";
pub const SUBMIT_LABEL: &str = "Submit Bug Report";

/// What the frame is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameView {
    Loading,
    Form {
        error: Option<String>,
        card: FormCard,
    },
    Success(SuccessCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCard {
    pub heading: String,
    pub step: Step,
    pub prompt: &'static str,
    pub field: FormField,
    pub can_go_back: bool,
    pub primary: PrimaryAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Title(String),
    Description(String),
    Severity {
        selected: Severity,
        summary: ReviewSummary,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryAction {
    Next { enabled: bool },
    Submit { enabled: bool, label: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessCard {
    pub heading: String,
    pub message: String,
    pub detail: String,
}

pub struct Frame {
    config: FrameConfig,
    host: Arc<dyn HostHandle>,
    wizard: Wizard,
    submission: SubmissionFlow,
    loaded: bool,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("loaded", &self.loaded)
            .field("wizard", &self.wizard)
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}

impl Frame {
    pub fn new(
        config: FrameConfig,
        backend: Arc<dyn SubmissionBackend>,
        host: Arc<dyn HostHandle>,
    ) -> Self {
        Self::with_flow(config, SubmissionFlow::new(backend), host)
    }

    pub fn with_flow(config: FrameConfig, submission: SubmissionFlow, host: Arc<dyn HostHandle>) -> Self {
        Self {
            config,
            host,
            wizard: Wizard::new(),
            submission,
            loaded: false,
        }
    }

    /// Finish loading and tell the host the frame is ready. Only the first
    /// call signals the host.
    pub fn load(&mut self) {
        if self.loaded {
            debug!("Frame already loaded");
            return;
        }
        self.loaded = true;
        info!(project_title = %self.config.frame.project_title, "Frame loaded");
        self.host.ready();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn submission_state(&self) -> &SubmissionState {
        self.submission.state()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.wizard.set_title(title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.wizard.set_description(description);
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.wizard.set_severity(severity);
    }

    pub fn next(&mut self) -> Step {
        self.wizard.advance()
    }

    pub fn back(&mut self) -> Step {
        self.wizard.retreat()
    }

    /// Start submitting the draft. Returns `None` when not on the review
    /// step or when a submission is already outstanding.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        let report = self.wizard.submit()?;
        self.submission.begin(report)
    }

    pub fn finish_submit(&mut self, outcome: SubmissionOutcome) -> &SubmissionState {
        self.submission.complete(outcome)
    }

    /// Submit the draft and wait for the outcome.
    pub async fn submit(&mut self) -> &SubmissionState {
        if let Some(pending) = self.begin_submit() {
            let outcome = pending.run().await;
            self.submission.complete(outcome);
        }
        self.submission.state()
    }

    /// Leave a finished submission behind.
    ///
    /// After a success the draft is cleared so another report can be filed.
    /// After a failure only the error is dismissed; the draft stays so the
    /// user can resubmit without retyping.
    pub fn reset(&mut self) -> bool {
        let succeeded = *self.submission.state() == SubmissionState::Succeeded;
        if !self.submission.reset() {
            return false;
        }
        if succeeded {
            self.wizard.clear();
            info!("Ready for another bug report");
        }
        true
    }

    pub fn view(&self) -> FrameView {
        if !self.loaded {
            return FrameView::Loading;
        }
        match self.submission.state() {
            SubmissionState::Succeeded => FrameView::Success(self.success_card()),
            state => FrameView::Form {
                error: self.submission.error().map(str::to_string),
                card: self.form_card(state == &SubmissionState::Submitting),
            },
        }
    }

    fn form_card(&self, submitting: bool) -> FormCard {
        let step = self.wizard.step();
        let draft = self.wizard.draft();
        let field = match self.wizard.summary() {
            Some(summary) => FormField::Severity {
                selected: draft.severity,
                summary,
            },
            None if step == Step::Title => FormField::Title(draft.title.clone()),
            None => FormField::Description(draft.description.clone()),
        };
        let primary = if step == Step::Review {
            PrimaryAction::Submit {
                enabled: !submitting,
                label: if submitting { SUBMITTING_LABEL } else { SUBMIT_LABEL },
            }
        } else {
            PrimaryAction::Next {
                enabled: self.wizard.can_advance(),
            }
        };

        FormCard {
            heading: self.config.frame.project_title.clone(),
            step,
            prompt: step.prompt(),
            field,
            can_go_back: self.wizard.can_retreat(),
            primary,
        }
    }

    fn success_card(&self) -> SuccessCard {
        let submission = &self.config.submission;
        SuccessCard {
            heading: "Bug Report Submitted!".to_string(),
            message: format!(
                "Thank you for your report. The {} team has been notified.",
                submission.team_name
            ),
            detail: format!(
                "A notification has been sent to {}. We'll review your report as soon as possible.",
                submission.notify_handle
            ),
        }
    }
}

impl fmt::Display for FrameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameView::Loading => write!(f, "Loading..."),
            FrameView::Form { error, card } => {
                if let Some(error) = error {
                    writeln!(f, "[!] {error}")?;
                }
                writeln!(f, "{}", card.heading)?;
                writeln!(f, "{}", card.prompt)?;
                match &card.field {
                    FormField::Title(title) => writeln!(f, "Bug Title: {title}")?,
                    FormField::Description(description) => {
                        writeln!(f, "Bug Description: {description}")?
                    }
                    FormField::Severity { selected, summary } => {
                        writeln!(f, "Severity: {}", selected.label())?;
                        writeln!(f, "Summary:")?;
                        writeln!(f, "  Title: {}", summary.title)?;
                        writeln!(f, "  Description: {}", summary.description_preview)?;
                        writeln!(f, "  Severity: {}", summary.severity)?;
                    }
                }
                let primary = match &card.primary {
                    PrimaryAction::Next { enabled: true } => "[Next]".to_string(),
                    PrimaryAction::Next { enabled: false } => "(Next)".to_string(),
                    PrimaryAction::Submit { enabled: true, label } => format!("[{label}]"),
                    PrimaryAction::Submit { enabled: false, label } => format!("({label})"),
                };
                if card.can_go_back {
                    write!(f, "[Back] ")?;
                }
                write!(f, "{primary}")
            }
            FrameView::Success(card) => {
                writeln!(f, "{}", card.heading)?;
                writeln!(f, "{}", card.message)?;
                writeln!(f, "{}", card.detail)?;
                write!(f, "[Report Another Bug]")
            }
        }
    }
}
