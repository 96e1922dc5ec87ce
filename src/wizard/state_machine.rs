use statig::prelude::*;
use tracing::{debug, info};

use super::types::{BugReport, Draft, ReviewSummary, Severity, Step, WizardEvent};

/// Shared storage for the wizard state machine: the draft being composed.
#[derive(Debug, Default)]
struct WizardMachine {
    draft: Draft,
}

#[state_machine(
    initial = "State::title_entry()",
    state(derive(Debug, Clone, PartialEq, Eq))
)]
impl WizardMachine {
    /// Clearing works from every step. Edits reach here only when they
    /// target a field that isn't on the current step, and are dropped.
    #[superstate]
    fn editing(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Clear => {
                self.draft = Draft::default();
                info!("Wizard draft cleared");
                Transition(State::title_entry())
            }
            WizardEvent::EditTitle(_)
            | WizardEvent::EditDescription(_)
            | WizardEvent::SelectSeverity(_) => {
                debug!(event = ?event, "Ignoring edit to a field not on this step");
                Handled
            }
            WizardEvent::Next | WizardEvent::Back => Handled,
        }
    }

    #[state(superstate = "editing")]
    fn title_entry(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::EditTitle(title) => {
                self.draft.title = title.clone();
                Handled
            }
            WizardEvent::Next if self.draft.has_title() => {
                info!(title = %self.draft.title, "Wizard advanced to description");
                Transition(State::description_entry())
            }
            WizardEvent::Next => {
                debug!("Ignoring next: title is empty");
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "editing")]
    fn description_entry(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::EditDescription(description) => {
                self.draft.description = description.clone();
                Handled
            }
            WizardEvent::Next if self.draft.has_description() => {
                info!(
                    description_len = self.draft.description.chars().count(),
                    "Wizard advanced to review"
                );
                Transition(State::review())
            }
            WizardEvent::Next => {
                debug!("Ignoring next: description is empty");
                Handled
            }
            WizardEvent::Back => Transition(State::title_entry()),
            _ => Super,
        }
    }

    #[state(superstate = "editing")]
    fn review(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SelectSeverity(severity) => {
                self.draft.severity = *severity;
                debug!(severity = %severity, "Severity selected");
                Handled
            }
            WizardEvent::Back => Transition(State::description_entry()),
            _ => Super,
        }
    }
}

/// Three-step bug report form: title, then description, then severity and
/// review.
///
/// `advance` and `retreat` never fail; a step change that is not allowed is
/// silently ignored, the same way a disabled button ignores clicks.
pub struct Wizard {
    machine: StateMachine<WizardMachine>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Wizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("step", &self.step())
            .field("draft", self.draft())
            .finish()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            machine: WizardMachine::default().state_machine(),
        }
    }

    pub fn step(&self) -> Step {
        match self.machine.state() {
            State::TitleEntry { .. } => Step::Title,
            State::DescriptionEntry { .. } => Step::Description,
            State::Review { .. } => Step::Review,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.machine.inner().draft
    }

    pub fn handle(&mut self, event: WizardEvent) -> Step {
        self.machine.handle(&event);
        self.step()
    }

    /// Only takes effect on the title step.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.handle(WizardEvent::EditTitle(title.into()));
    }

    /// Only takes effect on the description step.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.handle(WizardEvent::EditDescription(description.into()));
    }

    /// Only takes effect on the review step.
    pub fn set_severity(&mut self, severity: Severity) {
        self.handle(WizardEvent::SelectSeverity(severity));
    }

    /// Move to the next step if the current field has content.
    pub fn advance(&mut self) -> Step {
        self.handle(WizardEvent::Next)
    }

    /// Move to the previous step; no-op on the first step.
    pub fn retreat(&mut self) -> Step {
        self.handle(WizardEvent::Back)
    }

    /// Return the draft and step to their initial values.
    pub fn clear(&mut self) {
        self.handle(WizardEvent::Clear);
    }

    /// Whether the "Next" control is enabled.
    pub fn can_advance(&self) -> bool {
        match self.step() {
            Step::Title => self.draft().has_title(),
            Step::Description => self.draft().has_description(),
            Step::Review => false,
        }
    }

    pub fn can_retreat(&self) -> bool {
        self.step() > Step::Title
    }

    /// Summary of the draft, only available on the review step.
    pub fn summary(&self) -> Option<ReviewSummary> {
        (self.step() == Step::Review).then(|| ReviewSummary::from_draft(self.draft()))
    }

    /// Package the draft into a report. Only the review step can submit;
    /// the wizard itself stays where it is.
    pub fn submit(&self) -> Option<BugReport> {
        if self.step() != Step::Review {
            debug!(step = self.step().number(), "Ignoring submit outside review step");
            return None;
        }
        let draft = self.draft();
        if !draft.has_title() || !draft.has_description() {
            debug!("Ignoring submit: draft has a blank field");
            return None;
        }
        Some(BugReport::new(
            draft.title.clone(),
            draft.description.clone(),
            draft.severity,
        ))
    }
}
