// Wizard Module - Three-step bug report form
//
// The step logic is a statig state machine; the draft lives in its shared
// storage and is only changed through wizard events.

pub mod types;
pub mod state_machine;


pub use types::{
    description_preview, BugReport, Draft, ParseSeverityError, ReviewSummary, Severity, Step,
    WizardEvent, DESCRIPTION_PREVIEW_CHARS,
};
pub use state_machine::Wizard;
