use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of description characters shown on the review step
pub const DESCRIPTION_PREVIEW_CHARS: usize = 50;

/// How badly a bug hurts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Label shown in the severity select control
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown severity '{0}' (expected low, medium, high or critical)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

/// A finished bug report, built from the draft on the review step.
///
/// Fields are private so a report cannot change after it is handed to the
/// submission flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BugReport {
    title: String,
    description: String,
    severity: Severity,
}

impl BugReport {
    pub(crate) fn new(title: String, description: String, severity: Severity) -> Self {
        Self {
            title,
            description,
            severity,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// In-progress report data owned by one wizard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Draft {
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }
}

/// Wizard step, numbered the way the form shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Title = 1,
    Description = 2,
    Review = 3,
}

impl Step {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Prompt shown in the card header
    pub fn prompt(&self) -> &'static str {
        match self {
            Step::Title => "Step 1: What's the bug title?",
            Step::Description => "Step 2: Describe the bug",
            Step::Review => "Step 3: Set severity and submit",
        }
    }
}

/// Read-only summary shown on the review step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub title: String,
    pub description_preview: String,
    pub severity: Severity,
}

impl ReviewSummary {
    pub fn from_draft(draft: &Draft) -> Self {
        Self {
            title: draft.title.clone(),
            description_preview: description_preview(&draft.description),
            severity: draft.severity,
        }
    }
}

/// First [`DESCRIPTION_PREVIEW_CHARS`] characters of a description.
pub fn description_preview(description: &str) -> String {
    description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    EditTitle(String),
    EditDescription(String),
    SelectSeverity(Severity),
    Next,
    Back,
    Clear,
}
