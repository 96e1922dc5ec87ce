// Property-Based Testing for the bug report wizard
// Tests step gating and report invariants for arbitrary input using property-based testing

use bug_report_frame::wizard::{description_preview, DESCRIPTION_PREVIEW_CHARS};
use bug_report_frame::{Severity, Step, Wizard, WizardEvent};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

// Strategy for text that trims to nothing
fn blank_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just(' '),
            Just('\t'),
            Just('\n'),
            Just('\r'),
            Just('\u{a0}'),
            Just('\u{3000}'),
        ],
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

// Strategy for text with at least one visible character
fn non_blank_text_strategy() -> impl Strategy<Value = String> {
    any::<String>().prop_filter("needs a non-whitespace character", |s| {
        !s.trim().is_empty()
    })
}

// Field edits are a mix of blank and filled-in text
fn field_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![blank_text_strategy(), "[a-zA-Z0-9 ]{1,16}"]
}

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

// User actions against the form
#[derive(Debug, Clone, Arbitrary)]
enum FormAction {
    EditTitle(#[proptest(strategy = "field_text_strategy()")] String),
    EditDescription(#[proptest(strategy = "field_text_strategy()")] String),
    SelectSeverity(#[proptest(strategy = "severity_strategy()")] Severity),
    Next,
    Back,
    Clear,
}

impl From<FormAction> for WizardEvent {
    fn from(action: FormAction) -> Self {
        match action {
            FormAction::EditTitle(title) => WizardEvent::EditTitle(title),
            FormAction::EditDescription(description) => WizardEvent::EditDescription(description),
            FormAction::SelectSeverity(severity) => WizardEvent::SelectSeverity(severity),
            FormAction::Next => WizardEvent::Next,
            FormAction::Back => WizardEvent::Back,
            FormAction::Clear => WizardEvent::Clear,
        }
    }
}

proptest! {
    #[test]
    fn blank_title_never_advances(title in blank_text_strategy(), presses in 1usize..5) {
        let mut wizard = Wizard::new();
        wizard.set_title(title.clone());

        for _ in 0..presses {
            prop_assert_eq!(wizard.advance(), Step::Title);
        }
        prop_assert!(!wizard.can_advance());
        prop_assert_eq!(&wizard.draft().title, &title);
    }

    #[test]
    fn non_blank_title_advances_exactly_one_step(title in non_blank_text_strategy()) {
        let mut wizard = Wizard::new();
        wizard.set_title(title.clone());

        prop_assert!(wizard.can_advance());
        prop_assert_eq!(wizard.advance(), Step::Description);
        // The description is still empty, so the next press is ignored
        prop_assert_eq!(wizard.advance(), Step::Description);
        // Stored untrimmed
        prop_assert_eq!(&wizard.draft().title, &title);
    }

    #[test]
    fn retreat_on_first_step_is_noop(title in field_text_strategy(), presses in 1usize..5) {
        let mut wizard = Wizard::new();
        wizard.set_title(title.clone());

        for _ in 0..presses {
            prop_assert_eq!(wizard.retreat(), Step::Title);
        }
        prop_assert_eq!(&wizard.draft().title, &title);
    }

    #[test]
    fn preview_is_first_fifty_characters(description in any::<String>()) {
        let preview = description_preview(&description);

        let expected: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        prop_assert_eq!(&preview, &expected);
        if description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
            prop_assert_eq!(&preview, &description);
        }
    }

    #[test]
    fn review_summary_keeps_full_description_in_report(
        title in non_blank_text_strategy(),
        description in non_blank_text_strategy(),
    ) {
        let mut wizard = Wizard::new();
        wizard.set_title(title);
        wizard.advance();
        wizard.set_description(description.clone());
        prop_assert_eq!(wizard.advance(), Step::Review);

        let summary = wizard.summary().unwrap();
        prop_assert_eq!(summary.description_preview, description_preview(&description));
        let report = wizard.submit().unwrap();
        prop_assert_eq!(report.description(), description.as_str());
    }

    #[test]
    fn submitted_reports_never_have_blank_fields(
        actions in prop::collection::vec(any::<FormAction>(), 0..40)
    ) {
        let mut wizard = Wizard::new();

        for action in actions {
            wizard.handle(action.into());

            match wizard.submit() {
                Some(report) => {
                    prop_assert_eq!(wizard.step(), Step::Review);
                    prop_assert!(!report.title().trim().is_empty());
                    prop_assert!(!report.description().trim().is_empty());
                }
                None => {
                    prop_assert!(
                        wizard.step() != Step::Review
                            || wizard.draft().title.trim().is_empty()
                            || wizard.draft().description.trim().is_empty()
                    );
                }
            }
        }
    }
}
