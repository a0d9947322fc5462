//! Maps raw build-engine events to display-ready outcome reports.

use crate::model::{BuildEvent, EventKind, OutcomeReport, Severity};

/// Classify one build event. Pure and total: every event, including
/// engine-defined kinds this CLI has never seen, produces a report.
pub fn classify(event: &BuildEvent) -> OutcomeReport {
    match &event.kind {
        EventKind::Error => OutcomeReport {
            label: "error".into(),
            subject: event.target.clone(),
            severity: Severity::Error,
            extra: event.detail.clone(),
        },
        EventKind::Deleted => OutcomeReport {
            label: "remove".into(),
            subject: event.target.clone(),
            severity: Severity::Success,
            extra: None,
        },
        EventKind::Created => OutcomeReport {
            label: "create".into(),
            subject: event.target.clone(),
            severity: Severity::Success,
            extra: None,
        },
        EventKind::Identical => OutcomeReport {
            label: "identical".into(),
            subject: event.target.clone(),
            severity: Severity::Neutral,
            extra: None,
        },
        EventKind::Updated => OutcomeReport {
            label: "updated".into(),
            subject: event.target.clone(),
            severity: Severity::Warning,
            extra: None,
        },
        // Unknown kinds: the raw kind is the label and the detail payload is
        // the only meaningful display text, so it becomes the subject.
        EventKind::Other(raw) => OutcomeReport {
            label: raw.clone(),
            subject: event.detail.clone().unwrap_or_default(),
            severity: Severity::Info,
            extra: None,
        },
    }
}
