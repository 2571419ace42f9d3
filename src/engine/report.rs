//! Attempt reports
//!
//! Structured record of what one attempt did to the page, used for logging
//! and run summaries.

use serde::{Deserialize, Serialize};

use crate::core::{FieldKind, Verdict};

/// What happened to a single schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Resolved and interacted with
    Actuated,
    /// Not present on the page, or empty descriptor
    Skipped,
}

/// One field's outcome within an attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEvent {
    pub kind: FieldKind,
    /// Compound selector; empty for an empty descriptor
    pub selector: String,
    pub status: FieldStatus,
}

/// Result of one (identity, target) attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    pub identity: String,
    pub url: String,
    pub verdict: Verdict,
    /// Field outcomes in the order they were processed
    pub events: Vec<FieldEvent>,
    /// Selector of the submit control that was clicked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<String>,
    /// Cause of a failure that was not a missing submit control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttemptReport {
    /// Start a report; the verdict stays `Failure` until a submit click lands
    pub fn new(identity: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            url: url.into(),
            verdict: Verdict::Failure,
            events: Vec::new(),
            submitted: None,
            error: None,
        }
    }

    /// Finished report with the given verdict and no field events
    pub fn with_verdict(
        identity: impl Into<String>,
        url: impl Into<String>,
        verdict: Verdict,
    ) -> Self {
        Self {
            verdict,
            ..Self::new(identity, url)
        }
    }

    pub fn record(&mut self, kind: FieldKind, selector: impl Into<String>, status: FieldStatus) {
        self.events.push(FieldEvent {
            kind,
            selector: selector.into(),
            status,
        });
    }

    pub fn is_success(&self) -> bool {
        self.verdict.is_success()
    }

    /// Selectors of fields of `kind` that were interacted with
    pub fn actuated(&self, kind: FieldKind) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.kind == kind && e.status == FieldStatus::Actuated)
            .map(|e| e.selector.as_str())
            .collect()
    }

    pub fn skipped_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.status == FieldStatus::Skipped)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_starts_as_failure() {
        let report = AttemptReport::new("a@x.com", "https://a.test");
        assert!(!report.is_success());
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_actuated_filters_by_kind() {
        let mut report = AttemptReport::new("a@x.com", "https://a.test");
        report.record(FieldKind::Email, "[name=\"email\"]", FieldStatus::Actuated);
        report.record(FieldKind::Email, "#email2", FieldStatus::Skipped);
        report.record(FieldKind::Checkbox, "#gdpr", FieldStatus::Actuated);

        assert_eq!(report.actuated(FieldKind::Email), vec!["[name=\"email\"]"]);
        assert_eq!(report.skipped_count(), 1);
    }
}
