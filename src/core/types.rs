//! Shared types used across formrunner modules
//!
//! Contains the declarative form schema, registry records and attempt verdicts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{FormError, Result};

/// Declarative reference to one page element
///
/// Every fragment is optional; a descriptor with none of them cannot be
/// resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    /// CSS class (rendered as `.<class>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Element id (rendered as `#<id>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `name` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `value` attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldDescriptor {
    /// Descriptor matching on the `name` attribute only
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Descriptor matching on the element id only
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Descriptor matching on a CSS class only
    pub fn by_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    /// Add a `value` attribute constraint
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Check if no fragment is present
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.id.is_none() && self.name.is_none() && self.value.is_none()
    }
}

/// Declarative description of a form's interactive elements
///
/// Absent lists stay absent when written back to disk, so each list is kept
/// as an `Option`. Use the accessors to read them as slices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSchema {
    /// Checkboxes to tick, best-effort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkboxes: Option<Vec<FieldDescriptor>>,
    /// Inputs that receive the identity's email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Vec<FieldDescriptor>>,
    /// Radio buttons to select, best-effort
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radios: Option<Vec<FieldDescriptor>>,
    /// Submit candidates; only the first that resolves is clicked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit: Option<Vec<FieldDescriptor>>,
    /// Seconds to pause after the submit click
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<f64>,
}

impl FormSchema {
    /// Schema used when a record has no `input_fields`: one email input
    /// keyed by `name="email"` and nothing else.
    pub fn email_only() -> Self {
        Self {
            email: Some(vec![FieldDescriptor::by_name("email")]),
            ..Self::default()
        }
    }

    pub fn checkboxes(&self) -> &[FieldDescriptor] {
        self.checkboxes.as_deref().unwrap_or_default()
    }

    pub fn email(&self) -> &[FieldDescriptor] {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn radios(&self) -> &[FieldDescriptor] {
        self.radios.as_deref().unwrap_or_default()
    }

    pub fn submit(&self) -> &[FieldDescriptor] {
        self.submit.as_deref().unwrap_or_default()
    }

    /// Post-submit pause, `None` when absent or zero
    pub fn wait_duration(&self) -> Option<Duration> {
        self.wait
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Reject shapes serde alone cannot rule out
    pub fn validate(&self) -> Result<()> {
        if let Some(wait) = self.wait {
            if Duration::try_from_secs_f64(wait).is_err() {
                return Err(FormError::InvalidSchema(format!(
                    "wait must be a non-negative number of seconds, got {}",
                    wait
                )));
            }
        }
        Ok(())
    }
}

/// A target url with its form schema and verification flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Page hosting the form
    pub url: String,
    /// Whether any attempt against this target has succeeded
    pub verified: bool,
    /// Form schema; see [`TargetRecord::schema`] for the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_fields: Option<FormSchema>,
}

impl TargetRecord {
    /// Create a new unverified record
    pub fn new(url: impl Into<String>, input_fields: Option<FormSchema>) -> Self {
        Self {
            url: url.into(),
            verified: false,
            input_fields,
        }
    }

    /// Effective schema, falling back to [`FormSchema::email_only`]
    pub fn schema(&self) -> FormSchema {
        self.input_fields
            .clone()
            .unwrap_or_else(FormSchema::email_only)
    }
}

/// Outcome of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Success,
    Failure,
}

impl Verdict {
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::Success)
    }
}

impl From<bool> for Verdict {
    fn from(success: bool) -> Self {
        if success {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Success => write!(f, "success"),
            Verdict::Failure => write!(f, "failure"),
        }
    }
}

/// Kind of form field, which decides the interaction applied to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Checkbox,
    Email,
    Radio,
    Submit,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Checkbox => write!(f, "checkbox"),
            FieldKind::Email => write!(f, "email"),
            FieldKind::Radio => write!(f, "radio"),
            FieldKind::Submit => write!(f, "submit"),
        }
    }
}

/// Configured email identities, in order
///
/// Blank entries are kept; every entry is trimmed when read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identities {
    emails: Vec<String>,
}

impl Identities {
    pub fn new(emails: Vec<String>) -> Self {
        Self { emails }
    }

    /// Split a comma-delimited list such as the `EMAILS` variable
    pub fn parse(raw: &str) -> Self {
        Self {
            emails: raw.split(',').map(str::to_string).collect(),
        }
    }

    /// Raw entries, untrimmed
    pub fn into_emails(self) -> Vec<String> {
        self.emails
    }

    /// Iterate trimmed identities
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(|email| email.trim())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_is_empty() {
        assert!(FieldDescriptor::default().is_empty());
        assert!(!FieldDescriptor::by_name("email").is_empty());
        assert!(!FieldDescriptor::default().with_value("yes").is_empty());
    }

    #[test]
    fn test_schema_accessors_default_to_empty() {
        let schema = FormSchema::default();
        assert!(schema.checkboxes().is_empty());
        assert!(schema.email().is_empty());
        assert!(schema.radios().is_empty());
        assert!(schema.submit().is_empty());
        assert!(schema.wait_duration().is_none());
    }

    #[test]
    fn test_missing_input_fields_defaults_to_email_only() {
        let record: TargetRecord =
            serde_json::from_str(r#"{"url": "https://a.test/join", "verified": true}"#).unwrap();
        let schema = record.schema();
        assert_eq!(schema.email(), &[FieldDescriptor::by_name("email")]);
        assert!(schema.submit().is_empty());
        assert!(record.input_fields.is_none());
    }

    #[test]
    fn test_absent_fields_stay_absent_on_disk() {
        let record = TargetRecord::new(
            "https://a.test",
            Some(FormSchema {
                submit: Some(vec![FieldDescriptor::by_id("go")]),
                ..FormSchema::default()
            }),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"url":"https://a.test","verified":false,"input_fields":{"submit":[{"id":"go"}]}}"#
        );
    }

    #[test]
    fn test_unknown_descriptor_key_rejected() {
        let result = serde_json::from_str::<FieldDescriptor>(r#"{"clas": "btn"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_wait_rejected() {
        let schema = FormSchema {
            wait: Some(-1.0),
            ..FormSchema::default()
        };
        assert!(matches!(schema.validate(), Err(FormError::InvalidSchema(_))));

        let schema = FormSchema {
            wait: Some(2.5),
            ..FormSchema::default()
        };
        assert!(schema.validate().is_ok());
        assert_eq!(schema.wait_duration(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_unrepresentable_wait_rejected() {
        for wait in [1e20, f64::INFINITY, f64::NAN] {
            let schema = FormSchema {
                wait: Some(wait),
                ..FormSchema::default()
            };
            assert!(matches!(schema.validate(), Err(FormError::InvalidSchema(_))));
            assert!(schema.wait_duration().is_none());
        }
    }

    #[test]
    fn test_identities_keep_blanks_and_trim() {
        let identities = Identities::parse(" a@x.com,b@y.org , ,");
        assert_eq!(identities.len(), 4);
        let trimmed: Vec<&str> = identities.iter().collect();
        assert_eq!(trimmed, vec!["a@x.com", "b@y.org", "", ""]);
    }

    #[test]
    fn test_verdict_from_bool() {
        assert_eq!(Verdict::from(true), Verdict::Success);
        assert!(!Verdict::from(false).is_success());
        assert_eq!(Verdict::Failure.to_string(), "failure");
    }
}
