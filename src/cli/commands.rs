//! CLI commands
//!
//! Actions shared by the one-shot subcommands and the interactive menu.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::browser::{AgentBrowserProvider, SessionProvider};
use crate::controller::{CampaignController, VerificationController};
use crate::core::{Config, FormError, FormSchema, Identities, Result, TargetRecord};
use crate::engine::{FormInteractionEngine, SubmissionEngine};
use crate::registry::SubscriptionRegistry;

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Append a target, optionally with a schema file
    AddTarget {
        url: String,
        schema: Option<PathBuf>,
    },
    /// Print every target with its status
    ListTargets,
    /// Flip verification of a 1-based position
    Toggle { position: usize },
    /// Run a verification pass
    Verify,
    /// Run a campaign pass
    Campaign,
}

/// Collaborators the actions run against
pub struct CommandContext {
    registry: SubscriptionRegistry,
    identities: Identities,
    engine: Arc<dyn SubmissionEngine>,
    sessions: Arc<dyn SessionProvider>,
}

impl CommandContext {
    pub fn new(
        registry: SubscriptionRegistry,
        identities: Identities,
        engine: Arc<dyn SubmissionEngine>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            registry,
            identities,
            engine,
            sessions,
        }
    }

    /// Wire the agent-browser backed stack from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SubscriptionRegistry::new(config.registry.path.clone()),
            config.identities(),
            Arc::new(FormInteractionEngine::from_config(&config.typing)),
            Arc::new(AgentBrowserProvider::new(config.browser.clone())),
        )
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    fn verification(&self) -> VerificationController {
        VerificationController::new(
            self.registry.clone(),
            self.identities.clone(),
            Arc::clone(&self.engine),
            Arc::clone(&self.sessions),
        )
    }

    fn campaign(&self) -> CampaignController {
        CampaignController::new(
            self.registry.clone(),
            self.identities.clone(),
            Arc::clone(&self.engine),
            Arc::clone(&self.sessions),
        )
    }
}

/// Run an action and return the text to show
pub async fn execute(action: Action, ctx: &CommandContext) -> Result<String> {
    match action {
        Action::AddTarget { url, schema } => {
            let schema = schema.as_deref().map(read_schema).transpose()?;
            let record = ctx.registry.add(&url, schema)?;
            Ok(format!("URL added successfully as unverified: {}", record.url))
        }

        Action::ListTargets => Ok(format_targets(&ctx.registry.list()?)),

        Action::Toggle { position } => {
            let record = ctx.registry.toggle(position)?;
            Ok(format!(
                "Verification status updated: {} - {}",
                record.url,
                status_label(record.verified)
            ))
        }

        Action::Verify => {
            if ctx.identities.is_empty() {
                return Err(FormError::config("No identities configured (set EMAILS)"));
            }
            let summary = ctx.verification().run().await?;
            if summary.targets == 0 {
                return Ok("No unverified URLs found.".to_string());
            }

            let mut output = format!(
                "Verification process completed: {} target(s), {} attempt(s)\n",
                summary.targets, summary.attempts
            );
            for url in &summary.verified {
                output.push_str(&format!("  ✔ {}\n", url));
            }
            for url in &summary.failed {
                output.push_str(&format!("  ❌ {}\n", url));
            }
            Ok(output.trim_end().to_string())
        }

        Action::Campaign => {
            if ctx.identities.is_empty() {
                return Err(FormError::config("No identities configured (set EMAILS)"));
            }
            let summary = ctx.campaign().run().await?;
            if summary.attempts == 0 {
                return Ok("No verified URLs found.".to_string());
            }
            Ok(format!(
                "Campaign completed: {} attempt(s), {} succeeded, {} failed",
                summary.attempts, summary.successes, summary.failures
            ))
        }
    }
}

/// Read a standalone schema file (the `input_fields` object)
fn read_schema(path: &Path) -> Result<FormSchema> {
    let content = fs::read_to_string(path)?;
    let schema: FormSchema = serde_json::from_str(&content)
        .map_err(|e| FormError::InvalidSchema(format!("{}: {}", path.display(), e)))?;
    schema.validate()?;
    Ok(schema)
}

fn status_label(verified: bool) -> &'static str {
    if verified {
        "✔ Verified"
    } else {
        "❌ Unverified"
    }
}

/// Numbered listing of targets, 1-based to match `toggle`
pub fn format_targets(records: &[TargetRecord]) -> String {
    if records.is_empty() {
        return "No subscription URLs registered.".to_string();
    }

    records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} - {}", i + 1, r.url, status_label(r.verified)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_targets() {
        let mut verified = TargetRecord::new("https://b.test", None);
        verified.verified = true;
        let records = vec![TargetRecord::new("https://a.test", None), verified];

        let output = format_targets(&records);
        assert_eq!(
            output,
            "1. https://a.test - ❌ Unverified\n2. https://b.test - ✔ Verified"
        );
    }

    #[test]
    fn test_format_empty_targets() {
        assert_eq!(format_targets(&[]), "No subscription URLs registered.");
    }

    #[test]
    fn test_read_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(
            &path,
            r#"{"email": [{"name": "email"}], "submit": [{"id": "subBtn"}], "wait": 2}"#,
        )
        .unwrap();

        let schema = read_schema(&path).unwrap();
        assert_eq!(schema.submit().len(), 1);
        assert_eq!(schema.wait, Some(2.0));
    }

    #[test]
    fn test_read_schema_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, r#"{"emails": [{"name": "email"}]}"#).unwrap();

        assert!(matches!(
            read_schema(&path),
            Err(FormError::InvalidSchema(_))
        ));
    }
}
