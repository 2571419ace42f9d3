//! Verification pass
//!
//! Tries every unverified target with every identity and promotes a target
//! to verified the first time any identity succeeds. Promotion is one-way;
//! later identities are still tried for the record but change nothing.

use std::sync::Arc;

use crate::browser::{release, BrowserSession, SessionProvider};
use crate::core::{Identities, Result, TargetRecord};
use crate::engine::SubmissionEngine;
use crate::registry::{RecordFilter, SubscriptionRegistry};

/// Outcome of one verification pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationSummary {
    /// Unverified targets considered
    pub targets: usize,
    /// Attempts made across all identities
    pub attempts: usize,
    /// Urls promoted to verified during this pass
    pub verified: Vec<String>,
    /// Urls no identity could submit
    pub failed: Vec<String>,
}

/// Drives unverified registry entries towards verified
pub struct VerificationController {
    registry: SubscriptionRegistry,
    identities: Identities,
    engine: Arc<dyn SubmissionEngine>,
    sessions: Arc<dyn SessionProvider>,
}

impl VerificationController {
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

    /// Run one verification pass.
    ///
    /// The browser session lives for the whole pass and is released on every
    /// exit path. Registry errors abort the pass and are returned.
    pub async fn run(&self) -> Result<VerificationSummary> {
        let targets = self.registry.load_indexed(RecordFilter::Unverified)?;
        if targets.is_empty() {
            tracing::info!("no unverified urls found");
            return Ok(VerificationSummary::default());
        }

        let mut session = self.sessions.acquire().await?;
        let outcome = self.verify_targets(session.as_mut(), &targets).await;
        release(session).await;

        let summary = outcome?;
        tracing::info!(
            targets = summary.targets,
            verified = summary.verified.len(),
            failed = summary.failed.len(),
            "verification process completed"
        );
        Ok(summary)
    }

    async fn verify_targets(
        &self,
        session: &mut dyn BrowserSession,
        targets: &[(usize, TargetRecord)],
    ) -> Result<VerificationSummary> {
        let mut summary = VerificationSummary {
            targets: targets.len(),
            ..VerificationSummary::default()
        };

        for (index, record) in targets {
            let url = record.url.trim();
            let schema = record.schema();
            let mut promoted = false;

            for identity in self.identities.iter() {
                let report = self.engine.run_attempt(identity, url, &schema, session).await;
                summary.attempts += 1;

                if !report.is_success() {
                    tracing::warn!(%url, %identity, "url failed verification");
                    continue;
                }

                if promoted {
                    tracing::info!(%url, %identity, "additional identity confirmed url");
                    continue;
                }

                promoted = true;
                tracing::info!(%url, %identity, "url verified");
                if self.registry.mark_verified(*index, &record.url)? {
                    summary.verified.push(record.url.clone());
                }
            }

            if !promoted {
                summary.failed.push(record.url.clone());
            }
        }

        Ok(summary)
    }
}
