//! Campaign pass
//!
//! Replays the engine for every identity over every verified target. Nothing
//! is written back; failures are counted and the pass moves on.

use std::sync::Arc;

use crate::browser::{release, BrowserSession, SessionProvider};
use crate::core::{Identities, Result, TargetRecord};
use crate::engine::SubmissionEngine;
use crate::registry::{RecordFilter, SubscriptionRegistry};

/// Progress counters for one campaign pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignSummary {
    pub attempts: usize,
    pub successes: usize,
    pub failures: usize,
}

/// Read-only replay over verified targets
pub struct CampaignController {
    registry: SubscriptionRegistry,
    identities: Identities,
    engine: Arc<dyn SubmissionEngine>,
    sessions: Arc<dyn SessionProvider>,
}

impl CampaignController {
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

    /// Run one campaign pass
    pub async fn run(&self) -> Result<CampaignSummary> {
        let targets = self.registry.load(RecordFilter::Verified)?;
        if targets.is_empty() {
            tracing::info!("no verified urls found");
            return Ok(CampaignSummary::default());
        }

        let mut session = self.sessions.acquire().await?;
        let summary = self.replay(session.as_mut(), &targets).await;
        release(session).await;

        tracing::info!(
            attempts = summary.attempts,
            successes = summary.successes,
            failures = summary.failures,
            "campaign completed"
        );
        Ok(summary)
    }

    async fn replay(
        &self,
        session: &mut dyn BrowserSession,
        targets: &[TargetRecord],
    ) -> CampaignSummary {
        let mut summary = CampaignSummary::default();
        let total = self.identities.len() * targets.len();

        for identity in self.identities.iter() {
            for record in targets {
                let url = record.url.trim();
                let verdict = self
                    .engine
                    .attempt(identity, url, &record.schema(), session)
                    .await;

                summary.attempts += 1;
                if verdict.is_success() {
                    summary.successes += 1;
                } else {
                    summary.failures += 1;
                }
                tracing::info!(
                    progress = %format!("{}/{}", summary.attempts, total),
                    %identity,
                    %url,
                    %verdict,
                    "campaign attempt"
                );
            }
        }

        summary
    }
}
