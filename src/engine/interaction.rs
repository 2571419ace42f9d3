//! Form interaction engine
//!
//! Runs one schema against one page for one identity:
//! checkboxes → email fields → radios → submit.
//!
//! Missing fields are skipped. Anything else that goes wrong, including a
//! panic, ends the attempt with [`Verdict::Failure`] and never escapes
//! [`SubmissionEngine::run_attempt`].

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::Instrument;

use crate::browser::BrowserSession;
use crate::core::{FieldKind, FormSchema, Result, TypingConfig, Verdict};
use crate::engine::actuator::{FieldActuator, TypingPolicy};
use crate::engine::report::{AttemptReport, FieldStatus};
use crate::engine::selector::SelectorResolver;

/// Anything that can run an attempt and yield a verdict
#[async_trait]
pub trait SubmissionEngine: Send + Sync {
    /// Run one attempt and report what happened
    async fn run_attempt(
        &self,
        identity: &str,
        url: &str,
        schema: &FormSchema,
        session: &mut dyn BrowserSession,
    ) -> AttemptReport;

    /// Run one attempt, keeping only the verdict
    async fn attempt(
        &self,
        identity: &str,
        url: &str,
        schema: &FormSchema,
        session: &mut dyn BrowserSession,
    ) -> Verdict {
        self.run_attempt(identity, url, schema, session)
            .await
            .verdict
    }
}

/// Schema-driven form filler
#[derive(Debug, Clone, Default)]
pub struct FormInteractionEngine {
    resolver: SelectorResolver,
    actuator: FieldActuator,
}

impl FormInteractionEngine {
    pub fn new(actuator: FieldActuator) -> Self {
        Self {
            resolver: SelectorResolver::new(),
            actuator,
        }
    }

    /// Engine with keystroke timing taken from configuration
    pub fn from_config(typing: &TypingConfig) -> Self {
        Self::new(FieldActuator::new(TypingPolicy::from_config(typing)))
    }

    async fn run(
        &self,
        identity: &str,
        url: &str,
        schema: &FormSchema,
        session: &mut dyn BrowserSession,
        report: &mut AttemptReport,
    ) -> Result<Verdict> {
        session.navigate(url).await?;

        let best_effort = [
            (FieldKind::Checkbox, schema.checkboxes()),
            (FieldKind::Email, schema.email()),
            (FieldKind::Radio, schema.radios()),
        ];

        for (kind, descriptors) in best_effort {
            for descriptor in descriptors {
                let selector = SelectorResolver::compose(descriptor).unwrap_or_default();

                let element = match self.resolver.resolve(descriptor, session).await {
                    Ok(element) => element,
                    Err(e) if e.is_resolution_failure() => {
                        tracing::debug!(%kind, %selector, "field not found, skipping");
                        report.record(kind, selector, FieldStatus::Skipped);
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                self.actuator
                    .actuate(session, kind, &element, identity, None)
                    .await?;

                if kind == FieldKind::Email {
                    tracing::info!(%selector, "filled email field");
                } else {
                    tracing::debug!(%kind, %selector, "clicked field");
                }
                report.record(kind, selector, FieldStatus::Actuated);
            }
        }

        // One submission per visit: stop at the first control that resolves
        for descriptor in schema.submit() {
            let selector = SelectorResolver::compose(descriptor).unwrap_or_default();

            let element = match self.resolver.resolve(descriptor, session).await {
                Ok(element) => element,
                Err(e) if e.is_resolution_failure() => {
                    tracing::debug!(%selector, "submit candidate not found");
                    report.record(FieldKind::Submit, selector, FieldStatus::Skipped);
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.actuator
                .actuate(
                    session,
                    FieldKind::Submit,
                    &element,
                    identity,
                    schema.wait_duration(),
                )
                .await?;

            tracing::info!(%selector, "clicked submit button");
            report.record(FieldKind::Submit, selector.clone(), FieldStatus::Actuated);
            report.submitted = Some(selector);
            return Ok(Verdict::Success);
        }

        tracing::warn!("submit button not found");
        Ok(Verdict::Failure)
    }
}

#[async_trait]
impl SubmissionEngine for FormInteractionEngine {
    async fn run_attempt(
        &self,
        identity: &str,
        url: &str,
        schema: &FormSchema,
        session: &mut dyn BrowserSession,
    ) -> AttemptReport {
        let mut report = AttemptReport::new(identity, url);
        let span = tracing::info_span!("attempt", %identity, %url);

        let outcome = AssertUnwindSafe(self.run(identity, url, schema, session, &mut report))
            .catch_unwind()
            .instrument(span)
            .await;

        report.verdict = match outcome {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                tracing::warn!(%identity, %url, error = %e, "attempt failed");
                report.error = Some(e.to_string());
                Verdict::Failure
            }
            Err(_) => {
                tracing::error!(%identity, %url, "attempt panicked");
                report.error = Some("attempt panicked".to_string());
                Verdict::Failure
            }
        };

        report
    }
}
