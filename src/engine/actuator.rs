//! Field actuation
//!
//! Applies the interaction that fits each field kind to an already resolved
//! element.

use std::time::Duration;

use rand::Rng;

use crate::browser::{BrowserSession, Element};
use crate::core::{FieldKind, Result, TypingConfig};

/// Per-keystroke delay policy for typed input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingPolicy {
    enabled: bool,
    min: Duration,
    max: Duration,
}

impl TypingPolicy {
    /// Uniform delay between `min` and `max` (inclusive)
    pub fn jitter(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            enabled: true,
            min,
            max,
        }
    }

    /// No delay between keystrokes
    pub fn instant() -> Self {
        Self {
            enabled: false,
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn from_config(config: &TypingConfig) -> Self {
        if !config.enabled {
            return Self::instant();
        }
        let (min, max) = config.delay_range();
        Self::jitter(min, max)
    }

    /// Draw the delay to use for one field
    pub fn next_delay(&self) -> Duration {
        if !self.enabled || self.max.is_zero() {
            return Duration::ZERO;
        }
        if self.min == self.max {
            return self.min;
        }
        let micros = rand::rng().random_range(self.min.as_micros()..=self.max.as_micros());
        Duration::from_micros(micros as u64)
    }
}

impl Default for TypingPolicy {
    fn default() -> Self {
        Self::jitter(Duration::from_millis(30), Duration::from_millis(50))
    }
}

/// Performs clicks and typed entry on resolved elements
#[derive(Debug, Clone, Default)]
pub struct FieldActuator {
    typing: TypingPolicy,
}

impl FieldActuator {
    pub fn new(typing: TypingPolicy) -> Self {
        Self { typing }
    }

    pub fn typing(&self) -> &TypingPolicy {
        &self.typing
    }

    /// Apply the interaction for `kind`.
    ///
    /// `email` is only used for email fields, `wait` only for submit.
    pub async fn actuate(
        &self,
        session: &mut dyn BrowserSession,
        kind: FieldKind,
        element: &Element,
        email: &str,
        wait: Option<Duration>,
    ) -> Result<()> {
        match kind {
            FieldKind::Checkbox | FieldKind::Radio => self.click(session, element).await,
            FieldKind::Email => self.fill(session, element, email).await,
            FieldKind::Submit => self.submit(session, element, wait).await,
        }
    }

    /// Programmatic click, works on hidden or overlaid inputs
    pub async fn click(&self, session: &mut dyn BrowserSession, element: &Element) -> Result<()> {
        session.click(element).await
    }

    /// Keystroke-by-keystroke entry with the policy's delay
    pub async fn fill(
        &self,
        session: &mut dyn BrowserSession,
        element: &Element,
        text: &str,
    ) -> Result<()> {
        let delay = self.typing.next_delay();
        session.type_text(element, text, delay).await
    }

    /// Click the submit control, then hold for `wait`
    pub async fn submit(
        &self,
        session: &mut dyn BrowserSession,
        element: &Element,
        wait: Option<Duration>,
    ) -> Result<()> {
        session.click(element).await?;

        if let Some(wait) = wait {
            tracing::info!(seconds = wait.as_secs_f64(), "waiting after submit");
            session.sleep(wait).await;
        }
        Ok(())
    }
}
