//! Browser session capability
//!
//! The engine only talks to the page through [`BrowserSession`]. Sessions are
//! handed out by a [`SessionProvider`] for the length of one run and must be
//! returned through [`release`].

use std::time::Duration;

use async_trait::async_trait;

use crate::core::Result;

/// Handle to a resolved page element
///
/// The handle is the selector that resolved it; sessions act on the first
/// element matching that selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    selector: String,
}

impl Element {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// Capability surface of a live browser page
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load a url in the current tab
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// First element matching a CSS selector.
    ///
    /// Returns [`crate::core::FormError::ElementNotFound`] when nothing matches.
    async fn find_element(&mut self, selector: &str) -> Result<Element>;

    /// Programmatic click that skips pointer and overlay checks
    async fn click(&mut self, element: &Element) -> Result<()>;

    /// Type `text` one character at a time, pausing `per_char_delay` after each
    async fn type_text(&mut self, element: &Element, text: &str, per_char_delay: Duration)
        -> Result<()>;

    /// Pause the session
    async fn sleep(&mut self, duration: Duration);

    /// Shut the browser down
    async fn dispose(&mut self) -> Result<()>;
}

/// Source of browser sessions, one per verification or campaign run
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Dispose a session, logging instead of failing
///
/// Called on every exit path of a run so the browser is never leaked.
pub async fn release(mut session: Box<dyn BrowserSession>) {
    if let Err(e) = session.dispose().await {
        tracing::warn!(error = %e, "failed to dispose browser session");
    } else {
        tracing::debug!("browser session disposed");
    }
}
