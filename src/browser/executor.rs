//! Browser executor - wraps agent-browser CLI
//!
//! Implements [`BrowserSession`] on top of agent-browser commands.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::browser::session::{BrowserSession, Element, SessionProvider};
use crate::core::{BrowserConfig, FormError, Result};

/// Browser session driven through the agent-browser CLI
pub struct AgentBrowserSession {
    /// Executable name or path
    binary: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Wait for network idle after navigating
    wait_for_load: bool,
    /// Extra flags for every invocation
    extra_args: Vec<String>,
}

impl AgentBrowserSession {
    /// Create a new session from browser configuration
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            session_name: config.session_name.clone(),
            headed: config.headed,
            wait_for_load: config.wait_for_load,
            extra_args: config.extra_args.clone(),
        }
    }

    /// Check if agent-browser is installed
    pub async fn is_available(binary: &str) -> bool {
        Command::new(binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(&self.extra_args);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FormError::AgentBrowserNotFound
            } else {
                FormError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(FormError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Evaluate JavaScript in the page and return its printed result
    async fn eval(&self, script: &str) -> Result<String> {
        self.run_command(&["eval", script])
            .await
            .map(|s| s.trim().to_string())
    }
}

/// JS string literal for a selector
fn js_literal(selector: &str) -> String {
    serde_json::Value::String(selector.to_string()).to_string()
}

/// Script answering whether a selector matches anything.
///
/// Invalid selectors count as "no match".
fn query_script(selector: &str) -> String {
    format!(
        "(() => {{ try {{ return document.querySelector({}) !== null; }} catch (e) {{ return false; }} }})()",
        js_literal(selector)
    )
}

/// Script clicking the first match through `HTMLElement.click()`
fn click_script(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); if (!el) {{ throw new Error('element detached'); }} el.click(); return true; }})()",
        js_literal(selector)
    )
}

#[async_trait]
impl BrowserSession for AgentBrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.run_command(&["open", url])
            .await
            .map_err(|e| FormError::navigation(url, e.to_string()))?;

        // Network idle is best-effort; slow trackers should not fail the visit
        if self.wait_for_load {
            let _ = self.run_command(&["wait", "--load", "networkidle"]).await;
        }

        Ok(())
    }

    async fn find_element(&mut self, selector: &str) -> Result<Element> {
        let found = self.eval(&query_script(selector)).await?;

        if found == "true" {
            Ok(Element::new(selector))
        } else {
            Err(FormError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn click(&mut self, element: &Element) -> Result<()> {
        self.eval(&click_script(element.selector()))
            .await
            .map(|_| ())
            .map_err(|e| FormError::interaction(element.selector(), e.to_string()))
    }

    async fn type_text(
        &mut self,
        element: &Element,
        text: &str,
        per_char_delay: Duration,
    ) -> Result<()> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let key = ch.encode_utf8(&mut buf);
            self.run_command(&["type", element.selector(), key])
                .await
                .map_err(|e| FormError::interaction(element.selector(), e.to_string()))?;

            if !per_char_delay.is_zero() {
                tokio::time::sleep(per_char_delay).await;
            }
        }
        Ok(())
    }

    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn dispose(&mut self) -> Result<()> {
        self.run_command(&["close"]).await.map(|_| ())
    }
}

/// Hands out agent-browser sessions configured from [`BrowserConfig`]
pub struct AgentBrowserProvider {
    config: BrowserConfig,
}

impl AgentBrowserProvider {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for AgentBrowserProvider {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>> {
        if !AgentBrowserSession::is_available(&self.config.binary).await {
            return Err(FormError::AgentBrowserNotFound);
        }

        tracing::debug!(
            session = %self.config.session_name,
            headed = self.config.headed,
            "starting browser session"
        );
        Ok(Box::new(AgentBrowserSession::new(&self.config)))
    }
}
