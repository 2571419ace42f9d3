//! Configuration management for formrunner
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/formrunner/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::{FormError, Result};
use crate::core::types::Identities;

/// Main configuration for formrunner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Registry file configuration
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Email identities used for attempts
    #[serde(default)]
    pub identities: IdentityConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Keystroke timing configuration
    #[serde(default)]
    pub typing: TypingConfig,
}

/// Registry persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path of the JSON registry file
    /// Default: email_subscription.json
    pub path: PathBuf,
}

/// Identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Email addresses, tried in order
    pub emails: Vec<String>,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Executable used to drive the browser
    pub binary: String,
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Wait for network idle after each navigation
    pub wait_for_load: bool,
    /// Extra arguments passed to every agent-browser invocation
    #[serde(default)]
    pub extra_args: Vec<String>,
}

/// Human-like typing cadence for email fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingConfig {
    /// Whether to pause between keystrokes at all
    pub enabled: bool,
    /// Lower bound of the per-keystroke delay in ms
    /// Default: 30
    pub min_delay_ms: u64,
    /// Upper bound of the per-keystroke delay in ms
    /// Default: 50
    pub max_delay_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: env::var("FORMRUNNER_REGISTRY")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("email_subscription.json")),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            emails: env::var("EMAILS")
                .map(|raw| split_emails(&raw))
                .unwrap_or_default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: env::var("FORMRUNNER_BROWSER_BIN")
                .unwrap_or_else(|_| "agent-browser".to_string()),
            session_name: env::var("FORMRUNNER_BROWSER_SESSION")
                .unwrap_or_else(|_| "formrunner".to_string()),
            headed: env::var("FORMRUNNER_BROWSER_HEADED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            wait_for_load: true,
            extra_args: Vec::new(),
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay_ms: 30,
            max_delay_ms: 50,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("formrunner")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = Self::from_file_or_default(&Self::config_file());
        config.apply_env();
        config
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        Self::load_from_path(&Self::config_file())
    }

    /// Load configuration from a specific file
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Err(FormError::config("Config file not found"));
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| FormError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Config from `config_path`, or defaults when it is missing or unusable.
    ///
    /// A file that exists but cannot be used is logged, not ignored silently.
    pub fn from_file_or_default(config_path: &Path) -> Self {
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_path(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "ignoring unusable config file, falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| FormError::config(format!("Failed to parse config: {}", e)))?;
        config.typing.validate()?;
        Ok(config)
    }

    /// Environment variables win over the config file
    fn apply_env(&mut self) {
        if let Ok(path) = env::var("FORMRUNNER_REGISTRY") {
            self.registry.path = PathBuf::from(path);
        }
        if let Ok(raw) = env::var("EMAILS") {
            self.identities.emails = split_emails(&raw);
        }
    }

    /// Identities as consumed by the controllers
    pub fn identities(&self) -> Identities {
        Identities::new(self.identities.emails.clone())
    }

    /// Override the identity list from a comma-delimited string
    pub fn set_emails(&mut self, raw: &str) {
        self.identities.emails = split_emails(raw);
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

impl TypingConfig {
    /// Keystroke timing disabled, for deterministic runs
    pub fn instant() -> Self {
        Self {
            enabled: false,
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }

    fn validate(&self) -> Result<()> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(FormError::config(format!(
                "typing.min_delay_ms ({}) exceeds typing.max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}

/// Comma-delimited identity list, blanks kept
fn split_emails(raw: &str) -> Vec<String> {
    Identities::parse(raw).into_emails()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_typing_range() {
        let typing = TypingConfig::default();
        assert!(typing.enabled);
        assert_eq!(
            typing.delay_range(),
            (Duration::from_millis(30), Duration::from_millis(50))
        );
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = Config::default_config_toml();
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("[typing]"));
        assert!(toml_str.contains("session_name"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [identities]
            emails = ["a@x.com", " b@y.org"]
            "#,
        )
        .unwrap();
        let identities = config.identities();
        let emails: Vec<&str> = identities.iter().collect();
        assert_eq!(emails, vec!["a@x.com", "b@y.org"]);
        assert_eq!(config.typing.max_delay_ms, 50);
    }

    #[test]
    fn test_inverted_typing_range_rejected() {
        let result = Config::from_toml(
            r#"
            [typing]
            enabled = true
            min_delay_ms = 80
            max_delay_ms = 10
            "#,
        );
        assert!(matches!(result, Err(FormError::Config(_))));
    }

    #[test]
    fn test_set_emails_keeps_blank_entries() {
        let mut config = Config::default();
        config.set_emails("a@x.com,,b@y.org");
        assert_eq!(config.identities().len(), 3);
    }

    #[test]
    fn test_split_emails_matches_identity_parsing() {
        let raw = " a@x.com,,b@y.org ";
        assert_eq!(split_emails(raw), vec![" a@x.com", "", "b@y.org "]);
        assert_eq!(Identities::new(split_emails(raw)), Identities::parse(raw));
    }

    #[test]
    fn test_malformed_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[typing\nenabled = ").unwrap();
        assert!(Config::load_from_path(&path).is_err());
        let config = Config::from_file_or_default(&path);
        assert_eq!(config.typing.max_delay_ms, 50);

        fs::write(&path, "[typing]\nenabled = true\nmin_delay_ms = 80\nmax_delay_ms = 10\n")
            .unwrap();
        let config = Config::from_file_or_default(&path);
        assert_eq!(config.typing.min_delay_ms, 30);
    }

    #[test]
    fn test_config_file_values_used_when_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[typing]\nenabled = false\nmin_delay_ms = 5\nmax_delay_ms = 9\n")
            .unwrap();

        let config = Config::from_file_or_default(&path);
        assert!(!config.typing.enabled);
        assert_eq!(config.typing.max_delay_ms, 9);

        let missing = Config::from_file_or_default(&dir.path().join("absent.toml"));
        assert!(missing.typing.enabled);
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("formrunner"));
    }
}
