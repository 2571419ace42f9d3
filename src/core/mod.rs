//! Core module - shared infrastructure for formrunner
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the crate.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BrowserConfig, Config, TypingConfig};
pub use error::{FormError, Result};
pub use types::*;
