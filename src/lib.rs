//! formrunner - declarative web form submission
//!
//! Fills and submits opt-in forms described by a JSON schema, and keeps a
//! registry of which target urls have been confirmed to accept a submission.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Browser**: Session capability trait and the agent-browser backend
//! - **Engine**: Selector resolution, field actuation, and attempt verdicts
//! - **Registry**: JSON-file persistence of target records
//! - **Controller**: Verification and campaign passes
//! - **CLI**: One-shot commands and the interactive menu
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use formrunner::browser::AgentBrowserProvider;
//! use formrunner::controller::VerificationController;
//! use formrunner::engine::FormInteractionEngine;
//! use formrunner::registry::SubscriptionRegistry;
//! use formrunner::Config;
//!
//! #[tokio::main]
//! async fn main() -> formrunner::Result<()> {
//!     let config = Config::load();
//!     let controller = VerificationController::new(
//!         SubscriptionRegistry::new(config.registry.path.clone()),
//!         config.identities(),
//!         Arc::new(FormInteractionEngine::from_config(&config.typing)),
//!         Arc::new(AgentBrowserProvider::new(config.browser.clone())),
//!     );
//!
//!     let summary = controller.run().await?;
//!     println!("verified: {:?}", summary.verified);
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod controller;
pub mod core;
pub mod engine;
pub mod registry;

// Re-export commonly used items
pub use cli::Menu;
pub use core::{Config, FormError, Result};
