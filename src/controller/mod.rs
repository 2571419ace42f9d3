//! Controller module - verification and campaign passes
//!
//! Both controllers own one browser session per run and read targets from
//! the registry. Only the verification controller writes back.

pub mod campaign;
pub mod verification;

pub use campaign::{CampaignController, CampaignSummary};
pub use verification::{VerificationController, VerificationSummary};
