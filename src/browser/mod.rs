//! Browser automation module
//!
//! Session capability trait plus the agent-browser backed implementation.

mod executor;
mod session;

pub use executor::{AgentBrowserProvider, AgentBrowserSession};
pub use session::{release, BrowserSession, Element, SessionProvider};
