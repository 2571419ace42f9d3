//! Engine module - generic form interaction
//!
//! Resolves declarative field descriptors, actuates them, and classifies
//! each attempt as success or failure.

mod actuator;
mod interaction;
mod report;
mod selector;

pub use actuator::{FieldActuator, TypingPolicy};
pub use interaction::{FormInteractionEngine, SubmissionEngine};
pub use report::{AttemptReport, FieldEvent, FieldStatus};
pub use selector::SelectorResolver;
