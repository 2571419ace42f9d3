//! Registry module - persisted target records

mod store;

pub use store::{RecordFilter, SubscriptionRegistry};
