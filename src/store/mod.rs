//! Volatile in-memory stores backing the mock CRUD routes.

mod activity_log;
mod env_vars;

pub use activity_log::{ActivityLogEntry, ActivityLogStore, ActivityStatus};
pub use env_vars::{EnvVarRecord, EnvVarStore, MASKED_VALUE};
