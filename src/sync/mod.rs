//! Reconciliation with a remote source.
//!
//! # Architecture
//!
//! - **reconcile**: pure merge of a snapshot into the quote store
//! - **engine**: one sync cycle (fetch, merge, persist) with a busy guard
//! - **scheduler**: idle/running state machine driving the engine on a timer

pub mod engine;
pub mod reconcile;
pub mod scheduler;

pub use engine::{SyncEngine, SyncOutcome};
pub use reconcile::{reconcile, Change, ReconciliationSummary};
pub use scheduler::{SchedulerState, SyncScheduler};
