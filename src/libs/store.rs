//! The contract between the timer core and its backing store.
//!
//! The core never assumes a particular transport. Anything that can perform
//! these six operations (an in-memory map, a database, a remote service)
//! can back the timer state machine. Each operation is a single
//! request-response round trip; none is retried automatically.
//!
//! ## Failure taxonomy
//!
//! [`StoreError`] distinguishes three situations for reporting purposes:
//! a referenced entry no longer exists, a transition was attempted from the
//! wrong state, or the store could not be reached. Callers do not branch on
//! the variant; a failed operation simply refuses the transition, leaves
//! prior state untouched and surfaces the message to the user.

use crate::libs::entry::TimeEntry;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced entry (or task) is not in the store.
    #[error("time entry {0} not found")]
    NotFound(i64),

    /// The entry exists but is in a state that forbids the transition.
    #[error("{0}")]
    Precondition(String),

    /// The store could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The six operations every time-entry store provides.
///
/// Mutating operations return the entry as the store sees it after the
/// transition, so callers can converge their local view without a follow-up
/// fetch.
#[async_trait]
pub trait TimeEntryStore: Send + Sync {
    /// Creates a new active entry for `task_id`, running from now.
    async fn start_tracking(&self, task_id: &str) -> StoreResult<TimeEntry>;

    /// Completes an active entry, freezing its final duration.
    async fn stop_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry>;

    /// Pauses a running entry, banking its elapsed time.
    async fn pause_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry>;

    /// Resumes a paused entry.
    async fn resume_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry>;

    /// Zeroes an active entry's accumulated time, leaving it running.
    async fn reset_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry>;

    /// Fetches every active entry, ordered by id.
    async fn fetch_active(&self) -> StoreResult<Vec<TimeEntry>>;
}
