//! Timer state machine over a time-entry store.
//!
//! [`Tracker`] governs the lifecycle of a time entry (start, pause, resume,
//! stop, reset) against whatever store backs it. It contributes the pieces
//! the store does not: the start-time policy gate, a per-timer in-flight
//! guard so a double-submitted control cannot issue two overlapping round
//! trips, and a change notification that lets observers converge after every
//! successful transition.
//!
//! A failed store call mutates nothing locally and is never retried; the
//! message is surfaced and the prior displayed state stays intact. The next
//! user action is free to try again.

use crate::libs::entry::TimeEntry;
use crate::libs::store::{StoreError, TimeEntryStore};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Whether starting a timer checks for other active entries first.
///
/// The store itself never hard-enforces a single running timer, so this is
/// a policy of the state machine, not an invariant of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingleTimerPolicy {
    /// Start never looks at other entries.
    Unchecked,
    /// Start is refused while the same task already has an active entry.
    PerTask,
    /// Start is refused while any task has an active entry.
    Global,
}

impl Default for SingleTimerPolicy {
    fn default() -> Self {
        SingleTimerPolicy::PerTask
    }
}

impl std::fmt::Display for SingleTimerPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SingleTimerPolicy::Unchecked => "unchecked",
            SingleTimerPolicy::PerTask => "per-task",
            SingleTimerPolicy::Global => "global",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    /// A transition for the same timer is still waiting on the store.
    #[error("another operation is still in flight for this timer")]
    Busy,

    /// Refused by [`SingleTimerPolicy::PerTask`].
    #[error("task '{0}' already has an active timer")]
    TaskAlreadyTracking(String),

    /// Refused by [`SingleTimerPolicy::Global`].
    #[error("a timer is already active on task '{0}'")]
    AnotherTaskTracking(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Key identifying the control a transition belongs to. Start is keyed by
/// task (no entry exists yet), everything else by entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum OpKey {
    Task(String),
    Entry(i64),
}

pub struct Tracker {
    store: Arc<dyn TimeEntryStore>,
    policy: SingleTimerPolicy,
    in_flight: Mutex<HashSet<OpKey>>,
    refresh_tx: watch::Sender<u64>,
}

/// Removes the in-flight marker when the transition completes, in success
/// and failure alike.
struct InFlight<'a> {
    tracker: &'a Tracker,
    key: OpKey,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.tracker.in_flight.lock().remove(&self.key);
    }
}

impl Tracker {
    pub fn new(store: Arc<dyn TimeEntryStore>, policy: SingleTimerPolicy) -> Self {
        let (refresh_tx, _) = watch::channel(0);
        Tracker {
            store,
            policy,
            in_flight: Mutex::new(HashSet::new()),
            refresh_tx,
        }
    }

    /// Subscribes to the change counter bumped after every successful
    /// transition. Observers re-fetch the active set when it moves.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.refresh_tx.subscribe()
    }

    /// True while a transition for the given entry is awaiting the store.
    pub fn is_busy(&self, entry_id: i64) -> bool {
        self.in_flight.lock().contains(&OpKey::Entry(entry_id))
    }

    /// Starts tracking a new entry for `task_id`.
    ///
    /// The policy gate runs first; on `Unchecked` no lookup happens at all,
    /// matching the historically unguarded behavior. A failed start leaves
    /// no entry behind.
    pub async fn start(&self, task_id: &str) -> Result<TimeEntry, TrackerError> {
        let _guard = self.begin(OpKey::Task(task_id.to_string()))?;
        match self.policy {
            SingleTimerPolicy::Unchecked => {}
            SingleTimerPolicy::PerTask => {
                let active = self.store.fetch_active().await?;
                if active.iter().any(|e| e.task_id == task_id) {
                    return Err(TrackerError::TaskAlreadyTracking(task_id.to_string()));
                }
            }
            SingleTimerPolicy::Global => {
                let active = self.store.fetch_active().await?;
                if let Some(other) = active.first() {
                    return Err(TrackerError::AnotherTaskTracking(other.task_id.clone()));
                }
            }
        }
        let entry = self.store.start_tracking(task_id).await?;
        self.notify();
        Ok(entry)
    }

    /// Pauses a running entry, banking its elapsed time.
    pub async fn pause(&self, entry_id: i64) -> Result<TimeEntry, TrackerError> {
        let _guard = self.begin(OpKey::Entry(entry_id))?;
        let entry = self.store.pause_tracking(entry_id).await?;
        self.notify();
        Ok(entry)
    }

    /// Resumes a paused entry from now.
    pub async fn resume(&self, entry_id: i64) -> Result<TimeEntry, TrackerError> {
        let _guard = self.begin(OpKey::Entry(entry_id))?;
        let entry = self.store.resume_tracking(entry_id).await?;
        self.notify();
        Ok(entry)
    }

    /// Completes an entry; its duration is frozen at this instant.
    pub async fn stop(&self, entry_id: i64) -> Result<TimeEntry, TrackerError> {
        let _guard = self.begin(OpKey::Entry(entry_id))?;
        let entry = self.store.stop_tracking(entry_id).await?;
        self.notify();
        Ok(entry)
    }

    /// Discards an entry's accumulated time, leaving it running.
    pub async fn reset(&self, entry_id: i64) -> Result<TimeEntry, TrackerError> {
        let _guard = self.begin(OpKey::Entry(entry_id))?;
        let entry = self.store.reset_tracking(entry_id).await?;
        self.notify();
        Ok(entry)
    }

    /// Finds the active entry for a task, if any.
    pub async fn active_entry_for(&self, task_id: &str) -> Result<Option<TimeEntry>, StoreError> {
        let active = self.store.fetch_active().await?;
        Ok(active.into_iter().find(|e| e.task_id == task_id))
    }

    fn begin(&self, key: OpKey) -> Result<InFlight<'_>, TrackerError> {
        if !self.in_flight.lock().insert(key.clone()) {
            return Err(TrackerError::Busy);
        }
        Ok(InFlight { tracker: self, key })
    }

    fn notify(&self) {
        self.refresh_tx.send_modify(|generation| *generation += 1);
    }
}
