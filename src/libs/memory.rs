//! In-memory time-entry store.
//!
//! The reference implementation of [`TimeEntryStore`]: a mutex-guarded map
//! of entries plus an injected clock. It applies transitions through the
//! shared appliers on [`TimeEntry`], so its semantics are exactly those of
//! the state machine, including the deliberate absence of cross-task
//! checks on start.
//!
//! Tests can flip [`MemoryStore::set_unavailable`] to make every operation
//! fail the way an unreachable backend would.

use crate::libs::clock::Clock;
use crate::libs::entry::TimeEntry;
use crate::libs::store::{StoreError, StoreResult, TimeEntryStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

pub struct MemoryStore {
    entries: Mutex<HashMap<i64, TimeEntry>>,
    next_id: AtomicI64,
    clock: Arc<dyn Clock>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        MemoryStore {
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            clock,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulates an unreachable backend; while set, every operation fails
    /// with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Returns a snapshot of an entry regardless of lifecycle phase.
    pub fn get(&self, entry_id: i64) -> Option<TimeEntry> {
        self.entries.lock().get(&entry_id).cloned()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }

    /// Looks up an entry and applies a transition to it under the lock.
    ///
    /// Completed entries are read-only with respect to timer transitions;
    /// any attempt is refused before `apply` runs.
    fn transition<F>(&self, entry_id: i64, apply: F) -> StoreResult<TimeEntry>
    where
        F: FnOnce(&mut TimeEntry) -> StoreResult<()>,
    {
        self.check_available()?;
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(&entry_id).ok_or(StoreError::NotFound(entry_id))?;
        if !entry.is_active() {
            return Err(StoreError::Precondition(format!("time entry {} is already completed", entry_id)));
        }
        apply(entry)?;
        Ok(entry.clone())
    }
}

#[async_trait]
impl TimeEntryStore for MemoryStore {
    async fn start_tracking(&self, task_id: &str) -> StoreResult<TimeEntry> {
        self.check_available()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = TimeEntry::started(id, task_id, self.clock.now());
        self.entries.lock().insert(id, entry.clone());
        Ok(entry)
    }

    async fn stop_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
        let now = self.clock.now();
        self.transition(entry_id, |entry| {
            entry.complete_at(now);
            Ok(())
        })
    }

    async fn pause_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
        let now = self.clock.now();
        self.transition(entry_id, |entry| {
            if entry.is_paused {
                return Err(StoreError::Precondition(format!("time entry {} is already paused", entry_id)));
            }
            entry.pause_at(now);
            Ok(())
        })
    }

    async fn resume_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
        let now = self.clock.now();
        self.transition(entry_id, |entry| {
            if !entry.is_paused {
                return Err(StoreError::Precondition(format!("time entry {} is not paused", entry_id)));
            }
            entry.resume_at(now);
            Ok(())
        })
    }

    async fn reset_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
        let now = self.clock.now();
        self.transition(entry_id, |entry| {
            entry.reset_at(now);
            Ok(())
        })
    }

    async fn fetch_active(&self) -> StoreResult<Vec<TimeEntry>> {
        self.check_available()?;
        let entries = self.entries.lock();
        let mut active: Vec<TimeEntry> = entries.values().filter(|e| e.is_active()).cloned().collect();
        active.sort_by_key(|e| e.id);
        Ok(active)
    }
}
