//! Time entry model and the pause/resume elapsed-time calculation.
//!
//! A [`TimeEntry`] is the sole entity the timer core operates on. Its
//! lifecycle has two phases, decided only by `end_time`: *active* (still
//! trackable, possibly paused) and *completed* (frozen, `duration` holds the
//! authoritative total). All transition effects live here as appliers so
//! every store implementation mutates entries the same way and the elapsed
//! computation exists in exactly one place.
//!
//! ## Elapsed accounting
//!
//! `banked_seconds` holds the running time accumulated across all prior
//! running segments, frozen at the moment of the most recent pause. While
//! running, the live elapsed value is `banked_seconds` plus the time since
//! `last_resumed_at`; while paused it is `banked_seconds` alone. The value is
//! always recomputed from the stored timestamps, never incremented, so
//! calling it once per second accumulates no drift.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tracked period of work on a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Unique entry identifier.
    pub id: i64,
    /// Owning task. A foreign reference; the task itself is not stored here.
    pub task_id: String,
    /// When tracking began. Never changed by any transition, including reset.
    pub start_time: DateTime<Utc>,
    /// When tracking completed. Absent while the entry is active.
    pub end_time: Option<DateTime<Utc>>,
    /// True while the entry is paused.
    pub is_paused: bool,
    /// Timestamp of the most recent resume (or the initial start). Stale
    /// while paused; consumers must gate on `is_paused` before using it.
    pub last_resumed_at: Option<DateTime<Utc>>,
    /// Elapsed running time banked at the most recent pause, in seconds.
    /// The wire name is historical: upstream data calls this
    /// `totalPausedDuration` even though it has always held elapsed
    /// *running* time, not time spent paused.
    #[serde(rename = "totalPausedDuration")]
    pub banked_seconds: f64,
    /// Final total elapsed time in seconds, set only when `end_time` is set.
    pub duration: Option<f64>,
    /// Free-form text attached to the entry.
    pub notes: String,
}

/// Lifecycle state of a timer, as displayed to the user.
///
/// `Idle` means no entry exists for a task; the other three are derived from
/// an entry's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerState {
    pub fn label(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Completed => "completed",
        }
    }
}

impl TimeEntry {
    /// Creates an entry in the freshly started state.
    pub fn started(id: i64, task_id: &str, now: DateTime<Utc>) -> Self {
        TimeEntry {
            id,
            task_id: task_id.to_string(),
            start_time: now,
            end_time: None,
            is_paused: false,
            last_resumed_at: Some(now),
            banked_seconds: 0.0,
            duration: None,
            notes: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_running(&self) -> bool {
        self.is_active() && !self.is_paused
    }

    pub fn state(&self) -> TimerState {
        if self.end_time.is_some() {
            TimerState::Completed
        } else if self.is_paused {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    /// Seconds elapsed so far, computed from the stored fields and `now`.
    ///
    /// Paused entries (and entries that somehow lack a resume timestamp)
    /// report the banked baseline. A `now` earlier than `last_resumed_at`
    /// clamps to the baseline instead of going negative, so clock skew can
    /// never make the display jump backwards below it.
    ///
    /// Not meaningful for completed entries; read `duration` instead.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        let baseline = self.banked_seconds.floor() as i64;
        if self.is_paused {
            return baseline;
        }
        let Some(resumed_at) = self.last_resumed_at else {
            return baseline;
        };
        let delta_ms = (now - resumed_at).num_milliseconds();
        if delta_ms < 0 {
            return baseline;
        }
        (self.banked_seconds + delta_ms as f64 / 1000.0).floor() as i64
    }

    /// Banks the elapsed time accumulated so far and marks the entry paused.
    ///
    /// `last_resumed_at` is deliberately left untouched; it becomes stale
    /// until the next resume.
    pub fn pause_at(&mut self, now: DateTime<Utc>) {
        if let Some(resumed_at) = self.last_resumed_at {
            let delta_ms = (now - resumed_at).num_milliseconds().max(0);
            self.banked_seconds += delta_ms as f64 / 1000.0;
        }
        self.is_paused = true;
    }

    /// Restarts the running segment. The banked baseline is untouched; the
    /// next elapsed computation adds to it from `now`.
    pub fn resume_at(&mut self, now: DateTime<Utc>) {
        self.last_resumed_at = Some(now);
        self.is_paused = false;
    }

    /// Completes the entry, freezing `duration` at exactly the value the
    /// calculator would report at this instant.
    pub fn complete_at(&mut self, now: DateTime<Utc>) {
        let elapsed = self.elapsed_seconds(now);
        self.end_time = Some(now);
        self.duration = Some(elapsed as f64);
    }

    /// Discards all accumulated elapsed time while keeping the entry open.
    ///
    /// `start_time`, `task_id` and `id` are unchanged.
    pub fn reset_at(&mut self, now: DateTime<Utc>) {
        self.banked_seconds = 0.0;
        self.last_resumed_at = Some(now);
        self.is_paused = false;
    }
}
