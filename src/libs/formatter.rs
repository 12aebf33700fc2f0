//! Time formatting utilities for user-facing display.
//!
//! Two representations are used throughout the application:
//!
//! - **Live elapsed** (`format_elapsed`): "HH:MM:SS" with unbounded,
//!   zero-padded hours. This is the ticking display updated once per second.
//! - **Compact summary** (`format_compact`): "Nm" for short values, hours
//!   with two decimals ("N.NNh") otherwise. Used in summary rows where a
//!   ticking display would be noise.
//!
//! All functions are pure; formatting never fails.

use crate::libs::entry::TimeEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compact display switches from minutes to fractional hours at this point.
const COMPACT_MINUTES_LIMIT_SECS: i64 = 360;

/// A time entry flattened to display strings for table rendering and export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedEntry {
    /// Row number within the rendered set, starting at 1.
    pub row: i32,
    /// Owning task identifier.
    pub task: String,
    /// Formatted start time ("HH:MM").
    pub start: String,
    /// Lifecycle state label ("running", "paused", "completed").
    pub state: String,
    /// Formatted elapsed time ("HH:MM:SS").
    pub elapsed: String,
}

/// Formats whole seconds as "HH:MM:SS".
///
/// Hours are not capped at 24; a timer left running for days keeps counting.
/// Negative input is treated as zero.
pub fn format_elapsed(seconds: i64) -> String {
    let secs = seconds.max(0);
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Formats whole seconds compactly: minutes under six minutes of elapsed
/// time, hours with two-decimal precision above.
pub fn format_compact(seconds: i64) -> String {
    let secs = seconds.max(0);
    if secs < COMPACT_MINUTES_LIMIT_SECS {
        format!("{}m", secs / 60)
    } else {
        format!("{:.2}h", secs as f64 / 3600.0)
    }
}

/// Formats a collection of entries for display.
pub trait EntryGroup {
    fn format(&self, now: DateTime<Utc>) -> Vec<FormattedEntry>;
}

impl EntryGroup for Vec<TimeEntry> {
    fn format(&self, now: DateTime<Utc>) -> Vec<FormattedEntry> {
        self.iter()
            .enumerate()
            .map(|(index, entry)| {
                // Completed entries show the frozen duration, active entries
                // the live calculation.
                let seconds = match entry.duration {
                    Some(duration) => duration as i64,
                    None => entry.elapsed_seconds(now),
                };
                FormattedEntry {
                    row: (index + 1) as i32,
                    task: entry.task_id.clone(),
                    start: entry.start_time.format("%H:%M").to_string(),
                    state: entry.state().label().to_string(),
                    elapsed: format_elapsed(seconds),
                }
            })
            .collect()
    }
}
