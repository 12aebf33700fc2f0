//! Interactive time tracking session.
//!
//! Runs the timer core end to end over the in-memory store: stdin commands
//! drive the state machine while the polling driver feeds live elapsed
//! lines and periodic store reconciliation into the same loop. The session
//! owns the ticker, so ending it tears every scheduled tick down.

use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::formatter::{format_compact, format_elapsed};
use crate::libs::memory::MemoryStore;
use crate::libs::messages::Message;
use crate::libs::store::TimeEntryStore;
use crate::libs::ticker::{Ticker, TickerConfig, TickerEvent};
use crate::libs::tracker::Tracker;
use crate::libs::view::View;
use crate::{msg_debug, msg_error, msg_print, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Tasks to start tracking as soon as the session opens
    #[arg(long, short, value_name = "TASK")]
    pub start: Vec<String>,
}

pub async fn cmd(args: TrackArgs) -> Result<()> {
    let settings = Config::read()?.tracker.unwrap_or_default();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn TimeEntryStore> = Arc::new(MemoryStore::new(clock.clone()));
    let tracker = Tracker::new(store.clone(), settings.single_timer_policy);

    let ticker_config = TickerConfig {
        tick_interval: Duration::from_millis(settings.tick_interval_ms),
        refresh_interval: Duration::from_secs(settings.refresh_interval_secs),
    };
    let (ticker, mut events) = Ticker::new(ticker_config, store.clone(), clock.clone());
    ticker.start_refresh_loop();
    let mut changes = tracker.subscribe();

    msg_print!(Message::SessionStarted);
    for task in &args.start {
        start_task(&tracker, task).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events.recv() => handle_event(event, &ticker),
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                resync(&store, &ticker).await;
            }
            line = lines.next_line() => {
                match line? {
                    Some(input) => {
                        if handle_command(input.trim(), &tracker, &ticker, &clock, &store).await? {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    ticker.shutdown();
    msg_print!(Message::SessionEnded);
    Ok(())
}

fn handle_event(event: TickerEvent, ticker: &Ticker) {
    match event {
        TickerEvent::Tick { task_id, seconds, .. } => {
            msg_print!(format!("{}  {}", format_elapsed(seconds), task_id));
        }
        TickerEvent::Refreshed(entries) => ticker.sync(&entries),
        TickerEvent::RefreshFailed(reason) => msg_warning!(Message::RefreshFailed(reason)),
    }
}

/// Re-fetches the active set after a successful transition so the tick
/// schedule converges to the new state.
async fn resync(store: &Arc<dyn TimeEntryStore>, ticker: &Ticker) {
    match store.fetch_active().await {
        Ok(entries) => {
            msg_debug!(format!("resyncing {} active entries", entries.len()));
            ticker.sync(&entries);
        }
        Err(err) => msg_warning!(Message::RefreshFailed(err.to_string())),
    }
}

/// Dispatches one session command. Returns true when the session should end.
async fn handle_command(input: &str, tracker: &Tracker, ticker: &Ticker, clock: &Arc<dyn Clock>, store: &Arc<dyn TimeEntryStore>) -> Result<bool> {
    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let task = parts.next().map(str::trim).unwrap_or("");

    match command {
        "" => {}
        "help" => msg_print!(Message::SessionHelp),
        "start" => {
            if task.is_empty() {
                msg_warning!(Message::MissingTaskArgument(command.to_string()));
            } else {
                start_task(tracker, task).await;
            }
        }
        "pause" | "resume" | "stop" | "reset" => {
            if task.is_empty() {
                msg_warning!(Message::MissingTaskArgument(command.to_string()));
            } else {
                run_transition(tracker, command, task).await;
            }
        }
        "status" => match store.fetch_active().await {
            Ok(entries) if entries.is_empty() => msg_print!(Message::NoActiveTimers),
            Ok(entries) => {
                msg_print!(Message::ActiveTimersTitle);
                View::active_entries(&entries, clock.now())?;
            }
            Err(err) => msg_error!(Message::TimerOperationFailed(err.to_string())),
        },
        "refresh" => {
            if !ticker.refresh_now().await {
                msg_warning!(Message::RefreshSkipped);
            }
        }
        "quit" | "exit" => return Ok(true),
        _ => msg_warning!(Message::UnknownCommand(input.to_string())),
    }
    Ok(false)
}

async fn start_task(tracker: &Tracker, task: &str) {
    match tracker.start(task).await {
        Ok(_) => msg_success!(Message::TimerStarted(task.to_string())),
        Err(err) => msg_error!(Message::TimerOperationFailed(err.to_string())),
    }
}

/// Applies a pause/resume/stop/reset to the task's active entry.
///
/// A failed store call leaves the prior state displayed; the error message
/// is surfaced and nothing is retried.
async fn run_transition(tracker: &Tracker, command: &str, task: &str) {
    let entry = match tracker.active_entry_for(task).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            msg_warning!(Message::NoActiveTimerForTask(task.to_string()));
            return;
        }
        Err(err) => {
            msg_error!(Message::TimerOperationFailed(err.to_string()));
            return;
        }
    };

    // The disabled-control gate: while a transition for this timer is still
    // awaiting the store, further commands for it are refused up front.
    if tracker.is_busy(entry.id) {
        msg_warning!(Message::TimerBusy(task.to_string()));
        return;
    }

    let result = match command {
        "pause" => tracker.pause(entry.id).await,
        "resume" => tracker.resume(entry.id).await,
        "stop" => tracker.stop(entry.id).await,
        _ => tracker.reset(entry.id).await,
    };

    match result {
        Ok(updated) => match command {
            "pause" => msg_success!(Message::TimerPaused {
                task: task.to_string(),
                elapsed: format_elapsed(updated.banked_seconds.floor() as i64),
            }),
            "resume" => msg_success!(Message::TimerResumed(task.to_string())),
            "stop" => msg_success!(Message::TimerStopped {
                task: task.to_string(),
                total: format_compact(updated.duration.unwrap_or_default() as i64),
            }),
            _ => msg_success!(Message::TimerReset(task.to_string())),
        },
        Err(err) => msg_error!(Message::TimerOperationFailed(err.to_string())),
    }
}
