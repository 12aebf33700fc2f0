//! Polling driver that keeps displayed elapsed times current.
//!
//! Two independent cadences, both cancellable:
//!
//! - **Per-entry tick**: one tokio task per *running* entry recomputes its
//!   elapsed seconds on a fixed interval (one second in production) and
//!   emits a [`TickerEvent::Tick`]. Paused and completed entries get no
//!   tick; their displayed value is static until a transition. Ticks are
//!   independent: cancelling one never affects the others.
//! - **Full refresh**: a coarse reconciliation pass that re-fetches the
//!   whole active set from the store (every 30 seconds in production) to
//!   catch changes made elsewhere. Manual refresh performs the same fetch
//!   on demand. Both honor one shared `refreshing` flag, so two fetches can
//!   never be in flight at once.
//!
//! [`Ticker::sync`] reconciles the tick set against a fresh snapshot of the
//! active entries; callers invoke it after every refresh and after every
//! successful transition. [`Ticker::shutdown`] (also run on drop) aborts
//! everything, leaving no orphaned timers behind.

use crate::libs::clock::Clock;
use crate::libs::entry::TimeEntry;
use crate::libs::store::TimeEntryStore;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Cadences for the two polling loops. Production uses the defaults; tests
/// shrink both to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerConfig {
    pub tick_interval: Duration,
    pub refresh_interval: Duration,
}

impl Default for TickerConfig {
    fn default() -> Self {
        TickerConfig {
            tick_interval: Duration::from_secs(1),
            refresh_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TickerEvent {
    /// A running entry's recomputed elapsed display value.
    Tick { entry_id: i64, task_id: String, seconds: i64 },
    /// A full refresh completed with this active set.
    Refreshed(Vec<TimeEntry>),
    /// A full refresh failed; prior state stays displayed.
    RefreshFailed(String),
}

/// A scheduled tick plus the segment fingerprint it was spawned from.
///
/// Reset changes the accumulation fields without leaving the running state,
/// so a tick is also restarted when the fingerprint no longer matches.
struct Tick {
    handle: JoinHandle<()>,
    resumed_at: Option<DateTime<Utc>>,
    banked_seconds: f64,
}

pub struct Ticker {
    config: TickerConfig,
    store: Arc<dyn TimeEntryStore>,
    clock: Arc<dyn Clock>,
    events: UnboundedSender<TickerEvent>,
    ticks: Mutex<HashMap<i64, Tick>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    refreshing: Arc<AtomicBool>,
}

impl Ticker {
    /// Creates a ticker and the event stream its loops feed.
    pub fn new(config: TickerConfig, store: Arc<dyn TimeEntryStore>, clock: Arc<dyn Clock>) -> (Self, UnboundedReceiver<TickerEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let ticker = Ticker {
            config,
            store,
            clock,
            events,
            ticks: Mutex::new(HashMap::new()),
            refresh_task: Mutex::new(None),
            refreshing: Arc::new(AtomicBool::new(false)),
        };
        (ticker, receiver)
    }

    /// Reconciles the scheduled ticks against a snapshot of active entries.
    ///
    /// Entries that left the running state lose their tick; entries that
    /// entered it gain one. Entries still running on an unchanged segment
    /// keep their existing tick untouched.
    pub fn sync(&self, entries: &[TimeEntry]) {
        let running: HashMap<i64, &TimeEntry> = entries.iter().filter(|e| e.is_running()).map(|e| (e.id, e)).collect();

        let mut ticks = self.ticks.lock();
        ticks.retain(|id, tick| {
            let keep = running
                .get(id)
                .is_some_and(|entry| entry.last_resumed_at == tick.resumed_at && entry.banked_seconds == tick.banked_seconds);
            if !keep {
                tick.handle.abort();
            }
            keep
        });
        for (id, entry) in running {
            ticks.entry(id).or_insert_with(|| Tick {
                handle: self.spawn_tick(entry),
                resumed_at: entry.last_resumed_at,
                banked_seconds: entry.banked_seconds,
            });
        }
    }

    /// Starts the periodic full-refresh loop. Replaces any previous loop.
    pub fn start_refresh_loop(&self) {
        let store = self.store.clone();
        let events = self.events.clone();
        let refreshing = self.refreshing.clone();
        let interval = self.config.refresh_interval;

        let handle = tokio::spawn(async move {
            let mut cycle = time::interval(interval);
            cycle.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The immediate first tick is skipped; callers fetch once on
            // startup themselves.
            cycle.tick().await;
            loop {
                cycle.tick().await;
                run_refresh(&store, &events, &refreshing).await;
            }
        });

        let mut slot = self.refresh_task.lock();
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    /// Runs one refresh on demand.
    ///
    /// Returns `false` without fetching when another refresh is already in
    /// flight. Controls should stay disabled while [`Ticker::is_refreshing`]
    /// reports true.
    pub async fn refresh_now(&self) -> bool {
        run_refresh(&self.store, &self.events, &self.refreshing).await
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Entry ids with a tick currently scheduled.
    pub fn ticking(&self) -> HashSet<i64> {
        self.ticks.lock().keys().copied().collect()
    }

    /// Cancels every tick and the refresh loop.
    pub fn shutdown(&self) {
        let mut ticks = self.ticks.lock();
        for (_, tick) in ticks.drain() {
            tick.handle.abort();
        }
        if let Some(handle) = self.refresh_task.lock().take() {
            handle.abort();
        }
    }

    fn spawn_tick(&self, entry: &TimeEntry) -> JoinHandle<()> {
        let entry = entry.clone();
        let events = self.events.clone();
        let clock = self.clock.clone();
        let interval = self.config.tick_interval;

        tokio::spawn(async move {
            let mut tick = time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                // Always recomputed from the stored timestamps; a counter
                // would drift across missed ticks.
                let seconds = entry.elapsed_seconds(clock.now());
                let event = TickerEvent::Tick {
                    entry_id: entry.id,
                    task_id: entry.task_id.clone(),
                    seconds,
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One guarded fetch-and-publish pass shared by the periodic loop and the
/// manual refresh. Returns `false` when skipped because a refresh was
/// already in flight.
async fn run_refresh(store: &Arc<dyn TimeEntryStore>, events: &UnboundedSender<TickerEvent>, refreshing: &AtomicBool) -> bool {
    if refreshing.swap(true, Ordering::SeqCst) {
        return false;
    }
    let event = match store.fetch_active().await {
        Ok(entries) => TickerEvent::Refreshed(entries),
        Err(err) => TickerEvent::RefreshFailed(err.to_string()),
    };
    let _ = events.send(event);
    refreshing.store(false, Ordering::SeqCst);
    true
}
