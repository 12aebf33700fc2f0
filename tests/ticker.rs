#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use lapse::libs::clock::ManualClock;
    use lapse::libs::memory::MemoryStore;
    use lapse::libs::store::{StoreResult, TimeEntryStore};
    use lapse::libs::entry::TimeEntry;
    use lapse::libs::ticker::{Ticker, TickerConfig, TickerEvent};
    use std::sync::Arc;
    use std::time::Duration as StdDuration;
    use tokio::sync::mpsc::UnboundedReceiver;

    // Millisecond cadences keep the driver tests fast while exercising the
    // same scheduling paths as the one-second production tick.
    fn fast_config() -> TickerConfig {
        TickerConfig {
            tick_interval: StdDuration::from_millis(20),
            refresh_interval: StdDuration::from_millis(40),
        }
    }

    fn setup() -> (Arc<ManualClock>, Arc<MemoryStore>, Ticker, UnboundedReceiver<TickerEvent>) {
        let clock = Arc::new(ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()));
        let store = Arc::new(MemoryStore::new(clock.clone()));
        let (ticker, events) = Ticker::new(fast_config(), store.clone(), clock.clone());
        (clock, store, ticker, events)
    }

    async fn next_event(events: &mut UnboundedReceiver<TickerEvent>) -> TickerEvent {
        tokio::time::timeout(StdDuration::from_millis(500), events.recv())
            .await
            .expect("timed out waiting for ticker event")
            .expect("event channel closed")
    }

    fn drain(events: &mut UnboundedReceiver<TickerEvent>) {
        while events.try_recv().is_ok() {}
    }

    struct SlowStore {
        inner: MemoryStore,
        delay: StdDuration,
    }

    #[async_trait]
    impl TimeEntryStore for SlowStore {
        async fn start_tracking(&self, task_id: &str) -> StoreResult<TimeEntry> {
            self.inner.start_tracking(task_id).await
        }

        async fn stop_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
            self.inner.stop_tracking(entry_id).await
        }

        async fn pause_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
            self.inner.pause_tracking(entry_id).await
        }

        async fn resume_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
            self.inner.resume_tracking(entry_id).await
        }

        async fn reset_tracking(&self, entry_id: i64) -> StoreResult<TimeEntry> {
            self.inner.reset_tracking(entry_id).await
        }

        async fn fetch_active(&self) -> StoreResult<Vec<TimeEntry>> {
            tokio::time::sleep(self.delay).await;
            self.inner.fetch_active().await
        }
    }

    #[tokio::test]
    async fn test_running_entry_gets_tick_events() {
        let (clock, store, ticker, mut events) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());

        clock.advance(Duration::seconds(5));
        loop {
            match next_event(&mut events).await {
                TickerEvent::Tick { entry_id, task_id, seconds } if seconds == 5 => {
                    assert_eq!(entry_id, entry.id);
                    assert_eq!(task_id, "api-review");
                    break;
                }
                TickerEvent::Tick { .. } => continue,
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_paused_entry_gets_no_tick() {
        let (_clock, store, ticker, mut events) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        assert!(ticker.ticking().contains(&entry.id));

        store.pause_tracking(entry.id).await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        assert!(ticker.ticking().is_empty());

        drain(&mut events);
        tokio::time::sleep(StdDuration::from_millis(100)).await;
        assert!(events.try_recv().is_err(), "paused entry must not tick");
    }

    #[tokio::test]
    async fn test_ticks_are_independent_per_entry() {
        let (_clock, store, ticker, mut events) = setup();
        let a = store.start_tracking("api-review").await.unwrap();
        let b = store.start_tracking("standup").await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        assert_eq!(ticker.ticking().len(), 2);

        // Cancelling A's tick must not disturb B's.
        store.pause_tracking(a.id).await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        let expected: std::collections::HashSet<i64> = [b.id].into_iter().collect();
        assert_eq!(ticker.ticking(), expected);

        drain(&mut events);
        for _ in 0..3 {
            match next_event(&mut events).await {
                TickerEvent::Tick { entry_id, .. } => assert_eq!(entry_id, b.id),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_resume_restores_the_tick() {
        let (_clock, store, ticker, _events) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());

        store.pause_tracking(entry.id).await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        assert!(ticker.ticking().is_empty());

        store.resume_tracking(entry.id).await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        assert!(ticker.ticking().contains(&entry.id));
    }

    #[tokio::test]
    async fn test_refresh_loop_emits_active_set() {
        let (_clock, store, ticker, mut events) = setup();
        store.start_tracking("api-review").await.unwrap();
        ticker.start_refresh_loop();

        match next_event(&mut events).await {
            TickerEvent::Refreshed(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].task_id, "api-review");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_manual_refresh_fetches_on_demand() {
        let (_clock, store, ticker, mut events) = setup();
        store.start_tracking("api-review").await.unwrap();

        assert!(ticker.refresh_now().await);
        match next_event(&mut events).await {
            TickerEvent::Refreshed(entries) => assert_eq!(entries.len(), 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_failure_is_reported_not_fatal() {
        let (_clock, store, ticker, mut events) = setup();
        store.set_unavailable(true);

        assert!(ticker.refresh_now().await);
        match next_event(&mut events).await {
            TickerEvent::RefreshFailed(reason) => assert!(reason.contains("unavailable")),
            other => panic!("unexpected event: {:?}", other),
        }

        // The driver stays usable; the next refresh succeeds.
        store.set_unavailable(false);
        assert!(ticker.refresh_now().await);
        assert!(matches!(next_event(&mut events).await, TickerEvent::Refreshed(_)));
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_are_collapsed() {
        let clock = Arc::new(ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()));
        let slow = Arc::new(SlowStore {
            inner: MemoryStore::new(clock.clone()),
            delay: StdDuration::from_millis(100),
        });
        let (ticker, mut events) = Ticker::new(fast_config(), slow.clone(), clock.clone());

        let (first, second) = tokio::join!(ticker.refresh_now(), ticker.refresh_now());
        assert!(first ^ second, "exactly one of the overlapping refreshes may fetch");

        // Only one Refreshed event was published.
        assert!(matches!(next_event(&mut events).await, TickerEvent::Refreshed(_)));
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert!(events.try_recv().is_err());
        assert!(!ticker.is_refreshing());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_everything() {
        let (_clock, store, ticker, mut events) = setup();
        store.start_tracking("api-review").await.unwrap();
        store.start_tracking("standup").await.unwrap();
        ticker.sync(&store.fetch_active().await.unwrap());
        ticker.start_refresh_loop();

        ticker.shutdown();
        assert!(ticker.ticking().is_empty());

        drain(&mut events);
        tokio::time::sleep(StdDuration::from_millis(150)).await;
        assert!(events.try_recv().is_err(), "no events may arrive after shutdown");
    }
}
