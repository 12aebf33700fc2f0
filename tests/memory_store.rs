#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use lapse::libs::clock::{Clock, ManualClock};
    use lapse::libs::entry::TimerState;
    use lapse::libs::memory::MemoryStore;
    use lapse::libs::store::{StoreError, TimeEntryStore};
    use std::sync::Arc;

    fn setup() -> (Arc<ManualClock>, MemoryStore) {
        let clock = Arc::new(ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()));
        let store = MemoryStore::new(clock.clone());
        (clock, store)
    }

    #[tokio::test]
    async fn test_start_creates_running_entry() {
        let (clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();

        assert_eq!(entry.task_id, "api-review");
        assert_eq!(entry.state(), TimerState::Running);
        assert_eq!(entry.start_time, clock.now());
        assert_eq!(entry.last_resumed_at, Some(clock.now()));
        assert_eq!(entry.banked_seconds, 0.0);
        assert!(entry.end_time.is_none());
        assert!(entry.duration.is_none());
    }

    #[tokio::test]
    async fn test_start_does_not_stop_other_running_entries() {
        let (_clock, store) = setup();
        let first = store.start_tracking("api-review").await.unwrap();
        let second = store.start_tracking("standup").await.unwrap();
        // Even a second timer on the same task is accepted at this layer;
        // single-timer enforcement is the state machine's policy.
        let third = store.start_tracking("api-review").await.unwrap();

        let active = store.fetch_active().await.unwrap();
        assert_eq!(active.iter().map(|e| e.id).collect::<Vec<_>>(), vec![first.id, second.id, third.id]);
        assert!(active.iter().all(|e| e.is_running()));
    }

    #[tokio::test]
    async fn test_pause_banks_elapsed_and_freezes() {
        let (clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();

        clock.advance(Duration::seconds(10));
        let paused = store.pause_tracking(entry.id).await.unwrap();

        assert_eq!(paused.state(), TimerState::Paused);
        assert_eq!(paused.banked_seconds, 10.0);

        clock.advance(Duration::seconds(300));
        assert_eq!(store.get(entry.id).unwrap().elapsed_seconds(clock.now()), 10);
    }

    #[tokio::test]
    async fn test_pause_while_paused_is_refused() {
        let (clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();
        clock.advance(Duration::seconds(5));
        store.pause_tracking(entry.id).await.unwrap();

        let err = store.pause_tracking(entry.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Precondition(_)));
        // The baseline must not have been banked twice.
        assert_eq!(store.get(entry.id).unwrap().banked_seconds, 5.0);
    }

    #[tokio::test]
    async fn test_resume_while_running_is_refused() {
        let (_clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();

        let err = store.resume_tracking(entry.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_stop_completes_and_removes_from_active_set() {
        let (clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();
        clock.advance(Duration::seconds(42));

        let stopped = store.stop_tracking(entry.id).await.unwrap();
        assert_eq!(stopped.state(), TimerState::Completed);
        assert_eq!(stopped.end_time, Some(clock.now()));
        assert_eq!(stopped.duration, Some(42.0));

        assert!(store.fetch_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transitions_on_completed_entry_are_refused() {
        let (_clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();
        store.stop_tracking(entry.id).await.unwrap();

        for result in [
            store.pause_tracking(entry.id).await,
            store.resume_tracking(entry.id).await,
            store.reset_tracking(entry.id).await,
            store.stop_tracking(entry.id).await,
        ] {
            assert!(matches!(result.unwrap_err(), StoreError::Precondition(_)));
        }
    }

    #[tokio::test]
    async fn test_reset_zeroes_but_keeps_identity() {
        let (clock, store) = setup();
        let started_at = clock.now();
        let entry = store.start_tracking("api-review").await.unwrap();

        clock.advance(Duration::seconds(90));
        store.pause_tracking(entry.id).await.unwrap();
        clock.advance(Duration::seconds(30));
        let reset = store.reset_tracking(entry.id).await.unwrap();

        assert_eq!(reset.id, entry.id);
        assert_eq!(reset.task_id, "api-review");
        assert_eq!(reset.start_time, started_at);
        assert_eq!(reset.state(), TimerState::Running);
        assert_eq!(reset.elapsed_seconds(clock.now()), 0);
    }

    #[tokio::test]
    async fn test_unknown_entry_is_not_found() {
        let (_clock, store) = setup();
        let err = store.pause_tracking(999).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_operation() {
        let (_clock, store) = setup();
        let entry = store.start_tracking("api-review").await.unwrap();

        store.set_unavailable(true);
        assert!(matches!(store.start_tracking("standup").await.unwrap_err(), StoreError::Unavailable(_)));
        assert!(matches!(store.pause_tracking(entry.id).await.unwrap_err(), StoreError::Unavailable(_)));
        assert!(matches!(store.fetch_active().await.unwrap_err(), StoreError::Unavailable(_)));

        // Recovery: the next user action is free to try again.
        store.set_unavailable(false);
        assert_eq!(store.fetch_active().await.unwrap().len(), 1);
    }
}
