use futures::FutureExt;
use maplet_print::prelude::*;
use maplet_print::QuiescenceTracker;

/// Quiescence tests against the headless engine on a paused tokio clock.
/// Time only moves when every task is idle, so the timelines below are exact.
#[cfg(test)]
mod quiescence_tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    fn map() -> Arc<HeadlessMap> {
        Arc::new(HeadlessMap::new(Viewport::new(
            LatLng::new(59.3293, 18.0686),
            11.0,
            Point::new(800.0, 600.0),
        )))
    }

    /// A render event inside a window pushes settling out by one more window
    #[tokio::test(start_paused = true)]
    async fn test_render_event_restarts_the_window() {
        let map = map();
        map.mark_ready();

        let waiting = map.clone();
        let handle = tokio::spawn(async move { wait_for_map_to_render(&*waiting, WINDOW).await });

        tokio::time::sleep(Duration::from_millis(300)).await;
        map.emit_render();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!handle.is_finished());
        assert_eq!(map.listener_count(), 1);

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(handle.is_finished());

        let report = handle.await.unwrap();
        assert_eq!(report.ticks, 3);
        assert_eq!(map.listener_count(), 0);
    }

    /// No render events is not enough: every load predicate must hold too
    #[tokio::test(start_paused = true)]
    async fn test_waits_for_load_predicates() {
        let map = map();
        map.set_loaded(true);
        map.set_style_loaded(true);

        let waiting = map.clone();
        let handle = tokio::spawn(async move { wait_for_map_to_render(&*waiting, WINDOW).await });

        tokio::time::sleep(Duration::from_millis(5_200)).await;
        assert!(!handle.is_finished());

        map.set_tiles_loaded(true);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(handle.is_finished());
        assert_eq!(handle.await.unwrap().ticks, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_detaches_listener() {
        let map = map();

        let err = wait_for_map_to_render_within(&*map, WINDOW, Some(Duration::from_secs(2)))
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<PrintError>(), Some(PrintError::Timeout(_))));
        assert_eq!(map.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_wait_detaches_listener() {
        let map = map();
        map.mark_ready();

        let mut wait = Box::pin(wait_for_map_to_render(&*map, WINDOW));
        assert!((&mut wait).now_or_never().is_none());
        assert_eq!(map.listener_count(), 1);

        drop(wait);
        assert_eq!(map.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_after_simulated_load() {
        let map = map();
        let loading = HeadlessMap::spawn_load_simulation(map.clone(), 10, Duration::from_millis(100));

        let report = wait_for_map_to_render(&*map, WINDOW).await;

        assert!(report.elapsed >= Duration::from_millis(1_000));
        assert!(map.are_tiles_loaded());
        assert_eq!(map.listener_count(), 0);
        loading.await.unwrap();
    }

    /// Short windows over a long load produce a poll count far past `u16`
    #[tokio::test(start_paused = true)]
    async fn test_long_wait_counts_every_poll() {
        let map = map();
        map.set_loaded(true);
        map.set_style_loaded(true);

        let waiting = map.clone();
        let handle = tokio::spawn(async move {
            wait_for_map_to_render(&*waiting, Duration::from_millis(1)).await
        });

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!handle.is_finished());
        map.set_tiles_loaded(true);

        let report = handle.await.unwrap();
        let ticks: u64 = report.ticks;
        assert!(ticks > u64::from(u16::MAX), "{ticks} polls");
        assert!(report.elapsed >= Duration::from_secs(120));
    }

    #[test]
    fn test_tracker_listener_marks_activity() {
        let map = map();
        map.mark_ready();
        let mut tracker = QuiescenceTracker::new();
        let id = map.on_render(tracker.listener());

        let ready = maplet_print::print::quiesce::LoadPredicates::from_map(&*map);
        tracker.tick(ready);
        map.emit_render();
        assert_eq!(tracker.tick(ready), maplet_print::print::quiesce::QuiescenceState::Waiting);

        map.off_render(id);
        map.emit_render();
        assert_eq!(tracker.tick(ready), maplet_print::print::quiesce::QuiescenceState::Settled);
    }
}
