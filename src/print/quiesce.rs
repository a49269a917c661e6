//! Quiescence detection
//!
//! A renderer is quiescent once a full settle window passes without any
//! `render` event while the map, its style and its tiles all report loaded.
//! The load predicates are checked on their own because renderers go quiet
//! between tile arrivals long before loading has finished.

use crate::{
    runtime::{async_delay, with_deadline},
    traits::{ListenerId, MapEngine, RenderListener},
    Result,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::time::Instant;

/// Snapshot of the engine's load predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadPredicates {
    pub loaded: bool,
    pub style_loaded: bool,
    pub tiles_loaded: bool,
}

impl LoadPredicates {
    pub fn from_map<M: MapEngine + ?Sized>(map: &M) -> Self {
        Self {
            loaded: map.loaded(),
            style_loaded: map.is_style_loaded(),
            tiles_loaded: map.are_tiles_loaded(),
        }
    }

    pub fn all(&self) -> bool {
        self.loaded && self.style_loaded && self.tiles_loaded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuiescenceState {
    Waiting,
    Settled,
}

/// One-shot settle state machine.
///
/// The activity flag starts raised, so the first tick never settles and at
/// least one full window has to pass. Every render event raises it again;
/// every tick that does not settle lowers it.
#[derive(Debug)]
pub struct QuiescenceTracker {
    active_since_last_check: Arc<AtomicBool>,
    state: QuiescenceState,
}

impl QuiescenceTracker {
    pub fn new() -> Self {
        Self {
            active_since_last_check: Arc::new(AtomicBool::new(true)),
            state: QuiescenceState::Waiting,
        }
    }

    pub fn state(&self) -> QuiescenceState {
        self.state
    }

    pub fn record_activity(&self) {
        self.active_since_last_check.store(true, Ordering::SeqCst);
    }

    /// Listener that records render activity on this tracker
    pub fn listener(&self) -> RenderListener {
        let flag = self.active_since_last_check.clone();
        Arc::new(move || flag.store(true, Ordering::SeqCst))
    }

    /// Evaluates one poll. `Settled` is terminal.
    pub fn tick(&mut self, predicates: LoadPredicates) -> QuiescenceState {
        if self.state == QuiescenceState::Settled {
            return self.state;
        }

        let active = self.active_since_last_check.swap(false, Ordering::SeqCst);
        if !active && predicates.all() {
            self.state = QuiescenceState::Settled;
        }
        self.state
    }
}

impl Default for QuiescenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Render listener registration that detaches itself when dropped
pub struct ListenerGuard<'a, M: MapEngine + ?Sized> {
    map: &'a M,
    id: Option<ListenerId>,
}

impl<'a, M: MapEngine + ?Sized> ListenerGuard<'a, M> {
    pub fn attach(map: &'a M, listener: RenderListener) -> Self {
        let id = map.on_render(listener);
        Self { map, id: Some(id) }
    }

    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.map.off_render(id);
        }
    }
}

impl<M: MapEngine + ?Sized> Drop for ListenerGuard<'_, M> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Outcome of a completed wait
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuiescenceReport {
    /// Polls evaluated, including the settling one
    pub ticks: u64,
    pub elapsed: Duration,
}

/// Resolves once `map` has been quiet for a full `settle_window` with every
/// load predicate true.
///
/// Waits indefinitely. Dropping the future detaches the render listener, so
/// an outer timeout or `select!` cancels the wait cleanly.
pub async fn wait_for_map_to_render<M: MapEngine + ?Sized>(
    map: &M,
    settle_window: Duration,
) -> QuiescenceReport {
    let started = Instant::now();
    let mut tracker = QuiescenceTracker::new();
    let registration = ListenerGuard::attach(map, tracker.listener());
    let mut ticks: u64 = 0;

    loop {
        ticks = ticks.saturating_add(1);
        if tracker.tick(LoadPredicates::from_map(map)) == QuiescenceState::Settled {
            break;
        }
        async_delay(settle_window).await;
    }

    registration.detach();
    let report = QuiescenceReport {
        ticks,
        elapsed: started.elapsed(),
    };
    log::debug!(
        "Map settled after {} polls ({:?})",
        report.ticks,
        report.elapsed
    );
    report
}

/// [`wait_for_map_to_render`] bounded by `deadline`; `None` waits indefinitely
pub async fn wait_for_map_to_render_within<M: MapEngine + ?Sized>(
    map: &M,
    settle_window: Duration,
    deadline: Option<Duration>,
) -> Result<QuiescenceReport> {
    with_deadline(wait_for_map_to_render(map, settle_window), deadline).await
}
