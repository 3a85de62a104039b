//! Route-construction state machine.
//!
//! A [`RouteSession`] tracks the interaction mode, turns map taps into
//! segments and runs at most one routing fetch at a time. All mutations
//! happen under a short-lived lock; the fetch itself runs as a tokio task
//! whose result is applied only if it is still the session's current
//! request when it resolves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::error::{RouteError, RoutingError};
use crate::geo_point::GeoPoint;
use crate::segment::{Segment, SegmentStore};
use crate::summary::{RouteSnapshot, RouteSummary};
use crate::traits::{PathResult, RoutingClient, RoutingProfile, TrackSink, TrackSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// No edit mode active; taps are not consumed.
    #[default]
    View,
    FreeDrawing,
    GuidedRouting,
}

/// Result of a mode switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransition {
    pub next: RouteMode,
    /// Whether the route must be discarded.
    pub clear: bool,
}

impl RouteMode {
    /// Re-selecting the active mode turns it off and keeps the route.
    /// Selecting any other mode starts over with an empty route.
    pub fn transition(self, requested: RouteMode) -> ModeTransition {
        if self == requested {
            ModeTransition {
                next: RouteMode::View,
                clear: false,
            }
        } else {
            ModeTransition {
                next: requested,
                clear: true,
            }
        }
    }

    pub fn is_editing(self) -> bool {
        self != RouteMode::View
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Profile used for guided routing requests.
    pub profile: RoutingProfile,
}

/// What a map tap did.
#[derive(Debug)]
pub enum TapOutcome {
    /// The session is in `View` mode; the caller may handle the tap itself.
    NotConsumed,
    /// A manual point was added.
    Appended,
    /// A routing fetch was started for the tapped waypoint.
    Routing(PendingRoute),
}

/// Handle on an in-flight routing fetch.
///
/// Dropping it does not cancel the fetch; the session applies the result
/// either way.
#[derive(Debug)]
pub struct PendingRoute {
    handle: JoinHandle<Result<Segment, RouteError>>,
}

impl PendingRoute {
    /// Waits for the fetch and returns the routed segment it appended.
    pub async fn outcome(self) -> Result<Segment, RouteError> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => Err(RouteError::Cancelled),
            Err(err) => std::panic::resume_unwind(err.into_panic()),
        }
    }
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    abort: AbortHandle,
}

#[derive(Debug)]
struct SessionState {
    mode: RouteMode,
    store: SegmentStore,
    in_flight: Option<InFlight>,
    next_request: u64,
    last_error: Option<String>,
    snapshots: watch::Sender<RouteSnapshot>,
}

impl SessionState {
    fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            mode: self.mode,
            points: self.store.flattened_points().to_vec(),
            segments: self.store.segments().to_vec(),
            summary: RouteSummary::from_store(&self.store),
            busy: self.in_flight.is_some(),
            last_error: self.last_error.clone(),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(request = in_flight.id, "cancelling routing request");
            in_flight.abort.abort();
        }
    }

    fn append_manual(&mut self, point: GeoPoint) {
        self.store.append_manual(point);
        self.last_error = None;
    }
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct RouteSession<C: RoutingClient> {
    client: Arc<C>,
    config: SessionConfig,
    state: Arc<Mutex<SessionState>>,
}

impl<C: RoutingClient> RouteSession<C> {
    pub fn new(client: Arc<C>, config: SessionConfig) -> Self {
        let (snapshots, _) = watch::channel(RouteSnapshot::empty());
        let state = SessionState {
            mode: RouteMode::View,
            store: SegmentStore::new(),
            in_flight: None,
            next_request: 0,
            last_error: None,
            snapshots,
        };

        Self {
            client,
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn mode(&self) -> RouteMode {
        lock(&self.state).mode
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.state).in_flight.is_some()
    }

    /// Applies [`RouteMode::transition`] and returns the new mode.
    ///
    /// Any in-flight routing request is cancelled.
    pub fn set_mode(&self, requested: RouteMode) -> RouteMode {
        let mut state = lock(&self.state);
        let transition = state.mode.transition(requested);

        state.cancel_in_flight();
        if transition.clear {
            state.store.clear();
        }
        debug!(
            from = ?state.mode,
            to = ?transition.next,
            cleared = transition.clear,
            "mode changed"
        );
        state.mode = transition.next;
        state.last_error = None;
        state.publish();

        transition.next
    }

    /// Handles a tap on the map.
    ///
    /// In guided mode every tap after the first waypoint starts a routing
    /// fetch; the tapped point is only added once a path is confirmed.
    /// Taps arriving while that fetch is in flight are rejected with
    /// [`RouteError::Busy`].
    pub fn on_map_tap(&self, point: GeoPoint) -> Result<TapOutcome, RouteError> {
        let mut state = lock(&self.state);
        if !state.mode.is_editing() {
            return Ok(TapOutcome::NotConsumed);
        }
        if let Some(in_flight) = &state.in_flight {
            debug!(request = in_flight.id, "tap rejected while routing");
            return Err(RouteError::Busy);
        }

        let start = match (state.mode, state.store.last_point()) {
            (RouteMode::GuidedRouting, Some(start)) => start,
            _ => {
                state.append_manual(point);
                state.publish();
                return Ok(TapOutcome::Appended);
            }
        };

        match self.spawn_fetch(&mut state, start, point) {
            Ok(pending) => {
                state.last_error = None;
                state.publish();
                Ok(TapOutcome::Routing(pending))
            }
            Err(err) => {
                warn!(error = %err, "routing failed");
                state.last_error = Some(err.to_string());
                state.publish();
                Err(err)
            }
        }
    }

    fn spawn_fetch(
        &self,
        state: &mut SessionState,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<PendingRoute, RouteError> {
        let runtime =
            Handle::try_current().map_err(|err| RoutingError::Unavailable(err.to_string()))?;

        let id = state.next_request;
        state.next_request += 1;

        let client = Arc::clone(&self.client);
        let shared = Arc::downgrade(&self.state);
        let profile = self.config.profile;
        debug!(request = id, ?profile, "requesting routed path");

        let handle = runtime.spawn(async move {
            let result = client.fetch_path(start, end, profile).await;
            apply_fetch(&shared, id, end, result)
        });
        state.in_flight = Some(InFlight {
            id,
            abort: handle.abort_handle(),
        });

        Ok(PendingRoute { handle })
    }

    /// Removes the last segment; `None` when the route is empty.
    pub fn undo(&self) -> Option<Segment> {
        let mut state = lock(&self.state);
        state.cancel_in_flight();
        let removed = state.store.undo();
        if removed.is_some() {
            state.last_error = None;
        }
        state.publish();
        removed
    }

    /// Discards the route. The mode is kept.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.cancel_in_flight();
        state.store.clear();
        state.last_error = None;
        state.publish();
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary::from_store(&lock(&self.state).store)
    }

    pub fn flattened_points(&self) -> Vec<GeoPoint> {
        lock(&self.state).store.flattened_points().to_vec()
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        lock(&self.state).snapshot()
    }

    /// Receives a fresh snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<RouteSnapshot> {
        lock(&self.state).snapshots.subscribe()
    }

    /// Appends points as successive manual hops. Returns how many were added.
    pub fn import_points<I>(&self, points: I) -> usize
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut state = lock(&self.state);
        state.cancel_in_flight();
        let mut added = 0;
        for point in points {
            state.append_manual(point);
            added += 1;
        }
        state.publish();
        info!(points = added, "imported track points");
        added
    }

    pub fn import_from<S: TrackSource>(&self, source: &mut S) -> Result<usize, S::Error> {
        let points = source.load_points()?;
        Ok(self.import_points(points))
    }

    /// Hands the flattened route to `sink`. Returns the number of points.
    pub fn export_to<K: TrackSink>(&self, sink: &mut K) -> Result<usize, K::Error> {
        let points = self.flattened_points();
        sink.export_points(&points)?;
        Ok(points.len())
    }
}

impl<C: RoutingClient> Drop for RouteSession<C> {
    fn drop(&mut self) {
        lock(&self.state).cancel_in_flight();
    }
}

fn apply_fetch(
    shared: &Weak<Mutex<SessionState>>,
    id: u64,
    end: GeoPoint,
    result: Result<PathResult, RoutingError>,
) -> Result<Segment, RouteError> {
    let Some(shared) = shared.upgrade() else {
        debug!(request = id, "session gone, discarding routed path");
        return Err(RouteError::Cancelled);
    };
    let mut state = lock(&shared);
    if state.in_flight.as_ref().map(|in_flight| in_flight.id) != Some(id) {
        debug!(request = id, "stale routed path discarded");
        return Err(RouteError::Cancelled);
    }
    state.in_flight = None;

    let outcome = match result {
        Ok(path) => state.store.append_routed(path.points, end).cloned(),
        Err(err) => Err(RouteError::from(err)),
    };
    match &outcome {
        Ok(segment) => {
            debug!(request = id, points = segment.points().len(), "routed hop appended");
            state.last_error = None;
        }
        Err(err) => {
            warn!(request = id, error = %err, "routing failed");
            state.last_error = Some(err.to_string());
        }
    }
    state.publish();

    outcome
}
