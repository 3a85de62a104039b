//! In-memory routing client that replays scripted answers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use route_sketch::{GeoPoint, PathResult, RoutingClient, RoutingError, RoutingProfile};

pub type Call = (GeoPoint, GeoPoint, RoutingProfile);

#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<Vec<GeoPoint>, String>>>,
    calls: Mutex<Vec<Call>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch waits for one `notify_one` on the returned handle.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let client = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (client, gate)
    }

    pub fn respond_with(self, points: Vec<GeoPoint>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(points));
        self
    }

    pub fn fail_with(self, message: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl RoutingClient for ScriptedClient {
    async fn fetch_path(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        profile: RoutingProfile,
    ) -> Result<PathResult, RoutingError> {
        self.calls.lock().unwrap().push((start, end, profile));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(points)) => Ok(PathResult::new(points)),
            Some(Err(message)) => Err(RoutingError::Unavailable(message)),
            None => Err(RoutingError::Unavailable("no scripted response".to_string())),
        }
    }
}

/// A path from `start` to `end` through `via`, the way a backend returns it.
pub fn routed_path(start: GeoPoint, via: &[GeoPoint], end: GeoPoint) -> Vec<GeoPoint> {
    let mut points = vec![start];
    points.extend_from_slice(via);
    points.push(end);
    points
}
