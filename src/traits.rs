//! Collaborator seams of the route core.
//!
//! The core only knows these interfaces. Concrete backends live in
//! [`crate::ign`] and [`crate::osrm`]; track file formats live outside the
//! crate entirely.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::geo_point::GeoPoint;

/// Travel profile passed to the routing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProfile {
    #[default]
    Pedestrian,
    Car,
    Bike,
}

/// Path geometry for one hop, both endpoints included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathResult {
    pub points: Vec<GeoPoint>,
    /// Backend-reported length in meters, when provided.
    pub distance_m: Option<f64>,
    /// Backend-reported travel time in seconds, when provided.
    pub duration_s: Option<f64>,
}

impl PathResult {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            distance_m: None,
            duration_s: None,
        }
    }
}

/// Fetches path geometry between two waypoints.
pub trait RoutingClient: Send + Sync + 'static {
    fn fetch_path(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        profile: RoutingProfile,
    ) -> impl Future<Output = Result<PathResult, RoutingError>> + Send;
}

/// Supplies points from a stored track (e.g. a GPX reader).
pub trait TrackSource {
    type Error;

    fn load_points(&mut self) -> Result<Vec<GeoPoint>, Self::Error>;
}

/// Persists the flattened route (e.g. a GPX writer).
pub trait TrackSink {
    type Error;

    fn export_points(&mut self, points: &[GeoPoint]) -> Result<(), Self::Error>;
}
