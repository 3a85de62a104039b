//! Derived route views handed to renderers.

use serde::Serialize;

use crate::geo_point::GeoPoint;
use crate::haversine;
use crate::segment::{Segment, SegmentStore};
use crate::session::RouteMode;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteSummary {
    pub total_distance_m: f64,
    pub point_count: usize,
    pub segment_count: usize,
}

impl RouteSummary {
    pub fn from_store(store: &SegmentStore) -> Self {
        let points = store.flattened_points();
        Self {
            total_distance_m: haversine::path_length(points),
            point_count: points.len(),
            segment_count: store.len(),
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.total_distance_m / 1000.0
    }
}

/// Everything a renderer needs to draw the current route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSnapshot {
    pub mode: RouteMode,
    pub points: Vec<GeoPoint>,
    pub segments: Vec<Segment>,
    pub summary: RouteSummary,
    /// A routing request is in flight.
    pub busy: bool,
    /// Message of the last routing failure, cleared by the next change.
    pub last_error: Option<String>,
}

impl RouteSnapshot {
    pub fn empty() -> Self {
        Self {
            mode: RouteMode::View,
            points: Vec::new(),
            segments: Vec::new(),
            summary: RouteSummary::default(),
            busy: false,
            last_error: None,
        }
    }
}
