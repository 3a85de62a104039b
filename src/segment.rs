//! Undoable route history.
//!
//! A route is an ordered list of segments. Each segment remembers where its
//! points came from, so undo removes exactly one user action: a single
//! manual hop or a whole routed hop.

use serde::Serialize;
use tracing::debug;

use crate::error::RouteError;
use crate::geo_point::GeoPoint;
use crate::haversine;

/// Start offsets above this are logged when a routed path is joined.
pub const JOIN_TOLERANCE_M: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentOrigin {
    Manual,
    Routed,
}

/// Logical end-point of a segment, used by renderers to place a marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    /// 1-based position of the segment in the route.
    pub number: usize,
    /// Where the user tapped.
    pub position: GeoPoint,
}

impl Marker {
    pub fn title(&self) -> String {
        format!("Point {}", self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    points: Vec<GeoPoint>,
    origin: SegmentOrigin,
    marker: Marker,
}

impl Segment {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn origin(&self) -> SegmentOrigin {
        self.origin
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Number of points this segment adds to the flattened route.
    ///
    /// Every segment but the first shares its first point with the end of
    /// the previous one.
    fn contributed(&self, is_first: bool) -> usize {
        if is_first {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    flattened: Vec<GeoPoint>,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_manual(&mut self, point: GeoPoint) -> &Segment {
        let points = match self.flattened.last() {
            Some(last) => vec![*last, point],
            None => vec![point],
        };
        self.push(points, SegmentOrigin::Manual, point)
    }

    /// Appends the geometry of a routed hop ending at `marker_position`.
    ///
    /// The path's first point is taken to be the current last point and is
    /// not repeated in the flattened view.
    pub fn append_routed(
        &mut self,
        path: Vec<GeoPoint>,
        marker_position: GeoPoint,
    ) -> Result<&Segment, RouteError> {
        let Some(first) = path.first() else {
            return Err(RouteError::EmptyPath);
        };

        if let Some(last) = self.flattened.last() {
            let offset = haversine::distance(last, first);
            if offset > JOIN_TOLERANCE_M {
                debug!(offset_m = offset, "routed path starts away from the route end");
            }
        }

        Ok(self.push(path, SegmentOrigin::Routed, marker_position))
    }

    fn push(
        &mut self,
        points: Vec<GeoPoint>,
        origin: SegmentOrigin,
        position: GeoPoint,
    ) -> &Segment {
        let is_first = self.segments.is_empty();
        let segment = Segment {
            points,
            origin,
            marker: Marker {
                number: self.segments.len() + 1,
                position,
            },
        };

        let skip = segment.points.len() - segment.contributed(is_first);
        self.flattened.extend_from_slice(&segment.points[skip..]);
        self.segments.push(segment);

        &self.segments[self.segments.len() - 1]
    }

    /// Removes the most recent segment and the points it contributed.
    pub fn undo(&mut self) -> Option<Segment> {
        let segment = self.segments.pop()?;
        let contributed = segment.contributed(self.segments.is_empty());
        let keep = self.flattened.len().saturating_sub(contributed);
        self.flattened.truncate(keep);
        Some(segment)
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.flattened.clear();
    }

    pub fn flattened_points(&self) -> &[GeoPoint] {
        &self.flattened
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn last_point(&self) -> Option<GeoPoint> {
        self.flattened.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    /// Rebuilds the flattened view from segments alone.
    fn derive(store: &SegmentStore) -> Vec<GeoPoint> {
        let mut points = Vec::new();
        for (i, segment) in store.segments().iter().enumerate() {
            let skip = if i == 0 { 0 } else { 1 };
            points.extend_from_slice(&segment.points()[skip..]);
        }
        points
    }

    #[test]
    fn test_first_manual_segment_has_one_point() {
        let mut store = SegmentStore::new();
        let segment = store.append_manual(p(48.0, 2.0));
        assert_eq!(segment.points(), &[p(48.0, 2.0)]);
        assert_eq!(segment.origin(), SegmentOrigin::Manual);
        assert_eq!(segment.marker().number, 1);
    }

    #[test]
    fn test_later_manual_segments_link_previous_point() {
        let mut store = SegmentStore::new();
        store.append_manual(p(48.0, 2.0));
        let segment = store.append_manual(p(48.1, 2.1));
        assert_eq!(segment.points(), &[p(48.0, 2.0), p(48.1, 2.1)]);
        assert_eq!(segment.marker().title(), "Point 2");
    }

    #[test]
    fn test_each_manual_append_grows_by_one() {
        let mut store = SegmentStore::new();
        for i in 0..6 {
            store.append_manual(p(42.5 + i as f64 * 0.001, 2.0));
            assert_eq!(store.flattened_points().len(), i + 1);
            assert_eq!(store.flattened_points(), derive(&store).as_slice());
        }
    }

    #[test]
    fn test_routed_drops_shared_start() {
        let mut store = SegmentStore::new();
        let a = p(42.50, 2.03);
        let m = p(42.505, 2.035);
        let b = p(42.51, 2.04);
        store.append_manual(a);
        let segment = store.append_routed(vec![a, m, b], b).unwrap();
        assert_eq!(segment.points().len(), 3);
        assert_eq!(segment.origin(), SegmentOrigin::Routed);
        assert_eq!(store.flattened_points(), &[a, m, b]);
    }

    #[test]
    fn test_routed_on_empty_store_keeps_all_points() {
        let mut store = SegmentStore::new();
        let path = vec![p(42.50, 2.03), p(42.51, 2.04)];
        store.append_routed(path.clone(), path[1]).unwrap();
        assert_eq!(store.flattened_points(), path.as_slice());
    }

    #[test]
    fn test_empty_path_rejected_without_mutation() {
        let mut store = SegmentStore::new();
        store.append_manual(p(42.5, 2.0));
        let err = store.append_routed(Vec::new(), p(42.6, 2.1)).unwrap_err();
        assert!(matches!(err, RouteError::EmptyPath));
        assert_eq!(store.len(), 1);
        assert_eq!(store.flattened_points().len(), 1);
    }

    #[test]
    fn test_undo_inverts_manual_append() {
        let mut store = SegmentStore::new();
        store.append_manual(p(42.50, 2.03));
        store.append_manual(p(42.51, 2.04));
        let before: Vec<_> = store.flattened_points().to_vec();

        store.append_manual(p(42.52, 2.05));
        let removed = store.undo().unwrap();
        assert_eq!(removed.origin(), SegmentOrigin::Manual);
        assert_eq!(store.flattened_points(), before.as_slice());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_undo_inverts_routed_append() {
        let mut store = SegmentStore::new();
        let a = p(42.50, 2.03);
        let b = p(42.51, 2.04);
        store.append_manual(a);
        store
            .append_routed(vec![a, p(42.502, 2.031), p(42.505, 2.036), b], b)
            .unwrap();
        assert_eq!(store.flattened_points().len(), 4);

        let removed = store.undo().unwrap();
        assert_eq!(removed.points().len(), 4);
        assert_eq!(store.flattened_points(), &[a]);
        assert_eq!(store.flattened_points(), derive(&store).as_slice());
    }

    #[test]
    fn test_undo_mixed_history_back_to_empty() {
        let mut store = SegmentStore::new();
        let a = p(42.50, 2.03);
        let b = p(42.51, 2.04);
        let c = p(42.52, 2.05);
        store.append_manual(a);
        store.append_routed(vec![a, p(42.505, 2.035), b], b).unwrap();
        store.append_manual(c);
        assert_eq!(store.flattened_points().len(), 4);

        store.undo();
        assert_eq!(store.flattened_points().len(), 3);
        store.undo();
        assert_eq!(store.flattened_points(), &[a]);
        store.undo();
        assert!(store.is_empty());
        assert!(store.flattened_points().is_empty());
    }

    #[test]
    fn test_undo_on_empty_is_none() {
        let mut store = SegmentStore::new();
        assert!(store.undo().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = SegmentStore::new();
        store.append_manual(p(42.5, 2.0));
        store.append_manual(p(42.6, 2.0));
        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert!(store.last_point().is_none());
    }

    #[test]
    fn test_marker_position_is_tapped_point() {
        let mut store = SegmentStore::new();
        let a = p(42.50, 2.03);
        let tapped = p(42.5101, 2.0401);
        let snapped = p(42.51, 2.04);
        store.append_manual(a);
        let segment = store.append_routed(vec![a, snapped], tapped).unwrap();
        assert_eq!(segment.marker().position, tapped);
        assert_eq!(store.last_point(), Some(snapped));
    }
}
