//! route-sketch core
//!
//! Interactive route construction: manual sketching, guided routing through
//! an external backend, undo and clear, and a renderable route snapshot.

pub mod error;
pub mod geo_point;
pub mod haversine;
pub mod segment;
pub mod summary;
pub mod session;
pub mod traits;
pub mod ign;
pub mod osrm;
pub mod osrm_data;

pub use error::{RouteError, RoutingError};
pub use geo_point::GeoPoint;
pub use segment::{Marker, Segment, SegmentOrigin, SegmentStore};
pub use session::{
    ModeTransition, PendingRoute, RouteMode, RouteSession, SessionConfig, TapOutcome,
};
pub use summary::{RouteSnapshot, RouteSummary};
pub use traits::{PathResult, RoutingClient, RoutingProfile, TrackSink, TrackSource};
