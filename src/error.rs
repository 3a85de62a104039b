//! Error types for route construction and routing backends.

use thiserror::Error;

/// Failure reported by a [`RoutingClient`](crate::traits::RoutingClient).
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed routing response: {0}")]
    Decode(String),

    #[error("no route found: {0}")]
    NoRoute(String),

    #[error("routing backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("routing returned an empty path")]
    EmptyPath,

    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    #[error("a routing request is already in flight")]
    Busy,

    #[error("routing request cancelled")]
    Cancelled,
}

impl RouteError {
    /// True for failures the user can simply retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RouteError::InvalidCoordinate { .. })
    }
}
