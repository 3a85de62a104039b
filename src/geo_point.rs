//! Geographic point value type.

use serde::{Deserialize, Serialize};

use crate::error::{RouteError, RoutingError};

/// WGS84 position, optionally with an elevation in meters.
///
/// Construction validates the coordinate range, so every `GeoPoint` in the
/// crate is a valid position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoPointRepr")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation: Option<f64>,
}

/// Unchecked wire form; deserialization goes through [`GeoPoint::new`].
#[derive(Deserialize)]
struct GeoPointRepr {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation: Option<f64>,
}

impl TryFrom<GeoPointRepr> for GeoPoint {
    type Error = RouteError;

    fn try_from(repr: GeoPointRepr) -> Result<Self, Self::Error> {
        match repr.elevation {
            Some(elevation) => Self::with_elevation(repr.latitude, repr.longitude, elevation),
            None => Self::new(repr.latitude, repr.longitude),
        }
    }
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RouteError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(RouteError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
            elevation: None,
        })
    }

    pub fn with_elevation(
        latitude: f64,
        longitude: f64,
        elevation: f64,
    ) -> Result<Self, RouteError> {
        let point = Self::new(latitude, longitude)?;
        Ok(Self {
            elevation: elevation.is_finite().then_some(elevation),
            ..point
        })
    }

    /// Builds a point from a `[longitude, latitude]` GeoJSON position.
    pub fn from_lng_lat(position: &[f64]) -> Result<Self, RouteError> {
        match position {
            [lng, lat] => Self::new(*lat, *lng),
            [lng, lat, ele, ..] => Self::with_elevation(*lat, *lng, *ele),
            _ => Err(RouteError::InvalidCoordinate {
                latitude: f64::NAN,
                longitude: f64::NAN,
            }),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    /// Decodes a GeoJSON line string, rejecting it whole on any bad position.
    pub fn line_from_lng_lat(positions: &[Vec<f64>]) -> Result<Vec<Self>, RoutingError> {
        positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                Self::from_lng_lat(position)
                    .map_err(|err| RoutingError::Decode(format!("position {}: {}", i, err)))
            })
            .collect()
    }

    /// `lng,lat` pair as expected by routing query strings.
    pub fn to_lng_lat_param(&self) -> String {
        format!("{:.6},{:.6}", self.longitude, self.latitude)
    }
}
