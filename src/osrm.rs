//! OSRM HTTP adapter for routed paths.

use serde::Deserialize;
use tracing::debug;

use crate::error::RoutingError;
use crate::geo_point::GeoPoint;
use crate::traits::{PathResult, RoutingClient, RoutingProfile};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// URL profile segment. `osrm-routed` serves whatever dataset it was started
/// with, so this only matters behind a multi-profile proxy.
fn osrm_profile(profile: RoutingProfile) -> &'static str {
    match profile {
        RoutingProfile::Pedestrian => "foot",
        RoutingProfile::Car => "driving",
        RoutingProfile::Bike => "bike",
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, start: &GeoPoint, end: &GeoPoint, profile: RoutingProfile) -> String {
        format!(
            "{}/route/v1/{}/{};{}",
            self.config.base_url.trim_end_matches('/'),
            osrm_profile(profile),
            start.to_lng_lat_param(),
            end.to_lng_lat_param()
        )
    }
}

impl RoutingClient for OsrmClient {
    async fn fetch_path(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        profile: RoutingProfile,
    ) -> Result<PathResult, RoutingError> {
        let response = self
            .client
            .get(self.route_url(&start, &end, profile))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        // OSRM answers NoRoute and friends with a 400 and a JSON body.
        let status = response.status();
        let body = response.text().await?;
        let parsed: OsrmRouteResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) => {
                return Err(RoutingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
        };

        let path = parsed.into_path()?;
        debug!(points = path.points.len(), "OSRM route received");
        Ok(path)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Vec<f64>>,
}

impl OsrmRouteResponse {
    fn into_path(self) -> Result<PathResult, RoutingError> {
        if self.code != "Ok" {
            return Err(RoutingError::NoRoute(self.code));
        }

        let Some(route) = self.routes.into_iter().next() else {
            return Ok(PathResult::default());
        };

        Ok(PathResult {
            points: GeoPoint::line_from_lng_lat(&route.geometry.coordinates)?,
            distance_m: Some(route.distance),
            duration_s: Some(route.duration),
        })
    }
}
