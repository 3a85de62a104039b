//! IGN Géoplateforme itinerary adapter.

use serde::Deserialize;
use tracing::debug;

use crate::error::RoutingError;
use crate::geo_point::GeoPoint;
use crate::traits::{PathResult, RoutingClient, RoutingProfile};

#[derive(Debug, Clone)]
pub struct IgnConfig {
    pub base_url: String,
    /// Routing graph, e.g. "bdtopo-osrm" or "bdtopo-pgr".
    pub resource: String,
    /// "fastest" or "shortest".
    pub optimization: String,
    pub timeout_secs: u64,
}

impl Default for IgnConfig {
    fn default() -> Self {
        Self {
            base_url: "https://data.geopf.fr/navigation/".to_string(),
            resource: "bdtopo-osrm".to_string(),
            optimization: "fastest".to_string(),
            timeout_secs: 10,
        }
    }
}

fn ign_profile(profile: RoutingProfile) -> &'static str {
    match profile {
        RoutingProfile::Pedestrian => "pedestrian",
        RoutingProfile::Car => "car",
        RoutingProfile::Bike => "bike",
    }
}

#[derive(Debug, Clone)]
pub struct IgnClient {
    config: IgnConfig,
    client: reqwest::Client,
}

impl IgnClient {
    pub fn new(config: IgnConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn itinerary_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/itineraire", base)
    }
}

impl RoutingClient for IgnClient {
    async fn fetch_path(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        profile: RoutingProfile,
    ) -> Result<PathResult, RoutingError> {
        let start_param = start.to_lng_lat_param();
        let end_param = end.to_lng_lat_param();

        let response = self
            .client
            .get(self.itinerary_url())
            .query(&[
                ("resource", self.config.resource.as_str()),
                ("profile", ign_profile(profile)),
                ("optimization", self.config.optimization.as_str()),
                ("start", start_param.as_str()),
                ("end", end_param.as_str()),
                ("geometryFormat", "geojson"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RoutingError::Api { status, message });
        }

        let body: IgnRouteResponse = response.json().await?;
        let path = body.into_path()?;
        debug!(points = path.points.len(), "IGN itinerary received");
        Ok(path)
    }
}

#[derive(Debug, Deserialize)]
struct IgnRouteResponse {
    geometry: Option<IgnGeometry>,
    distance: Option<f64>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IgnGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

impl IgnRouteResponse {
    /// A single invalid position rejects the whole path.
    fn into_path(self) -> Result<PathResult, RoutingError> {
        let points = match self.geometry {
            Some(geometry) => GeoPoint::line_from_lng_lat(&geometry.coordinates)?,
            None => Vec::new(),
        };

        Ok(PathResult {
            points,
            distance_m: self.distance,
            duration_s: self.duration,
        })
    }
}
