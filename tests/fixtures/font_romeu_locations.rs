//! Real Font-Romeu / Cerdagne locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. They sit on the footpath network
//! covered by the Languedoc-Roussillon Geofabrik extract.

use route_sketch::GeoPoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng).expect("fixture coordinates are valid")
    }
}

pub const FONT_ROMEU_CENTER: Location = Location::new("Font-Romeu centre", 42.506059, 2.038907);

pub const HIKING_SPOTS: &[Location] = &[
    Location::new("Ermitage de Font-Romeu", 42.5149, 2.0483),
    Location::new("Lac de la Calme", 42.5226, 2.0660),
    Location::new("Pla de Barrès", 42.5007, 2.0769),
    Location::new("Bolquère", 42.4975, 2.0843),
    Location::new("Superbolquère", 42.5116, 2.0715),
    Location::new("Odeillo four solaire", 42.4945, 2.0350),
    Location::new("Via", 42.4864, 2.0269),
];

pub fn all_points() -> Vec<GeoPoint> {
    std::iter::once(&FONT_ROMEU_CENTER)
        .chain(HIKING_SPOTS.iter())
        .map(Location::point)
        .collect()
}
