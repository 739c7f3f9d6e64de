use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InvalidCoordinate {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    /// Range-checks a raw coordinate pair. Core routines assume their inputs
    /// already passed through here (or are otherwise known finite).
    pub fn validated(lat: f64, lng: f64) -> Result<GeoPoint, InvalidCoordinate> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate::Latitude(lat));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinate::Longitude(lng));
        }

        Ok(GeoPoint { lat, lng })
    }

    /// Great-circle distance in kilometers, spherical Earth of radius 6371 km.
    pub fn haversine_distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}
