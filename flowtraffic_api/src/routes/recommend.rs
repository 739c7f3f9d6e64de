use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use flowtraffic_core::congestion::{CongestionLevel, WeatherCondition};
use flowtraffic_core::geopoint::GeoPoint;
use flowtraffic_core::routes::{
    RouteCandidate, RouteKind, RoutePreferences, RouteRequest, synthesize,
};
use jiff::{Timestamp, Zoned};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// San Francisco, used when the caller omits either endpoint.
const DEFAULT_ORIGIN: GeoPoint = GeoPoint {
    lat: 37.773,
    lng: -122.43,
};
const DEFAULT_DESTINATION: GeoPoint = GeoPoint {
    lat: 37.74,
    lng: -122.38,
};

#[derive(Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RecommendRequestBody {
    origin: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    preferences: RoutePreferences,
}

/// Wire representation of a candidate: durations and distances are
/// preformatted display strings, paths are bare `[lat, lng]` pairs.
#[derive(Serialize, JsonSchema)]
pub struct ApiRoute {
    id: u8,
    name: String,
    #[serde(rename = "type")]
    kind: RouteKind,
    duration: String,
    distance: String,
    congestion: CongestionLevel,
    path: Vec<[f64; 2]>,
}

impl From<RouteCandidate> for ApiRoute {
    fn from(route: RouteCandidate) -> ApiRoute {
        ApiRoute {
            id: route.id,
            name: route.name,
            kind: route.kind,
            duration: format!("{} mins", route.duration_minutes),
            distance: format!("{:.1} km", route.distance_km),
            congestion: route.congestion,
            path: route.path.iter().map(|p| [p.lat, p.lng]).collect(),
        }
    }
}

#[derive(Serialize, JsonSchema)]
pub struct RecommendMetadata {
    timestamp: Timestamp,
    traffic_conditions: &'static str,
}

#[derive(Serialize, JsonSchema)]
pub struct RecommendResponse {
    routes: Vec<ApiRoute>,
    metadata: RecommendMetadata,
}

pub async fn recommend_routes_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecommendRequestBody>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let origin = checked(body.origin.unwrap_or(DEFAULT_ORIGIN))?;
    let destination = checked(body.destination.unwrap_or(DEFAULT_DESTINATION))?;

    let now = Zoned::now();
    let request = RouteRequest {
        origin,
        destination,
        hour: now.hour() as usize,
        weekday: now.weekday().to_monday_zero_offset() as usize,
        weather: WeatherCondition::Clear,
        incident_count: state.snapshot.read().incident_count(),
    };

    let routes = synthesize(&request, &body.preferences, &mut rand::rng());

    Ok(Json(RecommendResponse {
        routes: routes.into_iter().map(ApiRoute::from).collect(),
        metadata: RecommendMetadata {
            timestamp: Timestamp::now(),
            traffic_conditions: "moderate",
        },
    }))
}

fn checked(point: GeoPoint) -> Result<GeoPoint, ApiError> {
    GeoPoint::validated(point.lat, point.lng)
        .map_err(|error| ApiError::BadRequest(error.to_string()))
}
