//! Route synthesis.
//!
//! No road network is involved: all three candidates are derived from a single
//! great-circle distance, scaled per variant, and given an interpolated
//! waypoint path for map display. The caller supplies the ambient conditions
//! and a jitter RNG, which keeps this module deterministic under test.

use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::congestion::{CongestionLevel, WeatherCondition, estimate};
use crate::geopoint::GeoPoint;

/// Assumed free-flow speed for the duration model.
const BASE_SPEED_KMH: f64 = 60.0;

/// Maximum perturbation applied to interpolated waypoints, in degrees.
const WAYPOINT_JITTER_DEG: f64 = 0.01;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RouteKind {
    Fastest,
    Shortest,
    LeastCongested,
}

impl RouteKind {
    /// Lenient wire parsing: anything unrecognized means "no preference".
    pub fn from_wire(raw: &str) -> Option<RouteKind> {
        match raw {
            "fastest" => Some(RouteKind::Fastest),
            "shortest" => Some(RouteKind::Shortest),
            "leastCongested" => Some(RouteKind::LeastCongested),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RouteCandidate {
    pub id: u8,
    pub name: String,
    pub kind: RouteKind,
    pub duration_minutes: u32,
    pub distance_km: f64,
    pub congestion: CongestionLevel,
    pub path: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutePreferences {
    #[serde(deserialize_with = "lenient_route_kind")]
    pub route_type: Option<RouteKind>,
    /// Accepted for wire compatibility; toll filtering is not implemented and
    /// this flag changes nothing.
    pub avoid_tolls: bool,
}

fn lenient_route_kind<'de, D>(deserializer: D) -> Result<Option<RouteKind>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // Any non-string value counts as "no preference" too, not a 400.
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(RouteKind::from_wire))
}

/// Everything route synthesis needs besides the caller's preferences.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Hour of day in `0..24`.
    pub hour: usize,
    /// Weekday in `0..7`, 0 = Monday.
    pub weekday: usize,
    pub weather: WeatherCondition,
    pub incident_count: u32,
}

/// Produces exactly three candidates — fastest, shortest, least congested —
/// with ids 1, 2, 3 fixed in that generation order. Preference-driven
/// reordering permutes the list but never the ids or contents.
pub fn synthesize<R: Rng>(
    request: &RouteRequest,
    preferences: &RoutePreferences,
    rng: &mut R,
) -> Vec<RouteCandidate> {
    let direct_km = request
        .origin
        .haversine_distance_km(&request.destination);

    let base = estimate(
        request.hour,
        request.weekday,
        request.weather,
        request.incident_count,
    );

    tracing::debug!(direct_km, base_congestion = base, "synthesizing candidates");

    let mut routes = vec![
        // Slight detour that dodges the worst of the congestion.
        candidate(
            1,
            "Fastest Route",
            RouteKind::Fastest,
            direct_km * 1.1,
            (base * 0.7).max(0.1),
            2,
            request,
            rng,
        ),
        // Straight through the middle, congestion and all. The 1.2 factor is
        // deliberately left unclamped.
        candidate(
            2,
            "Shortest Route",
            RouteKind::Shortest,
            direct_km,
            base * 1.2,
            1,
            request,
            rng,
        ),
        candidate(
            3,
            "Alternative Route",
            RouteKind::LeastCongested,
            direct_km * 1.3,
            (base * 0.5).max(0.1),
            3,
            request,
            rng,
        ),
    ];

    match preferences.route_type {
        Some(RouteKind::Fastest) => routes.sort_by_key(|route| route.duration_minutes),
        Some(RouteKind::LeastCongested) => routes.sort_by_key(|route| route.congestion.rank()),
        _ => {}
    }

    routes
}

#[allow(clippy::too_many_arguments)]
fn candidate<R: Rng>(
    id: u8,
    name: &str,
    kind: RouteKind,
    distance_km: f64,
    congestion: f64,
    waypoints: usize,
    request: &RouteRequest,
    rng: &mut R,
) -> RouteCandidate {
    let time_hours = (distance_km / BASE_SPEED_KMH) * (1.0 + congestion);

    RouteCandidate {
        id,
        name: name.to_owned(),
        kind,
        duration_minutes: (time_hours * 60.0) as u32,
        distance_km,
        congestion: CongestionLevel::from_score(congestion),
        path: interpolated_path(&request.origin, &request.destination, waypoints, rng),
    }
}

/// Straight-line interpolation with per-waypoint jitter; purely a
/// visualization aid. Always `waypoints + 2` points, origin first,
/// destination last.
fn interpolated_path<R: Rng>(
    origin: &GeoPoint,
    destination: &GeoPoint,
    waypoints: usize,
    rng: &mut R,
) -> Vec<GeoPoint> {
    let mut path = Vec::with_capacity(waypoints + 2);
    path.push(*origin);

    for i in 0..waypoints {
        let progress = (i + 1) as f64 / (waypoints + 1) as f64;
        let lat = origin.lat
            + progress * (destination.lat - origin.lat)
            + rng.random_range(-WAYPOINT_JITTER_DEG..=WAYPOINT_JITTER_DEG);
        let lng = origin.lng
            + progress * (destination.lng - origin.lng)
            + rng.random_range(-WAYPOINT_JITTER_DEG..=WAYPOINT_JITTER_DEG);
        path.push(GeoPoint::new(lat, lng));
    }

    path.push(*destination);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sf_request() -> RouteRequest {
        RouteRequest {
            origin: GeoPoint::new(37.773, -122.43),
            destination: GeoPoint::new(37.74, -122.38),
            hour: 8,
            weekday: 0,
            weather: WeatherCondition::Clear,
            incident_count: 2,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn always_three_candidates_with_fixed_ids() {
        let routes = synthesize(&sf_request(), &RoutePreferences::default(), &mut rng());

        assert_eq!(routes.len(), 3);
        let mut ids: Vec<u8> = routes.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn default_order_and_names() {
        let routes = synthesize(&sf_request(), &RoutePreferences::default(), &mut rng());

        let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Fastest Route", "Shortest Route", "Alternative Route"]
        );
        assert_eq!(routes[0].kind, RouteKind::Fastest);
        assert_eq!(routes[1].kind, RouteKind::Shortest);
        assert_eq!(routes[2].kind, RouteKind::LeastCongested);
    }

    #[test]
    fn distances_scale_from_direct() {
        let request = sf_request();
        let direct = request.origin.haversine_distance_km(&request.destination);
        let routes = synthesize(&request, &RoutePreferences::default(), &mut rng());

        assert!((routes[0].distance_km - direct * 1.1).abs() < 1e-9);
        assert!((routes[1].distance_km - direct).abs() < 1e-9);
        assert!((routes[2].distance_km - direct * 1.3).abs() < 1e-9);
    }

    #[test]
    fn path_lengths_per_variant() {
        let routes = synthesize(&sf_request(), &RoutePreferences::default(), &mut rng());

        // 2, 1 and 3 waypoints respectively, plus origin and destination.
        assert_eq!(routes[0].path.len(), 4);
        assert_eq!(routes[1].path.len(), 3);
        assert_eq!(routes[2].path.len(), 5);
    }

    #[test]
    fn paths_start_and_end_at_the_request_points() {
        let request = sf_request();
        let routes = synthesize(&request, &RoutePreferences::default(), &mut rng());

        for route in &routes {
            assert_eq!(route.path.first(), Some(&request.origin));
            assert_eq!(route.path.last(), Some(&request.destination));
        }
    }

    #[test]
    fn waypoints_stay_near_the_segment() {
        let request = sf_request();
        let routes = synthesize(&request, &RoutePreferences::default(), &mut rng());

        let (lat_lo, lat_hi) = (request.destination.lat, request.origin.lat);
        for route in &routes {
            for point in &route.path[1..route.path.len() - 1] {
                assert!(point.lat > lat_lo - 0.011 && point.lat < lat_hi + 0.011);
                assert!(point.lng > request.origin.lng - 0.011);
                assert!(point.lng < request.destination.lng + 0.011);
            }
        }
    }

    #[test]
    fn seeded_rng_reproduces_paths() {
        let request = sf_request();
        let prefs = RoutePreferences::default();

        let first = synthesize(&request, &prefs, &mut rng());
        let second = synthesize(&request, &prefs, &mut rng());
        assert_eq!(first, second);
    }

    #[test]
    fn fastest_preference_sorts_by_duration() {
        let prefs = RoutePreferences {
            route_type: Some(RouteKind::Fastest),
            avoid_tolls: false,
        };
        let routes = synthesize(&sf_request(), &prefs, &mut rng());

        assert!(routes.windows(2).all(|w| w[0].duration_minutes <= w[1].duration_minutes));
    }

    #[test]
    fn least_congested_preference_sorts_by_level() {
        let prefs = RoutePreferences {
            route_type: Some(RouteKind::LeastCongested),
            avoid_tolls: false,
        };
        let routes = synthesize(&sf_request(), &prefs, &mut rng());

        assert!(routes
            .windows(2)
            .all(|w| w[0].congestion.rank() <= w[1].congestion.rank()));
    }

    #[test]
    fn avoid_tolls_changes_nothing() {
        let request = sf_request();
        let with_tolls = synthesize(&request, &RoutePreferences::default(), &mut rng());
        let without = synthesize(
            &request,
            &RoutePreferences {
                route_type: None,
                avoid_tolls: true,
            },
            &mut rng(),
        );
        assert_eq!(with_tolls, without);
    }

    #[test]
    fn shortest_duration_reflects_unclamped_congestion() {
        // Saturated conditions: base congestion clamps to 1.0, so the
        // shortest variant runs its duration model at 1.2.
        let request = RouteRequest {
            weather: WeatherCondition::Snow,
            incident_count: 10,
            ..sf_request()
        };
        let direct = request.origin.haversine_distance_km(&request.destination);
        let routes = synthesize(&request, &RoutePreferences::default(), &mut rng());

        let expected = ((direct / 60.0) * 2.2 * 60.0) as u32;
        assert_eq!(routes[1].duration_minutes, expected);
        assert_eq!(routes[1].congestion, CongestionLevel::High);
    }

    #[test]
    fn unknown_route_type_deserializes_to_none() {
        let prefs: RoutePreferences =
            serde_json::from_str(r#"{"routeType": "scenic", "avoidTolls": true}"#).unwrap();
        assert_eq!(prefs.route_type, None);
        assert!(prefs.avoid_tolls);

        let prefs: RoutePreferences =
            serde_json::from_str(r#"{"routeType": "leastCongested"}"#).unwrap();
        assert_eq!(prefs.route_type, Some(RouteKind::LeastCongested));
    }

    #[test]
    fn non_string_route_type_deserializes_to_none() {
        let prefs: RoutePreferences = serde_json::from_str(r#"{"routeType": 5}"#).unwrap();
        assert_eq!(prefs.route_type, None);

        let prefs: RoutePreferences = serde_json::from_str(r#"{"routeType": null}"#).unwrap();
        assert_eq!(prefs.route_type, None);
    }
}
