//! The service's synthetic traffic dataset.
//!
//! One snapshot is built at startup and owned by the service; handlers read
//! through it and the only mutation path is the methods on the container
//! itself.

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::geopoint::GeoPoint;

/// Fixed hourly congestion curve served by the historical endpoint.
const HOURLY_CONGESTION: [(u8, f64); 15] = [
    (6, 0.3),
    (7, 0.5),
    (8, 0.8),
    (9, 0.7),
    (10, 0.4),
    (11, 0.3),
    (12, 0.4),
    (13, 0.5),
    (14, 0.4),
    (15, 0.5),
    (16, 0.7),
    (17, 0.9),
    (18, 0.8),
    (19, 0.6),
    (20, 0.4),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    Accident,
    Construction,
    Closure,
    Hazard,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Incident {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub location: GeoPoint,
    pub severity: IncidentSeverity,
    pub reported_at: Timestamp,
    pub description: String,
}

/// Congestion by city zone, serialized in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ZoneCongestion {
    pub downtown: f64,
    pub highways: f64,
    pub residential: f64,
    pub commercial: f64,
}

#[derive(Debug, Clone)]
pub struct TrafficSnapshot {
    zones: ZoneCongestion,
    incidents: Vec<Incident>,
    next_incident_id: u32,
}

impl TrafficSnapshot {
    /// The canned dataset: four zones and two open incidents, timestamped
    /// relative to `now`.
    pub fn seeded(now: Timestamp) -> TrafficSnapshot {
        let incidents = vec![
            Incident {
                id: 1,
                kind: IncidentKind::Accident,
                location: GeoPoint::new(37.781, -122.412),
                severity: IncidentSeverity::Moderate,
                reported_at: now - SignedDuration::from_mins(15),
                description: "Two-vehicle collision, right lane blocked".to_owned(),
            },
            Incident {
                id: 2,
                kind: IncidentKind::Construction,
                location: GeoPoint::new(37.792, -122.421),
                severity: IncidentSeverity::Low,
                reported_at: now - SignedDuration::from_hours(2),
                description: "Road work, one lane closed".to_owned(),
            },
        ];

        TrafficSnapshot {
            zones: ZoneCongestion {
                downtown: 0.75,
                highways: 0.65,
                residential: 0.3,
                commercial: 0.5,
            },
            next_incident_id: incidents.len() as u32 + 1,
            incidents,
        }
    }

    pub fn zones(&self) -> &ZoneCongestion {
        &self.zones
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn incident_count(&self) -> u32 {
        self.incidents.len() as u32
    }

    /// Records a new incident and returns its assigned id.
    pub fn report_incident(
        &mut self,
        kind: IncidentKind,
        location: GeoPoint,
        severity: IncidentSeverity,
        description: impl Into<String>,
        reported_at: Timestamp,
    ) -> u32 {
        let id = self.next_incident_id;
        self.next_incident_id += 1;

        tracing::info!(id, ?kind, "incident reported");

        self.incidents.push(Incident {
            id,
            kind,
            location,
            severity,
            reported_at,
            description: description.into(),
        });
        id
    }

    pub fn clear_incidents(&mut self) {
        self.incidents.clear();
    }
}

/// The historical hour → congestion mapping, keyed by hour of day. The same
/// 15 entries on every call.
pub fn hourly_congestion() -> BTreeMap<u8, f64> {
    HOURLY_CONGESTION.into_iter().collect()
}
