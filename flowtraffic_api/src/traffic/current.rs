use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use flowtraffic_core::snapshot::{Incident, ZoneCongestion};
use jiff::Timestamp;
use schemars::JsonSchema;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, JsonSchema)]
pub struct CurrentTrafficResponse {
    /// Refreshed to the call time, not the snapshot's creation time.
    timestamp: Timestamp,
    congestion_levels: ZoneCongestion,
    incidents: Vec<Incident>,
}

pub async fn current_traffic_handler(
    State(state): State<Arc<AppState>>,
) -> Json<CurrentTrafficResponse> {
    let snapshot = state.snapshot.read();

    Json(CurrentTrafficResponse {
        timestamp: Timestamp::now(),
        congestion_levels: snapshot.zones().clone(),
        incidents: snapshot.incidents().to_vec(),
    })
}
