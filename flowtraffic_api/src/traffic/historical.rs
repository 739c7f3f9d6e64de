use std::collections::BTreeMap;

use axum::Json;
use flowtraffic_core::snapshot::hourly_congestion;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Serialize, JsonSchema)]
pub struct HistoricalTrafficResponse {
    congestion_by_hour: BTreeMap<u8, f64>,
}

pub async fn historical_traffic_handler() -> Json<HistoricalTrafficResponse> {
    Json(HistoricalTrafficResponse {
        congestion_by_hour: hourly_congestion(),
    })
}
