use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use flowtraffic_core::snapshot::Incident;

use crate::state::AppState;

pub async fn incidents_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Incident>> {
    Json(state.snapshot.read().incidents().to_vec())
}
