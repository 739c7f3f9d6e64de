use flowtraffic_core::snapshot::TrafficSnapshot;
use jiff::Timestamp;
use parking_lot::RwLock;

/// Shared service state. The snapshot is seeded once at startup; handlers
/// only ever take read guards.
pub struct AppState {
    pub snapshot: RwLock<TrafficSnapshot>,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            snapshot: RwLock::new(TrafficSnapshot::seeded(Timestamp::now())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
