pub mod congestion;
pub mod geopoint;
pub mod routes;
pub mod snapshot;
