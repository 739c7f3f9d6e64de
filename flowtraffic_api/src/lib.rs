pub mod docs;
pub mod error;
pub mod health;
pub mod incidents;
pub mod routes;
pub mod state;
pub mod traffic;

use std::sync::Arc;

use aide::axum::ApiRouter;
use aide::axum::routing::{get, post};
use aide::openapi::OpenApi;
use aide::transform::TransformOpenApi;
use axum::Extension;
use axum::http::Method;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::docs::docs_routes;
use crate::state::AppState;

/// Assembles the full service router and its generated OpenAPI document.
pub fn app(state: Arc<AppState>) -> (axum::Router, Arc<OpenApi>) {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers(Any);

    let mut api = OpenApi::default();

    let router = ApiRouter::new()
        .nest_api_service("/docs", docs_routes(state.clone()))
        .api_route(
            "/api/traffic/current",
            get(traffic::current::current_traffic_handler),
        )
        .api_route(
            "/api/traffic/historical",
            get(traffic::historical::historical_traffic_handler),
        )
        .api_route(
            "/api/routes/recommend",
            post(routes::recommend::recommend_routes_handler),
        )
        .api_route("/api/incidents", get(incidents::incidents_handler))
        .api_route("/api/health", get(health::health_handler))
        .finish_api_with(&mut api, api_docs);

    let api = Arc::new(api);

    let router = router
        .layer(ServiceBuilder::new().layer(cors_layer))
        .layer(Extension(api.clone()))
        .with_state(state);

    (router, api)
}

fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    api.title("FlowTraffic Open API")
}
