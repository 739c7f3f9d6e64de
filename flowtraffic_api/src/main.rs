use std::sync::Arc;

use flowtraffic_api::app;
use flowtraffic_api::state::AppState;
use tracing::{Level, info};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    aide::generate::on_error(|error| tracing::error!("{}", error));
    aide::generate::extract_schemas(true);

    let state = Arc::new(AppState::new());
    let (app, api) = app(state);

    if std::env::args().any(|a| a == "--generate-openapi") {
        use std::fs::File;
        use std::io::Write;

        let mut file = File::create("schemas/openapi.json").unwrap();
        let spec = serde_json::to_string_pretty(api.as_ref()).unwrap();
        file.write_all(spec.as_bytes()).unwrap();
        info!("OpenAPI specification has been written to openapi.json");
        return;
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    info!(port, "flowtraffic api listening");

    axum::serve(listener, app).await.unwrap();
}
