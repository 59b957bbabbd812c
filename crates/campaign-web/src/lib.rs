//! Campaign Web Server
//!
//! Axum server rendering the analysis form, results, charts and history.

pub mod markdown;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/charts", get(routes::api::get_charts))
        .route("/history", get(routes::api::get_history))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::page::index))
        .route("/analyze", post(routes::page::analyze))
        .route("/reset", post(routes::page::reset))
        .route("/report", get(routes::report::download_report))
        .route("/artifacts/{name}", get(routes::artifacts::get_artifact))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
