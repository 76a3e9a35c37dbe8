use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{api, AppState};

pub fn dashboard_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = ServeDir::new(&state.page.static_dir);

    Router::new()
        // Dashboard pages
        .route("/", get(api::get_dashboard))
        .route("/load", get(api::get_load))
        // Snapshot and health
        .route("/view", get(api::get_view))
        .route("/health", get(api::health_check))
        .nest_service("/static", static_dir)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_dashboard_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = dashboard_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard server starting on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
