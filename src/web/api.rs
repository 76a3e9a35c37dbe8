use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{render_page, AppState};

// === Dashboard Pages ===

/// Page load: run the bootstrap fetches, then render.
pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    let report = state.controller.bootstrap().await;
    info!(
        "Dashboard bootstrap finished ({} panels, {} failed)",
        report.panels.len(),
        report.failures()
    );
    render_dashboard(&state).await
}

#[derive(Debug, Deserialize)]
pub struct LoadParams {
    pub symbol: Option<String>,
}

/// The `#loadDataBtn` submit: load the requested symbol, or whatever the
/// dropdown currently holds, then render.
pub async fn get_load(
    State(state): State<AppState>,
    Query(params): Query<LoadParams>,
) -> Response {
    let symbol = match params.symbol.filter(|s| !s.is_empty()) {
        Some(symbol) => Some(symbol),
        None => state.controller.selected_symbol().await,
    };

    match symbol {
        Some(symbol) => {
            let report = state.controller.load_symbol(&symbol).await;
            info!("Load finished for {}", report);
        }
        None => warn!("Load requested without a symbol"),
    }
    render_dashboard(&state).await
}

async fn render_dashboard(state: &AppState) -> Response {
    let doc = state.controller.document().await;
    match render_page(&doc, &state.page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render dashboard: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render dashboard").into_response()
        }
    }
}

// === Document Snapshot ===

pub async fn get_view(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.document().await)
}

// === Health Check ===

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
