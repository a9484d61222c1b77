//! HTTP status surface: liveness ping, scheduler health snapshot, and a
//! CORS-friendly fallback.

use crate::scheduler::{SchedulerState, StatusSnapshot};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub scheduled_content_job_running: bool,
    pub immediate_content_check_running: bool,
    pub telegram_job_running: bool,
    pub midnight_refresh_running: bool,
    pub next_scheduled_content_run_scheduled: bool,
    pub next_immediate_check_scheduled: bool,
    pub next_telegram_run_scheduled: bool,
    pub next_midnight_refresh_scheduled: bool,
    pub users_processing_content: Vec<String>,
}

impl HealthResponse {
    fn from_snapshot(snapshot: StatusSnapshot) -> Self {
        Self {
            status: "ok",
            scheduled_content_job_running: snapshot.scheduled_content.running,
            immediate_content_check_running: snapshot.immediate_check.running,
            telegram_job_running: snapshot.telegram.running,
            midnight_refresh_running: snapshot.midnight_refresh.running,
            next_scheduled_content_run_scheduled: snapshot.scheduled_content.next_run_scheduled,
            next_immediate_check_scheduled: snapshot.immediate_check.next_run_scheduled,
            next_telegram_run_scheduled: snapshot.telegram.next_run_scheduled,
            next_midnight_refresh_scheduled: snapshot.midnight_refresh.next_run_scheduled,
            users_processing_content: snapshot
                .locked_subscribers
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

async fn ping() -> &'static str {
    "pong"
}

async fn health(State(state): State<Arc<SchedulerState>>) -> Json<HealthResponse> {
    Json(HealthResponse::from_snapshot(state.snapshot()))
}

async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
                (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            ],
        )
            .into_response();
    }
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

pub fn make_app(state: Arc<SchedulerState>) -> Router {
    // The fallback handles both unmatched paths and non-GET methods on the
    // registered routes, so OPTIONS preflights get CORS headers everywhere.
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .with_state(state)
}

pub async fn run_server(
    state: Arc<SchedulerState>,
    port: u16,
    shutdown: CancellationToken,
) -> Result<()> {
    let app = make_app(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Status server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Status server failed")?;

    info!("Status server stopped");
    Ok(())
}
