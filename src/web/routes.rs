use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::jobs::{GeneratorLauncher, JobService};

pub fn router<L>(jobs: Arc<JobService<L>>) -> Router
where
    L: GeneratorLauncher + 'static,
{
    Router::new()
        .route("/run", post(run_generator::<L>))
        .route("/jobs/:id", get(job_status::<L>))
        .route("/health", get(health))
        .with_state(jobs)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve<L>(addr: SocketAddr, jobs: Arc<JobService<L>>) -> std::io::Result<()>
where
    L: GeneratorLauncher + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Trigger endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, router(jobs))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
}

async fn run_generator<L: GeneratorLauncher + 'static>(
    State(jobs): State<Arc<JobService<L>>>,
) -> Response {
    match jobs.trigger() {
        Ok(job_id) => Json(json!({ "status": "success", "job_id": job_id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to launch generator: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn job_status<L: GeneratorLauncher + 'static>(
    State(jobs): State<Arc<JobService<L>>>,
    Path(id): Path<String>,
) -> Response {
    let record = Uuid::parse_str(&id)
        .ok()
        .and_then(|job_id| jobs.status(&job_id));

    match record {
        Some(record) => Json(json!({
            "job_id": id,
            "finished": record.status.is_finished(),
            "status": record.status,
            "started_at": record.started_at,
            "finished_at": record.finished_at,
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no job with id {}", id) })),
        )
            .into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
