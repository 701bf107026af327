//! Liveness and readiness endpoints

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::mongodb::check_health_detailed;

use crate::state::AppState;

/// Plain-text liveness banner served at `/`.
pub const BANNER: &str = "Simple Shop Server is running";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/ready", get(readiness_check))
        .with_state(state)
}

async fn banner() -> &'static str {
    BANNER
}

/// Readiness check - pings MongoDB
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let client = state.mongo_client.clone();
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async move {
            let status = check_health_detailed(&client).await;
            tracing::debug!(
                healthy = status.healthy,
                response_time_ms = status.response_time_ms,
                "MongoDB ping"
            );
            match status.message {
                Some(message) if !status.healthy => Err(message),
                _ => Ok(()),
            }
        }),
    )];

    run_health_checks(checks).await
}
