use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use std::time::Instant;

static START_TIME: OnceLock<Instant> = OnceLock::new();

pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

#[derive(Debug, Serialize, PartialEq)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db: &'static str,
    pub uptime_seconds: u64,
    pub version: &'static str,
}

impl HealthResponse {
    fn new(db_ok: bool) -> Self {
        Self {
            status: if db_ok { "ok" } else { "degraded" },
            db: if db_ok { "connected" } else { "unreachable" },
            uptime_seconds: START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0),
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn status_code(&self) -> StatusCode {
        if self.status == "ok" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health_check(State(pool): State<Pool<Postgres>>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "health check could not reach the database");
            false
        }
    };

    let body = HealthResponse::new(db_ok);
    (body.status_code(), Json(body))
}
