//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 存活检查 |
//! | /health/detailed | GET | 附带存储探测与会话数 |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

use crate::core::ServerState;

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

pub fn router() -> Router<ServerState> {
    STARTED_AT.get_or_init(Instant::now);
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct DetailedHealth {
    #[serde(flatten)]
    health: Health,
    uptime_seconds: u64,
    open_floors: usize,
    /// 存储探测耗时，失败时为 None
    storage_latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage_error: Option<String>,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealth> {
    let started = Instant::now();
    let (storage_latency_ms, storage_error) = match state.store.list_floors() {
        Ok(_) => (Some(started.elapsed().as_millis() as u64), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Json(DetailedHealth {
        health: Health {
            status: if storage_error.is_none() { "healthy" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
        },
        uptime_seconds: STARTED_AT.get_or_init(Instant::now).elapsed().as_secs(),
        open_floors: state.sessions.open_count(),
        storage_latency_ms,
        storage_error,
    })
}
