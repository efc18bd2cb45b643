// Route exports
pub mod feed;
pub mod swipes;

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{EngineError, MatchEngine};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(feed::configure)
            .configure(swipes::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_healthy = state.engine.store_healthy().await;
    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map engine errors onto HTTP status codes and JSON error bodies.
pub(crate) fn engine_error_response(err: EngineError) -> HttpResponse {
    let (status_code, error) = match &err {
        EngineError::SelfSwipe => (400, "self_swipe_rejected"),
        EngineError::UserNotFound(_) => (404, "user_not_found"),
        EngineError::Directory(_) => (500, "directory_fetch_failed"),
        EngineError::StoreUnavailable => (503, "store_unavailable"),
        EngineError::Store(_) => (500, "store_error"),
    };

    let body = ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code,
    };

    match status_code {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
