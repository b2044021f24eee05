// src/web/handlers/system_handlers.rs
use crate::web::types::{HealthResponse, ServerConfig};

use rocket::serde::json::Json;
use rocket::State;
use tracing::debug;

pub async fn health_handler(config: &State<ServerConfig>) -> Json<HealthResponse> {
    debug!("Health check");
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        model: config.model.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
