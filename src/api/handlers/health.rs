// src/api/handlers/health.rs
use actix_web::{
    web::{self, Data},
    HttpResponse,
};
use tracing::error;

use crate::{core::services::HealthService, utils::error::ServiceError};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)));
}

async fn health(service: Data<HealthService>) -> Result<HttpResponse, ServiceError> {
    let metrics = service.get_metrics().await.map_err(|e| {
        error!("Health check failed: {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(metrics))
}
