// src/api/rest.rs
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    error::{JsonPayloadError, UrlencodedError},
    http::header,
    web::{self, Data},
    App, HttpRequest, HttpServer,
};
use tracing::info;

use super::{captures::ImageCaptures, handlers};
use crate::{
    core::services::{FaceAuthService, HealthService},
    utils::{
        config::{SecurityConfig, ServerConfig},
        error::{Result, ServiceError},
        metrics::Metrics,
    },
};

/// Shared handles injected into every worker.
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<FaceAuthService>,
    pub health: Arc<HealthService>,
    pub captures: Arc<ImageCaptures>,
    pub metrics: Arc<Metrics>,
}

/// Registers app data, body limits and routes.
pub fn configure(cfg: &mut web::ServiceConfig, state: &ApiState, max_request_size: usize) {
    cfg.app_data(Data::from(state.auth.clone()))
        .app_data(Data::from(state.health.clone()))
        .app_data(Data::from(state.captures.clone()))
        .app_data(Data::from(state.metrics.clone()))
        .app_data(web::PayloadConfig::new(max_request_size))
        .app_data(
            web::JsonConfig::default()
                .limit(max_request_size)
                .error_handler(json_error),
        )
        .app_data(
            web::FormConfig::default()
                .limit(max_request_size)
                .error_handler(form_error),
        )
        .configure(handlers::face::routes)
        .configure(handlers::health::routes);
}

fn json_error(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ServiceError::Validation(format!("invalid request body: {}", error)).into()
}

fn form_error(error: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    ServiceError::Validation(format!("invalid form body: {}", error)).into()
}

pub fn cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(3600);

    for origin in allowed_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }
    cors
}

pub struct RestApi {
    server: ServerConfig,
    security: SecurityConfig,
    state: ApiState,
}

impl RestApi {
    pub fn new(server: ServerConfig, security: SecurityConfig, state: ApiState) -> Self {
        Self {
            server,
            security,
            state,
        }
    }

    /// Serves until the server is stopped (Ctrl-C / SIGTERM).
    pub async fn start(self) -> Result<()> {
        let state = self.state;
        let security = self.security;

        let mut server = HttpServer::new(move || {
            let state = state.clone();
            let max_request_size = security.max_request_size;
            App::new()
                .wrap(cors(&security.allowed_origins))
                .configure(move |cfg| configure(cfg, &state, max_request_size))
        });

        if let Some(workers) = self.server.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind((self.server.host.as_str(), self.server.port))
            .map_err(|e| ServiceError::Config(format!("Failed to bind API server: {}", e)))?;

        info!("Listening on {}:{}", self.server.host, self.server.port);
        server.run().await?;

        Ok(())
    }
}
