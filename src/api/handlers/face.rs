// src/api/handlers/face.rs
use std::time::Instant;

use actix_web::{
    web::{self, Data, Form, Json},
    Either, HttpResponse,
};
use tracing::{error, info, warn};

use crate::{
    api::{
        captures::ImageCaptures,
        types::{ApiResponse, FaceRequest},
    },
    core::services::FaceAuthService,
    utils::{error::ServiceError, metrics::Metrics},
};

type FacePayload = Either<Json<FaceRequest>, Form<FaceRequest>>;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/enroll").route(web::post().to(enroll)))
        .service(web::resource("/verify").route(web::post().to(verify)));
}

fn into_request(payload: FacePayload) -> FaceRequest {
    match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
}

async fn enroll(
    service: Data<FaceAuthService>,
    captures: Data<ImageCaptures>,
    metrics: Data<Metrics>,
    payload: FacePayload,
) -> Result<HttpResponse, ServiceError> {
    let started = Instant::now();
    let result = handle_enroll(&service, &captures, into_request(payload)).await;
    metrics.record_request(started.elapsed(), result.is_ok());
    result
}

async fn handle_enroll(
    service: &FaceAuthService,
    captures: &ImageCaptures,
    request: FaceRequest,
) -> Result<HttpResponse, ServiceError> {
    let (username, image) = request.into_parts()?;
    info!("Received enrollment request for {}", username);

    let path = captures.save_enrollment(&username, &image).await?;

    match service.enroll(path, &username).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(format!(
            "User {} enrolled successfully.",
            username
        )))),
        Err(e) => {
            let e = ServiceError::from(e);
            if e.is_client_error() {
                warn!("Enrollment for {} rejected: {}", username, e);
            } else {
                error!("Enrollment for {} failed: {}", username, e);
            }
            Err(e)
        }
    }
}

async fn verify(
    service: Data<FaceAuthService>,
    captures: Data<ImageCaptures>,
    metrics: Data<Metrics>,
    payload: FacePayload,
) -> Result<HttpResponse, ServiceError> {
    let started = Instant::now();
    let result = handle_verify(&service, &captures, into_request(payload)).await;
    metrics.record_request(started.elapsed(), result.is_ok());
    result
}

async fn handle_verify(
    service: &FaceAuthService,
    captures: &ImageCaptures,
    request: FaceRequest,
) -> Result<HttpResponse, ServiceError> {
    let (username, image) = request.into_parts()?;
    info!("Received verification request for {}", username);

    let path = captures.save_verification(&image).await?;
    let result = service.verify(path.clone(), &username).await;
    captures.discard(&path).await;

    let verified = result.map_err(|e| {
        if e.is_client_error() {
            warn!("Verification for {} rejected: {}", username, e);
        } else {
            error!("Verification for {} failed: {}", username, e);
        }
        e
    })?;

    if verified {
        Ok(HttpResponse::Ok().json(ApiResponse::success("Face verified!")))
    } else {
        Ok(HttpResponse::Ok().json(ApiResponse::fail("Face mismatch or not found.")))
    }
}
