// src/utils/error.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{
    api::types::ApiResponse,
    core::identity::types::{EnrollError, FaceError},
    storage::encrypted::StorageError,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("No face found in the image!")]
    NoFaceDetected,

    #[error("Face engine error: {0}")]
    Face(#[from] FaceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<EnrollError> for ServiceError {
    fn from(error: EnrollError) -> Self {
        match error {
            EnrollError::NoFaceDetected => ServiceError::NoFaceDetected,
            EnrollError::Face(e) => ServiceError::Face(e),
            EnrollError::Storage(e) => ServiceError::Storage(e),
        }
    }
}

impl ServiceError {
    /// Caused by what the caller sent rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::NoFaceDetected
                | ServiceError::Face(FaceError::ImageDecode { .. })
        )
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::error(self.to_string()))
    }
}
