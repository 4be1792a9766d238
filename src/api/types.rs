// src/api/types.rs
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::utils::error::ServiceError;

/// Body of `/enroll` and `/verify`, either as JSON
/// (`{"username", "faceEmbedding"}`) or as a urlencoded form
/// (`username`, `image`). The image is base64, optionally as a data URL.
#[derive(Debug, Default, Deserialize)]
pub struct FaceRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "faceEmbedding", alias = "image")]
    pub face_image: Option<String>,
}

impl FaceRequest {
    /// Validates the required fields and decodes the image bytes.
    pub fn into_parts(self) -> Result<(String, Vec<u8>), ServiceError> {
        // Kept exactly as sent; only blank names are refused
        let username = self
            .username
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("username is required".into()))?;

        let encoded = self
            .face_image
            .filter(|i| !i.trim().is_empty())
            .ok_or_else(|| ServiceError::Validation("face image is required".into()))?;

        let image = STANDARD
            .decode(strip_data_url(encoded.trim()))
            .map_err(|e| ServiceError::Validation(format!("face image is not valid base64: {}", e)))?;

        if image.is_empty() {
            return Err(ServiceError::Validation("face image is empty".into()));
        }

        Ok((username, image))
    }
}

/// Drops a `data:image/jpeg;base64,` style prefix if present.
fn strip_data_url(encoded: &str) -> &str {
    if encoded.starts_with("data:") {
        if let Some((_, payload)) = encoded.split_once(',') {
            return payload;
        }
    }
    encoded
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
        }
    }
}
