// src/core/identity/types.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::encrypted::StorageError;

/// A face encoding as produced by the recognition network (128 values for
/// the dlib ResNet model).
pub type FaceEmbedding = Vec<f64>;

/// Library default for "same person"; the service is stricter by default.
pub const LIBRARY_TOLERANCE: f64 = 0.6;
pub const DEFAULT_TOLERANCE: f64 = 0.5;

#[derive(Debug, Error)]
pub enum FaceError {
    #[error("failed to decode image {path:?}: {message}")]
    ImageDecode { path: PathBuf, message: String },

    #[error("failed to load model {path:?}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    #[error("embedding length mismatch: expected {expected} values, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("face backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("No face found in the image!")]
    NoFaceDetected,

    #[error(transparent)]
    Face(#[from] FaceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Outcome of a verification attempt. Only `Match` authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Match,
    Mismatch,
    NoFaceInInput,
    NotEnrolled,
}

impl VerificationOutcome {
    pub fn is_verified(self) -> bool {
        self == VerificationOutcome::Match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_match_verifies() {
        assert!(VerificationOutcome::Match.is_verified());
        assert!(!VerificationOutcome::Mismatch.is_verified());
        assert!(!VerificationOutcome::NoFaceInInput.is_verified());
        assert!(!VerificationOutcome::NotEnrolled.is_verified());
    }

    #[test]
    fn test_service_tolerance_is_stricter_than_library() {
        assert!(DEFAULT_TOLERANCE < LIBRARY_TOLERANCE);
    }
}
