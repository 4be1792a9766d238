// src/core/identity/biometric.rs
use std::{path::Path, sync::Arc};

use image::RgbImage;
use tracing::debug;

use super::types::{FaceEmbedding, FaceError};

/// Detection + encoding provided by a face-recognition library.
///
/// Implementations return one embedding per detected face, in the library's
/// detection order.
pub trait FaceEmbeddingBackend: Send + Sync {
    fn extract(&self, image: &RgbImage) -> Result<Vec<FaceEmbedding>, FaceError>;
}

pub struct FaceEngine {
    backend: Arc<dyn FaceEmbeddingBackend>,
}

impl FaceEngine {
    pub fn new(backend: Arc<dyn FaceEmbeddingBackend>) -> Self {
        Self { backend }
    }

    /// Decodes the image at `path` and returns the embedding of the first
    /// detected face, or `None` when no face is found.
    ///
    /// With several faces in frame the pick depends on the library's
    /// detection order, which is not specified.
    pub fn extract_embedding(&self, path: &Path) -> Result<Option<FaceEmbedding>, FaceError> {
        let decode_error = |message: String| FaceError::ImageDecode {
            path: path.to_path_buf(),
            message,
        };

        // Uploaded frames may not match their file extension, so sniff the format
        let image = image::io::Reader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?
            .to_rgb8();

        let mut faces = self.backend.extract(&image)?;
        debug!(
            faces = faces.len(),
            width = image.width(),
            height = image.height(),
            "face detection finished for {:?}",
            path
        );

        if faces.is_empty() {
            return Ok(None);
        }
        Ok(Some(faces.swap_remove(0)))
    }

    /// True iff the Euclidean distance between the encodings is within
    /// `tolerance`. Lower tolerance is stricter.
    pub fn compare(
        &self,
        known: &[f64],
        candidate: &[f64],
        tolerance: f64,
    ) -> Result<bool, FaceError> {
        let distance = face_distance(known, candidate)?;
        debug!(distance, tolerance, "compared face encodings");
        Ok(distance <= tolerance)
    }
}

pub fn face_distance(known: &[f64], candidate: &[f64]) -> Result<f64, FaceError> {
    if known.len() != candidate.len() {
        return Err(FaceError::DimensionMismatch {
            expected: known.len(),
            found: candidate.len(),
        });
    }

    Ok(known
        .iter()
        .zip(candidate)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt())
}
