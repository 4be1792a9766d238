// src/core/services/identity.rs
use std::{path::PathBuf, sync::Arc};

use tracing::{info, warn};

use crate::{
    core::identity::{
        types::{EnrollError, FaceEmbedding, FaceError, VerificationOutcome},
        FaceEngine,
    },
    storage::EmbeddingCache,
    utils::error::Result,
};

/// Enrollment and verification on top of the face engine and the
/// embedding cache.
pub struct FaceAuthService {
    engine: Arc<FaceEngine>,
    embeddings: Arc<EmbeddingCache>,
    tolerance: f64,
}

impl FaceAuthService {
    pub fn new(engine: Arc<FaceEngine>, embeddings: Arc<EmbeddingCache>, tolerance: f64) -> Self {
        Self {
            engine,
            embeddings,
            tolerance,
        }
    }

    pub fn embeddings(&self) -> &Arc<EmbeddingCache> {
        &self.embeddings
    }

    /// Stores the embedding of the face in `image_path` for `username`,
    /// replacing any earlier enrollment. The store is untouched when no face
    /// is found.
    pub async fn enroll(&self, image_path: PathBuf, username: &str) -> std::result::Result<(), EnrollError> {
        let embedding = self
            .extract(image_path)
            .await?
            .ok_or(EnrollError::NoFaceDetected)?;

        self.embeddings.save_embedding(username, &embedding).await?;

        info!("Enrolled face for {}", username);
        Ok(())
    }

    pub async fn verify(&self, image_path: PathBuf, username: &str) -> Result<bool> {
        Ok(self
            .verify_with_tolerance(image_path, username, self.tolerance)
            .await?
            .is_verified())
    }

    /// Fails closed: no face in the input, or no embedding on record, is
    /// reported as a non-match rather than an error.
    pub async fn verify_with_tolerance(
        &self,
        image_path: PathBuf,
        username: &str,
        tolerance: f64,
    ) -> Result<VerificationOutcome> {
        let Some(candidate) = self.extract(image_path).await? else {
            warn!("Verification for {}: no face in input", username);
            return Ok(VerificationOutcome::NoFaceInInput);
        };

        let Some(known) = self.embeddings.lookup(username).await? else {
            warn!("Verification for {}: no enrollment on record", username);
            return Ok(VerificationOutcome::NotEnrolled);
        };

        let outcome = if self.engine.compare(&known, &candidate, tolerance)? {
            VerificationOutcome::Match
        } else {
            VerificationOutcome::Mismatch
        };

        info!("Verification for {}: {:?}", username, outcome);
        Ok(outcome)
    }

    async fn extract(&self, image_path: PathBuf) -> std::result::Result<Option<FaceEmbedding>, FaceError> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.extract_embedding(&image_path))
            .await
            .map_err(|e| FaceError::Backend(format!("extraction task failed: {}", e)))?
    }
}
