// src/core/identity/mod.rs
pub mod biometric;
#[cfg(feature = "dlib")]
pub mod dlib;
pub mod types;

pub use biometric::{face_distance, FaceEmbeddingBackend, FaceEngine};
pub use types::{EnrollError, FaceEmbedding, FaceError, VerificationOutcome};
