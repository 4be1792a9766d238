// src/core/identity/dlib.rs
use std::path::{Path, PathBuf};

use dlib_face_recognition::{
    FaceDetector, FaceDetectorTrait, FaceEncoderNetwork, FaceEncoderTrait, ImageMatrix,
    LandmarkPredictor, LandmarkPredictorTrait,
};
use image::RgbImage;
use parking_lot::Mutex;
use tracing::debug;

use super::{
    biometric::FaceEmbeddingBackend,
    types::{FaceEmbedding, FaceError},
};

struct DlibModels {
    detector: FaceDetector,
    predictor: LandmarkPredictor,
    encoder: FaceEncoderNetwork,
}

/// HOG detector + 68-point landmarks + ResNet encoder, the same pipeline the
/// `face_recognition` package runs.
pub struct DlibBackend {
    models: Mutex<DlibModels>,
    jitters: u32,
}

impl DlibBackend {
    pub fn new(landmark_model: &Path, encoder_model: &Path, jitters: u32) -> Result<Self, FaceError> {
        debug!(path = %landmark_model.display(), "loading landmark model");
        let predictor = LandmarkPredictor::open(landmark_model).map_err(|message| FaceError::ModelLoad {
            path: PathBuf::from(landmark_model),
            message,
        })?;

        debug!(path = %encoder_model.display(), "loading encoder model");
        let encoder = FaceEncoderNetwork::open(encoder_model).map_err(|message| FaceError::ModelLoad {
            path: PathBuf::from(encoder_model),
            message,
        })?;

        Ok(Self {
            models: Mutex::new(DlibModels {
                detector: FaceDetector::new(),
                predictor,
                encoder,
            }),
            jitters,
        })
    }
}

impl FaceEmbeddingBackend for DlibBackend {
    fn extract(&self, image: &RgbImage) -> Result<Vec<FaceEmbedding>, FaceError> {
        let matrix = ImageMatrix::from_image(image);
        let models = self.models.lock();

        let locations = models.detector.face_locations(&matrix);
        let landmarks: Vec<_> = locations
            .iter()
            .map(|rect| models.predictor.face_landmarks(&matrix, rect))
            .collect();

        let encodings = models
            .encoder
            .get_face_encodings(&matrix, &landmarks, self.jitters);

        Ok(encodings.iter().map(|encoding| encoding.as_ref().to_vec()).collect())
    }
}
