// tests/common/mod.rs
#![allow(dead_code)]

use std::{io::Cursor, path::Path, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use biovault::{
    core::identity::{FaceEmbedding, FaceEmbeddingBackend, FaceError},
    storage::StorageBackend,
    utils::config::{
        Config, FaceConfig, LogConfig, SecurityConfig, ServerConfig, StorageConfig,
    },
    Application,
};
use image::{ImageOutputFormat, Rgb, RgbImage};

/// Maps the top-left pixel colour to a 3-d embedding. Black frames have no
/// face in them.
pub struct PixelBackend;

impl FaceEmbeddingBackend for PixelBackend {
    fn extract(&self, image: &RgbImage) -> Result<Vec<FaceEmbedding>, FaceError> {
        let Rgb([r, g, b]) = *image.get_pixel(0, 0);
        if (r, g, b) == (0, 0, 0) {
            return Ok(vec![]);
        }
        Ok(vec![vec![r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0]])
    }
}

pub const ALICE: [u8; 3] = [200, 40, 40];
pub const ALICE_AGAIN: [u8; 3] = [205, 45, 42];
pub const BOB: [u8; 3] = [20, 40, 220];
pub const NO_FACE: [u8; 3] = [0, 0, 0];

pub fn config(root: &Path, backend: StorageBackend) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 5001,
            workers: Some(1),
        },
        storage: StorageConfig {
            backend,
            data_dir: root.join("data"),
            file_name: "embeddings.json".into(),
            db_path: root.join("data").join("biovault"),
            key_path: root.join("data").join("secret.key"),
            captures_dir: root.join("captures"),
        },
        face: FaceConfig {
            tolerance: 0.5,
            landmark_model: None,
            encoder_model: None,
            jitters: 1,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:5173".into()],
            max_request_size: 1_048_576,
        },
        log: LogConfig {
            level: "debug".into(),
            directory: None,
        },
    }
}

pub async fn application(root: &Path, backend: StorageBackend) -> Application {
    Application::new(config(root, backend), Arc::new(PixelBackend))
        .await
        .unwrap()
}

/// A small JPEG of a single colour.
pub fn jpeg(rgb: [u8; 3]) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(8, 8, Rgb(rgb))
        .write_to(&mut bytes, ImageOutputFormat::Jpeg(100))
        .unwrap();
    bytes.into_inner()
}

/// A PNG of a single colour; saved under a `.jpg` name by the service.
pub fn png(rgb: [u8; 3]) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbImage::from_pixel(4, 4, Rgb(rgb))
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .unwrap();
    bytes.into_inner()
}

pub fn encode(image: &[u8]) -> String {
    STANDARD.encode(image)
}
