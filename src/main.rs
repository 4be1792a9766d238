use std::sync::Arc;

use biovault::{
    core::identity::FaceEmbeddingBackend,
    utils::{config::Config, error::ServiceError, logging},
    Application,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new()?;
    let _guard = logging::init_tracing(&config.log, "biovault-face.log");

    info!("Starting BioVault face service v{}", env!("CARGO_PKG_VERSION"));

    let backend = face_backend(&config).map_err(|e| {
        error!("Failed to load face models: {}", e);
        e
    })?;

    let app = Application::new(config, backend).await.map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    // Returns once actix has handled Ctrl-C / SIGTERM and drained workers
    if let Err(e) = app.start().await {
        error!("API server stopped with error: {}", e);
    }

    if let Err(e) = app.shutdown().await {
        error!("Error during shutdown: {}", e);
    }

    Ok(())
}

#[cfg(feature = "dlib")]
fn face_backend(config: &Config) -> Result<Arc<dyn FaceEmbeddingBackend>, ServiceError> {
    use biovault::core::identity::dlib::DlibBackend;

    let missing = |key: &str| ServiceError::Config(format!("face.{} must be set", key));
    let landmark = config.face.landmark_model.as_ref().ok_or_else(|| missing("landmark_model"))?;
    let encoder = config.face.encoder_model.as_ref().ok_or_else(|| missing("encoder_model"))?;

    Ok(Arc::new(DlibBackend::new(landmark, encoder, config.face.jitters)?))
}

#[cfg(not(feature = "dlib"))]
fn face_backend(_config: &Config) -> Result<Arc<dyn FaceEmbeddingBackend>, ServiceError> {
    Err(ServiceError::Config(
        "built without a face recognition backend; rebuild with `--features dlib`".into(),
    ))
}
