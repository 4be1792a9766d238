pub mod api;
pub mod core;
pub mod notify;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use tracing::info;

use crate::{
    api::{captures::ImageCaptures, ApiState, RestApi},
    core::{
        identity::{FaceEmbeddingBackend, FaceEngine},
        services::{FaceAuthService, HealthService},
    },
    storage::{EmbeddingCache, EmbeddingStore},
    utils::{config::Config, error::Result, metrics::Metrics},
};

pub struct Application {
    config: Arc<Config>,
    store: Arc<dyn EmbeddingStore>,
    state: ApiState,
}

impl Application {
    /// Opens the configured store (creating the key on first run) and wires
    /// the services around the given face backend.
    pub async fn new(config: Config, backend: Arc<dyn FaceEmbeddingBackend>) -> Result<Self> {
        let config = Arc::new(config);

        info!("Initializing storage...");
        let store = storage::open_store(&config.storage)?;
        let embeddings = Arc::new(EmbeddingCache::new(store.clone()));
        let enrolled = embeddings.refresh().await?.len();
        info!("{} enrolled user(s) on record", enrolled);

        info!("Initializing services...");
        let engine = Arc::new(FaceEngine::new(backend));
        let auth = Arc::new(FaceAuthService::new(
            engine,
            embeddings.clone(),
            config.face.tolerance,
        ));
        let metrics = Arc::new(Metrics::new());
        let health = Arc::new(HealthService::new(metrics.clone(), embeddings));
        let captures = Arc::new(ImageCaptures::new(&config.storage.captures_dir));

        Ok(Self {
            config,
            store,
            state: ApiState {
                auth,
                health,
                captures,
                metrics,
            },
        })
    }

    pub fn state(&self) -> &ApiState {
        &self.state
    }

    /// Runs the HTTP API until it is stopped.
    pub async fn start(&self) -> Result<()> {
        info!("Starting API server...");
        RestApi::new(
            self.config.server.clone(),
            self.config.security.clone(),
            self.state.clone(),
        )
        .start()
        .await
    }

    pub async fn shutdown(&self) -> Result<()> {
        info!("Flushing {} store...", self.store.backend());
        self.store.flush().await?;

        info!("Application shutdown complete");
        Ok(())
    }
}
