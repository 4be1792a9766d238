// src/core/services/health.rs
use std::sync::Arc;

use serde::Serialize;

use crate::{storage::EmbeddingCache, utils::error::Result, utils::metrics::Metrics};

#[derive(Debug, Serialize)]
pub struct HealthMetrics {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub requests: u64,
    pub failed_requests: u64,
    pub avg_process_micros: u64,
    pub enrolled: usize,
}

pub struct HealthService {
    metrics: Arc<Metrics>,
    embeddings: Arc<EmbeddingCache>,
}

impl HealthService {
    pub fn new(metrics: Arc<Metrics>, embeddings: Arc<EmbeddingCache>) -> Self {
        Self { metrics, embeddings }
    }

    /// Reading the enrolled count goes through the cache, so a broken key or
    /// unreachable store shows up here as an error.
    pub async fn get_metrics(&self) -> Result<HealthMetrics> {
        let enrolled = self.embeddings.snapshot().await?.len();

        Ok(HealthMetrics {
            status: "ok",
            uptime_secs: self.metrics.uptime().as_secs(),
            requests: self.metrics.requests_total(),
            failed_requests: self.metrics.requests_failed(),
            avg_process_micros: self.metrics.average_processing_micros(),
            enrolled,
        })
    }
}
