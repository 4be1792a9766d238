// src/utils/metrics.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Request counters for the HTTP surface.
pub struct Metrics {
    start_time: Instant,
    requests_total: AtomicU64,
    requests_failed: AtomicU64,
    processing_time: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            requests_total: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            processing_time: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self, duration: Duration, success: bool) {
        self.requests_total.fetch_add(1, Ordering::SeqCst);
        self.processing_time
            .fetch_add(duration.as_micros() as u64, Ordering::SeqCst);
        if !success {
            self.requests_failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::SeqCst)
    }

    pub fn requests_failed(&self) -> u64 {
        self.requests_failed.load(Ordering::SeqCst)
    }

    pub fn average_processing_micros(&self) -> u64 {
        let total = self.requests_total();
        if total == 0 {
            return 0;
        }
        self.processing_time.load(Ordering::SeqCst) / total
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
