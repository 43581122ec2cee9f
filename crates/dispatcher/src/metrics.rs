//! Provider metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a single registered provider
#[derive(Debug, Default)]
pub struct ProviderMetrics {
    /// Lookups handed to the provider
    attempt_count: AtomicU64,
    /// Lookups answered with a result
    success_count: AtomicU64,
    /// Lookups that failed (any class)
    failure_count: AtomicU64,
    /// Failures caused by exhausted quota
    quota_exceeded_count: AtomicU64,
    /// Lookups not handed to the provider because it was over quota
    skipped_count: AtomicU64,
}

impl ProviderMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_count(&self) -> u64 {
        self.attempt_count.load(Ordering::Relaxed)
    }

    pub fn inc_attempt_count(&self) {
        self.attempt_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success_count(&self) -> u64 {
        self.success_count.load(Ordering::Relaxed)
    }

    pub fn inc_success_count(&self) {
        self.success_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn quota_exceeded_count(&self) -> u64 {
        self.quota_exceeded_count.load(Ordering::Relaxed)
    }

    pub fn inc_quota_exceeded_count(&self) {
        self.quota_exceeded_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped_count.load(Ordering::Relaxed)
    }

    pub fn inc_skipped_count(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempt_count: self.attempt_count(),
            success_count: self.success_count(),
            failure_count: self.failure_count(),
            quota_exceeded_count: self.quota_exceeded_count(),
            skipped_count: self.skipped_count(),
        }
    }
}

/// Snapshot of provider metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub attempt_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub quota_exceeded_count: u64,
    pub skipped_count: u64,
}
