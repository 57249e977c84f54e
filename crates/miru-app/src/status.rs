use std::sync::atomic::{AtomicU64, Ordering};

/// Run counters, surfaced in the shutdown log.
#[derive(Debug, Default)]
pub struct MonitorStatus {
    pub cycles: AtomicU64,
    pub capture_failures: AtomicU64,
    pub region_errors: AtomicU64,
    pub events_emitted: AtomicU64,
    pub events_lost: AtomicU64,
}

impl MonitorStatus {
    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capture_failure(&self) {
        self.capture_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_region_error(&self) {
        self.region_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event(&self) {
        self.events_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lost_event(&self) {
        self.events_lost.fetch_add(1, Ordering::Relaxed);
    }

    pub fn log_summary(&self) {
        tracing::info!(
            cycles = self.cycles.load(Ordering::Relaxed),
            capture_failures = self.capture_failures.load(Ordering::Relaxed),
            region_errors = self.region_errors.load(Ordering::Relaxed),
            events_emitted = self.events_emitted.load(Ordering::Relaxed),
            events_lost = self.events_lost.load(Ordering::Relaxed),
            "monitor run summary"
        );
    }
}
