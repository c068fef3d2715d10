use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Process-wide request counters. A "failure" is a logical one: the client
/// received an in-body error payload. The concrete cause lives in the logs,
/// never in the counters or the client response.
#[derive(Default)]
pub(crate) struct RequestMetrics {
    pub requests_total: AtomicU64,
    pub failures_total: AtomicU64,
    pub slow_requests_total: AtomicU64,
}

impl RequestMetrics {
    pub(crate) fn observe_request(
        &self,
        route: &'static str,
        ok: bool,
        elapsed: Duration,
        slow_threshold: Duration,
    ) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.failures_total.fetch_add(1, Ordering::Relaxed);
        }
        if elapsed >= slow_threshold {
            self.slow_requests_total.fetch_add(1, Ordering::Relaxed);
            warn!(route, elapsed_ms = elapsed.as_millis() as u64, "slow request");
        } else {
            debug!(
                route,
                ok,
                elapsed_ms = elapsed.as_millis() as u64,
                "request complete"
            );
        }
    }

    pub(crate) fn snapshot(&self) -> Value {
        json!({
            "requests_total": self.requests_total.load(Ordering::Relaxed),
            "failures_total": self.failures_total.load(Ordering::Relaxed),
            "slow_requests_total": self.slow_requests_total.load(Ordering::Relaxed),
        })
    }
}
