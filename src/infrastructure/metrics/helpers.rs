//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{RENDERS_TOTAL, RENDER_DURATION, TEMPLATES_REGISTERED_TOTAL};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording registry metrics
pub struct RegistryMetrics;

impl RegistryMetrics {
    /// Record a successful registration
    pub fn record_registered() {
        TEMPLATES_REGISTERED_TOTAL.inc();
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record a successful render
    pub fn record_success(elapsed: Duration) {
        RENDERS_TOTAL.with_label_values(&["ok"]).inc();
        RENDER_DURATION.observe(elapsed.as_secs_f64());
    }

    /// Record a failed render by error kind
    pub fn record_failure(kind: &str, elapsed: Duration) {
        RENDERS_TOTAL.with_label_values(&[kind]).inc();
        RENDER_DURATION.observe(elapsed.as_secs_f64());
    }
}
