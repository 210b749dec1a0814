//! Prometheus metrics for the template service.
//!
//! - Registration metrics (templates registered)
//! - Render metrics (outcome by error kind, render duration)

mod helpers;

pub use helpers::{encode_metrics, RegistryMetrics, RenderMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "mailpress";

lazy_static! {
    // ============================================================================
    // Registry Metrics
    // ============================================================================

    /// Total templates registered across all registries in the process
    pub static ref TEMPLATES_REGISTERED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_templates_registered_total", METRIC_PREFIX),
        "Total templates registered"
    ).unwrap();

    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Renders by outcome ("ok" or the error kind)
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total template renders by outcome",
        &["outcome"]
    ).unwrap();

    /// Time spent resolving, evaluating and minifying a template
    pub static ref RENDER_DURATION: Histogram = register_histogram!(
        format!("{}_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]
    ).unwrap();
}
