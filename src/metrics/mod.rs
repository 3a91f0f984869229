// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// - Workflow outcomes per handler operation (ok, not_found, invalid, ...)
// - Workflow latency
// - Unit of work commit outcomes
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    pub workflow_total: IntCounterVec,
    pub workflow_duration: HistogramVec,
    pub commits_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let workflow_total = IntCounterVec::new(
            Opts::new("workflow_total", "Handler workflows by outcome"),
            &["workflow", "outcome"],
        )?;
        registry.register(Box::new(workflow_total.clone()))?;

        let workflow_duration = HistogramVec::new(
            HistogramOpts::new("workflow_duration_seconds", "Handler workflow duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["workflow"],
        )?;
        registry.register(Box::new(workflow_duration.clone()))?;

        let commits_total = IntCounterVec::new(
            Opts::new("commits_total", "Unit of work commits by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(commits_total.clone()))?;

        Ok(Self {
            registry,
            workflow_total,
            workflow_duration,
            commits_total,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_workflow(&self, workflow: &str, outcome: &str, duration_secs: f64) {
        self.workflow_total.with_label_values(&[workflow, outcome]).inc();
        self.workflow_duration.with_label_values(&[workflow]).observe(duration_secs);
    }

    pub fn record_commit(&self, success: bool) {
        let outcome = if success { "committed" } else { "failed" };
        self.commits_total.with_label_values(&[outcome]).inc();
    }
}
