//! Metrics Collection
//!
//! Counts dashboard actions and their failures.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector for the dashboard
#[derive(Default)]
pub struct Metrics {
    /// Start time for uptime calculation
    start_time: Option<Instant>,

    /// Projections computed
    pub projections: AtomicU64,

    /// Projections rejected (invalid parameters or simulation errors)
    pub projection_errors: AtomicU64,

    /// Genesis files written
    pub genesis_written: AtomicU64,

    /// Genesis generations that failed
    pub genesis_errors: AtomicU64,

    /// Bootstrap script runs that succeeded
    pub bootstrap_runs: AtomicU64,

    /// Bootstrap runs rejected or failed
    pub bootstrap_errors: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0)
    }

    pub fn inc_projections(&self) {
        self.projections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_projection_errors(&self) {
        self.projection_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_genesis_written(&self) {
        self.genesis_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_genesis_errors(&self) {
        self.genesis_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_bootstrap_runs(&self) {
        self.bootstrap_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_bootstrap_errors(&self) {
        self.bootstrap_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format
    pub fn to_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# HELP tokenomics_dashboard_uptime_seconds Dashboard uptime in seconds\n\
             # TYPE tokenomics_dashboard_uptime_seconds gauge\n\
             tokenomics_dashboard_uptime_seconds {}\n\n",
            self.uptime_secs()
        ));

        let counters = [
            ("projections_total", "Projections computed", &self.projections),
            ("projection_errors_total", "Projections rejected", &self.projection_errors),
            ("genesis_written_total", "Genesis files written", &self.genesis_written),
            ("genesis_errors_total", "Genesis generations failed", &self.genesis_errors),
            ("bootstrap_runs_total", "Node initializations completed", &self.bootstrap_runs),
            ("bootstrap_errors_total", "Node initializations failed", &self.bootstrap_errors),
        ];

        for (name, help, value) in counters {
            output.push_str(&format!(
                "# HELP tokenomics_dashboard_{name} {help}\n\
                 # TYPE tokenomics_dashboard_{name} counter\n\
                 tokenomics_dashboard_{name} {}\n\n",
                value.load(Ordering::Relaxed)
            ));
        }

        output
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "uptime_secs": self.uptime_secs(),
            "projections": {
                "computed": self.projections.load(Ordering::Relaxed),
                "errors": self.projection_errors.load(Ordering::Relaxed),
            },
            "genesis": {
                "written": self.genesis_written.load(Ordering::Relaxed),
                "errors": self.genesis_errors.load(Ordering::Relaxed),
            },
            "bootstrap": {
                "runs": self.bootstrap_runs.load(Ordering::Relaxed),
                "errors": self.bootstrap_errors.load(Ordering::Relaxed),
            },
        })
    }
}
