//! Application state for the API server

use std::sync::Arc;

use freshtrace_insight::InsightPipeline;
use freshtrace_ledger::ProvenanceLedger;

/// API server state
///
/// Read-only after startup; shared by all in-flight requests.
#[derive(Clone)]
pub struct AppState {
    /// Ledger client
    pub ledger: Arc<dyn ProvenanceLedger>,
    /// Insight pipeline
    pub insights: Arc<InsightPipeline>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create new app state
    pub fn new(ledger: Arc<dyn ProvenanceLedger>, insights: Arc<InsightPipeline>) -> Self {
        Self {
            ledger,
            insights,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            enable_cors: true,
        }
    }
}

impl ApiConfig {
    /// Read configuration from `FRESHTRACE_HOST` / `FRESHTRACE_PORT`,
    /// falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("FRESHTRACE_HOST").unwrap_or(defaults.host),
            port: std::env::var("FRESHTRACE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            enable_cors: defaults.enable_cors,
        }
    }
}
