//! FreshTrace HTTP API
//!
//! Thin orchestration over the ledger client and the insight pipeline:
//! request parsing, sequencing, and status-code mapping. The core crates
//! never depend on this layer.

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server, start_background_server};
pub use state::{ApiConfig, AppState};
