//! FreshTrace service binary
//!
//! Environment:
//!   FRESHTRACE_LEDGER_URL      - ledger node base URL (in-memory ledger when unset)
//!   FRESHTRACE_SIGNER_KEY      - hex-encoded Ed25519 seed (ephemeral key when unset)
//!   FRESHTRACE_GEMINI_API_KEY  - generative model API key
//!   FRESHTRACE_GEMINI_MODEL    - model name (default gemini-2.5-flash)
//!   FRESHTRACE_HOST / FRESHTRACE_PORT - bind address (default 0.0.0.0:3001)

use std::sync::Arc;

use freshtrace_api::{run_server, ApiConfig, AppState};
use freshtrace_core::{SigningIdentity, TransactionSigner};
use freshtrace_insight::gemini::{DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use freshtrace_insight::{GeminiModel, InsightPipeline};
use freshtrace_ledger::{HttpLedgerClient, InMemoryLedger, ProvenanceLedger};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ApiConfig::from_env();

    let signer: Arc<dyn TransactionSigner> = match std::env::var("FRESHTRACE_SIGNER_KEY") {
        Ok(hex_seed) => Arc::new(SigningIdentity::from_hex(&hex_seed)?),
        Err(_) => {
            tracing::warn!("FRESHTRACE_SIGNER_KEY not set, generating an ephemeral identity");
            Arc::new(SigningIdentity::generate())
        }
    };

    let ledger: Arc<dyn ProvenanceLedger> = match std::env::var("FRESHTRACE_LEDGER_URL") {
        Ok(url) => Arc::new(HttpLedgerClient::new(&url, signer)?),
        Err(_) => {
            tracing::warn!("FRESHTRACE_LEDGER_URL not set, using the in-memory ledger");
            Arc::new(InMemoryLedger::new(signer))
        }
    };

    let api_key = std::env::var("FRESHTRACE_GEMINI_API_KEY").unwrap_or_default();
    let model_name =
        std::env::var("FRESHTRACE_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let model = GeminiModel::with_config(
        freshtrace_insight::gemini::DEFAULT_BASE_URL,
        &model_name,
        api_key,
        DEFAULT_TIMEOUT_SECS,
    )?;

    let state = AppState::new(ledger, Arc::new(InsightPipeline::new(Arc::new(model))));

    run_server(&config, state).await
}
