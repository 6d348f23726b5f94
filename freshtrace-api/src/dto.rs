//! Request and response DTOs
//!
//! Wire types are kept separate from core types; converters live here so
//! handlers stay thin.

use serde::{Deserialize, Serialize};

use freshtrace_core::ProductRecord;
use freshtrace_insight::{InsightOutcome, InsightResult};

/// Create product request body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub product_id: u64,
    pub name: String,
    pub farm_name: String,
}

/// Add log request body
#[derive(Debug, Clone, Deserialize)]
pub struct AddLogRequest {
    pub status: String,
    pub location: String,
}

/// Write acknowledgement with the ledger receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub message: String,
    pub receipt: String,
}

/// Log entry as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntryResponse {
    pub status: String,
    pub location: String,
    pub timestamp: i64,
}

/// Product record as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product_id: u64,
    pub name: String,
    pub farm_name: String,
    pub harvest_timestamp: i64,
    /// Authority public key (hex)
    pub authority: String,
    pub history: Vec<LogEntryResponse>,
}

/// Record plus advisory insights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductWithInsightsResponse {
    pub product: ProductResponse,
    pub insights: InsightResult,
    /// True when insight generation fell back to the fixed degraded result
    pub insights_degraded: bool,
}

/// Convert a core record into its response shape
pub fn product_to_response(record: &ProductRecord) -> ProductResponse {
    ProductResponse {
        product_id: record.product_id,
        name: record.name.clone(),
        farm_name: record.farm_name.clone(),
        harvest_timestamp: record.harvest_timestamp,
        authority: hex::encode(record.authority),
        history: record
            .history
            .iter()
            .map(|log| LogEntryResponse {
                status: log.status.clone(),
                location: log.location.clone(),
                timestamp: log.timestamp,
            })
            .collect(),
    }
}

/// Combine a record and an insight outcome into the read response
pub fn with_insights(record: &ProductRecord, outcome: InsightOutcome) -> ProductWithInsightsResponse {
    let insights_degraded = outcome.is_degraded();
    ProductWithInsightsResponse {
        product: product_to_response(record),
        insights: outcome.into_insights(),
        insights_degraded,
    }
}
