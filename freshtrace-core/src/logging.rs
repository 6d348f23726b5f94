//! Logging conventions
//!
//! Structured field names and operation labels used across FreshTrace
//! crates. All modules log through `tracing` with these fields so output
//! stays greppable.
//!
//! Absence of a record on fetch is expected and is logged at DEBUG, never
//! as an error.

/// Standard log field names
pub mod fields {
    /// Product identifier
    pub const PRODUCT_ID: &str = "product_id";
    /// Derived record address (hex)
    pub const ADDRESS: &str = "address";
    /// Operation name
    pub const OPERATION: &str = "operation";
    /// Error message
    pub const ERROR: &str = "error";
    /// Transaction receipt
    pub const RECEIPT: &str = "receipt";
}

/// Log operation labels for consistent naming
pub mod operations {
    pub const CREATE_PRODUCT: &str = "create_product";
    pub const ADD_LOG: &str = "add_log";
    pub const FETCH_PRODUCT: &str = "fetch_product";
    pub const GENERATE_INSIGHTS: &str = "generate_insights";
}
