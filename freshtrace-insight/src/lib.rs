//! FreshTrace insight generation pipeline
//!
//! Transforms a fetched product record (and optionally an image) into a
//! structured quality assessment using an external generative model.
//! Generation is advisory: the pipeline never fails outward. Every
//! malfunction — transport error, non-JSON output, missing keys, timeout —
//! collapses into a fixed degraded result so a misbehaving model can never
//! block delivery of the authoritative ledger data.

pub mod gemini;
pub mod model;
pub mod pipeline;

pub use gemini::GeminiModel;
pub use model::{GenerativeModel, ImageAttachment, ModelError, ModelResult, MAX_IMAGE_BYTES};
pub use pipeline::{InsightOutcome, InsightPipeline, InsightResult};
