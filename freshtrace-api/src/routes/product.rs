//! Product provenance endpoints
//!
//! Each handler sequences one ledger call, optionally followed by insight
//! generation. Insight degradation is never an error: the read endpoints
//! always deliver the ledger record, with either generated or degraded
//! insights attached.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use freshtrace_insight::{ImageAttachment, MAX_IMAGE_BYTES};

use crate::dto::{
    with_insights, AddLogRequest, CreateProductRequest, ProductWithInsightsResponse,
    ReceiptResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the product image
const IMAGE_FIELD: &str = "product_image";

/// Create a new product record
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ReceiptResponse>)> {
    if req.name.is_empty() || req.farm_name.is_empty() {
        return Err(ApiError::Validation(
            "name and farm_name must not be empty".to_string(),
        ));
    }

    let receipt = state
        .ledger
        .create_product(req.product_id, &req.name, &req.farm_name)
        .await?;

    info!(
        product_id = req.product_id,
        receipt = %receipt,
        operation = "create_product",
        "Product created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ReceiptResponse {
            message: "Product created on the ledger.".to_string(),
            receipt: receipt.0,
        }),
    ))
}

/// Append a log entry to a product's history
pub async fn add_log(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
    Json(req): Json<AddLogRequest>,
) -> ApiResult<Json<ReceiptResponse>> {
    if req.status.is_empty() || req.location.is_empty() {
        return Err(ApiError::Validation(
            "status and location must not be empty".to_string(),
        ));
    }

    let receipt = state
        .ledger
        .add_log(product_id, &req.status, &req.location)
        .await?;

    info!(
        product_id,
        receipt = %receipt,
        operation = "add_log",
        "Log entry appended"
    );

    Ok(Json(ReceiptResponse {
        message: "Log added to the ledger.".to_string(),
        receipt: receipt.0,
    }))
}

/// Fetch a product record with insights
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> ApiResult<Json<ProductWithInsightsResponse>> {
    let record = state
        .ledger
        .fetch_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", product_id)))?;

    let outcome = state.insights.generate_insights(&record, None).await;

    Ok(Json(with_insights(&record, outcome)))
}

/// Fetch a product record with multimodal insights from an uploaded image
pub async fn analyze_with_image(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
    multipart: Multipart,
) -> ApiResult<Json<ProductWithInsightsResponse>> {
    let image = extract_image(multipart).await?;

    let record = state
        .ledger
        .fetch_product(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", product_id)))?;

    let outcome = state.insights.generate_insights(&record, Some(&image)).await;

    Ok(Json(with_insights(&record, outcome)))
}

/// Pull the image field out of the multipart body, enforcing the size
/// bound before the pipeline ever sees the bytes
async fn extract_image(mut multipart: Multipart) -> ApiResult<ImageAttachment> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image field: {}", e)))?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::Validation(format!(
                "image exceeds maximum size of {} bytes",
                MAX_IMAGE_BYTES
            )));
        }

        return Ok(ImageAttachment::new(media_type, bytes.to_vec()));
    }

    Err(ApiError::BadRequest(format!(
        "No image file uploaded (expected multipart field \"{}\")",
        IMAGE_FIELD
    )))
}
