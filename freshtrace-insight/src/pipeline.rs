//! Insight generation pipeline
//!
//! Renders the record into a prompt with a strict five-key output
//! contract, invokes the model, and parses the response. Degradation is an
//! explicit outcome variant rather than a swallowed exception, so callers
//! and tests can observe which branch was taken.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use freshtrace_core::ProductRecord;

use crate::model::{GenerativeModel, ImageAttachment};

/// Placeholder for `visual_inspection` when no image was supplied
pub const NO_IMAGE_PLACEHOLDER: &str = "No image provided.";

/// Structured quality assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightResult {
    /// 1-10 integer scale; `None` when generation degraded. Out-of-range
    /// model values pass through unclamped.
    pub freshness_score: Option<i64>,
    /// Remaining shelf life estimate
    pub estimated_shelf_life: String,
    /// Overall customer-facing summary
    pub quality_assessment: String,
    /// Appearance summary; the fixed placeholder when no image was supplied
    pub visual_inspection: String,
    /// Transit delay findings
    pub transit_anomalies: String,
}

impl InsightResult {
    /// The fixed result returned when generation fails for any reason
    pub fn degraded() -> Self {
        Self {
            freshness_score: None,
            estimated_shelf_life: "N/A".to_string(),
            quality_assessment: "Could not generate AI insights.".to_string(),
            visual_inspection: "Could not perform visual analysis.".to_string(),
            transit_anomalies: "Unknown".to_string(),
        }
    }
}

/// Outcome of one insight generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "insights", rename_all = "snake_case")]
pub enum InsightOutcome {
    /// The model produced a valid response honoring the key contract
    Generated(InsightResult),
    /// Generation failed; the fixed degraded result stands in
    Degraded(InsightResult),
}

impl InsightOutcome {
    /// The degraded outcome with its fixed result
    pub fn degraded() -> Self {
        Self::Degraded(InsightResult::degraded())
    }

    /// Whether generation degraded
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// The insight payload, whichever branch was taken
    pub fn insights(&self) -> &InsightResult {
        match self {
            Self::Generated(insights) | Self::Degraded(insights) => insights,
        }
    }

    /// Consume the outcome, yielding the insight payload
    pub fn into_insights(self) -> InsightResult {
        match self {
            Self::Generated(insights) | Self::Degraded(insights) => insights,
        }
    }
}

/// Insight generation pipeline
pub struct InsightPipeline {
    model: Arc<dyn GenerativeModel>,
}

impl InsightPipeline {
    /// Create a pipeline over a generative model
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Generate insights for a record. Never fails outward: every internal
    /// failure returns the degraded outcome.
    pub async fn generate_insights(
        &self,
        record: &ProductRecord,
        image: Option<&ImageAttachment>,
    ) -> InsightOutcome {
        let prompt = build_prompt(record, Utc::now().timestamp(), image.is_some());

        let raw = match self.model.generate(&prompt, image).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    product_id = record.product_id,
                    error = %e,
                    "Model call failed, returning degraded insights"
                );
                return InsightOutcome::degraded();
            }
        };

        match parse_insights(&raw, image.is_some()) {
            Ok(insights) => {
                debug!(product_id = record.product_id, "Insights generated");
                InsightOutcome::Generated(insights)
            }
            Err(reason) => {
                warn!(
                    product_id = record.product_id,
                    error = %reason,
                    "Model response failed validation, returning degraded insights"
                );
                InsightOutcome::degraded()
            }
        }
    }
}

/// Render the history into one line per entry, in stored order
pub fn render_history(record: &ProductRecord) -> String {
    record
        .history
        .iter()
        .map(|log| {
            format!(
                "At timestamp {}, status was updated to \"{}\" at location \"{}\".",
                log.timestamp, log.status, log.location
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the model prompt
fn build_prompt(record: &ProductRecord, now: i64, has_image: bool) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a supply chain and food quality analyst for a premium grocery \
         service called \"FreshTrace\".\n",
    );
    if has_image {
        prompt.push_str(
            "Analyze the provided supply chain data AND the attached product photo \
             to produce a customer-facing summary.\n",
        );
    } else {
        prompt.push_str(
            "Analyze the provided supply chain data to produce a customer-facing \
             summary.\n",
        );
    }
    prompt.push_str(
        "Your output MUST be a valid JSON object with exactly these keys: \
         \"freshness_score\", \"estimated_shelf_life\", \"quality_assessment\", \
         \"visual_inspection\", and \"transit_anomalies\". \
         Do not include any other text or markdown formatting.\n\n",
    );

    prompt.push_str("DATA ANALYSIS:\n");
    prompt.push_str("- freshness_score: an integer between 1 and 10, based on time since harvest.\n");
    prompt.push_str("- estimated_shelf_life: a string estimating the remaining shelf life.\n");
    prompt.push_str(
        "- transit_anomalies: a string that is \"None detected.\" unless the history \
         log shows long delays.\n",
    );

    if has_image {
        prompt.push_str("\nIMAGE ANALYSIS (based on the attached photo):\n");
        prompt.push_str(
            "- visual_inspection: a one-sentence summary of the product's appearance. \
             Comment on ripeness, color, and any visible blemishes.\n",
        );
    }

    prompt.push_str("\nOVERALL ASSESSMENT:\n");
    prompt.push_str(
        "- quality_assessment: a brief, reassuring summary combining the available \
         analyses.\n\n",
    );

    prompt.push_str(&format!(
        "Here is the data for the product \"{}\" from \"{}\":\n",
        record.name, record.farm_name
    ));
    prompt.push_str(&format!(
        "- Harvested at timestamp: {}\n",
        record.harvest_timestamp
    ));
    prompt.push_str(&format!("- Current unix timestamp: {}\n", now));
    prompt.push_str("- Supply chain history:\n");
    prompt.push_str(&render_history(record));

    prompt
}

/// Strip optional markdown code-fence markers around a JSON body
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse and validate the model's raw response against the key contract
fn parse_insights(raw: &str, has_image: bool) -> Result<InsightResult, String> {
    let cleaned = strip_code_fences(raw);
    let value: serde_json::Value =
        serde_json::from_str(&cleaned).map_err(|e| format!("invalid JSON: {}", e))?;
    let obj = value
        .as_object()
        .ok_or_else(|| "response is not a JSON object".to_string())?;

    let freshness_score = match obj.get("freshness_score") {
        None => return Err("missing key: freshness_score".to_string()),
        Some(serde_json::Value::Null) => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| "freshness_score is not an integer".to_string())?,
        ),
    };

    let estimated_shelf_life = require_string(obj, "estimated_shelf_life")?;
    let quality_assessment = require_string(obj, "quality_assessment")?;
    let transit_anomalies = require_string(obj, "transit_anomalies")?;

    // Without an image the model has nothing to inspect; whatever it put in
    // the key is discarded in favor of the fixed placeholder.
    let visual_inspection = if has_image {
        require_string(obj, "visual_inspection")?
    } else {
        NO_IMAGE_PLACEHOLDER.to_string()
    };

    Ok(InsightResult {
        freshness_score,
        estimated_shelf_life,
        quality_assessment,
        visual_inspection,
        transit_anomalies,
    })
}

fn require_string(
    obj: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Result<String, String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("missing or non-string key: {}", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshtrace_core::LogEntry;

    fn test_record() -> ProductRecord {
        ProductRecord {
            product_id: 7,
            name: "Mango".to_string(),
            farm_name: "Sunny Farm".to_string(),
            harvest_timestamp: 50,
            authority: [0u8; 32],
            history: vec![
                LogEntry {
                    status: "Harvested".to_string(),
                    location: "Farm A".to_string(),
                    timestamp: 100,
                },
                LogEntry {
                    status: "Shipped".to_string(),
                    location: "Warehouse B".to_string(),
                    timestamp: 200,
                },
            ],
        }
    }

    const VALID_BODY: &str = r#"{
        "freshness_score": 8,
        "estimated_shelf_life": "4-6 days",
        "quality_assessment": "Fresh and well handled.",
        "visual_inspection": "Ripe with even color.",
        "transit_anomalies": "None detected."
    }"#;

    #[test]
    fn test_render_history_order_and_format() {
        let rendered = render_history(&test_record());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "At timestamp 100, status was updated to \"Harvested\" at location \"Farm A\"."
        );
        assert!(rendered.find("Farm A").unwrap() < rendered.find("Warehouse B").unwrap());
    }

    #[test]
    fn test_render_history_empty() {
        let mut record = test_record();
        record.history.clear();
        assert_eq!(render_history(&record), "");
    }

    #[test]
    fn test_build_prompt_includes_record_data() {
        let prompt = build_prompt(&test_record(), 12345, false);

        assert!(prompt.contains("\"Mango\""));
        assert!(prompt.contains("\"Sunny Farm\""));
        assert!(prompt.contains("Harvested at timestamp: 50"));
        assert!(prompt.contains("Current unix timestamp: 12345"));
        assert!(prompt.contains("freshness_score"));
        assert!(!prompt.contains("IMAGE ANALYSIS"));
    }

    #[test]
    fn test_build_prompt_with_image_adds_visual_instruction() {
        let prompt = build_prompt(&test_record(), 12345, true);
        assert!(prompt.contains("IMAGE ANALYSIS"));
        assert!(prompt.contains("attached product photo"));
    }

    #[test]
    fn test_strip_code_fences() {
        let fenced = "```json\n{\"freshness_score\":8}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"freshness_score\":8}");

        let bare = "{\"freshness_score\":8}";
        assert_eq!(strip_code_fences(bare), bare);
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let fenced = format!("```json\n{}\n```", VALID_BODY);
        assert_eq!(
            parse_insights(&fenced, true).unwrap(),
            parse_insights(VALID_BODY, true).unwrap()
        );
    }

    #[test]
    fn test_parse_valid_response() {
        let insights = parse_insights(VALID_BODY, true).unwrap();
        assert_eq!(insights.freshness_score, Some(8));
        assert_eq!(insights.estimated_shelf_life, "4-6 days");
        assert_eq!(insights.visual_inspection, "Ripe with even color.");
    }

    #[test]
    fn test_parse_without_image_forces_placeholder() {
        let insights = parse_insights(VALID_BODY, false).unwrap();
        assert_eq!(insights.visual_inspection, NO_IMAGE_PLACEHOLDER);
    }

    #[test]
    fn test_parse_null_freshness_score() {
        let body = VALID_BODY.replace("8,", "null,");
        let insights = parse_insights(&body, true).unwrap();
        assert_eq!(insights.freshness_score, None);
    }

    #[test]
    fn test_parse_out_of_range_score_passes_through() {
        let body = VALID_BODY.replace("\"freshness_score\": 8", "\"freshness_score\": 42");
        let insights = parse_insights(&body, true).unwrap();
        assert_eq!(insights.freshness_score, Some(42));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_insights("the model rambled instead", true).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        let body = VALID_BODY.replace("\"transit_anomalies\": \"None detected.\"", "\"other\": 1");
        assert!(parse_insights(&body, true).is_err());
    }

    #[test]
    fn test_parse_rejects_fractional_score() {
        let body = VALID_BODY.replace("\"freshness_score\": 8", "\"freshness_score\": 8.5");
        assert!(parse_insights(&body, true).is_err());
    }

    #[test]
    fn test_degraded_result_is_fixed() {
        let degraded = InsightResult::degraded();
        assert_eq!(degraded.freshness_score, None);
        assert_eq!(degraded.estimated_shelf_life, "N/A");
        assert_eq!(degraded.quality_assessment, "Could not generate AI insights.");
        assert_eq!(degraded.visual_inspection, "Could not perform visual analysis.");
        assert_eq!(degraded.transit_anomalies, "Unknown");
    }
}
