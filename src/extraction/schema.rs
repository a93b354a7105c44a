//! Extraction prompts, request schemas, and response validation.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::ExtractionError;
use crate::onboarding::model::{CompanyInfo, PartialThemeColors};

/// Prompt for the full company-profile extraction.
pub const COMPANY_PROMPT: &str = "Extract the following information: company name, product description, pricing tiers (including name, price, and features), company mission, target audience, and the main brand colors used on the website (primary, secondary, accent).";

/// Prompt for the colors-only extraction.
pub const COLORS_PROMPT: &str = "Extract the main brand colors used on this website";

/// Fields the company extraction must return.
pub const COMPANY_REQUIRED_FIELDS: [&str; 6] = [
    "company_name",
    "product_description",
    "pricing_tiers",
    "company_mission",
    "target_audience",
    "theme_colors",
];

fn colors_properties() -> Value {
    json!({
        "primary": { "type": "string" },
        "secondary": { "type": "string" },
        "accent": { "type": "string" }
    })
}

/// JSON schema for the company profile plus theme colors.
pub fn company_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "company_name": { "type": "string" },
            "product_description": { "type": "string" },
            "pricing_tiers": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "price": { "type": "string" },
                        "features": { "type": "array", "items": { "type": "string" } }
                    }
                }
            },
            "company_mission": { "type": "string" },
            "target_audience": { "type": "string" },
            "theme_colors": {
                "type": "object",
                "properties": colors_properties()
            }
        },
        "required": COMPANY_REQUIRED_FIELDS
    })
}

/// JSON schema for brand colors only. Nothing is required.
pub fn colors_schema() -> Value {
    json!({
        "type": "object",
        "properties": colors_properties()
    })
}

/// Validate and decode the `data` payload of a company extraction.
///
/// `theme_colors` is requested but not needed downstream, so its absence is
/// tolerated. Everything else in [`CompanyInfo`] must be present and typed.
pub fn decode_company(data: Value) -> Result<CompanyInfo, ExtractionError> {
    decode(data, "company")
}

/// Validate and decode the `data` payload of a colors extraction.
pub fn decode_colors(data: Value) -> Result<PartialThemeColors, ExtractionError> {
    decode(data, "colors")
}

fn decode<T: DeserializeOwned>(data: Value, what: &str) -> Result<T, ExtractionError> {
    if !data.is_object() {
        return Err(ExtractionError::MalformedResponse {
            reason: format!("{what} data is not an object: {data}"),
        });
    }
    serde_json::from_value(data).map_err(|e| ExtractionError::MalformedResponse {
        reason: format!("{what} data: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_schema_lists_required_fields() {
        let schema = company_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, COMPANY_REQUIRED_FIELDS);
        assert_eq!(
            schema["properties"]["pricing_tiers"]["items"]["properties"]["features"]["type"],
            "array"
        );
        assert_eq!(
            schema["properties"]["theme_colors"]["properties"]["accent"]["type"],
            "string"
        );
    }

    #[test]
    fn colors_schema_has_no_required_fields() {
        let schema = colors_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"]["primary"]["type"], "string");
    }

    #[test]
    fn decode_company_full_payload() {
        let data = json!({
            "company_name": "Acme",
            "product_description": "Rockets",
            "pricing_tiers": [
                { "name": "Starter", "price": "$10", "features": ["1 rocket"] },
                { "name": "Pro", "price": "$99" }
            ],
            "company_mission": "Reach orbit",
            "target_audience": "Coyotes",
            "theme_colors": { "primary": "#FF0000" }
        });
        let info = decode_company(data).unwrap();
        assert_eq!(info.company_name, "Acme");
        assert_eq!(info.pricing_tiers.len(), 2);
        assert_eq!(info.pricing_tiers[0].features, vec!["1 rocket"]);
        assert!(info.pricing_tiers[1].features.is_empty());
    }

    #[test]
    fn decode_company_missing_field_is_malformed() {
        let data = json!({
            "company_name": "Acme",
            "product_description": "Rockets",
            "pricing_tiers": [],
            "target_audience": "Coyotes"
        });
        let err = decode_company(data).unwrap_err();
        match err {
            ExtractionError::MalformedResponse { reason } => {
                assert!(reason.contains("company_mission"), "reason: {reason}");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn decode_company_null_is_malformed() {
        assert!(matches!(
            decode_company(Value::Null),
            Err(ExtractionError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn decode_colors_accepts_partial() {
        let colors = decode_colors(json!({ "accent": "#ABCDEF" })).unwrap();
        assert_eq!(colors.accent.as_deref(), Some("#ABCDEF"));
        assert!(colors.primary.is_none());

        let colors = decode_colors(json!({})).unwrap();
        assert_eq!(colors, PartialThemeColors::default());
    }

    #[test]
    fn decode_colors_rejects_wrong_type() {
        assert!(matches!(
            decode_colors(json!({ "primary": 42 })),
            Err(ExtractionError::MalformedResponse { .. })
        ));
    }
}
