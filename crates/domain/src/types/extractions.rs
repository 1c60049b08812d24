//! Extraction results and feedback

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Position of an extraction on a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub height: f64,
    pub left: f64,
    pub page: u32,
    pub top: f64,
    pub width: f64,
}

/// One extracted value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extraction {
    #[serde(rename = "box", skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Name of the candidate list this extraction was picked from
    pub candidates: String,
    pub entity: String,
    pub value: String,
}

/// Extractions of a document, keyed by label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extractions {
    pub candidates: HashMap<String, Vec<Extraction>>,
    pub extractions: HashMap<String, Extraction>,
}

impl Extractions {
    /// Extraction for `label`, if present.
    pub fn get(&self, label: &str) -> Option<&Extraction> {
        self.extractions.get(label)
    }

    /// Value of the extraction for `label`, or `""` when absent.
    pub fn value(&self, label: &str) -> &str {
        self.get(label).map_or("", |extraction| extraction.value.as_str())
    }
}

/// Feedback payload keyed by extraction label
///
/// Each label maps to the corrected fields, typically `entity` and `value`.
pub type Feedback = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// Wire envelope for feedback submission: `{"feedback": {...}}`
#[derive(Debug, Serialize)]
pub struct FeedbackRequest<'a> {
    pub feedback: &'a Feedback,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const EXTRACTIONS_JSON: &str = r#"{
        "extractions": {
            "amountToPay": {
                "box": {"height": 9.0, "left": 516.0, "page": 1, "top": 588.0, "width": 42.0},
                "entity": "amount",
                "value": "24.99:EUR",
                "candidates": "amounts"
            },
            "docType": {"entity": "doctype", "value": "Invoice"}
        },
        "candidates": {
            "amounts": [
                {"box": {"height": 9.0, "left": 516.0, "page": 1, "top": 588.0, "width": 42.0},
                 "entity": "amount", "value": "24.99:EUR"}
            ]
        }
    }"#;

    #[test]
    fn value_returns_extracted_value_or_empty() {
        let extractions: Extractions = serde_json::from_str(EXTRACTIONS_JSON).unwrap();

        assert_eq!(extractions.value("amountToPay"), "24.99:EUR");
        assert_eq!(extractions.value("docType"), "Invoice");
        assert_eq!(extractions.value("unknown"), "");
    }

    #[test]
    fn decodes_boxes_and_candidates() {
        let extractions: Extractions = serde_json::from_str(EXTRACTIONS_JSON).unwrap();

        let amount = extractions.get("amountToPay").unwrap();
        let bounding_box = amount.bounding_box.unwrap();
        assert_eq!(bounding_box.page, 1);
        assert!((bounding_box.width - 42.0).abs() < f64::EPSILON);
        assert_eq!(amount.candidates, "amounts");
        assert!(extractions.get("docType").unwrap().bounding_box.is_none());
        assert_eq!(extractions.candidates["amounts"].len(), 1);
    }

    #[test]
    fn feedback_request_wraps_labels() {
        let mut feedback = Feedback::new();
        feedback.insert(
            "iban".into(),
            BTreeMap::from([
                ("entity".to_string(), json!("iban")),
                ("value".to_string(), json!("DE22222111117777766666")),
            ]),
        );

        let body = serde_json::to_value(FeedbackRequest { feedback: &feedback }).unwrap();
        assert_eq!(
            body,
            json!({"feedback": {"iban": {"entity": "iban", "value": "DE22222111117777766666"}}})
        );
    }
}
