use serde_json::Value;

use crate::models::{AdaptationCategory, AdaptationDetails};

// Keyword sets tested in fixed priority order. The order is load-bearing:
// raw diagnostic text routinely matches more than one category ("TEA com
// dificuldade motora"), and the earliest match wins. Reordering would
// silently reclassify ambiguous student records.
const TEA_KEYWORDS: [&str; 2] = ["tea", "autis"];
const TDAH_KEYWORDS: [&str; 3] = ["tdah", "déficit", "hiperativ"];
const DOWN_KEYWORDS: [&str; 2] = ["síndrome de down", "down"];
const VISUAL_KEYWORDS: [&str; 3] = ["visual", "visão", "cegueira"];
const MOTOR_KEYWORDS: [&str; 3] = ["motor", "física", "coordenação"];

/// Parses the raw adaptation blob off a student record.
///
/// The front end stores it either as a JSON object or as a JSON-encoded
/// string; both are accepted. Any malformed value is treated the same as
/// "no adaptation data": logged as a warning, never surfaced as an error.
pub fn parse_adaptation_details(raw: Option<&Value>) -> Option<AdaptationDetails> {
    let value = raw?;

    match value {
        Value::Null => None,
        Value::String(s) => match serde_json::from_str::<AdaptationDetails>(s) {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!("Malformed adaptation details string, treating as absent: {e}");
                None
            }
        },
        Value::Object(_) => match serde_json::from_value::<AdaptationDetails>(value.clone()) {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!("Malformed adaptation details object, treating as absent: {e}");
                None
            }
        },
        other => {
            tracing::warn!(
                "Unexpected adaptation details type ({}), treating as absent",
                type_name(other)
            );
            None
        }
    }
}

/// Classifies adaptation details into a category by keyword matching over
/// the concatenated diagnosis/difficulties/suggestions text.
///
/// Returns `Intellectual` when details are absent or nothing matches.
pub fn determine_adaptation_type(details: Option<&AdaptationDetails>) -> AdaptationCategory {
    let Some(details) = details else {
        return AdaptationCategory::Intellectual;
    };

    let blob = details
        .diagnosis
        .iter()
        .chain(details.difficulties.iter())
        .chain(details.suggestions.iter())
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    if contains_any(&blob, &TEA_KEYWORDS) {
        AdaptationCategory::Tea
    } else if contains_any(&blob, &TDAH_KEYWORDS) {
        AdaptationCategory::Tdah
    } else if contains_any(&blob, &DOWN_KEYWORDS) {
        AdaptationCategory::Down
    } else if contains_any(&blob, &VISUAL_KEYWORDS) {
        AdaptationCategory::Visual
    } else if contains_any(&blob, &MOTOR_KEYWORDS) {
        AdaptationCategory::Motor
    } else {
        AdaptationCategory::Intellectual
    }
}

fn contains_any(blob: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| blob.contains(k))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
