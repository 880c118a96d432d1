//! Decodes the planning model's reply into a [`PlanDocument`].

use serde::Deserialize;

use crate::error::EditError;
use crate::model::{IntentKind, IntentPosition};

/// Reply shape: an optional total and the ordered sections.
#[derive(Debug, Deserialize)]
pub(crate) struct PlanDocument {
    #[serde(default)]
    pub target_duration: Option<f64>,
    #[serde(alias = "sections", alias = "clips")]
    pub intents: Vec<IntentDocument>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IntentDocument {
    #[serde(alias = "type")]
    pub kind: IntentKind,
    #[serde(alias = "query", alias = "search_query")]
    pub description: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub position: IntentPosition,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Slice from the first `{` to the last `}`; handles code fences and surrounding prose.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

pub(crate) fn parse_plan_document(text: &str) -> Result<PlanDocument, EditError> {
    let json = extract_json_object(text).ok_or_else(|| {
        EditError::InvalidInstruction("planner reply contains no JSON object".to_string())
    })?;
    serde_json::from_str(json)
        .map_err(|e| EditError::InvalidInstruction(format!("planner reply is not a valid plan: {}", e)))
}
