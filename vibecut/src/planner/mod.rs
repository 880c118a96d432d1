//! Planner: instruction + preset + collection → ordered [`ExecutionPlan`].
//!
//! One call to the planning model per request. The reply is decoded, validated, truncated to the
//! preset's `max_clips`, and the intent durations are rescaled so they add up to the target
//! duration. The target is resolved, first present wins, from the request override, a duration
//! written into the instruction, the model's `target_duration`, then the preset default.

mod duration_hint;
mod parse;
mod prompt;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{EditError, Stage};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::model::{EditIntent, EditRequest, ExecutionPlan};

pub use duration_hint::parse_duration_hint;
pub use prompt::{render_planner_prompt, PLANNER_SYSTEM_PROMPT};

use parse::{parse_plan_document, IntentDocument};

pub struct Planner {
    llm: Arc<dyn LlmClient>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Builds the plan for `request`.
    ///
    /// Errors: `InvalidInstruction` for an empty instruction, a non-positive duration or an
    /// undecodable reply; `EmptyPlan` when the reply has no intents; `Collaborator` when the
    /// model call fails.
    pub async fn plan(&self, request: &EditRequest) -> Result<ExecutionPlan, EditError> {
        let instruction = request.instruction.trim();
        if instruction.is_empty() {
            return Err(EditError::InvalidInstruction(
                "instruction is empty".to_string(),
            ));
        }
        let preset = request.preset.config();
        let requested = requested_duration(request)?;
        let prompt_target = requested.unwrap_or(preset.default_duration);

        let messages = [
            Message::system(PLANNER_SYSTEM_PROMPT),
            Message::user(render_planner_prompt(request, preset, prompt_target)),
        ];
        debug!(preset = %request.preset, target = prompt_target, "planner: invoking model");
        let reply = self
            .llm
            .invoke(&messages)
            .await
            .map_err(EditError::collaborator(Stage::Planner))?;
        if let Some(usage) = &reply.usage {
            debug!(total_tokens = usage.total_tokens, "planner: model usage");
        }

        let doc = parse_plan_document(&reply.content)?;
        if doc.intents.is_empty() {
            return Err(EditError::EmptyPlan);
        }

        let target = requested
            .or_else(|| doc.target_duration.filter(|d| d.is_finite() && *d > 0.0))
            .unwrap_or(preset.default_duration);

        let mut sections = doc.intents;
        if sections.len() > preset.max_clips {
            warn!(
                planned = sections.len(),
                max_clips = preset.max_clips,
                "planner: truncating plan to preset max_clips"
            );
            sections.truncate(preset.max_clips);
        }

        let intents = build_intents(sections, target)?;
        let plan = ExecutionPlan::new(request.preset, target, intents, request.theme.clone())?;
        info!(
            intents = plan.len(),
            target_duration = plan.target_duration(),
            "planner: plan ready"
        );
        Ok(plan)
    }
}

/// Request override, else a duration in the instruction. Overrides must be positive.
fn requested_duration(request: &EditRequest) -> Result<Option<f64>, EditError> {
    match request.target_duration {
        Some(d) if d.is_finite() && d > 0.0 => Ok(Some(d)),
        Some(d) => Err(EditError::InvalidInstruction(format!(
            "target duration must be positive, got {}",
            d
        ))),
        None => Ok(parse_duration_hint(&request.instruction)),
    }
}

fn round_ms(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Validates sections, fills missing durations and rescales to `target`.
fn build_intents(sections: Vec<IntentDocument>, target: f64) -> Result<Vec<EditIntent>, EditError> {
    for (index, s) in sections.iter().enumerate() {
        if let Some(d) = s.duration {
            if !d.is_finite() || d <= 0.0 {
                return Err(EditError::InvalidInstruction(format!(
                    "planner gave intent {} a non-positive duration ({})",
                    index, d
                )));
            }
        }
        if s.description.trim().is_empty() && s.tags.is_empty() {
            return Err(EditError::InvalidInstruction(format!(
                "planner gave intent {} no description",
                index
            )));
        }
    }

    let explicit: f64 = sections.iter().filter_map(|s| s.duration).sum();
    let missing = sections.iter().filter(|s| s.duration.is_none()).count();
    let share = if missing == 0 {
        0.0
    } else if target - explicit > 0.0 {
        (target - explicit) / missing as f64
    } else {
        target / sections.len() as f64
    };

    let raw: Vec<f64> = sections
        .iter()
        .map(|s| s.duration.unwrap_or(share))
        .collect();
    let durations = rescale(&raw, target);

    Ok(sections
        .into_iter()
        .zip(durations)
        .map(|(s, duration)| EditIntent {
            kind: s.kind,
            description: s.description.trim().to_string(),
            duration,
            position: s.position,
            tags: s.tags,
        })
        .collect())
}

/// Proportional rescale to `target`, rounded to milliseconds. The last entry absorbs the
/// rounding remainder when that keeps it positive.
fn rescale(raw: &[f64], target: f64) -> Vec<f64> {
    let sum: f64 = raw.iter().sum();
    let factor = if sum > 0.0 { target / sum } else { 1.0 };
    let mut out: Vec<f64> = raw.iter().map(|d| round_ms(d * factor).max(0.001)).collect();
    if let Some((last, rest)) = out.split_last_mut() {
        let remainder = round_ms(target - rest.iter().sum::<f64>());
        if remainder > 0.0 {
            *last = remainder;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_hits_target_exactly() {
        let out = rescale(&[10.0, 10.0, 10.0], 20.0);
        assert!((out.iter().sum::<f64>() - 20.0).abs() < 1e-9, "{:?}", out);
        assert_eq!(out[0], 6.667);
    }

    #[test]
    fn missing_durations_share_remaining_time() {
        let sections = vec![
            IntentDocument {
                kind: crate::model::IntentKind::Intro,
                description: "intro".into(),
                duration: Some(10.0),
                position: Default::default(),
                tags: vec![],
            },
            IntentDocument {
                kind: crate::model::IntentKind::Outro,
                description: "outro".into(),
                duration: None,
                position: Default::default(),
                tags: vec![],
            },
        ];
        let intents = build_intents(sections, 30.0).unwrap();
        assert_eq!(intents[0].duration, 10.0);
        assert_eq!(intents[1].duration, 20.0);
    }
}
