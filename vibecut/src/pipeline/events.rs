//! Progress events emitted while a request runs.

use serde::Serialize;

use crate::error::Stage;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    StageStarted {
        stage: Stage,
    },
    StageCompleted {
        stage: Stage,
        elapsed_ms: u64,
    },
    /// A transient failure; the stage runs again after `delay_ms`.
    Retrying {
        stage: Stage,
        retry: usize,
        delay_ms: u64,
        error: String,
    },
    StageFailed {
        stage: Stage,
        error: String,
    },
}

impl PipelineEvent {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineEvent::StageStarted { stage }
            | PipelineEvent::StageCompleted { stage, .. }
            | PipelineEvent::Retrying { stage, .. }
            | PipelineEvent::StageFailed { stage, .. } => *stage,
        }
    }

    /// Short human-readable status line.
    pub fn status_line(&self) -> String {
        match self {
            PipelineEvent::StageStarted { stage } => match stage {
                Stage::Planner => "Analyzing request and creating plan...".to_string(),
                Stage::Retriever => "Searching for relevant clips...".to_string(),
                Stage::Assembler => "Assembling final video...".to_string(),
            },
            PipelineEvent::StageCompleted { stage, elapsed_ms } => {
                format!("{} done in {} ms", stage, elapsed_ms)
            }
            PipelineEvent::Retrying {
                stage,
                retry,
                delay_ms,
                ..
            } => format!("{} retry {} in {} ms", stage, retry + 1, delay_ms),
            PipelineEvent::StageFailed { stage, error } => format!("{} failed: {}", stage, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let ev = PipelineEvent::StageCompleted {
            stage: Stage::Retriever,
            elapsed_ms: 12,
        };
        let js = serde_json::to_value(&ev).unwrap();
        assert_eq!(js["type"], "stage_completed");
        assert_eq!(js["stage"], "retriever");
        assert_eq!(ev.stage(), Stage::Retriever);
    }

    #[test]
    fn started_status_lines() {
        let line = PipelineEvent::StageStarted {
            stage: Stage::Assembler,
        }
        .status_line();
        assert_eq!(line, "Assembling final video...");
    }
}
