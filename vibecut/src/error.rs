//! Error types for the edit pipeline.
//!
//! [`EditError`] is what Planner, Retriever, Assembler and the pipeline return to their
//! caller. [`CollaboratorError`] is what the external collaborators (planning model, search
//! index, assembly engine) return to the stages.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// One of the three pipeline stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Planner,
    Retriever,
    Assembler,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planner => "planner",
            Stage::Retriever => "retriever",
            Stage::Assembler => "assembler",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by an external collaborator.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CollaboratorError {
    /// Network or service-side failure; the same request may succeed later.
    #[error("transport error: {0}")]
    Transport(String),
    /// The collaborator refused the request (bad credentials, unknown collection, 4xx).
    #[error("request rejected: {0}")]
    Rejected(String),
    /// The collaborator answered with something that could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl CollaboratorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, CollaboratorError::Transport(_))
    }
}

/// Edit pipeline error. Every stage fails fast with one of these; nothing is swallowed.
#[derive(Debug, Error)]
pub enum EditError {
    /// Empty instruction, or one the planning model could not turn into a plan.
    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),

    #[error("unknown preset: {0:?} (use highlights, reels, or custom)")]
    UnknownPreset(String),

    /// The planner produced no intents.
    #[error("planner produced an empty plan")]
    EmptyPlan,

    /// An intent the retriever cannot act on (zero or negative duration).
    #[error("intent {index} is invalid: {reason}")]
    InvalidIntent { index: usize, reason: String },

    /// No candidate at or above the relevance threshold for an intent.
    #[error("no clip with relevance >= {min_relevance} for intent {index} ({description})")]
    NoMatch {
        index: usize,
        description: String,
        min_relevance: f64,
    },

    /// The search collaborator returned a range outside its source video.
    #[error(
        "clip {video_id} [{start:.3}s, {end:.3}s] lies outside its source video ({source_duration:.3}s)"
    )]
    ClipOutOfRange {
        video_id: String,
        start: f64,
        end: f64,
        source_duration: f64,
    },

    /// Assembly collaborator failure or degenerate output.
    #[error("assembly failed: {0}")]
    Assembly(String),

    /// Planner or retriever collaborator failure that is not about the request itself.
    #[error("{stage} collaborator failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: CollaboratorError,
    },

    #[error("{stage} stage timed out after {after:?}")]
    StageTimeout { stage: Stage, after: Duration },
}

impl EditError {
    /// Whether a retry policy may re-run the failing stage.
    pub fn is_transient(&self) -> bool {
        match self {
            EditError::Collaborator { source, .. } => source.is_transient(),
            EditError::StageTimeout { .. } => true,
            _ => false,
        }
    }

    pub(crate) fn collaborator(stage: Stage) -> impl FnOnce(CollaboratorError) -> Self {
        move |source| EditError::Collaborator { stage, source }
    }
}
