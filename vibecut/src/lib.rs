//! # VibeCut
//!
//! Natural-language video editing as a three-stage pipeline: **Planner → Retriever →
//! Assembler**. An instruction such as "Create a 30-second highlight reel" becomes an ordered
//! [`ExecutionPlan`], each intent of the plan is matched to clip ranges by a semantic search
//! collaborator, and the selected ranges are rendered into one [`OutputVideo`] by an assembly
//! collaborator.
//!
//! ## Design principles
//!
//! - **Linear chain**: each stage's output is the next stage's only input; no stage reads
//!   another's state. [`EditPipeline`] wires them in a fixed order.
//! - **Narrow collaborators**: the planning model ([`LlmClient`]), the search index
//!   ([`SearchIndex`]) and the assembly engine ([`AssemblyEngine`]) are traits. Each has an
//!   in-memory implementation for tests ([`MockLlm`], [`InMemoryIndex`], [`InMemoryAssembler`])
//!   and a hosted one ([`ChatOpenAI`], [`VideoDbClient`]).
//! - **Fail fast**: every stage returns [`EditError`]; no partial output is produced.
//!
//! ## Main modules
//!
//! - [`model`]: [`EditRequest`], [`ExecutionPlan`], [`EditIntent`], [`ClipCandidate`],
//!   [`SelectionSet`], [`OutputVideo`].
//! - [`preset`]: [`Preset`] and its [`PresetConfig`] defaults.
//! - [`planner`], [`retriever`], [`assembler`]: the three stages.
//! - [`pipeline`]: [`EditPipeline`], [`PipelineConfig`], [`RetryPolicy`], [`PipelineEvent`].
//! - [`llm`], [`videodb`]: collaborator clients.

pub mod assembler;
pub mod error;
pub mod llm;
pub mod message;
pub mod model;
pub mod pipeline;
pub mod planner;
pub mod preset;
pub mod retriever;
pub mod videodb;

pub use assembler::{
    estimate_processing_time, Assembler, AssemblerConfig, AssemblyEngine, AssemblyStyle,
    InMemoryAssembler, RenderQuality, RenderedArtifact, Timeline, TimelineSegment,
};
pub use error::{CollaboratorError, EditError, Stage};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm};
pub use message::Message;
pub use model::{
    ClipCandidate, CollectionRef, EditIntent, EditRequest, ExecutionPlan, IntentKind,
    IntentPosition, OutputVideo, SelectedClip, SelectionSet, TimeRange, VideoFormat,
};
pub use pipeline::{EditOutcome, EditPipeline, PipelineConfig, PipelineEvent, RetryPolicy};
pub use planner::{parse_duration_hint, Planner};
pub use preset::{Effect, Pacing, Preset, PresetConfig, TransitionStyle};
pub use retriever::{
    InMemoryIndex, Retriever, RetrieverConfig, SearchIndex, SearchQuery, VideoEntry,
};
pub use videodb::{IndexType, VideoDbClient, VideoIngest};
