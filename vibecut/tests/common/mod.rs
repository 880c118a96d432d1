//! Shared fixtures: a three-video match collection and a canned highlight plan.

#![allow(dead_code)]

use std::sync::Arc;

use vibecut::{
    Assembler, AssemblerConfig, CollectionRef, EditPipeline, EditRequest, InMemoryAssembler,
    InMemoryIndex, MockLlm, PipelineConfig, Planner, Preset, Retriever, RetrieverConfig,
    VideoEntry,
};

pub const COLLECTION: &str = "match-day";

/// Four intents, 5 + 10 + 10 + 5 seconds.
pub const HIGHLIGHT_PLAN: &str = r#"Here is the plan:
```json
{
  "target_duration": 30,
  "intents": [
    {"kind": "intro", "description": "wide shot of the stadium", "duration": 5, "position": "start", "tags": ["stadium"]},
    {"kind": "highlight", "description": "goal celebration", "duration": 10, "position": "middle", "tags": ["goal"]},
    {"kind": "reaction", "description": "crowd cheering", "duration": 10, "position": "middle", "tags": ["crowd"]},
    {"kind": "outro", "description": "players leaving the field", "duration": 5, "position": "end", "tags": ["players"]}
  ]
}
```"#;

pub fn collection() -> CollectionRef {
    CollectionRef::new(COLLECTION).with_videos(["v-1", "v-2", "v-3"])
}

pub fn highlight_request() -> EditRequest {
    EditRequest::new("Create a 30-second highlight reel", Preset::Highlights, collection())
}

/// Footage for every intent of [`HIGHLIGHT_PLAN`] plus one unrelated segment.
pub fn match_index() -> InMemoryIndex {
    InMemoryIndex::new()
        .with_video(
            COLLECTION,
            VideoEntry::new("v-1", 90.0)
                .segment(0.0, 8.0, "wide shot of the stadium")
                .segment(80.0, 88.0, "players leaving the field"),
        )
        .with_video(
            COLLECTION,
            VideoEntry::new("v-2", 120.0)
                .segment(0.0, 10.0, "parking lot before kickoff")
                .segment(30.0, 42.0, "goal celebration highlight"),
        )
        .with_video(
            COLLECTION,
            VideoEntry::new("v-3", 60.0)
                .segment(10.0, 16.0, "crowd cheering")
                .segment(20.0, 26.0, "crowd cheering loudly"),
        )
}

pub fn pipeline_with(
    llm: Arc<MockLlm>,
    index: Arc<InMemoryIndex>,
    engine: Arc<InMemoryAssembler>,
    config: PipelineConfig,
) -> EditPipeline {
    EditPipeline::new(
        Planner::new(llm),
        Retriever::new(index, RetrieverConfig::new(0.5)),
        Assembler::new(engine, AssemblerConfig::default()),
        config,
    )
}
