//! In-process assembly engine: records timelines and reports their summed duration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::assembler::engine::{AssemblyEngine, RenderedArtifact, Timeline};
use crate::error::CollaboratorError;
use crate::model::VideoFormat;

#[derive(Default)]
pub struct InMemoryAssembler {
    renders: AtomicUsize,
    timelines: Mutex<Vec<Timeline>>,
    failure: Option<CollaboratorError>,
    fixed_duration: Option<f64>,
}

impl InMemoryAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every render with `error`.
    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Reports `seconds` instead of the timeline duration.
    pub fn with_fixed_duration(mut self, seconds: f64) -> Self {
        self.fixed_duration = Some(seconds);
        self
    }

    /// Calls to `render`, failed ones included.
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    /// Timelines passed to successful renders, oldest first.
    pub fn timelines(&self) -> Vec<Timeline> {
        match self.timelines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl AssemblyEngine for InMemoryAssembler {
    async fn render(&self, timeline: &Timeline) -> Result<RenderedArtifact, CollaboratorError> {
        let n = self.renders.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref err) = self.failure {
            return Err(err.clone());
        }
        match self.timelines.lock() {
            Ok(mut guard) => guard.push(timeline.clone()),
            Err(poisoned) => poisoned.into_inner().push(timeline.clone()),
        }
        Ok(RenderedArtifact {
            uri: format!("memory://renders/{}.mp4", n),
            duration: self.fixed_duration.unwrap_or_else(|| timeline.duration()),
            format: Some(VideoFormat::Mp4),
        })
    }
}
