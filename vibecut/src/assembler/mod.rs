//! Assembler: selection → one [`OutputVideo`] through the assembly engine.
//!
//! The engine's answer is checked before it is returned: a zero or non-finite duration, or one
//! longer than the summed clip durations plus `duration_tolerance`, is an `Assembly` error. A
//! duration inside the tolerance is clamped, so the output never runs longer than its clips.

mod engine;
mod in_memory;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::EditError;
use crate::model::{OutputVideo, SelectionSet, VideoFormat};
use crate::preset::Preset;

pub use engine::{
    AssemblyEngine, AssemblyStyle, RenderQuality, RenderedArtifact, Timeline, TimelineSegment,
};
pub use in_memory::InMemoryAssembler;

#[derive(Clone, Debug, PartialEq)]
pub struct AssemblerConfig {
    pub quality: RenderQuality,
    /// Segments rendered by [`Assembler::preview`].
    pub preview_clips: usize,
    /// Container rounding the engine may report above the summed clip durations. Such a
    /// duration is clamped to the sum.
    pub duration_tolerance: f64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            quality: RenderQuality::Standard,
            preview_clips: 3,
            duration_tolerance: 0.05,
        }
    }
}

pub struct Assembler {
    engine: Arc<dyn AssemblyEngine>,
    config: AssemblerConfig,
}

impl Assembler {
    pub fn new(engine: Arc<dyn AssemblyEngine>, config: AssemblerConfig) -> Self {
        Self { engine, config }
    }

    /// Renders `selection` with the preset's style.
    pub async fn assemble(
        &self,
        selection: &SelectionSet,
        preset: Preset,
    ) -> Result<OutputVideo, EditError> {
        self.assemble_with_style(selection, AssemblyStyle::for_preset(preset.config()))
            .await
    }

    /// Renders `selection` with an explicit style (e.g. preset style plus the request theme).
    pub async fn assemble_with_style(
        &self,
        selection: &SelectionSet,
        style: AssemblyStyle,
    ) -> Result<OutputVideo, EditError> {
        self.render(selection, style, self.config.quality).await
    }

    /// Quick render of the first `preview_clips` clips at preview quality.
    pub async fn preview(
        &self,
        selection: &SelectionSet,
        preset: Preset,
    ) -> Result<OutputVideo, EditError> {
        let head = selection.first(self.config.preview_clips.max(1));
        self.render(
            &head,
            AssemblyStyle::for_preset(preset.config()),
            RenderQuality::Preview,
        )
        .await
    }

    async fn render(
        &self,
        selection: &SelectionSet,
        style: AssemblyStyle,
        quality: RenderQuality,
    ) -> Result<OutputVideo, EditError> {
        if selection.is_empty() {
            return Err(EditError::Assembly("selection is empty".to_string()));
        }
        let timeline = Timeline::from_selection(selection, style, quality);
        let expected = timeline.duration();
        debug!(
            segments = timeline.segments.len(),
            expected_duration = expected,
            quality = ?quality,
            estimate_secs = estimate_processing_time(selection.len(), expected).as_secs(),
            "assembler: rendering"
        );

        let artifact = self
            .engine
            .render(&timeline)
            .await
            .map_err(|e| EditError::Assembly(e.to_string()))?;

        if artifact.uri.trim().is_empty() {
            return Err(EditError::Assembly(
                "engine returned an empty uri".to_string(),
            ));
        }
        if !artifact.duration.is_finite() || artifact.duration <= 0.0 {
            return Err(EditError::Assembly(format!(
                "engine reported duration {} for {}",
                artifact.duration, artifact.uri
            )));
        }
        if artifact.duration > expected + self.config.duration_tolerance {
            return Err(EditError::Assembly(format!(
                "engine reported {:.3}s but the clips only total {:.3}s",
                artifact.duration, expected
            )));
        }

        let duration = artifact.duration.min(expected);

        let format = artifact
            .format
            .or_else(|| VideoFormat::from_uri(&artifact.uri))
            .unwrap_or(VideoFormat::Mp4);
        let output = OutputVideo {
            uri: artifact.uri,
            duration,
            format,
            clip_count: selection.len(),
        };
        info!(
            uri = %output.uri,
            duration = output.duration,
            clips = output.clip_count,
            "assembler: output ready"
        );
        Ok(output)
    }
}

/// Rough wall-clock estimate for a render: 2 s per clip, 1 s per 10 s of footage, 10 s overhead.
pub fn estimate_processing_time(clip_count: usize, total_duration: f64) -> Duration {
    let secs = clip_count as f64 * 2.0 + total_duration.max(0.0) / 10.0 + 10.0;
    Duration::from_secs(secs as u64)
}
