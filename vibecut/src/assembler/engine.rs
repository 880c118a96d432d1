use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::model::{SelectionSet, VideoFormat};
use crate::preset::{Effect, Pacing, PresetConfig, TransitionStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderQuality {
    Preview,
    #[default]
    Standard,
    High,
}

/// Presentation settings handed to the engine with the segments.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssemblyStyle {
    pub transition: TransitionStyle,
    pub pacing: Pacing,
    pub aspect_ratio: String,
    pub effects: Vec<Effect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl AssemblyStyle {
    pub fn for_preset(preset: &PresetConfig) -> Self {
        Self {
            transition: preset.transition,
            pacing: preset.pacing,
            aspect_ratio: preset.aspect_ratio.to_string(),
            effects: preset.effects.to_vec(),
            music_style: preset.music_style.map(str::to_string),
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: Option<&str>) -> Self {
        self.theme = theme.map(str::to_string);
        self
    }
}

/// One cut: `[start, end)` seconds of `video_id`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineSegment {
    pub video_id: String,
    pub start: f64,
    pub end: f64,
}

/// Ordered segments plus style; what the engine renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Timeline {
    pub segments: Vec<TimelineSegment>,
    pub style: AssemblyStyle,
    pub quality: RenderQuality,
}

impl Timeline {
    /// One segment per selected clip, in selection order.
    pub fn from_selection(selection: &SelectionSet, style: AssemblyStyle, quality: RenderQuality) -> Self {
        let segments = selection
            .clips()
            .iter()
            .map(|s| TimelineSegment {
                video_id: s.clip.video_id.clone(),
                start: s.clip.range.start(),
                end: s.clip.range.end(),
            })
            .collect();
        Self {
            segments,
            style,
            quality,
        }
    }

    /// Sum of segment durations in seconds.
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|s| s.end - s.start).sum()
    }
}

/// What the engine returns for one render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    pub uri: String,
    /// Seconds, as measured by the engine.
    pub duration: f64,
    /// `None` lets the Assembler infer it from the URI.
    #[serde(default)]
    pub format: Option<VideoFormat>,
}

/// Assembly collaborator: renders one timeline into one stored artifact.
#[async_trait]
pub trait AssemblyEngine: Send + Sync {
    async fn render(&self, timeline: &Timeline) -> Result<RenderedArtifact, CollaboratorError>;
}
