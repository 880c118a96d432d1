use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::preset::Preset;

/// Identifies the indexed collection to search, optionally restricted to some videos.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: String,
    /// Empty means every video in the collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video_ids: Vec<String>,
}

impl CollectionRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            video_ids: Vec::new(),
        }
    }

    pub fn with_videos<I, S>(mut self, video_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.video_ids = video_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `video_id` is inside this reference.
    pub fn includes(&self, video_id: &str) -> bool {
        self.video_ids.is_empty() || self.video_ids.iter().any(|v| v == video_id)
    }
}

/// One natural-language edit request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditRequest {
    pub instruction: String,
    pub preset: Preset,
    pub collection: CollectionRef,
    /// Seconds; overrides any duration found in the instruction or the preset default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl EditRequest {
    pub fn new(instruction: impl Into<String>, preset: Preset, collection: CollectionRef) -> Self {
        Self {
            instruction: instruction.into(),
            preset,
            collection,
            target_duration: None,
            theme: None,
        }
    }

    /// Parses the preset selector; an unrecognized value is `UnknownPreset`.
    pub fn parse(
        instruction: impl Into<String>,
        preset: &str,
        collection: CollectionRef,
    ) -> Result<Self, EditError> {
        Ok(Self::new(instruction, preset.parse()?, collection))
    }

    pub fn with_target_duration(mut self, seconds: f64) -> Self {
        self.target_duration = Some(seconds);
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        let theme = theme.into();
        self.theme = (!theme.trim().is_empty()).then_some(theme);
        self
    }
}
