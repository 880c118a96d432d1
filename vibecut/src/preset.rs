//! Presets: named bundles of planning and assembly defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Highlights,
    Reels,
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Highlights, Preset::Reels, Preset::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Highlights => "highlights",
            Preset::Reels => "reels",
            Preset::Custom => "custom",
        }
    }

    pub fn config(&self) -> &'static PresetConfig {
        match self {
            Preset::Highlights => &HIGHLIGHTS,
            Preset::Reels => &REELS,
            Preset::Custom => &CUSTOM,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "highlights" | "highlight" => Ok(Preset::Highlights),
            "reels" | "reel" => Ok(Preset::Reels),
            "custom" => Ok(Preset::Custom),
            _ => Err(EditError::UnknownPreset(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    Fade,
    QuickCut,
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pacing {
    Medium,
    Fast,
    UserDefined,
}

/// Post-processing hints passed through to the assembly engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    IntroFade,
    OutroFade,
    AutoColorCorrection,
    AutoCaptions,
    TrendingMusic,
    DynamicZoom,
    TextOverlays,
}

/// Defaults for one preset.
#[derive(Debug, PartialEq, Serialize)]
pub struct PresetConfig {
    pub name: &'static str,
    pub description: &'static str,
    /// Seconds.
    pub default_duration: f64,
    /// Upper bound on the number of intents in a plan.
    pub max_clips: usize,
    pub transition: TransitionStyle,
    pub pacing: Pacing,
    pub aspect_ratio: &'static str,
    pub music_style: Option<&'static str>,
    pub effects: &'static [Effect],
    /// Appended to every search query for this preset.
    pub search_keywords: &'static [&'static str],
}

static HIGHLIGHTS: PresetConfig = PresetConfig {
    name: "Highlights",
    description: "Best moments compilation with smooth transitions",
    default_duration: 60.0,
    max_clips: 8,
    transition: TransitionStyle::Fade,
    pacing: Pacing::Medium,
    aspect_ratio: "16:9",
    music_style: Some("uplifting"),
    effects: &[
        Effect::IntroFade,
        Effect::OutroFade,
        Effect::AutoColorCorrection,
    ],
    search_keywords: &["best", "important", "key moment", "highlight"],
};

static REELS: PresetConfig = PresetConfig {
    name: "Social Media Reel",
    description: "Fast-paced, engaging content for social platforms",
    default_duration: 30.0,
    max_clips: 6,
    transition: TransitionStyle::QuickCut,
    pacing: Pacing::Fast,
    aspect_ratio: "9:16",
    music_style: None,
    effects: &[
        Effect::AutoCaptions,
        Effect::TrendingMusic,
        Effect::DynamicZoom,
        Effect::TextOverlays,
    ],
    search_keywords: &["dynamic", "engaging", "action", "movement"],
};

static CUSTOM: PresetConfig = PresetConfig {
    name: "Custom",
    description: "Fully customizable video with user specifications",
    default_duration: 45.0,
    max_clips: 10,
    transition: TransitionStyle::Smooth,
    pacing: Pacing::UserDefined,
    aspect_ratio: "16:9",
    music_style: None,
    effects: &[],
    search_keywords: &[],
};
