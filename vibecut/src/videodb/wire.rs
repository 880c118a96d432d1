//! Request and response bodies for the VideoDB API.

use serde::{Deserialize, Serialize};

use super::IndexType;
use crate::assembler::{AssemblyStyle, RenderQuality, Timeline};

#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Numbers the API sometimes sends as strings (`"length": "120.5"`).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub(super) enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Float(v) => Some(*v).filter(|v| v.is_finite()),
            Number::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

fn is_empty(ids: &&[String]) -> bool {
    ids.is_empty()
}

#[derive(Debug, Serialize)]
pub(super) struct SearchRequest<'a> {
    pub query: &'a str,
    pub search_type: &'static str,
    pub index_type: &'static str,
    pub result_threshold: usize,
    #[serde(skip_serializing_if = "is_empty")]
    pub video_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub shots: Vec<Shot>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Shot {
    pub video_id: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub search_score: Option<f64>,
    #[serde(default)]
    pub video_length: Option<Number>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VideoResponse {
    pub length: Number,
}

#[derive(Debug, Serialize)]
pub(super) struct UploadRequest<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UploadResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct IndexRequest<'a> {
    pub index_type: IndexType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct CompileSegment<'a> {
    pub video_id: &'a str,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct CompileRequest<'a> {
    pub timeline: Vec<CompileSegment<'a>>,
    pub style: &'a AssemblyStyle,
    pub quality: RenderQuality,
}

impl<'a> From<&'a Timeline> for CompileRequest<'a> {
    fn from(timeline: &'a Timeline) -> Self {
        Self {
            timeline: timeline
                .segments
                .iter()
                .map(|s| CompileSegment {
                    video_id: &s.video_id,
                    start: s.start,
                    end: s.end,
                })
                .collect(),
            style: &timeline.style,
            quality: timeline.quality,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CompileResponse {
    pub stream_url: String,
    #[serde(default)]
    pub duration: Option<Number>,
}
