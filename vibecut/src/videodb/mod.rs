//! VideoDB HTTP client: semantic search ([`SearchIndex`]) and timeline compilation
//! ([`AssemblyEngine`]), plus upload and indexing for preparing a collection.
//!
//! Every request carries the API key in the `x-access-token` header. Responses are wrapped in
//! `{ "success": bool, "message": string?, "data": ... }`. Network failures, 429 and 5xx map to
//! `Transport`; other non-success statuses to `Rejected`; undecodable bodies to
//! `MalformedResponse`.

mod wire;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use config::Settings;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::assembler::{AssemblyEngine, RenderedArtifact, Timeline};
use crate::error::CollaboratorError;
use crate::model::{ClipCandidate, TimeRange, VideoFormat};
use crate::retriever::{SearchIndex, SearchQuery};

use wire::{
    CompileRequest, CompileResponse, Envelope, IndexRequest, SearchRequest, SearchResponse, Shot,
    UploadRequest, UploadResponse, VideoResponse,
};

/// What to index a video by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    #[serde(rename = "spoken_word")]
    SpokenWords,
    #[serde(rename = "scene")]
    Scenes,
}

const DEFAULT_SCENE_PROMPT: &str = "Describe the visual scenes and actions";

/// Containers accepted for upload.
pub const SUPPORTED_UPLOAD_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];

/// True when `path_or_url` ends in a supported container extension.
pub fn is_supported_upload(path_or_url: &str) -> bool {
    let path = path_or_url.split(['?', '#']).next().unwrap_or(path_or_url);
    path.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_UPLOAD_EXTENSIONS.contains(&ext.as_str()))
}

/// Uploads one source video into a collection and starts indexing it.
#[async_trait]
pub trait VideoIngest: Send + Sync {
    /// Returns the new video id.
    async fn ingest(
        &self,
        collection_id: &str,
        url: &str,
        index_type: IndexType,
        scene_prompt: Option<&str>,
    ) -> Result<String, CollaboratorError>;
}

pub struct VideoDbClient {
    api_key: Arc<str>,
    base_url: String,
    client: reqwest::Client,
    /// Source lengths already fetched, by video id.
    lengths: Mutex<HashMap<String, f64>>,
}

impl VideoDbClient {
    pub fn new(api_key: impl Into<Arc<str>>, base_url: impl Into<String>) -> Self {
        Self::with_client(api_key, base_url, reqwest::Client::new())
    }

    pub fn with_client(
        api_key: impl Into<Arc<str>>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            lengths: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.videodb_api_key(), settings.videodb_base_url())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Uploads a video by URL into `collection_id`; returns the new video id.
    pub async fn upload(
        &self,
        collection_id: &str,
        url: &str,
        name: Option<&str>,
    ) -> Result<String, CollaboratorError> {
        if !is_supported_upload(url) {
            return Err(CollaboratorError::Rejected(format!(
                "unsupported video format: {} (use {})",
                url,
                SUPPORTED_UPLOAD_EXTENSIONS.join(", ")
            )));
        }
        let body = UploadRequest { url, name };
        let resp: UploadResponse = self
            .post(&format!("collection/{}/upload", collection_id), &body)
            .await?;
        debug!(video_id = %resp.id, "videodb: uploaded");
        Ok(resp.id)
    }

    /// Starts indexing `video_id`. Scene indexing uses `scene_prompt` or a default prompt.
    pub async fn index(
        &self,
        video_id: &str,
        index_type: IndexType,
        scene_prompt: Option<&str>,
    ) -> Result<(), CollaboratorError> {
        let prompt = match index_type {
            IndexType::Scenes => Some(scene_prompt.unwrap_or(DEFAULT_SCENE_PROMPT)),
            IndexType::SpokenWords => None,
        };
        let body = IndexRequest { index_type, prompt };
        let _: Option<serde_json::Value> = self
            .post(&format!("video/{}/index", video_id), &body)
            .await?;
        debug!(video_id, ?index_type, "videodb: indexing started");
        Ok(())
    }

    /// Upload then index; returns the video id.
    pub async fn upload_and_index(
        &self,
        collection_id: &str,
        url: &str,
        index_type: IndexType,
        scene_prompt: Option<&str>,
    ) -> Result<String, CollaboratorError> {
        let video_id = self.upload(collection_id, url, None).await?;
        self.index(&video_id, index_type, scene_prompt).await?;
        Ok(video_id)
    }

    /// Source length in seconds; cached per video.
    pub async fn video_length(&self, video_id: &str) -> Result<f64, CollaboratorError> {
        if let Some(len) = self.lengths.lock().await.get(video_id) {
            return Ok(*len);
        }
        let resp: VideoResponse = self.get(&format!("video/{}", video_id)).await?;
        let length = resp.length.as_f64().ok_or_else(|| {
            CollaboratorError::MalformedResponse(format!("video {} has no length", video_id))
        })?;
        self.lengths.lock().await.insert(video_id.to_string(), length);
        Ok(length)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CollaboratorError> {
        let url = self.url(path);
        trace!(url = %url, "videodb: GET");
        let req = self
            .client
            .get(&url)
            .header("x-access-token", self.api_key.as_ref());
        self.send(req).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CollaboratorError> {
        let url = self.url(path);
        trace!(url = %url, "videodb: POST");
        let req = self
            .client
            .post(&url)
            .header("x-access-token", self.api_key.as_ref())
            .json(body);
        self.send(req).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, CollaboratorError> {
        let response = req
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("VideoDB request failed: {}", e)))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| {
            CollaboratorError::Transport(format!("failed to read VideoDB response: {}", e))
        })?;
        if !status.is_success() {
            return Err(classify_status(status, &text));
        }
        decode_envelope(&text)
    }

    async fn shots_to_candidates(
        &self,
        shots: Vec<Shot>,
    ) -> Result<Vec<ClipCandidate>, CollaboratorError> {
        let mut out = Vec::with_capacity(shots.len());
        for shot in shots {
            let source_duration = match shot.video_length.as_ref().and_then(|n| n.as_f64()) {
                Some(len) => len,
                None => self.video_length(&shot.video_id).await?,
            };
            out.push(shot_to_candidate(shot, source_duration)?);
        }
        Ok(out)
    }
}

fn classify_status(status: StatusCode, body: &str) -> CollaboratorError {
    let msg = format!("VideoDB {}: {}", status, body.trim());
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        CollaboratorError::Transport(msg)
    } else {
        CollaboratorError::Rejected(msg)
    }
}

fn decode_envelope<T: DeserializeOwned>(text: &str) -> Result<T, CollaboratorError> {
    let envelope: Envelope<T> = serde_json::from_str(text).map_err(|e| {
        CollaboratorError::MalformedResponse(format!("VideoDB response: {}", e))
    })?;
    if envelope.success == Some(false) {
        return Err(CollaboratorError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "VideoDB reported failure".to_string()),
        ));
    }
    match envelope.data {
        Some(data) => Ok(data),
        // Accepts a missing `data` only for targets that decode from null.
        None => serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            CollaboratorError::MalformedResponse("VideoDB response has no data".to_string())
        }),
    }
}

/// Degenerate ranges (negative start, `start >= end`) are malformed; ranges past the source
/// end are passed through for the Retriever to reject.
fn shot_to_candidate(shot: Shot, source_duration: f64) -> Result<ClipCandidate, CollaboratorError> {
    let range = TimeRange::new(shot.start, shot.end).ok_or_else(|| {
        CollaboratorError::MalformedResponse(format!(
            "shot of {} has invalid range [{}, {}]",
            shot.video_id, shot.start, shot.end
        ))
    })?;
    Ok(ClipCandidate::new(
        shot.video_id,
        range,
        shot.search_score.unwrap_or(0.0),
        source_duration,
    ))
}

#[async_trait]
impl SearchIndex for VideoDbClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ClipCandidate>, CollaboratorError> {
        let body = SearchRequest {
            query: &query.text,
            search_type: "semantic",
            index_type: "scene",
            result_threshold: query.limit,
            video_ids: &query.collection.video_ids,
        };
        let resp: SearchResponse = self
            .post(&format!("collection/{}/search", query.collection.id), &body)
            .await?;
        debug!(shots = resp.shots.len(), query = %query.text, "videodb: search");
        let mut shots = resp.shots;
        shots.truncate(query.limit);
        self.shots_to_candidates(shots).await
    }
}

#[async_trait]
impl VideoIngest for VideoDbClient {
    async fn ingest(
        &self,
        collection_id: &str,
        url: &str,
        index_type: IndexType,
        scene_prompt: Option<&str>,
    ) -> Result<String, CollaboratorError> {
        self.upload_and_index(collection_id, url, index_type, scene_prompt)
            .await
    }
}

#[async_trait]
impl AssemblyEngine for VideoDbClient {
    async fn render(&self, timeline: &Timeline) -> Result<RenderedArtifact, CollaboratorError> {
        let body = CompileRequest::from(timeline);
        let resp: CompileResponse = self.post("timeline/compile", &body).await?;
        let duration = resp.duration.as_ref().and_then(|n| n.as_f64()).ok_or_else(|| {
            CollaboratorError::MalformedResponse("compiled timeline has no duration".to_string())
        })?;
        debug!(uri = %resp.stream_url, duration, "videodb: compiled");
        Ok(RenderedArtifact {
            format: VideoFormat::from_uri(&resp.stream_url),
            uri: resp.stream_url,
            duration,
        })
    }
}
