//! Builds requests and settings from CLI options and runs the pipeline or an ingest.

use std::time::Duration;

use config::Settings;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use vibecut::{
    CollectionRef, EditOutcome, EditPipeline, EditRequest, IndexType, PipelineConfig,
    PipelineEvent, RetryPolicy, VideoDbClient, VideoIngest,
};

use crate::CliError;

/// Options for `vibecut run`.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub instruction: String,
    pub collection: String,
    /// Restrict the search to these videos; empty means the whole collection.
    pub videos: Vec<String>,
    pub preset: String,
    pub duration: Option<f64>,
    pub theme: Option<String>,
    pub min_relevance: Option<f64>,
    /// Seconds per stage attempt.
    pub stage_timeout: Option<f64>,
    /// Extra attempts for transient planner and retriever failures.
    pub retries: usize,
    pub preview: bool,
}

/// Options for `vibecut ingest`.
#[derive(Clone, Debug, Default)]
pub struct IngestOptions {
    pub collection: String,
    pub urls: Vec<String>,
    pub index: String,
    pub scene_prompt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IngestedVideo {
    pub url: String,
    pub video_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailedUpload {
    pub url: String,
    pub error: String,
}

/// Outcome of `vibecut ingest`: every URL lands in exactly one list, in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub uploaded: Vec<IngestedVideo>,
    pub failed: Vec<FailedUpload>,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Ok(())` when nothing failed, otherwise [`CliError::IngestFailed`].
    pub fn into_result(self) -> Result<(), CliError> {
        if self.is_complete() {
            return Ok(());
        }
        Err(CliError::IngestFailed {
            failed: self.failed.len(),
            total: self.failed.len() + self.uploaded.len(),
        })
    }
}

/// Parses the preset and assembles the request. Fails before any settings are read.
pub fn build_request(opts: &RunOptions) -> Result<EditRequest, CliError> {
    if opts.collection.trim().is_empty() {
        return Err(CliError::InvalidArgument(
            "--collection must not be empty".to_string(),
        ));
    }
    let collection = CollectionRef::new(opts.collection.trim()).with_videos(opts.videos.iter());
    let mut request = EditRequest::parse(&opts.instruction, &opts.preset, collection)?;
    if let Some(seconds) = opts.duration {
        request = request.with_target_duration(seconds);
    }
    if let Some(theme) = &opts.theme {
        request = request.with_theme(theme.as_str());
    }
    Ok(request)
}

/// Applies `--min-relevance` and `--stage-timeout` on top of the environment settings.
pub fn apply_overrides(settings: Settings, opts: &RunOptions) -> Result<Settings, CliError> {
    let mut settings = match opts.min_relevance {
        Some(value) => settings.with_min_relevance(value)?,
        None => settings,
    };
    if let Some(secs) = opts.stage_timeout {
        settings = settings.with_stage_timeout(Some(stage_timeout(secs)?));
    }
    Ok(settings)
}

fn stage_timeout(secs: f64) -> Result<Duration, CliError> {
    let invalid = || {
        CliError::InvalidArgument(format!(
            "--stage-timeout must be a positive number of seconds, got {}",
            secs
        ))
    };
    if secs <= 0.0 {
        return Err(invalid());
    }
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

pub fn pipeline_config(settings: &Settings, opts: &RunOptions) -> PipelineConfig {
    let retry = match opts.retries {
        0 => RetryPolicy::None,
        n => RetryPolicy::exponential(
            n,
            Duration::from_millis(500),
            Duration::from_secs(8),
            2.0,
        ),
    };
    PipelineConfig::from_settings(settings)
        .with_retry(retry)
        .with_preview(opts.preview)
}

/// Runs one edit against OpenAI and VideoDB.
pub async fn run_edit(
    settings: &Settings,
    opts: &RunOptions,
    events: Option<mpsc::Sender<PipelineEvent>>,
) -> Result<EditOutcome, CliError> {
    let request = build_request(opts)?;
    let settings = apply_overrides(settings.clone(), opts)?;
    let pipeline =
        EditPipeline::from_settings(&settings).with_config(pipeline_config(&settings, opts));
    Ok(pipeline.run_with_events(&request, events).await?)
}

pub fn parse_index_type(s: &str) -> Result<IndexType, CliError> {
    match s.trim().to_lowercase().as_str() {
        "spoken" | "spoken_word" | "spoken_words" | "speech" => Ok(IndexType::SpokenWords),
        "scene" | "scenes" | "visual" => Ok(IndexType::Scenes),
        other => Err(CliError::InvalidArgument(format!(
            "unknown index type {:?} (use spoken or scene)",
            other
        ))),
    }
}

/// Uploads every URL into the collection through VideoDB and starts indexing it, in order.
pub async fn ingest(settings: &Settings, opts: &IngestOptions) -> Result<IngestReport, CliError> {
    let client = VideoDbClient::from_settings(settings);
    ingest_with(&client, opts).await
}

/// A failed URL is recorded and the rest are still attempted. Only bad options are an error.
pub async fn ingest_with(
    videos: &dyn VideoIngest,
    opts: &IngestOptions,
) -> Result<IngestReport, CliError> {
    if opts.urls.is_empty() {
        return Err(CliError::InvalidArgument(
            "ingest needs at least one video url".to_string(),
        ));
    }
    let index_type = parse_index_type(&opts.index)?;

    let mut report = IngestReport::default();
    for url in &opts.urls {
        match videos
            .ingest(
                &opts.collection,
                url,
                index_type,
                opts.scene_prompt.as_deref(),
            )
            .await
        {
            Ok(video_id) => {
                info!(url = %url, video_id = %video_id, "ingested");
                report.uploaded.push(IngestedVideo {
                    url: url.clone(),
                    video_id,
                });
            }
            Err(e) => {
                warn!(url = %url, error = %e, "ingest failed");
                report.failed.push(FailedUpload {
                    url: url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use vibecut::{CollaboratorError, EditError, Preset};

    fn settings() -> Settings {
        Settings::from_lookup(|k| match k {
            "VIDEODB_API_KEY" => Some("vdb".to_string()),
            "OPENAI_API_KEY" => Some("sk".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn opts() -> RunOptions {
        RunOptions {
            instruction: "Create a 30-second highlight reel".to_string(),
            collection: "c1".to_string(),
            videos: vec!["v-1".to_string(), "v-2".to_string()],
            preset: "highlights".to_string(),
            ..RunOptions::default()
        }
    }

    #[test]
    fn request_carries_options() {
        let mut o = opts();
        o.duration = Some(20.0);
        o.theme = Some("sunset".to_string());
        let request = build_request(&o).unwrap();
        assert_eq!(request.preset, Preset::Highlights);
        assert_eq!(request.collection.video_ids, vec!["v-1", "v-2"]);
        assert_eq!(request.target_duration, Some(20.0));
        assert_eq!(request.theme.as_deref(), Some("sunset"));
    }

    #[test]
    fn unknown_preset_fails_request() {
        let mut o = opts();
        o.preset = "vlog".to_string();
        assert!(matches!(
            build_request(&o),
            Err(CliError::Edit(EditError::UnknownPreset(_)))
        ));
    }

    #[test]
    fn blank_collection_is_rejected() {
        let mut o = opts();
        o.collection = "  ".to_string();
        assert!(matches!(build_request(&o), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn overrides_replace_settings() {
        let mut o = opts();
        o.min_relevance = Some(0.7);
        o.stage_timeout = Some(2.5);
        let s = apply_overrides(settings(), &o).unwrap();
        assert_eq!(s.min_relevance(), 0.7);
        assert_eq!(s.stage_timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn out_of_range_relevance_is_rejected() {
        let mut o = opts();
        o.min_relevance = Some(1.5);
        assert!(matches!(
            apply_overrides(settings(), &o),
            Err(CliError::Settings(_))
        ));
    }

    #[test]
    fn zero_stage_timeout_is_rejected() {
        let mut o = opts();
        o.stage_timeout = Some(0.0);
        assert!(matches!(
            apply_overrides(settings(), &o),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_stage_timeout_is_rejected() {
        let mut o = opts();
        o.stage_timeout = Some(1e20);
        assert!(matches!(
            apply_overrides(settings(), &o),
            Err(CliError::InvalidArgument(_))
        ));
        o.stage_timeout = Some(f64::NAN);
        assert!(matches!(
            apply_overrides(settings(), &o),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn retries_select_exponential_policy() {
        let mut o = opts();
        assert_eq!(pipeline_config(&settings(), &o).retry, RetryPolicy::None);
        o.retries = 2;
        o.preview = true;
        let cfg = pipeline_config(&settings(), &o);
        assert_eq!(cfg.retry.max_retries(), 2);
        assert!(cfg.preview);
    }

    #[test]
    fn index_type_names() {
        assert_eq!(parse_index_type("spoken").unwrap(), IndexType::SpokenWords);
        assert_eq!(parse_index_type("Scene").unwrap(), IndexType::Scenes);
        assert!(parse_index_type("faces").is_err());
    }

    /// Accepts `.mp4` URLs and rejects everything else, numbering the ids it hands out.
    struct FakeVideos {
        calls: Mutex<Vec<String>>,
    }

    impl FakeVideos {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VideoIngest for FakeVideos {
        async fn ingest(
            &self,
            _collection_id: &str,
            url: &str,
            _index_type: IndexType,
            _scene_prompt: Option<&str>,
        ) -> Result<String, CollaboratorError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            if url.ends_with(".mp4") {
                Ok(format!("m-{}", calls.len()))
            } else {
                Err(CollaboratorError::Rejected(format!("cannot ingest {}", url)))
            }
        }
    }

    fn ingest_opts(urls: &[&str]) -> IngestOptions {
        IngestOptions {
            collection: "c1".to_string(),
            urls: urls.iter().map(|u| u.to_string()).collect(),
            index: "spoken".to_string(),
            scene_prompt: None,
        }
    }

    /// **Scenario**: an unsupported container is reported as failed before any request is sent.
    #[tokio::test]
    async fn ingest_reports_unsupported_format() {
        let report = ingest(&settings(), &ingest_opts(&["https://example.com/notes.txt"]))
            .await
            .unwrap();
        assert!(report.uploaded.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(
            report.failed[0].error.contains("unsupported video format"),
            "{}",
            report.failed[0].error
        );
        assert!(matches!(
            report.into_result(),
            Err(CliError::IngestFailed { failed: 1, total: 1 })
        ));
    }

    /// **Scenario**: a rejected URL does not stop the others, and the ids of the uploaded
    /// videos are kept next to the failure.
    #[tokio::test]
    async fn ingest_continues_past_a_failed_url() {
        let videos = FakeVideos::new();
        let o = ingest_opts(&["https://x/a.mp4", "https://x/b.mov", "https://x/c.mp4"]);

        let report = ingest_with(&videos, &o).await.unwrap();

        assert_eq!(videos.calls.lock().unwrap().len(), 3);
        assert_eq!(
            report.uploaded,
            vec![
                IngestedVideo {
                    url: "https://x/a.mp4".into(),
                    video_id: "m-1".into(),
                },
                IngestedVideo {
                    url: "https://x/c.mp4".into(),
                    video_id: "m-3".into(),
                },
            ]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].url, "https://x/b.mov");
        assert!(!report.is_complete());
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "ingest: 1 of 3 videos failed");
    }

    #[tokio::test]
    async fn ingest_without_failures_is_ok() {
        let videos = FakeVideos::new();
        let report = ingest_with(&videos, &ingest_opts(&["https://x/a.mp4"]))
            .await
            .unwrap();
        assert!(report.into_result().is_ok());
    }

    #[tokio::test]
    async fn ingest_with_bad_index_type_is_an_error() {
        let videos = FakeVideos::new();
        let mut o = ingest_opts(&["https://x/a.mp4"]);
        o.index = "faces".to_string();
        assert!(matches!(
            ingest_with(&videos, &o).await,
            Err(CliError::InvalidArgument(_))
        ));
        assert!(videos.calls.lock().unwrap().is_empty());
    }
}
