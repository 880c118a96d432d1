//! Edit pipeline: Planner → Retriever → Assembler, statically composed.
//!
//! Each stage's output is the next stage's only input. A stage may be bounded by
//! [`PipelineConfig::stage_timeout`] and re-run under [`PipelineConfig::retry`] on transient
//! failures; the assembler is never re-run so one request yields at most one artifact.
//! Progress is reported as [`PipelineEvent`]s when a sender is given.

mod events;
mod logging;
mod retry;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use config::Settings;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::assembler::{Assembler, AssemblerConfig, AssemblyStyle};
use crate::error::{EditError, Stage};
use crate::llm::ChatOpenAI;
use crate::model::{EditRequest, ExecutionPlan, OutputVideo, SelectionSet};
use crate::planner::Planner;
use crate::retriever::{Retriever, RetrieverConfig};
use crate::videodb::VideoDbClient;

pub use events::PipelineEvent;
pub use retry::RetryPolicy;

use logging::{
    log_run_complete, log_run_start, log_stage_complete, log_stage_error, log_stage_retry,
    log_stage_start,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineConfig {
    /// Upper bound per stage attempt; `None` leaves stages unbounded.
    pub stage_timeout: Option<Duration>,
    pub retry: RetryPolicy,
    /// Render a short preview instead of the full edit.
    pub preview: bool,
}

impl PipelineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            stage_timeout: settings.stage_timeout(),
            ..Self::default()
        }
    }

    pub fn with_stage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stage_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// Everything a successful run produced.
#[derive(Clone, Debug, Serialize)]
pub struct EditOutcome {
    pub run_id: String,
    pub plan: ExecutionPlan,
    pub selection: SelectionSet,
    pub output: OutputVideo,
}

pub struct EditPipeline {
    planner: Planner,
    retriever: Retriever,
    assembler: Assembler,
    config: PipelineConfig,
}

impl EditPipeline {
    pub fn new(
        planner: Planner,
        retriever: Retriever,
        assembler: Assembler,
        config: PipelineConfig,
    ) -> Self {
        Self {
            planner,
            retriever,
            assembler,
            config,
        }
    }

    /// OpenAI planner and VideoDB search and assembly, configured from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        let videodb = Arc::new(VideoDbClient::from_settings(settings));
        Self::new(
            Planner::new(Arc::new(ChatOpenAI::from_settings(settings))),
            Retriever::new(videodb.clone(), RetrieverConfig::from_settings(settings)),
            Assembler::new(videodb, AssemblerConfig::default()),
            PipelineConfig::from_settings(settings),
        )
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, request: &EditRequest) -> Result<EditOutcome, EditError> {
        self.run_with_events(request, None).await
    }

    /// Runs the request, sending progress to `events`. A closed receiver does not stop the run.
    pub async fn run_with_events(
        &self,
        request: &EditRequest,
        events: Option<mpsc::Sender<PipelineEvent>>,
    ) -> Result<EditOutcome, EditError> {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("edit_run", run_id = %run_id, preset = %request.preset);
        self.run_inner(request, run_id, events.as_ref())
            .instrument(span)
            .await
    }

    async fn run_inner(
        &self,
        request: &EditRequest,
        run_id: String,
        events: Option<&mpsc::Sender<PipelineEvent>>,
    ) -> Result<EditOutcome, EditError> {
        log_run_start(&request.instruction, request.preset.as_str());

        let plan = self
            .stage(Stage::Planner, events, || self.planner.plan(request))
            .await?;
        let selection = self
            .stage(Stage::Retriever, events, || {
                self.retriever.retrieve(&plan, &request.collection)
            })
            .await?;
        let output = if self.config.preview {
            self.stage(Stage::Assembler, events, || {
                self.assembler.preview(&selection, plan.preset())
            })
            .await?
        } else {
            let style =
                AssemblyStyle::for_preset(plan.preset().config()).with_theme(plan.theme());
            self.stage(Stage::Assembler, events, || {
                self.assembler.assemble_with_style(&selection, style.clone())
            })
            .await?
        };

        log_run_complete(&output.uri, output.duration);
        Ok(EditOutcome {
            run_id,
            plan,
            selection,
            output,
        })
    }

    /// Runs one stage with the configured timeout and retry policy.
    async fn stage<T, F, Fut>(
        &self,
        stage: Stage,
        events: Option<&mpsc::Sender<PipelineEvent>>,
        mut op: F,
    ) -> Result<T, EditError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, EditError>>,
    {
        emit(events, PipelineEvent::StageStarted { stage }).await;
        let mut retry = 0;
        loop {
            log_stage_start(stage, retry);
            let started = Instant::now();
            let result = match self.config.stage_timeout {
                Some(limit) => match tokio::time::timeout(limit, op()).await {
                    Ok(result) => result,
                    Err(_) => Err(EditError::StageTimeout { stage, after: limit }),
                },
                None => op().await,
            };

            match result {
                Ok(value) => {
                    let elapsed = started.elapsed();
                    log_stage_complete(stage, elapsed);
                    emit(
                        events,
                        PipelineEvent::StageCompleted {
                            stage,
                            elapsed_ms: elapsed.as_millis() as u64,
                        },
                    )
                    .await;
                    return Ok(value);
                }
                Err(error)
                    if stage != Stage::Assembler
                        && error.is_transient()
                        && self.config.retry.allows(retry) =>
                {
                    let delay = self.config.retry.delay(retry);
                    log_stage_retry(stage, retry, delay, &error);
                    emit(
                        events,
                        PipelineEvent::Retrying {
                            stage,
                            retry,
                            delay_ms: delay.as_millis() as u64,
                            error: error.to_string(),
                        },
                    )
                    .await;
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(error) => {
                    log_stage_error(stage, &error);
                    emit(
                        events,
                        PipelineEvent::StageFailed {
                            stage,
                            error: error.to_string(),
                        },
                    )
                    .await;
                    return Err(error);
                }
            }
        }
    }
}

async fn emit(events: Option<&mpsc::Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
