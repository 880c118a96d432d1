//! VibeCut CLI library: request building, pipeline invocation and output rendering for the
//! `vibecut` binary.
//!
//! The binary parses arguments with clap and hands plain option structs ([`RunOptions`],
//! [`IngestOptions`]) to the functions here, so they can be tested without spawning a process.

mod display;
mod run;

use config::SettingsError;
use thiserror::Error;
use vibecut::EditError;

pub use display::{
    format_ingest, format_ingest_failures, format_outcome, format_presets, presets_json,
    write_json,
};
pub use run::{
    apply_overrides, build_request, ingest, ingest_with, parse_index_type, pipeline_config,
    run_edit, FailedUpload, IngestOptions, IngestReport, IngestedVideo, RunOptions,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("ingest: {failed} of {total} videos failed")]
    IngestFailed { failed: usize, total: usize },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode json: {0}")]
    Json(#[from] serde_json::Error),
}
