//! VibeCut CLI binary: turn a natural-language instruction into an edited video.
//!
//! Subcommands: `run` (plan, retrieve and assemble one edit), `presets` (list presets),
//! `ingest` (upload and index source videos).

mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cli::{
    format_ingest, format_ingest_failures, format_outcome, format_presets, presets_json,
    write_json, CliError, IngestOptions, RunOptions,
};
use config::Settings;
use tokio::sync::mpsc;
use vibecut::PipelineEvent;

#[derive(Parser, Debug)]
#[command(name = "vibecut")]
#[command(about = "VibeCut: edit videos from natural-language instructions")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan, retrieve and assemble one edit
    Run(RunArgs),
    /// List presets and their defaults
    Presets(PresetsArgs),
    /// Upload videos into a collection and index them for search
    Ingest(IngestArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Editing instruction, e.g. "Create a 30-second highlight reel"
    #[arg(required = true)]
    instruction: Vec<String>,

    /// VideoDB collection to search
    #[arg(short, long, env = "VIBECUT_COLLECTION", value_name = "ID")]
    collection: String,

    /// Restrict the search to this video (repeatable)
    #[arg(long = "video", value_name = "ID")]
    videos: Vec<String>,

    /// highlights, reels or custom
    #[arg(short, long, default_value = "highlights")]
    preset: String,

    /// Target duration in seconds (overrides the instruction and preset)
    #[arg(short, long, value_name = "SECS")]
    duration: Option<f64>,

    /// Visual theme passed to the assembler
    #[arg(long, value_name = "TEXT")]
    theme: Option<String>,

    /// Minimum clip relevance in [0, 1] (overrides VIBECUT_MIN_RELEVANCE)
    #[arg(long, value_name = "F")]
    min_relevance: Option<f64>,

    /// Per-stage timeout in seconds (overrides VIBECUT_STAGE_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    stage_timeout: Option<f64>,

    /// Retries for transient planner and search failures
    #[arg(long, default_value_t = 0)]
    retries: usize,

    /// Render a short preview of the first clips only
    #[arg(long)]
    preview: bool,

    /// Print the full outcome (plan, selection, output) as JSON
    #[arg(long)]
    json: bool,

    /// When using --json, write output to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// When using --json, pretty-print (multi-line)
    #[arg(long)]
    pretty: bool,

    /// Print stage progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::Args, Debug)]
struct PresetsArgs {
    #[arg(long)]
    json: bool,
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::Args, Debug)]
struct IngestArgs {
    /// Video URLs to upload
    #[arg(required = true)]
    urls: Vec<String>,

    #[arg(short, long, env = "VIBECUT_COLLECTION", value_name = "ID")]
    collection: String,

    /// spoken or scene
    #[arg(long, default_value = "spoken")]
    index: String,

    /// Prompt for scene indexing
    #[arg(long, value_name = "TEXT")]
    scene_prompt: Option<String>,

    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn options(&self) -> RunOptions {
        RunOptions {
            instruction: self.instruction.join(" "),
            collection: self.collection.clone(),
            videos: self.videos.clone(),
            preset: self.preset.clone(),
            duration: self.duration,
            theme: self.theme.clone(),
            min_relevance: self.min_relevance,
            stage_timeout: self.stage_timeout,
            retries: self.retries,
            preview: self.preview,
        }
    }
}

async fn run(args: RunArgs) -> Result<(), CliError> {
    let opts = args.options();
    cli::build_request(&opts)?;
    let settings = Settings::from_env()?;

    let (events, printer) = if args.verbose {
        let (tx, mut rx) = mpsc::channel::<PipelineEvent>(16);
        let printer = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                eprintln!("{}", event.status_line());
            }
        });
        (Some(tx), Some(printer))
    } else {
        (None, None)
    };

    let result = cli::run_edit(&settings, &opts, events).await;
    if let Some(printer) = printer {
        let _ = printer.await;
    }
    let outcome = result?;

    if args.json {
        let value = serde_json::to_value(&outcome)?;
        write_json(&value, args.file.as_deref(), args.pretty)?;
    } else {
        println!("{}", format_outcome(&outcome));
    }
    Ok(())
}

async fn ingest(args: IngestArgs) -> Result<(), CliError> {
    let settings = Settings::from_env()?;
    let opts = IngestOptions {
        collection: args.collection,
        urls: args.urls,
        index: args.index,
        scene_prompt: args.scene_prompt,
    };
    let report = cli::ingest(&settings, &opts).await?;
    if args.json {
        write_json(&serde_json::to_value(&report)?, None, false)?;
    } else if !report.uploaded.is_empty() {
        println!("{}", format_ingest(&report));
    }
    if !report.is_complete() {
        eprintln!("{}", format_ingest_failures(&report));
    }
    report.into_result()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("vibecut", None::<&std::path::Path>).ok();
    let log_guard = logging::init()?;

    let args = Args::parse();
    let result = match args.cmd {
        Command::Run(a) => run(a).await,
        Command::Presets(a) => {
            if a.json {
                write_json(&presets_json(), None, a.pretty)
            } else {
                println!("{}", format_presets());
                Ok(())
            }
        }
        Command::Ingest(a) => ingest(a).await,
    };
    if let Err(e) = result {
        tracing::error!(error = %e, "vibecut failed");
        eprintln!("vibecut: {}", e);
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}
