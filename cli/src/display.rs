//! Text and JSON rendering for run results, presets and ingests.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::json;
use vibecut::{EditOutcome, Preset};

use crate::run::IngestReport;
use crate::CliError;

/// Multi-line summary: output URI and length, then one line per planned intent.
pub fn format_outcome(outcome: &EditOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Output: {}", outcome.output.uri);
    let _ = writeln!(
        out,
        "Duration: {} ({} clips, {})",
        outcome.output.formatted_duration(),
        outcome.output.clip_count,
        outcome.output.format.as_str()
    );
    let _ = writeln!(
        out,
        "Plan: {} intents, target {:.0}s ({})",
        outcome.plan.len(),
        outcome.plan.target_duration(),
        outcome.plan.preset()
    );
    for (index, intent) in outcome.plan.intents().iter().enumerate() {
        let clips = outcome
            .selection
            .clips()
            .iter()
            .filter(|s| s.intent_index == index)
            .count();
        let _ = writeln!(
            out,
            "  {}. {:<10} {:>5.1}s  {} ({} clips)",
            index + 1,
            intent.kind.as_str(),
            intent.duration,
            intent.description,
            clips
        );
    }
    let _ = write!(out, "Run: {}", outcome.run_id);
    out
}

pub fn format_presets() -> String {
    let mut out = String::new();
    for preset in Preset::ALL {
        let cfg = preset.config();
        let _ = writeln!(out, "{} ({})", preset, cfg.name);
        let _ = writeln!(out, "  {}", cfg.description);
        let _ = writeln!(
            out,
            "  duration {:.0}s, max {} clips, {:?} transitions, {} aspect",
            cfg.default_duration, cfg.max_clips, cfg.transition, cfg.aspect_ratio
        );
    }
    out.trim_end().to_string()
}

/// `[{ "preset": "highlights", "name": ..., ... }]`
pub fn presets_json() -> serde_json::Value {
    Preset::ALL
        .iter()
        .map(|preset| {
            let mut value = json!(preset.config());
            if let Some(obj) = value.as_object_mut() {
                obj.insert("preset".to_string(), json!(preset.as_str()));
            }
            value
        })
        .collect()
}

/// One `url -> video_id` line per uploaded video.
pub fn format_ingest(report: &IngestReport) -> String {
    report
        .uploaded
        .iter()
        .map(|v| format!("{} -> {}", v.url, v.video_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `url: error` line per failed video.
pub fn format_ingest_failures(report: &IngestReport) -> String {
    report
        .failed
        .iter()
        .map(|f| format!("{}: {}", f.url, f.error))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes JSON to stdout or to `file`. Pretty is multi-line; otherwise one line.
pub fn write_json(
    value: &serde_json::Value,
    file: Option<&Path>,
    pretty: bool,
) -> Result<(), CliError> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", s))?,
        None => {
            println!("{}", s);
            std::io::Write::flush(&mut std::io::stdout())?;
        }
    }
    Ok(())
}
