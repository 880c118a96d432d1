//! Planner prompt text.

use std::fmt::Write as _;

use crate::model::{EditRequest, IntentKind};
use crate::preset::PresetConfig;

pub const PLANNER_SYSTEM_PROMPT: &str = "\
You are a video editing planner. Analyze the user's request and the available clips and \
produce an ordered edit plan: a narrative structure (intro, main content, conclusion) \
where every section names what footage to search for and how long it should run.

Reply with a single JSON object and nothing else:
{
  \"target_duration\": <total seconds, number>,
  \"intents\": [
    {
      \"kind\": <one of the allowed kinds>,
      \"description\": <what the clip should show, used as a semantic search query>,
      \"duration\": <seconds, number greater than zero>,
      \"position\": \"start\" | \"middle\" | \"end\" | \"any\",
      \"tags\": [<short search keywords>]
    }
  ]
}
Intents are listed in playback order. Durations should add up to target_duration.";

/// Renders the user prompt: request, clip count, preset settings and the duration to aim for.
pub fn render_planner_prompt(
    request: &EditRequest,
    preset: &PresetConfig,
    target_duration: f64,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User Request: {}", request.instruction.trim());
    match request.collection.video_ids.len() {
        0 => {
            let _ = writeln!(
                out,
                "Available Clips: every video in collection {}",
                request.collection.id
            );
        }
        n => {
            let _ = writeln!(out, "Available Clips: {} videos uploaded", n);
        }
    }
    let _ = writeln!(out, "Preset Type: {} ({})", preset.name, preset.description);
    let _ = writeln!(out, "Target Duration: {:.0} seconds", target_duration);
    let _ = writeln!(out, "Maximum Sections: {}", preset.max_clips);
    let _ = writeln!(
        out,
        "Pacing: {:?}; Transition: {:?}; Aspect Ratio: {}",
        preset.pacing, preset.transition, preset.aspect_ratio
    );
    if let Some(theme) = request.theme.as_deref() {
        let _ = writeln!(out, "Theme: {}", theme);
    }
    let kinds: Vec<&str> = IntentKind::ALL.iter().map(|k| k.as_str()).collect();
    let _ = write!(out, "Allowed kinds: {}", kinds.join(", "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CollectionRef;
    use crate::preset::Preset;

    #[test]
    fn prompt_names_clip_count_preset_and_duration() {
        let req = EditRequest::new(
            "Create a 30-second highlight reel",
            Preset::Highlights,
            CollectionRef::new("c1").with_videos(["a", "b", "c"]),
        )
        .with_theme("sunset");
        let p = render_planner_prompt(&req, Preset::Highlights.config(), 30.0);
        assert!(p.contains("User Request: Create a 30-second highlight reel"));
        assert!(p.contains("3 videos uploaded"));
        assert!(p.contains("Preset Type: Highlights"));
        assert!(p.contains("Target Duration: 30 seconds"));
        assert!(p.contains("Theme: sunset"));
        assert!(p.contains("establishing"));
    }
}
