use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::preset::Preset;

/// Fixed enumeration of intent kinds the planner may emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    #[serde(alias = "opening")]
    Intro,
    Establishing,
    Highlight,
    Action,
    Reaction,
    Detail,
    #[serde(alias = "closing")]
    Outro,
}

impl IntentKind {
    pub const ALL: [IntentKind; 7] = [
        IntentKind::Intro,
        IntentKind::Establishing,
        IntentKind::Highlight,
        IntentKind::Action,
        IntentKind::Reaction,
        IntentKind::Detail,
        IntentKind::Outro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Intro => "intro",
            IntentKind::Establishing => "establishing",
            IntentKind::Highlight => "highlight",
            IntentKind::Action => "action",
            IntentKind::Reaction => "reaction",
            IntentKind::Detail => "detail",
            IntentKind::Outro => "outro",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the final edit the planner wants the intent to land. Carried on the plan and in
/// the outcome JSON; the timeline already follows plan order, so no stage reorders by it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentPosition {
    #[serde(alias = "beginning")]
    Start,
    Middle,
    End,
    #[default]
    Any,
}

/// One desired segment of the final edit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditIntent {
    pub kind: IntentKind,
    pub description: String,
    /// Seconds.
    pub duration: f64,
    #[serde(default)]
    pub position: IntentPosition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl EditIntent {
    pub fn new(kind: IntentKind, description: impl Into<String>, duration: f64) -> Self {
        Self {
            kind,
            description: description.into(),
            duration,
            position: IntentPosition::Any,
            tags: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: IntentPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Search text: description, then tags and preset keywords not already present
    /// (case-insensitive).
    pub fn search_query(&self, keywords: &[&str]) -> String {
        let mut query = self.description.trim().to_string();
        let extra = self
            .tags
            .iter()
            .map(String::as_str)
            .chain(keywords.iter().copied());
        for term in extra {
            let term = term.trim();
            if term.is_empty() || query.to_lowercase().contains(&term.to_lowercase()) {
                continue;
            }
            if !query.is_empty() {
                query.push(' ');
            }
            query.push_str(term);
        }
        query
    }
}

/// Ordered, non-empty list of intents for one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecutionPlan {
    preset: Preset,
    target_duration: f64,
    intents: Vec<EditIntent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

impl ExecutionPlan {
    /// Fails with `EmptyPlan` when `intents` is empty.
    pub fn new(
        preset: Preset,
        target_duration: f64,
        intents: Vec<EditIntent>,
        theme: Option<String>,
    ) -> Result<Self, EditError> {
        if intents.is_empty() {
            return Err(EditError::EmptyPlan);
        }
        Ok(Self {
            preset,
            target_duration,
            intents,
            theme,
        })
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    /// Seconds.
    pub fn target_duration(&self) -> f64 {
        self.target_duration
    }

    pub fn intents(&self) -> &[EditIntent] {
        &self.intents
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Plans are never empty; always false.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// Sum of intent durations in seconds.
    pub fn planned_duration(&self) -> f64 {
        self.intents.iter().map(|i| i.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_is_an_error() {
        let err = ExecutionPlan::new(Preset::Highlights, 30.0, Vec::new(), None).unwrap_err();
        assert!(matches!(err, EditError::EmptyPlan));
    }

    #[test]
    fn kind_accepts_aliases() {
        let k: IntentKind = serde_json::from_str("\"opening\"").unwrap();
        assert_eq!(k, IntentKind::Intro);
        let k: IntentKind = serde_json::from_str("\"closing\"").unwrap();
        assert_eq!(k, IntentKind::Outro);
        assert!(serde_json::from_str::<IntentKind>("\"montage\"").is_err());
    }

    #[test]
    fn search_query_appends_new_terms_only() {
        let intent = EditIntent::new(IntentKind::Highlight, "best goal of the match", 10.0)
            .with_tags(["goal", "crowd"]);
        let q = intent.search_query(&["best", "key moment"]);
        assert_eq!(q, "best goal of the match crowd key moment");
    }

    #[test]
    fn position_defaults_to_any() {
        let intent: EditIntent =
            serde_json::from_str(r#"{"kind":"detail","description":"d","duration":2.0}"#).unwrap();
        assert_eq!(intent.position, IntentPosition::Any);
        assert!(intent.tags.is_empty());
    }

    #[test]
    fn planned_duration_sums_intents() {
        let plan = ExecutionPlan::new(
            Preset::Reels,
            30.0,
            vec![
                EditIntent::new(IntentKind::Intro, "a", 10.0),
                EditIntent::new(IntentKind::Outro, "b", 20.0),
            ],
            None,
        )
        .unwrap();
        assert_eq!(plan.len(), 2);
        assert!((plan.planned_duration() - 30.0).abs() < 1e-9);
    }
}
