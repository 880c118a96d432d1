//! Retriever: plan → [`SelectionSet`], one search per intent in plan order.
//!
//! Candidates are range-checked, filtered by `min_relevance`, ranked by score (ties: earliest
//! start, then video id) and taken greedily: clips overlapping an earlier pick are skipped, the
//! last pick is trimmed to the time the intent still needs, and at most
//! `max_clips_per_intent` clips are taken. Any failing intent fails the whole retrieval.

mod in_memory;
mod search;

use std::cmp::Ordering;
use std::sync::Arc;

use config::Settings;
use tracing::{debug, info};

use crate::error::{CollaboratorError, EditError, Stage};
use crate::model::{
    ClipCandidate, CollectionRef, EditIntent, ExecutionPlan, SelectedClip, SelectionSet,
};

pub use in_memory::{InMemoryIndex, VideoEntry};
pub use search::{SearchIndex, SearchQuery};

/// Remaining intent time below this counts as covered.
const COVERED_EPSILON: f64 = 1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct RetrieverConfig {
    /// Candidates scoring below this are discarded. In `[0, 1]`.
    pub min_relevance: f64,
    /// Candidates requested per search.
    pub result_limit: usize,
    pub max_clips_per_intent: usize,
    /// Candidates shorter than this (seconds) are skipped.
    pub min_clip_duration: f64,
}

impl RetrieverConfig {
    pub fn new(min_relevance: f64) -> Self {
        Self {
            min_relevance,
            result_limit: 10,
            max_clips_per_intent: config::DEFAULT_MAX_CLIPS_PER_INTENT,
            min_clip_duration: 1.0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.min_relevance()).with_max_clips_per_intent(settings.max_clips_per_intent())
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit.max(1);
        self
    }

    pub fn with_max_clips_per_intent(mut self, n: usize) -> Self {
        self.max_clips_per_intent = n.max(1);
        self
    }

    pub fn with_min_clip_duration(mut self, seconds: f64) -> Self {
        self.min_clip_duration = seconds.max(0.0);
        self
    }
}

pub struct Retriever {
    index: Arc<dyn SearchIndex>,
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(index: Arc<dyn SearchIndex>, config: RetrieverConfig) -> Self {
        Self { index, config }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Selects clips for every intent of `plan`, preserving plan order.
    ///
    /// Errors: `InvalidIntent` (checked for all intents before any search), `ClipOutOfRange`,
    /// `NoMatch`, or `Collaborator` when a search fails.
    pub async fn retrieve(
        &self,
        plan: &ExecutionPlan,
        collection: &CollectionRef,
    ) -> Result<SelectionSet, EditError> {
        for (index, intent) in plan.intents().iter().enumerate() {
            validate_intent(index, intent)?;
        }
        let keywords = plan.preset().config().search_keywords;

        let mut selected: Vec<SelectedClip> = Vec::new();
        for (index, intent) in plan.intents().iter().enumerate() {
            let query = SearchQuery {
                collection: collection.clone(),
                text: intent.search_query(keywords),
                limit: self.config.result_limit,
            };
            debug!(intent = index, kind = %intent.kind, query = %query.text, "retriever: search");
            let candidates = self
                .index
                .search(&query)
                .await
                .map_err(EditError::collaborator(Stage::Retriever))?;
            let returned = candidates.len();
            let ranked = self.rank(candidates, collection)?;
            let picks = self.pick(index, intent, ranked, &selected);
            if picks.is_empty() {
                return Err(EditError::NoMatch {
                    index,
                    description: intent.description.clone(),
                    min_relevance: self.config.min_relevance,
                });
            }
            debug!(
                intent = index,
                returned,
                picked = picks.len(),
                "retriever: intent covered"
            );
            selected.extend(picks);
        }

        let selection = SelectionSet::new(selected);
        info!(
            clips = selection.len(),
            total_duration = selection.total_duration(),
            "retriever: selection ready"
        );
        Ok(selection)
    }

    /// Range check, relevance filter and ordering.
    fn rank(
        &self,
        candidates: Vec<ClipCandidate>,
        collection: &CollectionRef,
    ) -> Result<Vec<ClipCandidate>, EditError> {
        let mut kept = Vec::with_capacity(candidates.len());
        for c in candidates {
            if !c.lies_within_source() {
                return Err(EditError::ClipOutOfRange {
                    video_id: c.video_id,
                    start: c.range.start(),
                    end: c.range.end(),
                    source_duration: c.source_duration,
                });
            }
            if !(0.0..=1.0).contains(&c.score) {
                return Err(EditError::Collaborator {
                    stage: Stage::Retriever,
                    source: CollaboratorError::MalformedResponse(format!(
                        "relevance {} for {} is outside [0, 1]",
                        c.score, c.video_id
                    )),
                });
            }
            if c.score >= self.config.min_relevance && collection.includes(&c.video_id) {
                kept.push(c);
            }
        }
        kept.sort_by(compare_candidates);
        Ok(kept)
    }

    /// Greedy selection for one intent against everything picked so far.
    fn pick(
        &self,
        index: usize,
        intent: &EditIntent,
        ranked: Vec<ClipCandidate>,
        earlier: &[SelectedClip],
    ) -> Vec<SelectedClip> {
        let mut remaining = intent.duration;
        let mut picks: Vec<SelectedClip> = Vec::new();
        for candidate in ranked {
            if picks.len() >= self.config.max_clips_per_intent || remaining <= COVERED_EPSILON {
                break;
            }
            if candidate.duration() < self.config.min_clip_duration {
                continue;
            }
            let overlaps = earlier.iter().chain(picks.iter()).any(|s| {
                s.clip.video_id == candidate.video_id && s.clip.range.overlaps(&candidate.range)
            });
            if overlaps {
                continue;
            }
            let Some(clip) = candidate.trimmed_to(remaining) else {
                continue;
            };
            remaining -= clip.duration();
            picks.push(SelectedClip {
                intent_index: index,
                clip,
            });
        }
        picks
    }
}

fn validate_intent(index: usize, intent: &EditIntent) -> Result<(), EditError> {
    if !intent.duration.is_finite() || intent.duration <= 0.0 {
        return Err(EditError::InvalidIntent {
            index,
            reason: format!("duration must be positive, got {}", intent.duration),
        });
    }
    Ok(())
}

/// Score descending, then earliest start, then video id.
fn compare_candidates(a: &ClipCandidate, b: &ClipCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.range.start().total_cmp(&b.range.start()))
        .then_with(|| a.video_id.cmp(&b.video_id))
}
