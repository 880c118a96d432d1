//! Deterministic in-process search index for tests and offline runs.
//!
//! Segments are scored by keyword overlap: the share of a segment's words (three letters or
//! more) that also appear in the query. Segments added with a fixed score match every query.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::model::{ClipCandidate, TimeRange};
use crate::retriever::search::{SearchIndex, SearchQuery};

#[derive(Clone, Debug)]
enum Scoring {
    Text(BTreeSet<String>),
    Fixed(f64),
}

#[derive(Clone, Debug)]
struct Segment {
    start: f64,
    end: f64,
    scoring: Scoring,
}

/// One source video and its indexed segments.
#[derive(Clone, Debug)]
pub struct VideoEntry {
    id: String,
    duration: f64,
    segments: Vec<Segment>,
}

impl VideoEntry {
    pub fn new(id: impl Into<String>, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration,
            segments: Vec::new(),
        }
    }

    /// Segment matched by keyword overlap with `text`.
    pub fn segment(mut self, start: f64, end: f64, text: &str) -> Self {
        self.segments.push(Segment {
            start,
            end,
            scoring: Scoring::Text(tokens(text)),
        });
        self
    }

    /// Segment returned for every query with `score`.
    pub fn scored_segment(mut self, start: f64, end: f64, score: f64) -> Self {
        self.segments.push(Segment {
            start,
            end,
            scoring: Scoring::Fixed(score),
        });
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(str::to_lowercase)
        .collect()
}

#[derive(Default)]
pub struct InMemoryIndex {
    collections: HashMap<String, Vec<VideoEntry>>,
    failure: Option<CollaboratorError>,
    fail_first: usize,
    searches: AtomicUsize,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, collection_id: impl Into<String>, video: VideoEntry) -> Self {
        self.collections
            .entry(collection_id.into())
            .or_default()
            .push(video);
        self
    }

    /// Fails the first `times` searches with `error`.
    pub fn failing_first(mut self, times: usize, error: CollaboratorError) -> Self {
        self.failure = Some(error);
        self.fail_first = times;
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndex for InMemoryIndex {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ClipCandidate>, CollaboratorError> {
        let n = self.searches.fetch_add(1, Ordering::SeqCst);
        if let Some(ref err) = self.failure {
            if n < self.fail_first {
                return Err(err.clone());
            }
        }
        let videos = self.collections.get(&query.collection.id).ok_or_else(|| {
            CollaboratorError::Rejected(format!("unknown collection {}", query.collection.id))
        })?;
        let query_tokens = tokens(&query.text);

        let mut out: Vec<ClipCandidate> = videos
            .iter()
            .filter(|v| query.collection.includes(&v.id))
            .flat_map(|v| {
                v.segments.iter().filter_map(|s| {
                    let score = match &s.scoring {
                        Scoring::Fixed(score) => *score,
                        Scoring::Text(words) if words.is_empty() => 0.0,
                        Scoring::Text(words) => {
                            words.intersection(&query_tokens).count() as f64 / words.len() as f64
                        }
                    };
                    if score <= 0.0 {
                        return None;
                    }
                    let range = TimeRange::new(s.start, s.end)?;
                    Some(ClipCandidate::new(v.id.clone(), range, score, v.duration))
                })
            })
            .collect();
        out.sort_by(|a, b| b.score.total_cmp(&a.score));
        out.truncate(query.limit);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CollectionRef;

    fn query(text: &str) -> SearchQuery {
        SearchQuery {
            collection: CollectionRef::new("c1"),
            text: text.to_string(),
            limit: 10,
        }
    }

    #[tokio::test]
    async fn scores_by_segment_word_overlap() {
        let index = InMemoryIndex::new().with_video(
            "c1",
            VideoEntry::new("v1", 60.0)
                .segment(0.0, 5.0, "crowd cheering loudly")
                .segment(10.0, 20.0, "empty parking lot"),
        );
        let out = index.search(&query("crowd cheering in the stadium")).await.unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0].score - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(out[0].source_duration, 60.0);
    }

    #[tokio::test]
    async fn respects_video_restriction_and_limit() {
        let index = InMemoryIndex::new()
            .with_video("c1", VideoEntry::new("v1", 30.0).scored_segment(0.0, 5.0, 0.9))
            .with_video("c1", VideoEntry::new("v2", 30.0).scored_segment(0.0, 5.0, 0.8));
        let mut q = query("anything");
        q.collection = CollectionRef::new("c1").with_videos(["v2"]);
        let out = index.search(&q).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].video_id, "v2");

        let mut q = query("anything");
        q.limit = 1;
        assert_eq!(index.search(&q).await.unwrap()[0].video_id, "v1");
    }

    #[tokio::test]
    async fn unknown_collection_is_rejected() {
        let index = InMemoryIndex::new();
        let err = index.search(&query("x")).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Rejected(_)));
    }
}
