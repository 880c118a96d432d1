use serde::Serialize;

/// Half-open time range `[start, end)` in seconds. `0 <= start < end`, both finite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// `None` when the bounds are not finite, `start` is negative, or `start >= end`.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (start.is_finite() && end.is_finite() && start >= 0.0 && start < end)
            .then_some(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// True when the ranges share more than a boundary point.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Same start, end pulled in so the duration is at most `max`. `None` if `max <= 0`.
    pub fn trimmed_to(&self, max: f64) -> Option<Self> {
        if self.duration() <= max {
            return Some(*self);
        }
        Self::new(self.start, self.start + max)
    }
}

/// A time range in a source video returned by the search collaborator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClipCandidate {
    pub video_id: String,
    pub range: TimeRange,
    /// Relevance in `[0, 1]`.
    pub score: f64,
    /// Length of the source video in seconds, as reported by the collaborator.
    pub source_duration: f64,
}

impl ClipCandidate {
    pub fn new(video_id: impl Into<String>, range: TimeRange, score: f64, source_duration: f64) -> Self {
        Self {
            video_id: video_id.into(),
            range,
            score,
            source_duration,
        }
    }

    /// Range ends at or before the source end (1 ms tolerance for float rounding).
    pub fn lies_within_source(&self) -> bool {
        self.source_duration.is_finite() && self.range.end() <= self.source_duration + 1e-3
    }

    pub fn duration(&self) -> f64 {
        self.range.duration()
    }

    /// Same clip with the range trimmed to at most `max` seconds.
    pub fn trimmed_to(&self, max: f64) -> Option<Self> {
        self.range.trimmed_to(max).map(|range| Self {
            range,
            ..self.clone()
        })
    }
}

/// A clip chosen for the intent at `intent_index` in the plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SelectedClip {
    pub intent_index: usize,
    pub clip: ClipCandidate,
}

/// Selected clips in plan order: intent indices never decrease.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SelectionSet {
    clips: Vec<SelectedClip>,
}

impl SelectionSet {
    /// Stable-sorts by intent index, so clips for one intent keep their given order.
    pub fn new(mut clips: Vec<SelectedClip>) -> Self {
        clips.sort_by_key(|c| c.intent_index);
        Self { clips }
    }

    pub fn clips(&self) -> &[SelectedClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Sum of clip durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.clip.duration()).sum()
    }

    /// Intent index of each clip, in order.
    pub fn intent_order(&self) -> Vec<usize> {
        self.clips.iter().map(|c| c.intent_index).collect()
    }

    /// First `n` clips.
    pub fn first(&self, n: usize) -> Self {
        Self {
            clips: self.clips.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: f64, e: f64) -> TimeRange {
        TimeRange::new(s, e).unwrap()
    }

    #[test]
    fn time_range_rejects_degenerate_bounds() {
        assert!(TimeRange::new(5.0, 5.0).is_none());
        assert!(TimeRange::new(6.0, 5.0).is_none());
        assert!(TimeRange::new(-1.0, 5.0).is_none());
        assert!(TimeRange::new(0.0, f64::NAN).is_none());
        assert!(TimeRange::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!range(0.0, 5.0).overlaps(&range(5.0, 9.0)));
        assert!(range(0.0, 5.0).overlaps(&range(4.9, 9.0)));
        assert!(range(2.0, 3.0).overlaps(&range(0.0, 10.0)));
    }

    #[test]
    fn trimmed_keeps_start() {
        let r = range(10.0, 20.0).trimmed_to(4.0).unwrap();
        assert_eq!((r.start(), r.end()), (10.0, 14.0));
        assert_eq!(range(10.0, 12.0).trimmed_to(4.0).unwrap(), range(10.0, 12.0));
        assert!(range(10.0, 12.0).trimmed_to(0.0).is_none());
    }

    #[test]
    fn within_source_check() {
        let inside = ClipCandidate::new("v", range(0.0, 30.0), 0.9, 30.0);
        let outside = ClipCandidate::new("v", range(25.0, 31.0), 0.9, 30.0);
        assert!(inside.lies_within_source());
        assert!(!outside.lies_within_source());
    }

    #[test]
    fn selection_set_sorts_by_intent_stably() {
        let c = |v: &str| ClipCandidate::new(v, range(0.0, 1.0), 0.9, 10.0);
        let set = SelectionSet::new(vec![
            SelectedClip { intent_index: 1, clip: c("b1") },
            SelectedClip { intent_index: 0, clip: c("a") },
            SelectedClip { intent_index: 1, clip: c("b2") },
        ]);
        assert_eq!(set.intent_order(), vec![0, 1, 1]);
        let ids: Vec<_> = set.clips().iter().map(|c| c.clip.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b1", "b2"]);
        assert!((set.total_duration() - 3.0).abs() < 1e-9);
        assert_eq!(set.first(2).len(), 2);
    }
}
