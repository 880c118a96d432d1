//! Data model passed between stages. All values are immutable once constructed.

mod clip;
mod output;
mod plan;
mod request;

pub use clip::{ClipCandidate, SelectedClip, SelectionSet, TimeRange};
pub use output::{OutputVideo, VideoFormat};
pub use plan::{EditIntent, ExecutionPlan, IntentKind, IntentPosition};
pub use request::{CollectionRef, EditRequest};
