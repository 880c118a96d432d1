use async_trait::async_trait;

use crate::error::CollaboratorError;
use crate::model::{ClipCandidate, CollectionRef};

/// One semantic search against the index.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub collection: CollectionRef,
    pub text: String,
    /// Maximum candidates to return.
    pub limit: usize,
}

/// Search collaborator: ranked candidate ranges for a query.
///
/// Implementations return candidates in any order; the Retriever ranks them. Each candidate
/// carries the source video's length so its range can be checked.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ClipCandidate>, CollaboratorError>;
}
