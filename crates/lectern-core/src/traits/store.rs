//! Document store trait and related types.
//!
//! The [`DocumentStore`] trait is the seam between the retrieval subsystem
//! and the owning application's relational store. Every read takes a
//! [`Scope`] and must apply its clause list in order (owner first,
//! soft-delete exclusion second), so tenant isolation and soft-delete
//! invisibility hold in every backend identically.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LecternResult;
use crate::types::{DocumentMeta, EntityKind, Scope};

/// A candidate chunk returned from vector or full-text search.
///
/// Carries enough document context to build a
/// [`SearchHit`](crate::types::SearchHit) without a second round-trip.
/// `score` is method-scaled: raw vector distance for
/// [`vector_search_chunks`](DocumentStore::vector_search_chunks)
/// (lower is better), lexical rank for
/// [`fulltext_search_chunks`](DocumentStore::fulltext_search_chunks)
/// (higher is better).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMatch {
    /// Parent article.
    pub article_id: String,
    /// Article title.
    pub title: String,
    /// Article domain.
    pub domain: String,
    /// Chunk text.
    pub content: String,
    /// Method-scaled raw score.
    pub score: f32,
}

/// A document with its full body text, for substring scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentBody {
    /// Document metadata.
    pub meta: DocumentMeta,
    /// Full body text.
    pub body: String,
}

/// A keyword hit on an entity (article or concept).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntityHit {
    /// Entity identifier.
    pub id: String,
    /// Display title (article title or concept term).
    pub title: String,
    /// Whether the match landed on the primary field (title/term) rather
    /// than a secondary field (body/definition).
    pub primary_match: bool,
}

/// A vector hit on an entity (article or concept).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntityHit {
    /// Entity identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Cosine similarity in `[0, 1]`.
    pub similarity: f32,
}

/// Abstract document store for the retrieval subsystem.
///
/// All operations are async (via `async-trait`) and `Send + Sync`.
/// Implementations must never return documents outside the scope's owner
/// or documents with `deleted_at` set.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Rank chunks in scope by ascending vector distance to `query_vec`.
    async fn vector_search_chunks(
        &self,
        query_vec: &[f32],
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<ChunkMatch>>;

    /// Lexical rank query over chunks in scope.
    ///
    /// Candidates failing the match predicate are excluded, not merely
    /// down-ranked. Results are ordered by rank descending.
    async fn fulltext_search_chunks(
        &self,
        terms: &[String],
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<ChunkMatch>>;

    /// The most recently saved documents in scope, with bodies, for the
    /// substring tier's bounded candidate sample.
    async fn recent_documents(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<DocumentBody>>;

    /// Every document in scope (metadata only), for comprehensive mode.
    async fn documents_in_scope(&self, scope: &Scope) -> LecternResult<Vec<DocumentMeta>>;

    /// Keyword search over one entity kind, reporting which field matched.
    async fn keyword_search_entities(
        &self,
        kind: EntityKind,
        query: &str,
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<KeywordEntityHit>>;

    /// Vector search over one entity kind.
    async fn vector_search_entities(
        &self,
        kind: EntityKind,
        query_vec: &[f32],
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<VectorEntityHit>>;
}
