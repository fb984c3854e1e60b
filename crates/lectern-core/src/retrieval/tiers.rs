//! Retrieval tier strategies.
//!
//! Each tier exposes one `attempt` operation; the orchestrator iterates
//! the ordered tier list and stops at the first non-empty result, which
//! keeps the fallback invariant in one place instead of per branch.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::EmbeddingCache;
use crate::error::LecternResult;
use crate::excerpt;
use crate::traits::DocumentStore;
use crate::types::{SearchHit, SearchRequest};

/// Fixed similarity reported by the substring tier. A calibration
/// constant from the original system: deliberately lower than any real
/// ranking signal so substring hits never outrank scored ones.
pub const SUBSTRING_SIMILARITY: f32 = 0.1;

/// Fixed similarity reported in summary mode. The caller explicitly
/// selected these documents, so they are unconditionally relevant.
pub const SUMMARY_SIMILARITY: f32 = 1.0;

/// A single retrieval strategy.
#[async_trait]
pub trait Tier: Send + Sync {
    /// Tier name for logs.
    fn name(&self) -> &'static str;

    /// Run the strategy. An empty vec means "no results here, fall
    /// through"; errors are classified by the orchestrator.
    async fn attempt(&self, request: &SearchRequest) -> LecternResult<Vec<SearchHit>>;
}

/// Vector tier: rank chunks by ascending embedding distance.
pub struct VectorTier {
    store: Arc<dyn DocumentStore>,
    embeddings: Arc<EmbeddingCache>,
    excerpt_max_len: usize,
}

impl VectorTier {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        embeddings: Arc<EmbeddingCache>,
        excerpt_max_len: usize,
    ) -> Self {
        Self {
            store,
            embeddings,
            excerpt_max_len,
        }
    }
}

#[async_trait]
impl Tier for VectorTier {
    fn name(&self) -> &'static str {
        "vector"
    }

    async fn attempt(&self, request: &SearchRequest) -> LecternResult<Vec<SearchHit>> {
        let query_vec = self.embeddings.get_or_create(&request.query).await?;
        let matches = self
            .store
            .vector_search_chunks(&query_vec, &request.scope, request.top_k)
            .await?;

        Ok(matches
            .into_iter()
            .map(|m| SearchHit {
                excerpt: excerpt::extract(&m.content, &request.query, self.excerpt_max_len),
                article_id: m.article_id,
                title: m.title,
                domain: m.domain,
                // Store reports raw distance; invert to a similarity.
                similarity: 1.0 - m.score,
                content: m.content,
            })
            .collect())
    }
}

/// Full-text tier: lexical rank query that requires a match.
pub struct FulltextTier {
    store: Arc<dyn DocumentStore>,
    excerpt_max_len: usize,
}

impl FulltextTier {
    pub fn new(store: Arc<dyn DocumentStore>, excerpt_max_len: usize) -> Self {
        Self {
            store,
            excerpt_max_len,
        }
    }
}

#[async_trait]
impl Tier for FulltextTier {
    fn name(&self) -> &'static str {
        "fulltext"
    }

    async fn attempt(&self, request: &SearchRequest) -> LecternResult<Vec<SearchHit>> {
        let terms = excerpt::query_terms(&request.query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .store
            .fulltext_search_chunks(&terms, &request.scope, request.top_k)
            .await?;

        Ok(matches
            .into_iter()
            .map(|m| SearchHit {
                excerpt: excerpt::extract(&m.content, &request.query, self.excerpt_max_len),
                article_id: m.article_id,
                title: m.title,
                domain: m.domain,
                similarity: m.score,
                content: m.content,
            })
            .collect())
    }
}

/// Substring tier: last resort, case-insensitive containment scan over a
/// bounded sample of the most recent documents in scope.
pub struct SubstringTier {
    store: Arc<dyn DocumentStore>,
    sample_limit: usize,
    excerpt_max_len: usize,
}

impl SubstringTier {
    pub fn new(store: Arc<dyn DocumentStore>, sample_limit: usize, excerpt_max_len: usize) -> Self {
        Self {
            store,
            sample_limit,
            excerpt_max_len,
        }
    }
}

#[async_trait]
impl Tier for SubstringTier {
    fn name(&self) -> &'static str {
        "substring"
    }

    async fn attempt(&self, request: &SearchRequest) -> LecternResult<Vec<SearchHit>> {
        let docs = self
            .store
            .recent_documents(&request.scope, self.sample_limit)
            .await?;

        let needle = request.query.to_lowercase();
        let hits = docs
            .into_iter()
            .filter(|doc| doc.body.to_lowercase().contains(&needle))
            .take(request.top_k)
            .map(|doc| {
                let snippet = excerpt::extract(&doc.body, &request.query, self.excerpt_max_len);
                SearchHit {
                    article_id: doc.meta.id,
                    title: doc.meta.title,
                    domain: doc.meta.domain,
                    content: snippet.clone(),
                    excerpt: snippet,
                    similarity: SUBSTRING_SIMILARITY,
                }
            })
            .collect();

        Ok(hits)
    }
}

/// Summary tier: one hit per document in a narrowed scope, built from
/// the document's stored summary instead of chunk search.
pub struct SummaryTier {
    store: Arc<dyn DocumentStore>,
    excerpt_max_len: usize,
}

impl SummaryTier {
    pub fn new(store: Arc<dyn DocumentStore>, excerpt_max_len: usize) -> Self {
        Self {
            store,
            excerpt_max_len,
        }
    }
}

#[async_trait]
impl Tier for SummaryTier {
    fn name(&self) -> &'static str {
        "summary"
    }

    async fn attempt(&self, request: &SearchRequest) -> LecternResult<Vec<SearchHit>> {
        let docs = self.store.documents_in_scope(&request.scope).await?;

        Ok(docs
            .into_iter()
            .map(|doc| {
                let summary = doc.summary.unwrap_or_default();
                SearchHit {
                    article_id: doc.id,
                    title: doc.title,
                    domain: doc.domain,
                    // Truncated form of the summary; no term scoring.
                    excerpt: excerpt::extract(&summary, "", self.excerpt_max_len),
                    content: summary,
                    similarity: SUMMARY_SIMILARITY,
                }
            })
            .collect())
    }
}
