//! Retrieval orchestrator.
//!
//! Runs the ordered tier cascade (vector, full-text, substring) for fast
//! searches and the summary path for comprehensive ones, with a TTL
//! result cache in front of everything.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{Clock, EmbeddingCache, ResultCache, SystemClock};
use crate::config::RetrievalConfig;
use crate::error::{LecternError, LecternResult};
use crate::traits::{DocumentStore, Embedder};
use crate::types::{Retrieval, SearchHit, SearchMode, SearchRequest};

use super::tiers::{FulltextTier, SubstringTier, SummaryTier, Tier, VectorTier};

/// Orchestrates tiered retrieval over a document store.
///
/// Tier errors are contained: a failure inside any tier degrades that
/// tier to zero results and the cascade continues. Only infrastructure
/// errors (store unreachable) propagate to the caller.
pub struct RetrievalService {
    results: ResultCache,
    config: RetrievalConfig,
    fast_tiers: Vec<Box<dyn Tier>>,
    summary_tier: SummaryTier,
}

impl RetrievalService {
    /// Create a service over a store and an embedding provider.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn Embedder>,
        config: RetrievalConfig,
    ) -> Self {
        Self::with_clock(store, embedder, config, Arc::new(SystemClock))
    }

    /// Create a service with an injected clock, for deterministic TTL
    /// behavior in tests.
    pub fn with_clock(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn Embedder>,
        config: RetrievalConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let embeddings = Arc::new(EmbeddingCache::with_limits(
            embedder,
            Arc::clone(&clock),
            config.embedding_ttl(),
            config.cache_capacity,
        ));
        Self::with_embedding_cache(store, embeddings, config, clock)
    }

    /// Create a service sharing an existing embedding cache.
    pub fn with_embedding_cache(
        store: Arc<dyn DocumentStore>,
        embeddings: Arc<EmbeddingCache>,
        config: RetrievalConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let fast_tiers: Vec<Box<dyn Tier>> = vec![
            Box::new(VectorTier::new(
                Arc::clone(&store),
                embeddings,
                config.excerpt_max_len,
            )),
            Box::new(FulltextTier::new(
                Arc::clone(&store),
                config.excerpt_max_len,
            )),
            Box::new(SubstringTier::new(
                Arc::clone(&store),
                config.substring_sample_limit,
                config.excerpt_max_len,
            )),
        ];
        let summary_tier = SummaryTier::new(store, config.excerpt_max_len);

        Self {
            results: ResultCache::with_limits(clock, config.result_ttl(), config.cache_capacity),
            config,
            fast_tiers,
            summary_tier,
        }
    }

    /// Run a search, consulting the result cache first.
    ///
    /// Fast mode walks the tier cascade and stops at the first tier that
    /// produces any results. Comprehensive mode requires a narrowed scope
    /// (explicit articles or a collection) and returns one entry per
    /// document, built from stored summaries.
    pub async fn search(&self, request: &SearchRequest) -> LecternResult<Retrieval> {
        if let Some(cached) = self.results.get(request) {
            debug!(query = %request.query, "result cache hit");
            return Ok(cached);
        }

        let hits = match request.mode {
            SearchMode::Fast => self.run_cascade(request).await?,
            SearchMode::Comprehensive => {
                if !request.scope.is_narrowed() {
                    warn!(
                        owner = %request.scope.owner_id,
                        "comprehensive search without article or collection scope"
                    );
                    return Ok(Retrieval::empty());
                }
                self.run_tier(&self.summary_tier, request).await?
            }
        };

        let retrieval = Self::format(hits);
        self.results.insert(request, retrieval.clone());
        Ok(retrieval)
    }

    /// Clear the result cache. Callers invalidate after document writes.
    pub fn invalidate_results(&self) {
        self.results.clear();
    }

    async fn run_cascade(&self, request: &SearchRequest) -> LecternResult<Vec<SearchHit>> {
        for tier in &self.fast_tiers {
            let hits = self.run_tier(tier.as_ref(), request).await?;
            if !hits.is_empty() {
                debug!(tier = tier.name(), count = hits.len(), "tier produced results");
                return Ok(hits);
            }
            debug!(tier = tier.name(), "tier empty, falling through");
        }
        Ok(Vec::new())
    }

    /// Run one tier under the configured deadline, containing tier-local
    /// failures as empty results.
    async fn run_tier(
        &self,
        tier: &dyn Tier,
        request: &SearchRequest,
    ) -> LecternResult<Vec<SearchHit>> {
        let deadline = self.config.tier_timeout();
        let outcome = tokio::time::timeout(deadline, tier.attempt(request)).await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(LecternError::timeout(
                format!("{} tier exceeded deadline", tier.name()),
                deadline.as_millis() as u64,
            )),
        };

        match result {
            Ok(hits) => Ok(hits),
            Err(e) if e.is_tier_local() => {
                warn!(tier = tier.name(), error = %e, "tier failed, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Render hits into the prompt-ready documents block.
    ///
    /// Each hit becomes a numbered block of the form
    /// `[n] title (domain)` followed by the excerpt, blocks separated by
    /// a blank line.
    fn format(hits: Vec<SearchHit>) -> Retrieval {
        let documents = hits
            .iter()
            .enumerate()
            .map(|(i, hit)| format!("[{}] {} ({})\n{}", i + 1, hit.title, hit.domain, hit.excerpt))
            .collect::<Vec<_>>()
            .join("\n\n");

        Retrieval {
            documents,
            sources: hits,
        }
    }
}
