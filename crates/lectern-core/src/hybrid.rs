//! Hybrid entity ranking across keyword and vector signals.
//!
//! Ranks articles and concepts for navigation-style lookups: keyword
//! matches are weighted by which field they hit, vector similarity is
//! added on top, and a hit found by both signals is marked as such.

use std::collections::HashMap;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use tracing::warn;

use crate::cache::EmbeddingCache;
use crate::error::LecternResult;
use crate::traits::{DocumentStore, KeywordEntityHit, VectorEntityHit};
use crate::types::{EntityKind, HybridResults, Provenance, RankedEntity, Scope};

/// Weight of a keyword match on the primary field (title or term).
pub const KEYWORD_PRIMARY_WEIGHT: f32 = 1.0;

/// Weight of a keyword match on a secondary field (body or definition).
pub const KEYWORD_SECONDARY_WEIGHT: f32 = 0.5;

/// Multiplier applied to vector similarity before merging.
pub const VECTOR_WEIGHT: f32 = 1.0;

/// Ranks entities by combining keyword and vector search.
pub struct HybridRanker {
    store: Arc<dyn DocumentStore>,
    embeddings: Arc<EmbeddingCache>,
}

impl HybridRanker {
    pub fn new(store: Arc<dyn DocumentStore>, embeddings: Arc<EmbeddingCache>) -> Self {
        Self { store, embeddings }
    }

    /// Rank entities matching `query` within `scope`.
    ///
    /// `kind` restricts the ranking to one entity kind; `None` ranks
    /// concepts and articles together. Up to four store calls run
    /// concurrently (keyword and vector sub-queries per kind). Vector
    /// failures degrade the ranking to keyword-only rather than failing
    /// the call; keyword failures propagate.
    pub async fn search(
        &self,
        query: &str,
        kind: Option<EntityKind>,
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<HybridResults> {
        // One embedding shared by both entity kinds. A miss here turns
        // off the vector signal entirely.
        let query_vec = match self.embeddings.get_or_create(query).await {
            Ok(vec) => Some(vec),
            Err(e) => {
                warn!(error = %e, "embedding unavailable, ranking keyword-only");
                None
            }
        };

        let (concepts, articles) = tokio::join!(
            self.rank_kind(
                kind,
                EntityKind::Concept,
                query,
                query_vec.as_deref(),
                scope,
                limit
            ),
            self.rank_kind(
                kind,
                EntityKind::Article,
                query,
                query_vec.as_deref(),
                scope,
                limit
            ),
        );

        Ok(HybridResults {
            concepts: concepts?,
            articles: articles?,
        })
    }

    async fn rank_kind(
        &self,
        requested: Option<EntityKind>,
        kind: EntityKind,
        query: &str,
        query_vec: Option<&[f32]>,
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<RankedEntity>> {
        if requested.is_some_and(|r| r != kind) {
            return Ok(Vec::new());
        }

        // Both sub-queries for this kind are issued at once.
        let keyword_fut = self.store.keyword_search_entities(kind, query, scope, limit);
        let vector_fut = async {
            match query_vec {
                Some(vec) => self.store.vector_search_entities(kind, vec, scope, limit).await,
                None => Ok(Vec::new()),
            }
        };
        let (keyword_hits, vector_hits) = tokio::join!(keyword_fut, vector_fut);

        let keyword_hits = keyword_hits?;
        let vector_hits = match vector_hits {
            Ok(hits) => hits,
            Err(e) => {
                warn!(?kind, error = %e, "vector entity search failed, keyword-only");
                Vec::new()
            }
        };

        Ok(merge(keyword_hits, vector_hits, limit))
    }
}

/// Seed with keyword hits, fold in vector hits, sort, truncate.
fn merge(
    keyword_hits: Vec<KeywordEntityHit>,
    vector_hits: Vec<VectorEntityHit>,
    limit: usize,
) -> Vec<RankedEntity> {
    let mut merged: HashMap<String, RankedEntity> = HashMap::new();

    for hit in keyword_hits {
        let score = if hit.primary_match {
            KEYWORD_PRIMARY_WEIGHT
        } else {
            KEYWORD_SECONDARY_WEIGHT
        };
        merged.insert(
            hit.id.clone(),
            RankedEntity {
                id: hit.id,
                title: hit.title,
                score,
                provenance: Provenance::Keyword,
            },
        );
    }

    for hit in vector_hits {
        match merged.get_mut(&hit.id) {
            Some(entity) => {
                entity.score += VECTOR_WEIGHT * hit.similarity;
                entity.provenance = Provenance::Hybrid;
            }
            None => {
                merged.insert(
                    hit.id.clone(),
                    RankedEntity {
                        id: hit.id,
                        title: hit.title,
                        score: VECTOR_WEIGHT * hit.similarity,
                        provenance: Provenance::Vector,
                    },
                );
            }
        }
    }

    let mut ranked: Vec<RankedEntity> = merged.into_values().collect();
    // Stable order: score descending, then id ascending on ties.
    ranked.sort_by(|a, b| {
        OrderedFloat(b.score)
            .cmp(&OrderedFloat(a.score))
            .then_with(|| a.id.cmp(&b.id))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::cache::ManualClock;
    use crate::traits::Embedder;

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        async fn embed(&self, _text: &str) -> LecternResult<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "unit"
        }
    }

    fn embeddings() -> Arc<EmbeddingCache> {
        Arc::new(EmbeddingCache::new(
            Arc::new(UnitEmbedder),
            Arc::new(ManualClock::starting_now()),
        ))
    }

    /// Store whose keyword query only completes once the vector query
    /// for the same call has started. Resolves only if both sub-queries
    /// are in flight at the same time.
    #[derive(Default)]
    struct RendezvousStore {
        vector_started: Notify,
    }

    #[async_trait]
    impl crate::traits::DocumentStore for RendezvousStore {
        async fn vector_search_chunks(
            &self,
            _query_vec: &[f32],
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<crate::traits::ChunkMatch>> {
            Ok(Vec::new())
        }

        async fn fulltext_search_chunks(
            &self,
            _terms: &[String],
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<crate::traits::ChunkMatch>> {
            Ok(Vec::new())
        }

        async fn recent_documents(
            &self,
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<crate::traits::DocumentBody>> {
            Ok(Vec::new())
        }

        async fn documents_in_scope(
            &self,
            _scope: &Scope,
        ) -> LecternResult<Vec<crate::types::DocumentMeta>> {
            Ok(Vec::new())
        }

        async fn keyword_search_entities(
            &self,
            _kind: EntityKind,
            _query: &str,
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<KeywordEntityHit>> {
            self.vector_started.notified().await;
            Ok(vec![KeywordEntityHit {
                id: "e1".to_string(),
                title: "E1".to_string(),
                primary_match: true,
            }])
        }

        async fn vector_search_entities(
            &self,
            _kind: EntityKind,
            _query_vec: &[f32],
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<VectorEntityHit>> {
            self.vector_started.notify_one();
            Ok(Vec::new())
        }
    }

    /// Store counting keyword calls per entity kind.
    #[derive(Default)]
    struct KindCountingStore {
        concept_calls: AtomicUsize,
        article_calls: AtomicUsize,
    }

    #[async_trait]
    impl crate::traits::DocumentStore for KindCountingStore {
        async fn vector_search_chunks(
            &self,
            _query_vec: &[f32],
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<crate::traits::ChunkMatch>> {
            Ok(Vec::new())
        }

        async fn fulltext_search_chunks(
            &self,
            _terms: &[String],
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<crate::traits::ChunkMatch>> {
            Ok(Vec::new())
        }

        async fn recent_documents(
            &self,
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<crate::traits::DocumentBody>> {
            Ok(Vec::new())
        }

        async fn documents_in_scope(
            &self,
            _scope: &Scope,
        ) -> LecternResult<Vec<crate::types::DocumentMeta>> {
            Ok(Vec::new())
        }

        async fn keyword_search_entities(
            &self,
            kind: EntityKind,
            _query: &str,
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<KeywordEntityHit>> {
            let counter = match kind {
                EntityKind::Concept => &self.concept_calls,
                EntityKind::Article => &self.article_calls,
            };
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![KeywordEntityHit {
                id: format!("{:?}", kind).to_lowercase(),
                title: format!("{:?}", kind),
                primary_match: true,
            }])
        }

        async fn vector_search_entities(
            &self,
            _kind: EntityKind,
            _query_vec: &[f32],
            _scope: &Scope,
            _limit: usize,
        ) -> LecternResult<Vec<VectorEntityHit>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_keyword_and_vector_sub_queries_run_concurrently() {
        let ranker = HybridRanker::new(Arc::new(RendezvousStore::default()), embeddings());

        let results = tokio::time::timeout(
            Duration::from_secs(5),
            ranker.search("e1", Some(EntityKind::Article), &Scope::owner("u1"), 10),
        )
        .await
        .expect("sub-queries must not serialize")
        .unwrap();

        assert_eq!(results.articles.len(), 1);
        assert_eq!(results.articles[0].id, "e1");
    }

    #[tokio::test]
    async fn test_kind_selector_skips_the_other_kind() {
        let store = Arc::new(KindCountingStore::default());
        let ranker = HybridRanker::new(Arc::clone(&store) as Arc<dyn DocumentStore>, embeddings());

        let results = ranker
            .search("q", Some(EntityKind::Concept), &Scope::owner("u1"), 10)
            .await
            .unwrap();

        assert_eq!(results.concepts.len(), 1);
        assert!(results.articles.is_empty());
        assert_eq!(store.concept_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.article_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_kind_ranks_both() {
        let store = Arc::new(KindCountingStore::default());
        let ranker = HybridRanker::new(Arc::clone(&store) as Arc<dyn DocumentStore>, embeddings());

        let results = ranker
            .search("q", None, &Scope::owner("u1"), 10)
            .await
            .unwrap();

        assert_eq!(results.concepts.len(), 1);
        assert_eq!(results.articles.len(), 1);
    }

    fn kw(id: &str, primary: bool) -> KeywordEntityHit {
        KeywordEntityHit {
            id: id.to_string(),
            title: id.to_uppercase(),
            primary_match: primary,
        }
    }

    fn vec_hit(id: &str, similarity: f32) -> VectorEntityHit {
        VectorEntityHit {
            id: id.to_string(),
            title: id.to_uppercase(),
            similarity,
        }
    }

    #[test]
    fn test_primary_outranks_secondary() {
        let ranked = merge(vec![kw("a", false), kw("b", true)], vec![], 10);
        assert_eq!(ranked[0].id, "b");
        assert_eq!(ranked[0].score, KEYWORD_PRIMARY_WEIGHT);
        assert_eq!(ranked[1].score, KEYWORD_SECONDARY_WEIGHT);
    }

    #[test]
    fn test_overlap_becomes_hybrid_with_summed_score() {
        let ranked = merge(vec![kw("a", true)], vec![vec_hit("a", 0.9)], 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].provenance, Provenance::Hybrid);
        assert!((ranked[0].score - 1.9).abs() < 1e-6);
    }

    #[test]
    fn test_vector_only_hits_keep_vector_provenance() {
        let ranked = merge(vec![], vec![vec_hit("a", 0.4)], 10);
        assert_eq!(ranked[0].provenance, Provenance::Vector);
        assert!((ranked[0].score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_ties_break_by_id_ascending() {
        let ranked = merge(vec![kw("b", true), kw("a", true)], vec![], 10);
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[1].id, "b");
    }

    #[test]
    fn test_truncates_to_limit() {
        let hits = vec![kw("a", true), kw("b", true), kw("c", false)];
        let ranked = merge(hits, vec![], 2);
        assert_eq!(ranked.len(), 2);
    }
}
