//! In-memory [`DocumentStore`] implementation for testing and embedding
//! in single-process deployments.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock`. Vector search is
//! brute-force cosine similarity over all stored embeddings; full-text
//! search is a term-frequency scan requiring every term to match.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use ordered_float::OrderedFloat;

use crate::error::LecternResult;
use crate::traits::{
    ChunkMatch, DocumentBody, DocumentStore, KeywordEntityHit, VectorEntityHit,
};
use crate::types::{Chunk, Concept, DocumentMeta, EntityKind, Scope};

struct StoredDocument {
    meta: DocumentMeta,
    body: String,
}

/// In-memory document store.
pub struct MemoryStore {
    docs: RwLock<HashMap<String, StoredDocument>>,
    chunks: RwLock<Vec<Chunk>>,
    concepts: RwLock<HashMap<String, Concept>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            chunks: RwLock::new(Vec::new()),
            concepts: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace a document and its body.
    pub fn add_document(&self, meta: DocumentMeta, body: impl Into<String>) {
        let mut docs = self.docs.write().unwrap();
        docs.insert(
            meta.id.clone(),
            StoredDocument {
                meta,
                body: body.into(),
            },
        );
    }

    /// Append a chunk. Chunks reference their parent by `document_id`.
    pub fn add_chunk(&self, chunk: Chunk) {
        self.chunks.write().unwrap().push(chunk);
    }

    /// Insert or replace a concept.
    pub fn add_concept(&self, concept: Concept) {
        let mut concepts = self.concepts.write().unwrap();
        concepts.insert(concept.id.clone(), concept);
    }

    /// Mark a document soft-deleted.
    pub fn delete_document(&self, id: &str, deleted_at: i64) {
        let mut docs = self.docs.write().unwrap();
        if let Some(stored) = docs.get_mut(id) {
            stored.meta.deleted_at = Some(deleted_at);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Cosine similarity in `[-1, 1]`; 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn vector_search_chunks(
        &self,
        query_vec: &[f32],
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<ChunkMatch>> {
        let docs = self.docs.read().unwrap();
        let chunks = self.chunks.read().unwrap();

        let mut matches: Vec<ChunkMatch> = chunks
            .iter()
            .filter(|c| !c.embedding.is_empty())
            .filter_map(|c| {
                let stored = docs.get(&c.document_id)?;
                if !scope.matches(&stored.meta) {
                    return None;
                }
                Some(ChunkMatch {
                    article_id: stored.meta.id.clone(),
                    title: stored.meta.title.clone(),
                    domain: stored.meta.domain.clone(),
                    content: c.content.clone(),
                    score: 1.0 - cosine_similarity(query_vec, &c.embedding),
                })
            })
            .collect();

        matches.sort_by_key(|m| OrderedFloat(m.score));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn fulltext_search_chunks(
        &self,
        terms: &[String],
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<ChunkMatch>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let docs = self.docs.read().unwrap();
        let chunks = self.chunks.read().unwrap();

        let mut matches: Vec<ChunkMatch> = chunks
            .iter()
            .filter_map(|c| {
                let stored = docs.get(&c.document_id)?;
                if !scope.matches(&stored.meta) {
                    return None;
                }
                let content_lower = c.content.to_lowercase();
                // Every term must be present; rank by total frequency.
                if !terms.iter().all(|t| content_lower.contains(t.as_str())) {
                    return None;
                }
                let score: usize = terms
                    .iter()
                    .map(|t| content_lower.matches(t.as_str()).count())
                    .sum();
                Some(ChunkMatch {
                    article_id: stored.meta.id.clone(),
                    title: stored.meta.title.clone(),
                    domain: stored.meta.domain.clone(),
                    content: c.content.clone(),
                    score: score as f32,
                })
            })
            .collect();

        matches.sort_by_key(|m| std::cmp::Reverse(OrderedFloat(m.score)));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn recent_documents(
        &self,
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<DocumentBody>> {
        let docs = self.docs.read().unwrap();
        let mut in_scope: Vec<DocumentBody> = docs
            .values()
            .filter(|s| scope.matches(&s.meta))
            .map(|s| DocumentBody {
                meta: s.meta.clone(),
                body: s.body.clone(),
            })
            .collect();

        in_scope.sort_by_key(|d| std::cmp::Reverse(d.meta.saved_at));
        in_scope.truncate(limit);
        Ok(in_scope)
    }

    async fn documents_in_scope(&self, scope: &Scope) -> LecternResult<Vec<DocumentMeta>> {
        let docs = self.docs.read().unwrap();
        let mut in_scope: Vec<DocumentMeta> = docs
            .values()
            .filter(|s| scope.matches(&s.meta))
            .map(|s| s.meta.clone())
            .collect();
        in_scope.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(in_scope)
    }

    async fn keyword_search_entities(
        &self,
        kind: EntityKind,
        query: &str,
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<KeywordEntityHit>> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<KeywordEntityHit> = match kind {
            EntityKind::Article => {
                let docs = self.docs.read().unwrap();
                docs.values()
                    .filter(|s| scope.matches(&s.meta))
                    .filter_map(|s| {
                        let primary = s.meta.title.to_lowercase().contains(&needle);
                        let secondary = s.body.to_lowercase().contains(&needle);
                        (primary || secondary).then(|| KeywordEntityHit {
                            id: s.meta.id.clone(),
                            title: s.meta.title.clone(),
                            primary_match: primary,
                        })
                    })
                    .collect()
            }
            EntityKind::Concept => {
                let concepts = self.concepts.read().unwrap();
                concepts
                    .values()
                    .filter(|c| c.owner_id == scope.owner_id && c.deleted_at.is_none())
                    .filter_map(|c| {
                        let primary = c.term.to_lowercase().contains(&needle);
                        let secondary = c.definition.to_lowercase().contains(&needle);
                        (primary || secondary).then(|| KeywordEntityHit {
                            id: c.id.clone(),
                            title: c.term.clone(),
                            primary_match: primary,
                        })
                    })
                    .collect()
            }
        };

        // Primary-field matches first; titles are not unique, so the id
        // tie-break keeps truncation at `limit` reproducible.
        hits.sort_by(|a, b| {
            b.primary_match
                .cmp(&a.primary_match)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn vector_search_entities(
        &self,
        kind: EntityKind,
        query_vec: &[f32],
        scope: &Scope,
        limit: usize,
    ) -> LecternResult<Vec<VectorEntityHit>> {
        let mut hits: Vec<VectorEntityHit> = match kind {
            EntityKind::Article => {
                let docs = self.docs.read().unwrap();
                let chunks = self.chunks.read().unwrap();
                docs.values()
                    .filter(|s| scope.matches(&s.meta))
                    .filter_map(|s| {
                        // An article's similarity is its best chunk's.
                        let best = chunks
                            .iter()
                            .filter(|c| c.document_id == s.meta.id && !c.embedding.is_empty())
                            .map(|c| OrderedFloat(cosine_similarity(query_vec, &c.embedding)))
                            .max()?;
                        Some(VectorEntityHit {
                            id: s.meta.id.clone(),
                            title: s.meta.title.clone(),
                            similarity: best.into_inner(),
                        })
                    })
                    .collect()
            }
            EntityKind::Concept => {
                let concepts = self.concepts.read().unwrap();
                concepts
                    .values()
                    .filter(|c| {
                        c.owner_id == scope.owner_id
                            && c.deleted_at.is_none()
                            && !c.embedding.is_empty()
                    })
                    .map(|c| VectorEntityHit {
                        id: c.id.clone(),
                        title: c.term.clone(),
                        similarity: cosine_similarity(query_vec, &c.embedding),
                    })
                    .collect()
            }
        };

        hits.sort_by(|a, b| {
            OrderedFloat(b.similarity)
                .cmp(&OrderedFloat(a.similarity))
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_docs() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_document(
            DocumentMeta::new("d1", "u1", "Rust Ownership", "doc.rust-lang.org").with_saved_at(100),
            "Ownership is Rust's most unique feature.",
        );
        store.add_document(
            DocumentMeta::new("d2", "u1", "Async Patterns", "tokio.rs").with_saved_at(200),
            "Spawning tasks and awaiting futures.",
        );
        store.add_document(
            DocumentMeta::new("d3", "u2", "Other User Doc", "doc.rust-lang.org").with_saved_at(300),
            "Ownership content belonging to someone else.",
        );
        store
    }

    #[tokio::test]
    async fn test_vector_search_orders_by_distance() {
        let store = store_with_docs();
        store.add_chunk(Chunk::new("c1", "d1", 0, "far").with_embedding(vec![0.0, 1.0]));
        store.add_chunk(Chunk::new("c2", "d2", 0, "near").with_embedding(vec![1.0, 0.0]));

        let hits = store
            .vector_search_chunks(&[1.0, 0.0], &Scope::owner("u1"), 10)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "near");
        assert!(hits[0].score < hits[1].score);
    }

    #[tokio::test]
    async fn test_vector_search_respects_owner_scope() {
        let store = store_with_docs();
        store.add_chunk(Chunk::new("c1", "d3", 0, "foreign").with_embedding(vec![1.0, 0.0]));

        let hits = store
            .vector_search_chunks(&[1.0, 0.0], &Scope::owner("u1"), 10)
            .await
            .unwrap();

        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_fulltext_requires_every_term() {
        let store = store_with_docs();
        store.add_chunk(Chunk::new("c1", "d1", 0, "ownership and borrowing rules"));
        store.add_chunk(Chunk::new("c2", "d2", 0, "only borrowing here"));

        let hits = store
            .fulltext_search_chunks(
                &["ownership".into(), "borrowing".into()],
                &Scope::owner("u1"),
                10,
            )
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].article_id, "d1");
    }

    #[tokio::test]
    async fn test_recent_documents_newest_first() {
        let store = store_with_docs();
        let docs = store
            .recent_documents(&Scope::owner("u1"), 10)
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].meta.id, "d2");
    }

    #[tokio::test]
    async fn test_deleted_documents_are_invisible() {
        let store = store_with_docs();
        store.delete_document("d1", 400);

        let docs = store
            .documents_in_scope(&Scope::owner("u1"))
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "d2");
    }

    #[tokio::test]
    async fn test_keyword_entities_flag_primary_matches() {
        let store = store_with_docs();
        store.add_concept(Concept::new("k1", "u1", "Ownership", "Core memory model."));

        let hits = store
            .keyword_search_entities(EntityKind::Concept, "ownership", &Scope::owner("u1"), 10)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert!(hits[0].primary_match);

        let article_hits = store
            .keyword_search_entities(EntityKind::Article, "ownership", &Scope::owner("u1"), 10)
            .await
            .unwrap();
        // Title match ranks ahead of the body-only match.
        assert_eq!(article_hits[0].id, "d1");
        assert!(article_hits[0].primary_match);
    }

    #[tokio::test]
    async fn test_keyword_entities_order_is_reproducible_across_equal_titles() {
        let store = MemoryStore::new();
        for id in ["n3", "n1", "n2"] {
            store.add_document(
                DocumentMeta::new(id, "u1", "Weekly Notes", "notes.local"),
                "recap",
            );
        }

        let hits = store
            .keyword_search_entities(EntityKind::Article, "weekly", &Scope::owner("u1"), 2)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "n1");
        assert_eq!(hits[1].id, "n2");
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
