//! Search and retrieval result types.

use serde::{Deserialize, Serialize};

/// A single retrieval hit, normalized across tiers.
///
/// `similarity` is comparable only within one tier's scale: the vector
/// tier reports `1 - distance`, the full-text tier a lexical rank score,
/// and the substring and summary tiers fixed constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Source article.
    pub article_id: String,
    /// Article title.
    pub title: String,
    /// Source domain.
    pub domain: String,
    /// Matched content (chunk text or article summary).
    pub content: String,
    /// Bounded, boundary-safe excerpt of `content`.
    pub excerpt: String,
    /// Tier-scaled relevance score.
    pub similarity: f32,
}

/// Result of one `RetrievalService::search` call.
///
/// `documents` is the deterministic, ordered textual join of `sources`.
/// It is built exactly once; callers never re-derive it, because the
/// downstream LLM prompt depends on the exact formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retrieval {
    /// Prompt-ready text block, one labeled section per source.
    pub documents: String,
    /// Structured sources in the same order as `documents`.
    pub sources: Vec<SearchHit>,
}

impl Retrieval {
    /// An empty retrieval (no sources, empty prompt block).
    pub fn empty() -> Self {
        Self {
            documents: String::new(),
            sources: Vec::new(),
        }
    }

    /// Whether the retrieval carries no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Which sub-queries contributed a hybrid search entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Found only by the keyword sub-query.
    Keyword,
    /// Found only by the vector sub-query.
    Vector,
    /// Found by both; score is the sum of both contributions.
    Hybrid,
}

/// A scored entity returned by the hybrid searcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntity {
    /// Entity identifier.
    pub id: String,
    /// Display title (article title or concept term).
    pub title: String,
    /// Combined relevance score.
    pub score: f32,
    /// Which sub-queries contributed.
    pub provenance: Provenance,
}

/// Hybrid search output, one ranked list per entity kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HybridResults {
    /// Ranked concepts.
    pub concepts: Vec<RankedEntity>,
    /// Ranked articles.
    pub articles: Vec<RankedEntity>,
}
