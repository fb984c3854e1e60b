//! Retrieval request types.

use serde::{Deserialize, Serialize};

use super::scope::Scope;

/// Retrieval mode, matched exhaustively at the orchestration entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Tiered chunk search: vector, then full-text, then substring.
    #[default]
    Fast,
    /// Per-document summaries for an already-narrowed scope; skips the
    /// chunk tiers entirely.
    Comprehensive,
}

impl SearchMode {
    /// Stable string form, used in cache keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Fast => "fast",
            SearchMode::Comprehensive => "comprehensive",
        }
    }
}

/// Default number of sources returned per retrieval.
pub const DEFAULT_TOP_K: usize = 5;

/// Bundles all inputs for a single retrieval invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Owner plus optional narrowing. The owner clause is mandatory.
    pub scope: Scope,
    /// Retrieval mode.
    pub mode: SearchMode,
    /// Maximum sources to return.
    pub top_k: usize,
}

impl SearchRequest {
    /// Create a fast-mode request with the default `top_k`.
    pub fn new(query: impl Into<String>, scope: Scope) -> Self {
        Self {
            query: query.into(),
            scope,
            mode: SearchMode::Fast,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the retrieval mode.
    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the result limit.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Canonical cache key over the full five-tuple
    /// (query, owner, narrowing, mode, top_k).
    ///
    /// Built from [`Scope::canonical_key`], so semantically identical
    /// requests produce identical keys regardless of how the scope was
    /// assembled.
    pub fn cache_key(&self) -> String {
        format!(
            "q={}|{}|mode={}|topk={}",
            self.query,
            self.scope.canonical_key(),
            self.mode.as_str(),
            self.top_k
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_stability() {
        let a = SearchRequest::new(
            "neural networks",
            Scope::owner("u1").with_articles(vec!["b".into(), "a".into()]),
        );
        let b = SearchRequest::new(
            "neural networks",
            Scope::owner("u1").with_articles(vec!["a".into(), "b".into()]),
        );
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_varies_by_tuple() {
        let base = SearchRequest::new("q", Scope::owner("u1"));
        assert_ne!(
            base.cache_key(),
            base.clone().with_top_k(10).cache_key()
        );
        assert_ne!(
            base.cache_key(),
            base.clone().with_mode(SearchMode::Comprehensive).cache_key()
        );
        assert_ne!(
            base.cache_key(),
            SearchRequest::new("q", Scope::owner("u2")).cache_key()
        );
    }
}
