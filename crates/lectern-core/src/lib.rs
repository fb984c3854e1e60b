//! lectern-core - Core library for lectern.
//!
//! This crate provides the retrieval subsystem for a personal reading
//! and learning application: tiered document search (vector, full-text,
//! substring) with TTL caching, excerpt extraction, and hybrid entity
//! ranking over saved articles and concepts.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lectern_core::{MemoryStore, RetrievalConfig, RetrievalService, Scope, SearchRequest};
//!
//! let store = Arc::new(MemoryStore::new());
//! let service = RetrievalService::new(store, embedder, RetrievalConfig::default());
//!
//! let request = SearchRequest::new("ownership and borrowing", Scope::owner("user1"));
//! let retrieval = service.search(&request).await?;
//! println!("{}", retrieval.documents);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod excerpt;
pub mod hybrid;
pub mod retrieval;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use cache::{CacheStats, Clock, EmbeddingCache, ManualClock, ResultCache, SystemClock};
pub use config::RetrievalConfig;
pub use error::{ErrorCode, LecternError, LecternResult};
pub use hybrid::HybridRanker;
pub use retrieval::RetrievalService;
pub use store::{cosine_similarity, MemoryStore};
pub use traits::{
    ChunkMatch, DocumentBody, DocumentStore, Embedder, EmbedderConfig, EmbedderProvider,
    KeywordEntityHit, VectorEntityHit,
};
pub use types::{
    Chunk, Concept, DocumentMeta, EntityKind, HybridResults, Provenance, RankedEntity, Retrieval,
    Scope, ScopeClause, SearchHit, SearchMode, SearchRequest,
};
