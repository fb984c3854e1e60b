//! Tiered document retrieval.
//!
//! [`RetrievalService`] orchestrates an ordered cascade of search tiers
//! (vector similarity, then full-text, then substring scan) with a TTL
//! result cache in front, plus a summary-based comprehensive mode for
//! explicitly narrowed scopes.

pub mod service;
pub mod tiers;

pub use service::RetrievalService;
pub use tiers::{
    FulltextTier, SubstringTier, SummaryTier, Tier, VectorTier, SUBSTRING_SIMILARITY,
    SUMMARY_SIMILARITY,
};
