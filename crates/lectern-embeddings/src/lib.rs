//! lectern-embeddings - embedding providers for the lectern retrieval
//! subsystem.
//!
//! The retrieval service only sees the `lectern_core::Embedder` trait;
//! this crate supplies the implementations that talk to real providers:
//!
//! - **OpenAI** (feature `openai`, on by default) for hosted corpora
//! - **Ollama** (feature `ollama`) when embeddings must stay local
//!
//! Both are constructed through [`EmbedderFactory`], which hands back
//! the `Arc<dyn Embedder>` that `RetrievalService` and
//! `EmbeddingCache` expect:
//!
//! ```ignore
//! let embedder = lectern_embeddings::EmbedderFactory::openai()?;
//! let service = RetrievalService::new(store, embedder, config);
//! ```

mod factory;
mod ollama;
mod openai;

pub use factory::EmbedderFactory;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAIEmbedder;

pub use lectern_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};
