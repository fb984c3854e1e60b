//! Provider selection and construction.

use std::sync::Arc;

use lectern_core::error::LecternResult;
use lectern_core::traits::{Embedder, EmbedderConfig, EmbedderProvider};

use crate::ollama::OllamaEmbedder;
use crate::openai::OpenAIEmbedder;

/// Builds `Arc<dyn Embedder>` instances for the retrieval service from
/// an [`EmbedderProvider`] tag plus configuration.
pub struct EmbedderFactory;

impl EmbedderFactory {
    /// Construct the embedder named by `provider` with `config`.
    pub fn create(
        provider: EmbedderProvider,
        config: EmbedderConfig,
    ) -> LecternResult<Arc<dyn Embedder>> {
        match provider {
            EmbedderProvider::OpenAI => Ok(Arc::new(OpenAIEmbedder::new(config)?)),
            EmbedderProvider::Ollama => Ok(Arc::new(OllamaEmbedder::new(config)?)),
        }
    }

    /// OpenAI with the default model (`text-embedding-3-small`, 1536 dims).
    pub fn openai() -> LecternResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::OpenAI, EmbedderConfig::default())
    }

    /// OpenAI with an explicit model and dimension.
    pub fn openai_with_model(
        model: impl Into<String>,
        dims: usize,
    ) -> LecternResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::OpenAI, sized_config(model, dims))
    }

    /// Local Ollama daemon running `nomic-embed-text` (768 dims).
    pub fn ollama() -> LecternResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::Ollama, sized_config("nomic-embed-text", 768))
    }

    /// Local Ollama daemon with an explicit model and dimension.
    pub fn ollama_with_model(
        model: impl Into<String>,
        dims: usize,
    ) -> LecternResult<Arc<dyn Embedder>> {
        Self::create(EmbedderProvider::Ollama, sized_config(model, dims))
    }
}

fn sized_config(model: impl Into<String>, dims: usize) -> EmbedderConfig {
    EmbedderConfig {
        model: model.into(),
        embedding_dims: dims,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_factory_sets_model_and_dims() {
        let embedder = EmbedderFactory::ollama_with_model("mxbai-embed-large", 1024).unwrap();
        assert_eq!(embedder.model_name(), "mxbai-embed-large");
        assert_eq!(embedder.dimension(), 1024);
    }
}
