//! Query and chunk embedding through the OpenAI embeddings API.

use async_trait::async_trait;

use lectern_core::error::{LecternError, LecternResult};
use lectern_core::traits::{Embedder, EmbedderConfig};

#[cfg(feature = "openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};

/// Embedder backed by the OpenAI embeddings endpoint.
///
/// The model name and expected dimension come from [`EmbedderConfig`];
/// `base_url` redirects requests to an API-compatible gateway. The key
/// is taken from the config, falling back to `OPENAI_API_KEY`.
pub struct OpenAIEmbedder {
    #[cfg(feature = "openai")]
    client: Client<OpenAIConfig>,
    config: EmbedderConfig,
}

fn resolve_api_key(config: &EmbedderConfig) -> LecternResult<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .ok_or_else(|| {
            LecternError::Configuration(
                "no OpenAI API key: set OPENAI_API_KEY or put api_key in the embedder config"
                    .to_string(),
            )
        })
}

impl OpenAIEmbedder {
    /// Build an embedder, resolving the API key eagerly so a missing
    /// key surfaces at construction rather than on the first query.
    pub fn new(config: EmbedderConfig) -> LecternResult<Self> {
        let api_key = resolve_api_key(&config)?;

        #[cfg(feature = "openai")]
        let client = {
            let mut client_config = OpenAIConfig::new().with_api_key(api_key);
            if let Some(base_url) = &config.base_url {
                client_config = client_config.with_api_base(base_url);
            }
            Client::with_config(client_config)
        };

        #[cfg(not(feature = "openai"))]
        let _ = api_key;

        Ok(Self {
            #[cfg(feature = "openai")]
            client,
            config,
        })
    }

    #[cfg(feature = "openai")]
    async fn request(&self, input: EmbeddingInput) -> LecternResult<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequest {
            model: self.config.model.clone(),
            input,
            ..Default::default()
        };

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| {
                LecternError::embedding(format!("OpenAI embeddings request failed: {e}"))
            })?;

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[cfg(feature = "openai")]
    async fn embed(&self, text: &str) -> LecternResult<Vec<f32>> {
        let mut vectors = self
            .request(EmbeddingInput::String(text.to_string()))
            .await?;
        if vectors.is_empty() {
            return Err(LecternError::embedding(
                "OpenAI returned an empty embeddings response",
            ));
        }
        Ok(vectors.swap_remove(0))
    }

    #[cfg(not(feature = "openai"))]
    async fn embed(&self, _text: &str) -> LecternResult<Vec<f32>> {
        Err(LecternError::Configuration(
            "lectern-embeddings was built without the 'openai' feature".to_string(),
        ))
    }

    #[cfg(feature = "openai")]
    async fn embed_batch(&self, texts: &[String]) -> LecternResult<Vec<Vec<f32>>> {
        self.request(EmbeddingInput::StringArray(texts.to_vec()))
            .await
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_key_wins_over_environment() {
        let config = EmbedderConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&config).unwrap(), "sk-test");
    }

    #[test]
    fn test_accessors_reflect_config() {
        let embedder = OpenAIEmbedder::new(EmbedderConfig {
            model: "text-embedding-3-large".to_string(),
            embedding_dims: 3072,
            api_key: Some("sk-test".to_string()),
            base_url: None,
        })
        .unwrap();

        assert_eq!(embedder.dimension(), 3072);
        assert_eq!(embedder.model_name(), "text-embedding-3-large");
    }
}
