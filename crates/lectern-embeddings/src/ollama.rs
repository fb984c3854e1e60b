//! Local embedding through an Ollama daemon.

use async_trait::async_trait;

use lectern_core::error::{LecternError, LecternResult};
use lectern_core::traits::{Embedder, EmbedderConfig};

#[cfg(feature = "ollama")]
use ollama_rs::{generation::embeddings::request::GenerateEmbeddingsRequest, Ollama};

const DEFAULT_DAEMON_URL: &str = "http://localhost:11434";

/// Embedder backed by a local Ollama daemon.
///
/// Suited to corpora that must not leave the machine; pair it with a
/// model such as `nomic-embed-text`. The daemon address comes from
/// `base_url`, defaulting to localhost on the standard Ollama port.
pub struct OllamaEmbedder {
    #[cfg(feature = "ollama")]
    client: Ollama,
    config: EmbedderConfig,
}

impl OllamaEmbedder {
    /// Build an embedder. The daemon URL is validated here; whether the
    /// daemon is actually running is only discovered on the first call.
    pub fn new(config: EmbedderConfig) -> LecternResult<Self> {
        let daemon_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DAEMON_URL.to_string());

        let url = url::Url::parse(&daemon_url).map_err(|e| {
            LecternError::Configuration(format!(
                "Ollama base_url {daemon_url:?} does not parse: {e}"
            ))
        })?;

        #[cfg(feature = "ollama")]
        let client = Ollama::new(
            format!("http://{}", url.host_str().unwrap_or("localhost")),
            url.port().unwrap_or(11434),
        );

        #[cfg(not(feature = "ollama"))]
        let _ = url;

        Ok(Self {
            #[cfg(feature = "ollama")]
            client,
            config,
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[cfg(feature = "ollama")]
    async fn embed(&self, text: &str) -> LecternResult<Vec<f32>> {
        let request = GenerateEmbeddingsRequest::new(self.config.model.clone(), text.into());

        let response = self.client.generate_embeddings(request).await.map_err(|e| {
            LecternError::embedding(format!(
                "Ollama embeddings request failed for model {:?}: {e}",
                self.config.model
            ))
        })?;

        // The daemon reports f64 components.
        Ok(response.embeddings.into_iter().map(|v| v as f32).collect())
    }

    #[cfg(not(feature = "ollama"))]
    async fn embed(&self, _text: &str) -> LecternResult<Vec<f32>> {
        Err(LecternError::Configuration(
            "lectern-embeddings was built without the 'ollama' feature".to_string(),
        ))
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dims
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
