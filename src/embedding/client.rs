use serde::{Deserialize, Serialize};

use super::error::EmbeddingError;

/// Upper bound accepted by the service's batch endpoint in one round trip.
pub const EMBED_BATCH_LIMIT: usize = 2048;

/// Minimal async interface to the embedding service.
pub trait EmbeddingClient: Send + Sync {
    /// Embeds a single text.
    fn embed(
        &self,
        text: &str,
        model: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Embeds a batch of texts in one round trip.
    ///
    /// The returned vectors are in input order, one per text.
    fn embed_batch(
        &self,
        texts: &[String],
        model: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;
}

/// Shared handles delegate, so callers can keep a reference to the client
/// after handing it to a cache.
impl<C: EmbeddingClient> EmbeddingClient for std::sync::Arc<C> {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text, model).await
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        model: &str,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts, model).await
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedDatum>,
}

#[derive(Deserialize)]
struct EmbedDatum {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Clone)]
/// Embedding client for OpenAI-compatible `/embeddings` endpoints.
pub struct HttpEmbedder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpEmbedder {
    /// Creates a client for `base_url` authenticated with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn request(
        &self,
        texts: &[String],
        model: &str,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest {
                model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let mut message: String = body.chars().take(256).collect();
            if message.is_empty() {
                message = status.to_string();
            }
            return Err(EmbeddingError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    message: e.to_string(),
                })?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::BatchLengthMismatch {
                expected: texts.len(),
                actual: parsed.data.len(),
            });
        }

        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl EmbeddingClient for HttpEmbedder {
    async fn embed(&self, text: &str, model: &str) -> Result<Vec<f32>, EmbeddingError> {
        let texts = [text.to_string()];
        let mut vectors = self.request(&texts, model).await?;
        Ok(vectors.remove(0))
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        model: &str,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(EMBED_BATCH_LIMIT) {
            vectors.extend(self.request(chunk, model).await?);
        }

        Ok(vectors)
    }
}
