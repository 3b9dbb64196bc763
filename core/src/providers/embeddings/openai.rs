use crate::embeddings::{model::EmbeddingModel, EmbedderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_API_KEY_VAR_NAME: &str = "OPENAI_API_KEY";
const DEFAULT_URL: &str = "https://api.openai.com/v1/embeddings";

/// Embeddings from an OpenAI compatible `/v1/embeddings` endpoint.
pub struct OpenAIEmbedding {
    api_url: String,
    api_key: String,
    model: String,
    dimension: usize,
    /// Sent as `dimensions` to shorten the vectors of `text-embedding-3-*` models
    requested_dimensions: Option<usize>,
    client: Client,
}

impl OpenAIEmbedding {
    pub fn new(api_key: String, api_url: String, model: String, dimension: usize) -> Self {
        Self {
            api_url,
            api_key,
            model,
            dimension,
            requested_dimensions: None,
            client: Client::new(),
        }
    }

    /// Asks the endpoint for vectors of `dimensions` components instead of the native length.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimension = dimensions;
        self.requested_dimensions = Some(dimensions);
        self
    }

    /// Builds the provider with the API key read from `api_key_var` (`OPENAI_API_KEY` by default).
    ///
    /// For a known model, a `dimension` other than its native length is requested from the
    /// endpoint. For any other model `dimension` only declares the vector length.
    ///
    /// # Errors
    /// `EmbedderError::ModelLoad` if the key isn't set, or `dimension` is `None` for a model
    /// whose vector length isn't known.
    pub fn from_env(
        model: &str,
        api_key_var: Option<&str>,
        api_url: Option<&str>,
        dimension: Option<usize>,
    ) -> Result<Self, EmbedderError> {
        let load_error = |message: String| EmbedderError::ModelLoad {
            model: model.to_string(),
            message,
        };
        let api_key_var = api_key_var.unwrap_or(DEFAULT_API_KEY_VAR_NAME);
        let api_key = std::env::var(api_key_var)
            .map_err(|_| load_error(format!("env var `{api_key_var}` is not set")))?;
        let native = known_dimension(model);
        let declared = dimension
            .or(native)
            .ok_or_else(|| load_error("unknown model, set `dimension` in the config".to_string()))?;

        let embedding = Self::new(
            api_key,
            api_url.unwrap_or(DEFAULT_URL).to_string(),
            model.to_string(),
            declared,
        );
        Ok(match native {
            Some(native) if native != declared => embedding.with_dimensions(declared),
            _ => embedding,
        })
    }

    fn request_body(&self, data: &str) -> serde_json::Value {
        let mut body = json!({
            "input": data,
            "model": self.model,
        });
        if let Some(dimensions) = self.requested_dimensions {
            body["dimensions"] = json!(dimensions);
        }
        body
    }
}

fn known_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

#[derive(Deserialize)]
struct OpenAIEmbeddingResponse {
    pub data: Vec<OpenAIEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAIEmbeddingData {
    pub embedding: Vec<f64>,
}

#[async_trait]
impl EmbeddingModel for OpenAIEmbedding {
    async fn embed(&self, data: &str) -> Result<Vec<f64>, EmbedderError> {
        let request_body = self.request_body(data);
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::RequestError(e.to_string()))?;

        if response.status().is_success() {
            let response = response
                .json::<OpenAIEmbeddingResponse>()
                .await
                .map_err(|e| EmbedderError::ParseError(e.to_string()))?;

            response
                .data
                .into_iter()
                .next()
                .map(|d| d.embedding)
                .ok_or_else(|| {
                    EmbedderError::ParseError("response contained no embedding".to_string())
                })
        } else {
            let error_message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            Err(EmbedderError::ProviderError(error_message))
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
