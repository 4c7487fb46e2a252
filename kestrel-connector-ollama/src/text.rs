//! Text generation service for Ollama's `/api/generate` endpoint.

use std::collections::HashMap;
use std::future::Future;

use futures::TryStreamExt;
use kestrel_types::{
    ContentStream, PromptExecutionSettings, ServiceError, StreamingTextContent, TextContent,
    TextGeneration, MODEL_ID_KEY,
};

use crate::client::{OllamaClient, DEFAULT_BASE_URL};
use crate::error::map_reqwest_error;
use crate::mapping::{project_generate_chunk, text_content_from_response, to_generate_request};
use crate::streaming::ndjson_stream;
use crate::types::GenerateResponse;

/// Text generation against Ollama's `/api/generate` endpoint.
///
/// Implements [`TextGeneration`]. Construct one per model; calls are
/// independent and may run concurrently.
///
/// # Example
///
/// ```no_run
/// use kestrel_connector_ollama::OllamaTextGenerationService;
///
/// let service = OllamaTextGenerationService::new("llama3.2", "http://localhost:11434");
/// ```
pub struct OllamaTextGenerationService {
    client: OllamaClient,
    attributes: HashMap<String, String>,
}

impl OllamaTextGenerationService {
    /// Create a service for the given model and base URL.
    #[must_use]
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = OllamaClient::new(model, base_url);
        let attributes = HashMap::from([(MODEL_ID_KEY.to_string(), client.model.clone())]);
        Self { client, attributes }
    }

    /// Create a service pointed at the default local endpoint.
    #[must_use]
    pub fn with_default_endpoint(model: impl Into<String>) -> Self {
        Self::new(model, DEFAULT_BASE_URL)
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, etc.).
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.client.http = http;
        self
    }

    /// Set the default keep_alive duration for model memory residency.
    ///
    /// Examples: `"5m"` (keep for 5 minutes), `"0"` (unload after the
    /// request). Settings-level keep_alive takes precedence per call.
    #[must_use]
    pub fn with_keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.client.keep_alive = Some(duration.into());
        self
    }
}

impl TextGeneration for OllamaTextGenerationService {
    fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// One-shot completion: `stream: false`, one JSON document,
    /// projected as a single terminal chunk.
    fn get_text_contents(
        &self,
        prompt: &str,
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<Vec<TextContent>, ServiceError>> + Send {
        async move {
            let body = to_generate_request(
                prompt,
                settings,
                &self.client.model,
                self.client.keep_alive.as_deref(),
                false,
            );

            tracing::debug!(model = %body.model, "sending text generation request");

            let response = self
                .client
                .post_json(&self.client.generate_url(), &body)
                .await?;
            let text = response.text().await.map_err(map_reqwest_error)?;
            let parsed: GenerateResponse = serde_json::from_str(&text)
                .map_err(|e| ServiceError::Decode(format!("invalid JSON response: {e}")))?;

            Ok(vec![text_content_from_response(parsed)])
        }
    }

    /// Streaming completion: `stream: true`, NDJSON body decoded and
    /// projected lazily, one delta per line.
    fn get_streaming_text_contents(
        &self,
        prompt: &str,
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<ContentStream<StreamingTextContent>, ServiceError>> + Send
    {
        async move {
            let body = to_generate_request(
                prompt,
                settings,
                &self.client.model,
                self.client.keep_alive.as_deref(),
                true,
            );

            tracing::debug!(model = %body.model, "sending streaming text generation request");

            let response = self
                .client
                .post_json(&self.client.generate_url(), &body)
                .await?;

            // The response body is owned by the stream; dropping the
            // stream drops the body and closes the connection.
            let bytes = response.bytes_stream().map_err(map_reqwest_error);
            let stream: ContentStream<StreamingTextContent> =
                Box::pin(ndjson_stream::<GenerateResponse, _>(bytes).map_ok(project_generate_chunk));

            Ok(stream)
        }
    }
}
