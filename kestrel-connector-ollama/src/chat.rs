//! Chat completion service for Ollama's `/api/chat` endpoint.

use std::collections::HashMap;
use std::future::Future;

use futures::TryStreamExt;
use kestrel_types::{
    ChatCompletion, ChatMessage, ChatMessageContent, ContentStream, PromptExecutionSettings,
    ServiceError, StreamingChatMessageContent, MODEL_ID_KEY,
};

use crate::client::{OllamaClient, DEFAULT_BASE_URL};
use crate::error::map_reqwest_error;
use crate::mapping::{chat_content_from_response, to_chat_request, ChatChunkProjector};
use crate::streaming::ndjson_stream;
use crate::types::ChatResponse;

/// Chat completion against Ollama's `/api/chat` endpoint.
///
/// Implements [`ChatCompletion`]. Each streaming call owns its own
/// projector state and HTTP connection, so concurrent calls through
/// one service never interfere.
///
/// # Example
///
/// ```no_run
/// use kestrel_connector_ollama::OllamaChatCompletionService;
///
/// let service = OllamaChatCompletionService::new("llama3.2", "http://localhost:11434");
/// ```
pub struct OllamaChatCompletionService {
    client: OllamaClient,
    attributes: HashMap<String, String>,
}

impl OllamaChatCompletionService {
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
    #[must_use]
    pub fn with_keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.client.keep_alive = Some(duration.into());
        self
    }
}

impl ChatCompletion for OllamaChatCompletionService {
    fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// One-shot chat completion. Ollama returns a single choice, so
    /// the result is always a one-element list.
    fn get_chat_message_contents(
        &self,
        messages: &[ChatMessage],
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<Vec<ChatMessageContent>, ServiceError>> + Send {
        async move {
            let body = to_chat_request(
                messages,
                settings,
                &self.client.model,
                self.client.keep_alive.as_deref(),
                false,
            );

            tracing::debug!(model = %body.model, "sending chat completion request");

            let response = self.client.post_json(&self.client.chat_url(), &body).await?;
            let text = response.text().await.map_err(map_reqwest_error)?;
            let parsed: ChatResponse = serde_json::from_str(&text)
                .map_err(|e| ServiceError::Decode(format!("invalid JSON response: {e}")))?;

            Ok(vec![chat_content_from_response(parsed)])
        }
    }

    /// Streaming chat completion. Role is projected on the first delta
    /// only; the projector is scoped to this call.
    fn get_streaming_chat_message_contents(
        &self,
        messages: &[ChatMessage],
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<ContentStream<StreamingChatMessageContent>, ServiceError>> + Send
    {
        async move {
            let body = to_chat_request(
                messages,
                settings,
                &self.client.model,
                self.client.keep_alive.as_deref(),
                true,
            );

            tracing::debug!(model = %body.model, "sending streaming chat completion request");

            let response = self.client.post_json(&self.client.chat_url(), &body).await?;

            let bytes = response.bytes_stream().map_err(map_reqwest_error);
            let mut projector = ChatChunkProjector::new();
            let stream: ContentStream<StreamingChatMessageContent> = Box::pin(
                ndjson_stream::<ChatResponse, _>(bytes).map_ok(move |chunk| projector.project(chunk)),
            );

            Ok(stream)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_carry_model_id() {
        let service = OllamaChatCompletionService::new("fake-model", "http://localhost:11434");
        assert_eq!(
            service.attributes().get(MODEL_ID_KEY).map(String::as_str),
            Some("fake-model")
        );
    }

    #[test]
    fn default_endpoint_is_local() {
        let service = OllamaChatCompletionService::with_default_endpoint("llama3.2");
        assert_eq!(service.client.base_url, "http://localhost:11434");
    }
}
