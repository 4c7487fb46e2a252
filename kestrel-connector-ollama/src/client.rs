//! Shared HTTP plumbing for the Ollama services.

use kestrel_types::ServiceError;
use serde::Serialize;

use crate::error::map_reqwest_error;

/// Default Ollama API base URL.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// HTTP client state shared by the text and chat services.
///
/// Holds the reqwest client (cheap to clone, pooled connections), the
/// model id, the base URL, and an optional default keep-alive. All of
/// it is immutable after construction, so concurrent calls through
/// one service never interfere.
#[derive(Debug, Clone)]
pub(crate) struct OllamaClient {
    /// Model identifier sent with every request.
    pub(crate) model: String,
    /// API base URL (override for remote instances or test servers).
    pub(crate) base_url: String,
    /// Default keep_alive duration (e.g. "5m", "0" to unload).
    pub(crate) keep_alive: Option<String>,
    /// Shared HTTP client.
    pub(crate) http: reqwest::Client,
}

impl OllamaClient {
    pub(crate) fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: base_url.into(),
            keep_alive: None,
            http: reqwest::Client::new(),
        }
    }

    pub(crate) fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// POST a JSON body and check the status.
    ///
    /// A non-success status is read to completion and surfaced as
    /// [`ServiceError::HttpOperation`] before anything is decoded, so
    /// a failed streaming call never yields a partial sequence.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, ServiceError> {
        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(map_reqwest_error)?;
            return Err(ServiceError::HttpOperation {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}
