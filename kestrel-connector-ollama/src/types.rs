//! Ollama `/api/generate` and `/api/chat` wire types.
//!
//! Notes on the protocol:
//! - No auth headers; Ollama is local.
//! - Tool call arguments are JSON objects (not strings) and carry no
//!   IDs, so the connector synthesizes UUIDs.
//! - Response timing fields are nanoseconds and appear only on the
//!   terminal (`done: true`) object.
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md>

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `/api/generate` request body.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest {
    /// Model identifier (e.g. "llama3.2").
    pub model: String,
    /// The prompt to complete.
    pub prompt: String,
    /// System prompt, sent as a dedicated top-level field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Response format: "json" or a JSON schema object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    /// Whether to stream the response.
    pub stream: bool,
    /// How long to keep the model loaded (e.g. "5m", "0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
    /// Generation options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaRequestOptions>,
}

/// `/api/chat` request body.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages, oldest first.
    pub messages: Vec<WireChatMessage>,
    /// Tools available to the model.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    /// Response format: "json" or a JSON schema object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<serde_json::Value>,
    /// Whether to stream the response.
    pub stream: bool,
    /// How long to keep the model loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
    /// Generation options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaRequestOptions>,
}

/// A message in the `/api/chat` format, used in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireChatMessage {
    /// "system", "user", "assistant", or "tool".
    pub role: String,
    /// Message text.
    #[serde(default)]
    pub content: String,
    /// Tool calls requested by the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// A tool call in a response message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireToolCall {
    /// The function being called.
    pub function: WireFunctionCall,
}

/// A function call within a tool call. Arguments are a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireFunctionCall {
    /// Function name.
    pub name: String,
    /// Arguments as a JSON object (NOT a string like OpenAI).
    pub arguments: serde_json::Value,
}

/// Tool definition offered in a chat request.
#[derive(Debug, Serialize)]
pub(crate) struct WireTool {
    /// Always "function".
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The function definition.
    pub function: WireFunction,
}

/// Function definition within a tool.
#[derive(Debug, Serialize)]
pub(crate) struct WireFunction {
    /// Function name.
    pub name: String,
    /// Function description.
    pub description: String,
    /// JSON Schema for the parameters.
    pub parameters: serde_json::Value,
}

/// Generation options. Unset fields are omitted so the server applies
/// its own defaults.
#[derive(Debug, Default, PartialEq, Serialize)]
pub(crate) struct OllamaRequestOptions {
    /// Context window size in tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Top-k sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Penalty for repeating tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Penalty for tokens already present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Sequences that stop generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// One `/api/generate` response object: the single body of a
/// non-streaming call, or one line of a streaming body.
///
/// `model` and `created_at` are required; a line missing either fails
/// decoding. Everything else defaults so intermediate chunks decode.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    /// Model that produced this chunk.
    pub model: String,
    /// When the server produced this chunk.
    pub created_at: DateTime<Utc>,
    /// Text contributed by this chunk. Empty on the terminal chunk.
    #[serde(default)]
    pub response: String,
    /// Present (and `true`) only on the terminal chunk.
    #[serde(default)]
    pub done: Option<bool>,
    /// Why generation stopped. Terminal chunk only.
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Conversation context token ids. Terminal chunk only.
    #[serde(default)]
    pub context: Option<Vec<i64>>,
    /// Total request time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Model load time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub load_duration: Option<u64>,
    /// Prompt token count. Terminal chunk only.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Prompt evaluation time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub prompt_eval_duration: Option<u64>,
    /// Generated token count. Terminal chunk only.
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Generation time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub eval_duration: Option<u64>,
}

/// One `/api/chat` response object, terminal or streaming.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    /// Model that produced this chunk.
    pub model: String,
    /// When the server produced this chunk.
    pub created_at: DateTime<Utc>,
    /// The message fragment for this chunk.
    #[serde(default)]
    pub message: Option<WireChatMessage>,
    /// Present (and `true`) only on the terminal chunk.
    #[serde(default)]
    pub done: Option<bool>,
    /// Why generation stopped. Terminal chunk only.
    #[serde(default)]
    pub done_reason: Option<String>,
    /// Total request time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Model load time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub load_duration: Option<u64>,
    /// Prompt token count. Terminal chunk only.
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Prompt evaluation time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub prompt_eval_duration: Option<u64>,
    /// Generated token count. Terminal chunk only.
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Generation time in nanoseconds. Terminal chunk only.
    #[serde(default)]
    pub eval_duration: Option<u64>,
}
