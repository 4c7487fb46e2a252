//! Core content types for completion services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a chat participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// A system instruction.
    System,
    /// A human user.
    User,
    /// An AI assistant.
    Assistant,
    /// A tool result message.
    Tool,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// Tool calls requested by the assistant (assistant messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    /// Create a user message.
    ///
    /// # Example
    ///
    /// ```
    /// use kestrel_types::ChatMessage;
    /// let msg = ChatMessage::user("What is Rust?");
    /// ```
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create a tool result message.
    #[must_use]
    pub fn tool(text: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: text.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this call. Synthesized by the connector
    /// when the backend does not provide one.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments as a JSON object.
    pub arguments: serde_json::Value,
}

/// A tool made available to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool parameters.
    pub parameters: serde_json::Value,
}

/// Performance and lifecycle metadata attached to completion content.
///
/// Every field is optional: streaming chunks carry only `created_at`
/// (and `done: false`) until the terminal chunk, which carries the
/// full set. Durations are in nanoseconds, as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionMetadata {
    /// When the backend produced this chunk.
    pub created_at: Option<DateTime<Utc>>,
    /// Whether generation has finished.
    pub done: Option<bool>,
    /// Why generation stopped (e.g. "stop", "length"). Terminal chunk only.
    pub done_reason: Option<String>,
    /// Total wall time for the request.
    pub total_duration: Option<u64>,
    /// Time spent loading the model.
    pub load_duration: Option<u64>,
    /// Number of tokens in the prompt.
    pub prompt_eval_count: Option<u64>,
    /// Time spent evaluating the prompt.
    pub prompt_eval_duration: Option<u64>,
    /// Number of tokens generated.
    pub eval_count: Option<u64>,
    /// Time spent generating.
    pub eval_duration: Option<u64>,
    /// Conversation context token ids (text completion only).
    pub context: Option<Vec<i64>>,
}

/// A complete text completion result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// The generated text.
    pub text: String,
    /// The model that produced it.
    pub model_id: Option<String>,
    /// Backend metadata.
    pub metadata: Option<CompletionMetadata>,
}

/// One incremental piece of a streamed text completion.
///
/// `text` is empty exactly on the terminal chunk; concatenating `text`
/// across all deltas in arrival order reconstructs the full response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingTextContent {
    /// The text contributed by this chunk (possibly empty).
    pub text: String,
    /// The model that produced it.
    pub model_id: Option<String>,
    /// Backend metadata. Fully populated only on the terminal chunk.
    pub metadata: Option<CompletionMetadata>,
}

/// A complete chat completion result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageContent {
    /// The author role of the response message.
    pub role: Role,
    /// The message text.
    pub content: String,
    /// Tool calls requested by the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// The model that produced it.
    pub model_id: Option<String>,
    /// Backend metadata.
    pub metadata: Option<CompletionMetadata>,
}

/// One incremental piece of a streamed chat completion.
///
/// `role` is set on at most one delta per stream (the first that
/// carries it); all subsequent deltas have `role: None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingChatMessageContent {
    /// The author role, carried by the first delta only.
    pub role: Option<Role>,
    /// The text contributed by this chunk (possibly empty).
    pub content: String,
    /// Tool calls carried by this chunk.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// The model that produced it.
    pub model_id: Option<String>,
    /// Backend metadata. Fully populated only on the terminal chunk.
    pub metadata: Option<CompletionMetadata>,
}
