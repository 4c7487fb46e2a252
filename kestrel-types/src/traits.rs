//! Service traits: TextGeneration and ChatCompletion.

use std::collections::HashMap;
use std::future::Future;

use crate::error::ServiceError;
use crate::settings::PromptExecutionSettings;
use crate::stream::ContentStream;
use crate::types::{
    ChatMessage, ChatMessageContent, StreamingChatMessageContent, StreamingTextContent,
    TextContent,
};

/// Attribute key under which a service reports its model identifier.
pub const MODEL_ID_KEY: &str = "ModelId";

/// A text generation service: prompt in, completion out.
///
/// Uses RPITIT (return position impl trait in trait) — Rust 2024
/// native async. Not object-safe by design; compose with generics
/// `<S: TextGeneration>`.
pub trait TextGeneration: Send + Sync {
    /// Service metadata. Contains at least [`MODEL_ID_KEY`].
    fn attributes(&self) -> &HashMap<String, String>;

    /// Generate a completion for the prompt and return it whole.
    fn get_text_contents(
        &self,
        prompt: &str,
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<Vec<TextContent>, ServiceError>> + Send;

    /// Generate a completion for the prompt as a lazy stream of deltas.
    ///
    /// The returned future resolves once the backend has accepted the
    /// request; a non-success status fails here, before any item is
    /// yielded. Dropping the stream closes the connection.
    fn get_streaming_text_contents(
        &self,
        prompt: &str,
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<ContentStream<StreamingTextContent>, ServiceError>> + Send;
}

/// A chat completion service: conversation in, assistant message out.
///
/// Same shape as [`TextGeneration`]; see there for the streaming and
/// object-safety notes.
pub trait ChatCompletion: Send + Sync {
    /// Service metadata. Contains at least [`MODEL_ID_KEY`].
    fn attributes(&self) -> &HashMap<String, String>;

    /// Send the conversation and return the response message(s) whole.
    fn get_chat_message_contents(
        &self,
        messages: &[ChatMessage],
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<Vec<ChatMessageContent>, ServiceError>> + Send;

    /// Send the conversation and stream the response message as deltas.
    fn get_streaming_chat_message_contents(
        &self,
        messages: &[ChatMessage],
        settings: Option<&PromptExecutionSettings>,
    ) -> impl Future<Output = Result<ContentStream<StreamingChatMessageContent>, ServiceError>> + Send;
}
