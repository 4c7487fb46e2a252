#![deny(missing_docs)]
//! Ollama connector for kestrel.
//!
//! Implements the [`kestrel_types::TextGeneration`] and
//! [`kestrel_types::ChatCompletion`] traits against Ollama's
//! `/api/generate` and `/api/chat` endpoints. Ollama runs models
//! locally, so there are no auth headers.
//!
//! Streaming responses are NDJSON: one JSON object per line over a
//! chunked body, with `done: true` on the final line. The connector
//! decodes lines lazily and projects each into one content delta.

mod chat;
mod client;
mod error;
mod mapping;
mod streaming;
mod text;
mod types;

pub use chat::OllamaChatCompletionService;
pub use text::OllamaTextGenerationService;
