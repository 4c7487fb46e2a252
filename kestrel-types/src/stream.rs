//! Streaming result type for incremental completion responses.

use std::pin::Pin;

use futures::Stream;

use crate::error::ServiceError;

/// A lazy stream of completion content.
///
/// Items arrive in network order, one per backend chunk. The producer
/// reads from the connection only when the consumer polls, so
/// backpressure is inherent. A decode failure mid-stream yields one
/// `Err` item and then the stream ends; items already yielded remain
/// valid. Dropping the stream closes the underlying connection.
pub type ContentStream<T> = Pin<Box<dyn Stream<Item = Result<T, ServiceError>> + Send>>;
