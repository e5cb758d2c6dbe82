//! Logging trait for chat client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to
//! capture all API traffic passing through the [`OpenAi`](crate::OpenAi)
//! client.

use crate::types::{ChatCompletion, ChatCompletionChunk};

/// A trait for logging chat client operations.
///
/// Implement this trait to capture and record API interactions, including
/// both non-streaming responses and individual streaming chunks.
///
/// # Example
///
/// ```rust,ignore
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// use chuck::{ChatCompletion, ChatCompletionChunk, ClientLogger};
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_response(&self, completion: &ChatCompletion) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "response: {}", serde_json::to_string(completion).unwrap()).unwrap();
///     }
///
///     fn log_chunk(&self, chunk: &ChatCompletionChunk) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "chunk: {}", serde_json::to_string(chunk).unwrap()).unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a complete response from a non-streaming `complete` call.
    fn log_response(&self, completion: &ChatCompletion);

    /// Log an individual streaming chunk.
    ///
    /// This method is called for each [`ChatCompletionChunk`] received during
    /// a streaming request, in arrival order.
    fn log_chunk(&self, chunk: &ChatCompletionChunk);
}
