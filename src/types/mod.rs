// Public modules
pub mod chat_chunk;
pub mod chat_completion;
pub mod chat_message;
pub mod chat_request;
pub mod role;

// Re-exports
pub use chat_chunk::{ChatCompletionChunk, ChunkChoice, ChunkDelta};
pub use chat_completion::{ChatChoice, ChatCompletion};
pub use chat_message::ChatMessage;
pub use chat_request::ChatRequest;
pub use role::Role;
