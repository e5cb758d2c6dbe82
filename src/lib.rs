// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod sse;
pub mod types;

// Re-exports
pub use chat::{
    CancelToken, ChatArgs, ChatConfig, ChatSession, Command, Conversation, HistoryDirection,
    StreamOutcome, StreamingAnswer, TurnHistory,
};
pub use client::{ChatProvider, ChunkStream, OpenAi};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
