//! Chat session engine for interactive conversations.
//!
//! This module provides the conversation session engine behind the chuck
//! binary. It supports:
//!
//! - Streaming responses assembled line by line with a bounded display window
//! - Cooperative mid-response cancellation that keeps partial content
//! - An optional system directive and adjustable sampling temperature
//! - Navigable input history for questions and directives
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - config: CLI argument parsing and configuration
//! - conversation: transcript, directive, and temperature state
//! - answer: incremental response assembly and the cancellable drain protocol
//! - history: the input history navigation model
//! - commands: per-turn input classification
//! - session: the turn engine tying the pieces to a provider

mod answer;
mod commands;
mod config;
mod conversation;
mod history;
mod session;

pub use answer::{AnswerWindow, CancelToken, StreamOutcome, StreamingAnswer, drain};
pub use commands::{Command, classify, help_text};
pub use config::{ChatArgs, ChatConfig, DEFAULT_WINDOW_LINES};
pub use conversation::{Conversation, TEMPERATURE_MAX, TEMPERATURE_MIN};
pub use history::{HistoryDirection, TurnHistory};
pub use session::ChatSession;
