//! Incremental response assembly.
//!
//! This module reassembles the token stream of an in-flight answer into a
//! line-oriented structure, and provides the cancellable drain protocol that
//! feeds it from a provider chunk stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::Stream;
use futures::stream::StreamExt;

use crate::Error;
use crate::types::ChatCompletionChunk;

/// How often the drain loop re-checks the cancel token while no chunk is
/// available. Keeps a hung stream cancellable.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The in-progress, line-structured reconstruction of a streamed answer.
///
/// Chunks accumulate in `current` until a line break closes the text before
/// it into `completed`. The structure is transient: once the answer is
/// finalized it collapses into a single string.
#[derive(Debug, Default)]
pub struct StreamingAnswer {
    completed: Vec<String>,
    current: String,
}

/// A bounded display view over a [`StreamingAnswer`].
pub struct AnswerWindow<'a> {
    /// Number of completed lines elided from the front.
    pub elided: usize,
    /// The visible tail of completed lines.
    pub lines: &'a [String],
    /// The partial line still being assembled, if non-empty.
    pub current: Option<&'a str>,
}

impl StreamingAnswer {
    /// Creates an empty answer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one incoming chunk of text.
    ///
    /// Every line break contained in the accumulated text closes the content
    /// before it (with a trailing carriage return stripped) into the
    /// completed lines.
    pub fn push(&mut self, chunk: &str) {
        self.current.push_str(chunk);
        while let Some(pos) = self.current.find('\n') {
            let mut line: String = self.current.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            self.completed.push(line);
        }
    }

    /// Returns true if nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.current.is_empty()
    }

    /// The completed lines received so far.
    pub fn completed_lines(&self) -> &[String] {
        &self.completed
    }

    /// The partial line still being assembled, if non-empty.
    pub fn current_line(&self) -> Option<&str> {
        if self.current.is_empty() {
            None
        } else {
            Some(&self.current)
        }
    }

    /// Returns a display view bounded to the last `limit` completed lines.
    ///
    /// Bounding is a display concern only; the full content remains stored
    /// and is returned by [`finalize`](Self::finalize) regardless of what was
    /// shown.
    pub fn window(&self, limit: usize) -> AnswerWindow<'_> {
        let elided = self.completed.len().saturating_sub(limit);
        AnswerWindow {
            elided,
            lines: &self.completed[elided..],
            current: self.current_line(),
        }
    }

    /// Folds the partial line in and returns the full answer text.
    pub fn finalize(mut self) -> String {
        if !self.current.is_empty() {
            self.completed.push(std::mem::take(&mut self.current));
        }
        self.completed.join("\n")
    }
}

/// Cooperative cancellation token shared between the input listener and the
/// streaming consumer.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    tripped: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates an untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the token.
    pub fn cancel(&self) {
        self.tripped.store(true, Ordering::Relaxed);
    }

    /// Returns true once the token has been tripped.
    pub fn is_cancelled(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
    }

    /// Rearms the token for the next turn.
    pub fn reset(&self) {
        self.tripped.store(false, Ordering::Relaxed);
    }
}

/// Terminal state of one streaming consumption.
///
/// All three states leave whatever was accumulated in the shared answer; the
/// caller folds it into the final answer text.
#[derive(Debug)]
pub enum StreamOutcome {
    /// The provider stream ended normally.
    Completed,
    /// The consumer observed the cancel token tripped.
    Cancelled,
    /// The stream raised an error mid-consumption.
    Failed(Error),
}

/// Drains a provider chunk stream into a shared [`StreamingAnswer`].
///
/// The token is checked between chunks and on poll ticks, so consumption
/// stops promptly even when the stream has gone quiet. No chunk is processed
/// after cancellation is observed, and dropping the stream releases the
/// underlying subscription.
pub async fn drain<S>(
    mut stream: S,
    answer: Arc<Mutex<StreamingAnswer>>,
    cancel: CancelToken,
) -> StreamOutcome
where
    S: Stream<Item = Result<ChatCompletionChunk, Error>> + Unpin,
{
    loop {
        if cancel.is_cancelled() {
            return StreamOutcome::Cancelled;
        }
        match tokio::time::timeout(CANCEL_POLL_INTERVAL, stream.next()).await {
            Err(_) => continue,
            Ok(None) => return StreamOutcome::Completed,
            Ok(Some(Ok(chunk))) => {
                if let Some(text) = chunk.content() {
                    answer.lock().expect("answer lock poisoned").push(text);
                }
            }
            Ok(Some(Err(err))) => return StreamOutcome::Failed(err),
        }
    }
}
