//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation
//! state and the input history, and drives blocking and streaming turns
//! against a [`ChatProvider`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::chat::answer::{CancelToken, StreamOutcome, StreamingAnswer, drain};
use crate::chat::config::ChatConfig;
use crate::chat::history::{HistoryDirection, TurnHistory};
use crate::client::ChatProvider;
use crate::render::Renderer;
use crate::types::{ChatMessage, ChatRequest};
use crate::{Conversation, Error};

/// How often the foreground loop re-renders the in-flight answer.
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// A chat session that manages conversation state and provider interactions.
///
/// One session is active per process; all conversation mutations happen on
/// turn boundaries in the caller's loop, so no synchronization beyond the
/// cancel token and the shared in-flight answer is needed.
pub struct ChatSession<P: ChatProvider> {
    provider: P,
    config: ChatConfig,
    conversation: Conversation,
    history: TurnHistory,
}

impl<P: ChatProvider> ChatSession<P> {
    /// Creates a new chat session with the given provider and configuration.
    ///
    /// A system directive or temperature carried by the configuration is
    /// applied before the first turn; an out-of-range temperature is ignored
    /// the same way it would be at the prompt.
    pub fn new(provider: P, config: ChatConfig) -> Self {
        let mut conversation = Conversation::new();
        if let Some(system) = &config.system {
            conversation.set_directive(system);
        }
        if let Some(temperature) = config.temperature {
            conversation.set_temperature(temperature);
        }
        Self {
            provider,
            config,
            conversation,
            history: TurnHistory::new(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the model identifier used for requests.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.conversation.len()
    }

    /// Appends the question to the transcript and the input history, and
    /// returns the ordered message list to send to the provider, directive
    /// first when one is active.
    pub fn submit_user(&mut self, text: &str) -> Vec<ChatMessage> {
        self.conversation.push_user(text);
        self.history.push(text);
        self.conversation.outbound()
    }

    /// Records the assistant's answer; a no-op on empty text.
    pub fn complete_assistant(&mut self, text: &str) {
        self.conversation.push_assistant(text);
    }

    /// Sets or clears the system directive.
    ///
    /// A non-empty directive also lands in the input history, like a
    /// question would.
    pub fn set_directive(&mut self, text: &str) {
        if !text.is_empty() {
            self.history.push(text);
        }
        self.conversation.set_directive(text);
    }

    /// Sets the sampling temperature; false when the value was rejected.
    pub fn set_temperature(&mut self, value: f32) -> bool {
        self.conversation.set_temperature(value)
    }

    /// Clears the conversation.
    ///
    /// The input history intentionally survives; it tracks what was typed,
    /// not what the model saw.
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    /// Returns the display snapshot of the conversation state.
    pub fn snapshot(&self) -> Vec<String> {
        self.conversation.snapshot()
    }

    /// Moves the history cursor and returns the text to prefill the prompt
    /// with; empty when navigating past the newest entry.
    pub fn navigate_history(&mut self, direction: HistoryDirection) -> String {
        self.history.navigate(direction)
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest::new(self.config.model.clone(), messages)
            .with_temperature(self.conversation.temperature())
    }

    /// Asks a question and waits for the full answer.
    ///
    /// A provider failure is surfaced as the returned answer text but is not
    /// recorded in the transcript, since the provider returned no content.
    pub async fn ask(&mut self, question: &str) -> String {
        let messages = self.submit_user(question);
        match self.provider.complete(self.request(messages)).await {
            Ok(completion) => match completion.content() {
                Some(content) => {
                    let answer = content.to_string();
                    self.complete_assistant(&answer);
                    answer
                }
                None => String::new(),
            },
            Err(err) => err.to_string(),
        }
    }

    /// Asks a question and streams the answer.
    ///
    /// The provider stream is drained by a background task into a shared
    /// in-flight answer while this method re-renders its visible tail on an
    /// interval and watches the cancel token. Whatever was accumulated when
    /// the stream ends, is cancelled, or fails is committed as the answer
    /// exactly once. Failing to open the stream at all surfaces the error
    /// text as the answer without recording anything.
    pub async fn ask_streaming(
        &mut self,
        question: &str,
        renderer: &mut dyn Renderer,
        cancel: &CancelToken,
    ) -> (String, StreamOutcome) {
        let messages = self.submit_user(question);
        let stream = match self.provider.stream(self.request(messages)).await {
            Ok(stream) => stream,
            Err(err) => {
                let text = err.to_string();
                renderer.print_error(&text);
                return (text, StreamOutcome::Failed(err));
            }
        };

        let shared = Arc::new(Mutex::new(StreamingAnswer::new()));
        let mut drain_task = tokio::spawn(drain(stream, Arc::clone(&shared), cancel.clone()));
        let mut ticker = tokio::time::interval(RENDER_INTERVAL);

        let outcome = loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let answer = shared.lock().expect("answer lock poisoned");
                    renderer.draw_progress(&answer.window(self.config.window_lines));
                }
                joined = &mut drain_task => {
                    break joined.unwrap_or_else(|err| {
                        StreamOutcome::Failed(Error::streaming(
                            format!("streaming task failed: {err}"),
                            None,
                        ))
                    });
                }
            }
        };

        let answer = Arc::try_unwrap(shared)
            .map(|mutex| mutex.into_inner().expect("answer lock poisoned"))
            .unwrap_or_else(|shared| {
                std::mem::take(&mut *shared.lock().expect("answer lock poisoned"))
            });
        let text = answer.finalize();

        renderer.finish_answer(&text);
        match &outcome {
            StreamOutcome::Completed => {}
            StreamOutcome::Cancelled => renderer.print_interrupted(),
            StreamOutcome::Failed(err) => renderer.print_error(&err.to_string()),
        }

        self.complete_assistant(&text);
        (text, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::AnswerWindow;
    use crate::client::ChunkStream;
    use crate::types::{
        ChatChoice, ChatCompletion, ChatCompletionChunk, ChunkChoice, ChunkDelta, Role,
    };
    use futures::stream::{self, StreamExt};

    fn chunk(text: &str) -> crate::Result<ChatCompletionChunk> {
        Ok(ChatCompletionChunk {
            id: None,
            choices: vec![ChunkChoice {
                index: 0,
                delta: ChunkDelta {
                    role: None,
                    content: Some(text.to_string()),
                },
                finish_reason: None,
            }],
        })
    }

    /// Provider that replays a scripted chunk sequence and records requests.
    struct ScriptedProvider {
        chunks: Vec<crate::Result<ChatCompletionChunk>>,
        hang_after_chunks: bool,
        fail_to_open: bool,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn new(chunks: Vec<crate::Result<ChatCompletionChunk>>) -> Self {
            Self {
                chunks,
                hang_after_chunks: false,
                fail_to_open: false,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn hanging(mut self) -> Self {
            self.hang_after_chunks = true;
            self
        }

        fn broken() -> Self {
            let mut provider = Self::new(vec![]);
            provider.fail_to_open = true;
            provider
        }

        fn last_request(&self) -> ChatRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(&self, request: ChatRequest) -> crate::Result<ChatCompletion> {
            self.requests.lock().unwrap().push(request);
            if self.fail_to_open {
                return Err(Error::internal_server("the model is on fire"));
            }
            let text: String = self
                .chunks
                .iter()
                .filter_map(|c| c.as_ref().ok())
                .filter_map(|c| c.content())
                .collect();
            Ok(ChatCompletion {
                id: None,
                choices: vec![ChatChoice {
                    index: 0,
                    message: ChatMessage::assistant(text),
                    finish_reason: Some("stop".to_string()),
                }],
            })
        }

        async fn stream(&self, request: ChatRequest) -> crate::Result<ChunkStream> {
            self.requests.lock().unwrap().push(request);
            if self.fail_to_open {
                return Err(Error::internal_server("the model is on fire"));
            }
            let replay = stream::iter(self.chunks.clone());
            if self.hang_after_chunks {
                Ok(Box::pin(replay.chain(stream::pending())))
            } else {
                Ok(Box::pin(replay))
            }
        }
    }

    /// Renderer that swallows everything.
    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn draw_progress(&mut self, _window: &AnswerWindow<'_>) {}
        fn finish_answer(&mut self, _text: &str) {}
        fn print_info(&mut self, _info: &str) {}
        fn print_error(&mut self, _error: &str) {}
    }

    fn session(provider: ScriptedProvider) -> ChatSession<ScriptedProvider> {
        ChatSession::new(provider, ChatConfig::new("test-model"))
    }

    #[tokio::test]
    async fn streaming_turn_commits_answer() {
        let provider = ScriptedProvider::new(vec![chunk("Hel"), chunk("lo\n"), chunk("World")]);
        let mut session = session(provider);
        let (answer, outcome) = session
            .ask_streaming("greet me", &mut NullRenderer, &CancelToken::new())
            .await;
        assert_eq!(answer, "Hello\nWorld");
        assert!(matches!(outcome, StreamOutcome::Completed));
        assert_eq!(session.message_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_turn_commits_partial_answer_once() {
        let provider =
            ScriptedProvider::new(vec![chunk("partial answ"), chunk("er")]).hanging();
        let mut session = session(provider);
        let cancel = CancelToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            canceller.cancel();
        });
        let (answer, outcome) = session
            .ask_streaming("tell me everything", &mut NullRenderer, &cancel)
            .await;
        assert_eq!(answer, "partial answer");
        assert!(matches!(outcome, StreamOutcome::Cancelled));
        // question + partial answer, nothing else
        assert_eq!(session.message_count(), 2);
    }

    #[tokio::test]
    async fn failed_stream_keeps_partial_content() {
        let provider = ScriptedProvider::new(vec![
            chunk("half an "),
            chunk("answer"),
            Err(Error::streaming("connection reset", None)),
        ]);
        let mut session = session(provider);
        let (answer, outcome) = session
            .ask_streaming("question", &mut NullRenderer, &CancelToken::new())
            .await;
        assert_eq!(answer, "half an answer");
        assert!(matches!(outcome, StreamOutcome::Failed(_)));
        assert_eq!(session.message_count(), 2);
    }

    #[tokio::test]
    async fn unopened_stream_surfaces_error_without_recording() {
        let mut session = session(ScriptedProvider::broken());
        let (answer, outcome) = session
            .ask_streaming("question", &mut NullRenderer, &CancelToken::new())
            .await;
        assert!(answer.contains("the model is on fire"));
        assert!(matches!(outcome, StreamOutcome::Failed(_)));
        // the user message stays; no assistant message was recorded
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn blocking_turn_commits_answer() {
        let provider = ScriptedProvider::new(vec![chunk("forty-two")]);
        let mut session = session(provider);
        let answer = session.ask("the question").await;
        assert_eq!(answer, "forty-two");
        assert_eq!(session.message_count(), 2);
    }

    #[tokio::test]
    async fn blocking_failure_surfaces_error_without_recording() {
        let mut session = session(ScriptedProvider::broken());
        let answer = session.ask("the question").await;
        assert!(answer.contains("the model is on fire"));
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn directive_is_first_outbound_message() {
        let provider = ScriptedProvider::new(vec![chunk("aye")]);
        let mut session = session(provider);
        session.set_directive("be concise");
        let _ = session
            .ask_streaming("question", &mut NullRenderer, &CancelToken::new())
            .await;
        let request = session.provider.last_request();
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "be concise");
        assert_eq!(request.messages[1].content, "question");

        session.set_directive("");
        let _ = session
            .ask_streaming("another", &mut NullRenderer, &CancelToken::new())
            .await;
        let request = session.provider.last_request();
        assert!(request.messages.iter().all(|m| m.role != Role::System));
    }

    #[tokio::test]
    async fn temperature_rides_along_with_requests() {
        let provider = ScriptedProvider::new(vec![chunk("ok")]);
        let mut session = session(provider);
        assert!(session.set_temperature(1.5));
        let _ = session.ask("question").await;
        assert_eq!(session.provider.last_request().temperature, Some(1.5));
    }

    #[tokio::test]
    async fn clear_resets_conversation_but_not_history() {
        let provider = ScriptedProvider::new(vec![chunk("answer")]);
        let mut session = session(provider);
        let _ = session.ask("remember me").await;
        session.clear();
        assert_eq!(session.message_count(), 0);
        assert!(session.snapshot().is_empty());
        assert_eq!(
            session.navigate_history(HistoryDirection::Older),
            "remember me"
        );
    }

    #[test]
    fn questions_and_directives_land_in_history() {
        let provider = ScriptedProvider::new(vec![]);
        let mut session = session(provider);
        session.submit_user("a question");
        session.set_directive("a directive");
        session.set_directive("");
        assert_eq!(
            session.navigate_history(HistoryDirection::Older),
            "a directive"
        );
        assert_eq!(
            session.navigate_history(HistoryDirection::Older),
            "a question"
        );
    }

    #[test]
    fn config_seeds_directive_and_temperature() {
        let config = ChatConfig::new("test-model")
            .with_system(Some("seeded".to_string()))
            .with_temperature(Some(0.3));
        let session = ChatSession::new(ScriptedProvider::new(vec![]), config);
        assert_eq!(session.snapshot(), vec!["@0.3", "sys: seeded"]);
    }
}
