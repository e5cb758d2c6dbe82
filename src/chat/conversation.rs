//! Conversation state for a chat session.

use crate::types::{ChatMessage, Role};

/// Lowest accepted sampling temperature.
pub const TEMPERATURE_MIN: f32 = 0.0;

/// Highest accepted sampling temperature.
pub const TEMPERATURE_MAX: f32 = 2.0;

/// The ordered transcript of a conversation, plus the optional system
/// directive and sampling temperature that accompany every request.
///
/// The directive is stored separately from the transcript and prepended to
/// the outbound message list only while one is active; the transcript itself
/// never contains a system message.
#[derive(Debug, Default)]
pub struct Conversation {
    transcript: Vec<ChatMessage>,
    directive: Option<ChatMessage>,
    temperature: Option<f32>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message to the transcript.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::user(text));
    }

    /// Appends an assistant message to the transcript.
    ///
    /// A no-op on empty input: an answer is only recorded when the provider
    /// actually returned content.
    pub fn push_assistant(&mut self, text: &str) {
        if !text.is_empty() {
            self.transcript.push(ChatMessage::assistant(text));
        }
    }

    /// Sets or clears the system directive.
    ///
    /// Empty text clears the directive; non-empty text replaces whatever
    /// directive was active before.
    pub fn set_directive(&mut self, text: &str) {
        if text.is_empty() {
            self.directive = None;
        } else {
            self.directive = Some(ChatMessage::system(text));
        }
    }

    /// Returns the active directive text, if any.
    pub fn directive(&self) -> Option<&str> {
        self.directive.as_ref().map(|msg| msg.content.as_str())
    }

    /// Sets the sampling temperature.
    ///
    /// Only finite values in `[TEMPERATURE_MIN, TEMPERATURE_MAX]` are
    /// accepted; anything else leaves the state unchanged and returns false.
    pub fn set_temperature(&mut self, value: f32) -> bool {
        if value.is_finite() && (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&value) {
            self.temperature = Some(value);
            true
        } else {
            false
        }
    }

    /// Returns the sampling temperature, if set.
    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Returns the number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    /// Returns true if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    /// Resets transcript, directive, and temperature to their initial empty
    /// state in one step.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.directive = None;
        self.temperature = None;
    }

    /// Returns the ordered message list to send to the provider, with the
    /// directive prepended iff one is active.
    pub fn outbound(&self) -> Vec<ChatMessage> {
        self.directive
            .iter()
            .chain(self.transcript.iter())
            .cloned()
            .collect()
    }

    /// Returns a display list of the conversation state.
    ///
    /// Temperature and directive come first when set, each with its own
    /// prefix, followed by the non-assistant transcript entries in
    /// chronological order. Read-only.
    pub fn snapshot(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(temperature) = self.temperature {
            lines.push(format!("@{temperature}"));
        }
        if let Some(directive) = self.directive() {
            lines.push(format!("sys: {directive}"));
        }
        for message in &self.transcript {
            if message.role != Role::Assistant {
                lines.push(message.content.clone());
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_preserves_order_and_count() {
        let mut conversation = Conversation::new();
        conversation.push_user("one");
        conversation.push_assistant("two");
        conversation.push_user("three");
        assert_eq!(conversation.len(), 3);
        let outbound = conversation.outbound();
        assert_eq!(outbound[0].content, "one");
        assert_eq!(outbound[1].content, "two");
        assert_eq!(outbound[2].content, "three");
    }

    #[test]
    fn empty_assistant_answer_is_not_recorded() {
        let mut conversation = Conversation::new();
        conversation.push_user("question");
        conversation.push_assistant("");
        assert_eq!(conversation.len(), 1);
    }

    #[test]
    fn directive_is_prepended_not_stored_in_transcript() {
        let mut conversation = Conversation::new();
        conversation.set_directive("be concise");
        conversation.push_user("question");
        assert_eq!(conversation.len(), 1);
        let outbound = conversation.outbound();
        assert_eq!(outbound.len(), 2);
        assert_eq!(outbound[0].role, Role::System);
        assert_eq!(outbound[0].content, "be concise");
    }

    #[test]
    fn directive_round_trip() {
        let mut conversation = Conversation::new();
        conversation.set_directive("be concise");
        assert_eq!(conversation.directive(), Some("be concise"));
        conversation.set_directive("be thorough");
        assert_eq!(conversation.directive(), Some("be thorough"));
        conversation.set_directive("");
        assert_eq!(conversation.directive(), None);
        assert!(conversation.outbound().is_empty());
    }

    #[test]
    fn temperature_range_is_enforced() {
        let mut conversation = Conversation::new();
        assert!(!conversation.set_temperature(2.5));
        assert_eq!(conversation.temperature(), None);
        assert!(conversation.set_temperature(1.5));
        assert_eq!(conversation.temperature(), Some(1.5));
        assert!(!conversation.set_temperature(-0.1));
        assert_eq!(conversation.temperature(), Some(1.5));
        assert!(!conversation.set_temperature(f32::NAN));
        assert!(conversation.set_temperature(0.0));
        assert!(conversation.set_temperature(2.0));
    }

    #[test]
    fn clear_resets_everything() {
        let mut conversation = Conversation::new();
        conversation.push_user("question");
        conversation.push_assistant("answer");
        conversation.set_directive("be concise");
        conversation.set_temperature(0.7);
        conversation.clear();
        assert!(conversation.is_empty());
        assert_eq!(conversation.directive(), None);
        assert_eq!(conversation.temperature(), None);
        assert!(conversation.snapshot().is_empty());
    }

    #[test]
    fn snapshot_lists_settings_then_questions() {
        let mut conversation = Conversation::new();
        conversation.set_temperature(1.5);
        conversation.set_directive("be concise");
        conversation.push_user("first");
        conversation.push_assistant("answer");
        conversation.push_user("second");
        assert_eq!(
            conversation.snapshot(),
            vec!["@1.5", "sys: be concise", "first", "second"]
        );
    }
}
