use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

/// Parameters for a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// The model identifier to use.
    pub model: String,

    /// The ordered message list, directive first when one is active.
    pub messages: Vec<ChatMessage>,

    /// Optional sampling temperature; omitted means provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Whether the response should be streamed as server-sent events.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub stream: bool,
}

impl ChatRequest {
    /// Create a new non-streaming request.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            stream: false,
        }
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_unset_fields() {
        let req = ChatRequest::new("gpt-4", vec![ChatMessage::user("hi")]);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn serializes_temperature_and_stream() {
        let mut req =
            ChatRequest::new("gpt-4", vec![ChatMessage::user("hi")]).with_temperature(Some(1.5));
        req.stream = true;
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["temperature"], 1.5);
        assert_eq!(json["stream"], true);
        assert_eq!(json["model"], "gpt-4");
    }
}
