use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

/// A complete (non-streaming) chat completion response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    /// Provider-assigned identifier for the completion.
    #[serde(default)]
    pub id: Option<String>,

    /// The completion choices; the first choice carries the answer.
    pub choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatChoice {
    /// Index of the choice within the response.
    #[serde(default)]
    pub index: usize,

    /// The generated message.
    pub message: ChatMessage,

    /// Why generation stopped, if reported.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl ChatCompletion {
    /// Returns the content of the first choice, if the provider returned one.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn parses_provider_response() {
        let json = r#"{
            "id": "cmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
            ]
        }"#;
        let completion: ChatCompletion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.content(), Some("hello"));
        assert_eq!(completion.choices[0].message.role, Role::Assistant);
        assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn empty_choices_have_no_content() {
        let completion = ChatCompletion {
            id: None,
            choices: vec![],
        };
        assert_eq!(completion.content(), None);
    }

    #[test]
    fn empty_content_is_no_content() {
        let completion = ChatCompletion {
            id: None,
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage::assistant(""),
                finish_reason: None,
            }],
        };
        assert_eq!(completion.content(), None);
    }
}
