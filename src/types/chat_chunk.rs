use serde::{Deserialize, Serialize};

use crate::types::Role;

/// One incremental fragment of a streaming chat completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionChunk {
    /// Provider-assigned identifier for the completion.
    #[serde(default)]
    pub id: Option<String>,

    /// The per-choice deltas; the first choice carries the answer.
    pub choices: Vec<ChunkChoice>,
}

/// One choice within a streaming chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkChoice {
    /// Index of the choice within the response.
    #[serde(default)]
    pub index: usize,

    /// The incremental content delta.
    pub delta: ChunkDelta,

    /// Why generation stopped; set on the final chunk of a choice.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The delta payload of a streaming chunk.
///
/// The first chunk of a stream typically carries only the role; subsequent
/// chunks carry content fragments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkDelta {
    /// The role, present on the first chunk only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// The content fragment, absent on role-only and terminal chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// Returns the content fragment of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.as_deref())
    }
}
