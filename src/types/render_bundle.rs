use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::identifiers::{Priority, PromptVersion};

/// Speaker of a single chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered turn, in the generic `{role, content}` shape chat APIs accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Metadata describing how a render was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderMetadata {
    /// `None` when the render was unbounded.
    pub budget: Option<usize>,
    pub threshold: Priority,

    /// `prompt_tokens + reserved_tokens` for the accepted threshold.
    pub tokens_used: usize,
    pub prompt_tokens: usize,
    pub reserved_tokens: usize,

    /// Number of thresholds rendered before one was accepted, including it.
    pub candidates_considered: usize,
}

/// The final result of a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    pub messages: Vec<ChatMessage>,
    pub render: RenderMetadata,
    pub version: PromptVersion,
}
