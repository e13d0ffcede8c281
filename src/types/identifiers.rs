use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::render_bundle::ChatMessage;

/// Importance rank of a node. Content survives a render when its priority is
/// greater than or equal to the chosen threshold.
pub type Priority = u32;

/// Priority given to messages and root reservations that do not name one.
pub const MAX_PRIORITY: Priority = Priority::MAX;

/// Content hash of a rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptVersion(String);

impl PromptVersion {
    /// Hash the messages in order. Role and content both participate, so two
    /// renders share a version only if they would send identical requests.
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        let mut hasher = Sha256::new();
        for message in messages {
            hasher.update(message.role.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update((message.content.len() as u64).to_le_bytes());
            hasher.update(message.content.as_bytes());
        }

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        PromptVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
