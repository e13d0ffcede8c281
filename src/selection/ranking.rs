use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::types::errors::TokenizerError;
use crate::types::render_bundle::ChatMessage;

pub trait TokenCounter {
    fn count_tokens(&self, content: &str) -> usize;

    /// Token count of a whole rendered prompt. Only message contents are
    /// counted; role markers are left to the caller's reservations.
    fn count_messages(&self, messages: &[ChatMessage]) -> usize {
        messages
            .iter()
            .map(|message| self.count_tokens(&message.content))
            .fold(0, usize::saturating_add)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, content: &str) -> usize {
        (**self).count_tokens(content)
    }

    fn count_messages(&self, messages: &[ChatMessage]) -> usize {
        (**self).count_messages(messages)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Box<T> {
    fn count_tokens(&self, content: &str) -> usize {
        (**self).count_tokens(content)
    }

    fn count_messages(&self, messages: &[ChatMessage]) -> usize {
        (**self).count_messages(messages)
    }
}

/// Approximate GPT-style tokenization
/// tokens(content) := ceil(len(content) / 4)
#[derive(Debug, Default, Clone, Copy)]
pub struct ApproxTokenCounter;

impl TokenCounter for ApproxTokenCounter {
    fn count_tokens(&self, content: &str) -> usize {
        // Integer division ceil(len / 4) equivalent to (len + 4 - 1) / 4
        if content.is_empty() {
            0
        } else {
            (content.len() + 3) / 4
        }
    }
}

/// Exact counts with the `cl100k_base` BPE used by GPT-4 class models.
pub struct Cl100kTokenCounter {
    bpe: CoreBPE,
}

impl Cl100kTokenCounter {
    pub fn new() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::Load {
            encoding: "cl100k_base",
            reason: e.to_string(),
        })?;
        debug!(encoding = "cl100k_base", "loaded tokenizer");
        Ok(Self { bpe })
    }
}

impl std::fmt::Debug for Cl100kTokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cl100kTokenCounter").finish_non_exhaustive()
    }
}

impl TokenCounter for Cl100kTokenCounter {
    fn count_tokens(&self, content: &str) -> usize {
        if content.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(content).len()
    }
}
