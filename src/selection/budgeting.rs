use serde::{Deserialize, Serialize};

use crate::node::{Chain, Node};
use crate::selection::ranking::TokenCounter;
use crate::selection::render::render_priority;
use crate::types::errors::InsufficientChildrenError;
use crate::types::identifiers::Priority;
use crate::types::render_bundle::ChatMessage;

/// Token cost of rendering a chain at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateCost {
    pub threshold: Priority,
    pub prompt_tokens: usize,
    pub reserved_tokens: usize,
}

impl CandidateCost {
    /// Saturates at `usize::MAX`, which no budget can satisfy.
    pub fn total(&self) -> usize {
        self.prompt_tokens.saturating_add(self.reserved_tokens)
    }
}

/// Render `chain` at `threshold` and price the result.
pub fn measure<T: TokenCounter + ?Sized>(
    chain: &Chain,
    tokenizer: &T,
    threshold: Priority,
) -> Result<(Vec<ChatMessage>, CandidateCost), InsufficientChildrenError> {
    let messages = render_priority(chain, threshold)?;
    let cost = CandidateCost {
        threshold,
        prompt_tokens: tokenizer.count_messages(&messages),
        reserved_tokens: reserved_tokens(chain, threshold),
    };
    Ok((messages, cost))
}

/// Reservations charged at `threshold`.
///
/// Reservations inside messages only count when they and all their
/// ancestors survive the threshold. Reservations at the root are always
/// charged, whatever the threshold.
pub fn reserved_tokens(chain: &Chain, threshold: Priority) -> usize {
    let nested: usize = chain
        .messages()
        .filter(|message| message.priority() >= threshold)
        .map(|message| nested_reservations(message.children(), message.priority(), threshold))
        .fold(0, usize::saturating_add);

    let root: usize = chain
        .root_reservations()
        .map(|reserve| reserve.tokens())
        .fold(0, usize::saturating_add);

    nested.saturating_add(root)
}

// Top-k truncation is not applied here: a reservation under a surviving
// top-k node is charged even if its branch falls outside the first `k`.
fn nested_reservations(nodes: &[Node], inherited: Priority, threshold: Priority) -> usize {
    nodes
        .iter()
        .filter(|node| !matches!(node, Node::Text(_)))
        .map(|node| {
            let priority = node.effective_priority(inherited);
            if priority < threshold {
                return 0;
            }
            match node {
                Node::Reserve(reserve) => reserve.tokens(),
                _ => nested_reservations(node.children(), priority, threshold),
            }
        })
        .fold(0, usize::saturating_add)
}
