use crate::format::normalize;
use crate::node::{Chain, Message, Node};
use crate::types::errors::InsufficientChildrenError;
use crate::types::identifiers::Priority;
use crate::types::render_bundle::ChatMessage;

/// Render every message of `chain` at `threshold`.
///
/// Messages are never dropped: a message below the threshold still yields a
/// record, with empty content.
pub fn render_priority(
    chain: &Chain,
    threshold: Priority,
) -> Result<Vec<ChatMessage>, InsufficientChildrenError> {
    chain
        .messages()
        .map(|message| {
            let content = render_message(message, threshold)?;
            Ok(ChatMessage::new(message.role(), normalize(&content)))
        })
        .collect()
}

/// Raw concatenation of a message's surviving content, before normalization.
fn render_message(message: &Message, threshold: Priority) -> Result<String, InsufficientChildrenError> {
    let mut out = String::new();
    if message.priority() >= threshold {
        render_nodes(message.children(), message.priority(), threshold, &mut out)?;
    }
    Ok(out)
}

fn render_nodes(
    nodes: &[Node],
    inherited: Priority,
    threshold: Priority,
    out: &mut String,
) -> Result<(), InsufficientChildrenError> {
    for node in nodes {
        render_node(node, inherited, threshold, out)?;
    }
    Ok(())
}

fn render_node(
    node: &Node,
    inherited: Priority,
    threshold: Priority,
    out: &mut String,
) -> Result<(), InsufficientChildrenError> {
    if let Node::Text(text) = node {
        out.push_str(text);
        return Ok(());
    }

    let priority = node.effective_priority(inherited);
    if priority < threshold {
        return Ok(());
    }

    match node {
        Node::Text(_) | Node::Reserve(_) => {}
        Node::Scope(scope) => render_nodes(scope.children(), priority, threshold, out)?,
        Node::TopK(top_k) => {
            for child in sorted_by_priority(top_k.children(), priority)
                .into_iter()
                .take(top_k.k())
            {
                render_node(child, priority, threshold, out)?;
            }
        }
        Node::MinK(min_k) => {
            let sorted = sorted_by_priority(min_k.children(), priority);
            let found = sorted
                .iter()
                .filter(|child| child.effective_priority(priority) >= threshold)
                .count();

            if found < min_k.m() {
                return Err(InsufficientChildrenError {
                    found,
                    required: min_k.m(),
                    threshold,
                });
            }

            // `m` only gates the render; the threshold decides what is dropped.
            for child in sorted {
                render_node(child, priority, threshold, out)?;
            }
        }
    }

    Ok(())
}

/// Children ordered by priority, highest first.
///
/// `sort_by` is a stable sort, so children with equal priority keep their
/// authored order. Top-k and min-k selection both depend on this.
pub fn sorted_by_priority(children: &[Node], inherited: Priority) -> Vec<&Node> {
    let mut sorted: Vec<&Node> = children.iter().collect();
    sorted.sort_by(|a, b| {
        b.effective_priority(inherited)
            .cmp(&a.effective_priority(inherited))
    });
    sorted
}
