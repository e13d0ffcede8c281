use std::collections::BTreeSet;

use crate::node::node::{Element, Message, Node, Reserve};
use crate::types::identifiers::Priority;

/// The root of a prompt: messages and reservations in declaration order.
///
/// A chain is immutable once built and can be rendered any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    elements: Vec<Element>,
}

impl Chain {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.elements.iter().filter_map(|element| match element {
            Element::Message(message) => Some(message),
            Element::Reserve(_) => None,
        })
    }

    /// Reservations placed directly at the root.
    pub fn root_reservations(&self) -> impl Iterator<Item = &Reserve> {
        self.elements.iter().filter_map(|element| match element {
            Element::Reserve(reserve) => Some(reserve),
            Element::Message(_) => None,
        })
    }

    /// Every distinct priority found inside the chain's messages. These are
    /// the only thresholds worth rendering at. Root-level reservations are
    /// always charged, so they add no candidates.
    pub fn priorities(&self) -> BTreeSet<Priority> {
        let mut priorities = BTreeSet::new();
        for message in self.messages() {
            priorities.insert(message.priority());
            collect_priorities(message.children(), message.priority(), &mut priorities);
        }
        priorities
    }
}

fn collect_priorities(nodes: &[Node], inherited: Priority, out: &mut BTreeSet<Priority>) {
    for node in nodes {
        if let Node::Text(_) = node {
            continue;
        }
        let priority = node.effective_priority(inherited);
        out.insert(priority);
        collect_priorities(node.children(), priority, out);
    }
}
