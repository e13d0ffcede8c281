use crate::types::errors::PriorityError;
use crate::types::identifiers::Priority;
use crate::types::render_bundle::Role;

/// A content node. Content nodes live below a [`Message`]; only messages and
/// reservations may appear at the root of a chain (see [`Element`]).
///
/// Priorities are `None` until an ancestor with a concrete priority is built,
/// at which point they inherit it. Inside a built [`Message`] every
/// priority-bearing node has a concrete priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Scope(Scope),
    TopK(TopK),
    MinK(MinK),
    Reserve(Reserve),
}

/// Groups children under a shared priority without adding output of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub(crate) priority: Option<Priority>,
    pub(crate) children: Vec<Node>,
}

/// Renders at most `k` children, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopK {
    pub(crate) priority: Option<Priority>,
    pub(crate) k: usize,
    pub(crate) children: Vec<Node>,
}

/// Fails the render unless at least `m` children survive the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinK {
    pub(crate) priority: Option<Priority>,
    pub(crate) m: usize,
    pub(crate) children: Vec<Node>,
}

/// Token space held back from the prompt, e.g. for the completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reserve {
    pub(crate) priority: Option<Priority>,
    pub(crate) tokens: usize,
}

/// One chat turn. Its priority is always concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub(crate) role: Role,
    pub(crate) priority: Priority,
    pub(crate) children: Vec<Node>,
}

/// A root-level entry of a [`Chain`](crate::node::Chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Message(Message),
    Reserve(Reserve),
}

impl Node {
    /// Own priority, `None` for text and for nodes still waiting to inherit.
    pub fn priority(&self) -> Option<Priority> {
        match self {
            Node::Text(_) => None,
            Node::Scope(scope) => scope.priority,
            Node::TopK(top_k) => top_k.priority,
            Node::MinK(min_k) => min_k.priority,
            Node::Reserve(reserve) => reserve.priority,
        }
    }

    /// Priority used for filtering and sorting: text (and anything pending)
    /// takes the priority of its nearest priority-bearing ancestor.
    pub fn effective_priority(&self, inherited: Priority) -> Priority {
        self.priority().unwrap_or(inherited)
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Scope(scope) => &scope.children,
            Node::TopK(top_k) => &top_k.children,
            Node::MinK(min_k) => &min_k.children,
            Node::Text(_) | Node::Reserve(_) => &[],
        }
    }

    /// Place this node under a parent whose priority is `parent`.
    ///
    /// A pending node inherits `parent` and passes it on to its own pending
    /// descendants, checking any explicit descendant priorities on the way.
    /// A node that already has a priority only needs to be compared with the
    /// parent: its subtree was checked when it was built.
    pub(crate) fn settle(self, parent: Priority) -> Result<Node, PriorityError> {
        if let Some(child) = self.priority() {
            if child > parent {
                return Err(PriorityError::ChildExceedsParent { child, parent });
            }
            return Ok(self);
        }

        let node = match self {
            Node::Text(text) => Node::Text(text),
            Node::Scope(scope) => Node::Scope(Scope {
                priority: Some(parent),
                children: settle_all(scope.children, parent)?,
            }),
            Node::TopK(top_k) => Node::TopK(TopK {
                priority: Some(parent),
                k: top_k.k,
                children: settle_all(top_k.children, parent)?,
            }),
            Node::MinK(min_k) => Node::MinK(MinK {
                priority: Some(parent),
                m: min_k.m,
                children: settle_all(min_k.children, parent)?,
            }),
            Node::Reserve(reserve) => Node::Reserve(Reserve {
                priority: Some(parent),
                tokens: reserve.tokens,
            }),
        };

        Ok(node)
    }
}

pub(crate) fn settle_all(children: Vec<Node>, parent: Priority) -> Result<Vec<Node>, PriorityError> {
    children
        .into_iter()
        .map(|child| child.settle(parent))
        .collect()
}

impl Scope {
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl TopK {
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl MinK {
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl Reserve {
    pub fn new(tokens: usize) -> Self {
        Self {
            priority: None,
            tokens,
        }
    }

    /// Reservations have no children, so setting a priority cannot fail.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn tokens(&self) -> usize {
        self.tokens
    }
}

impl Message {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<Scope> for Node {
    fn from(scope: Scope) -> Self {
        Node::Scope(scope)
    }
}

impl From<TopK> for Node {
    fn from(top_k: TopK) -> Self {
        Node::TopK(top_k)
    }
}

impl From<MinK> for Node {
    fn from(min_k: MinK) -> Self {
        Node::MinK(min_k)
    }
}

impl From<Reserve> for Node {
    fn from(reserve: Reserve) -> Self {
        Node::Reserve(reserve)
    }
}

impl From<Message> for Element {
    fn from(message: Message) -> Self {
        Element::Message(message)
    }
}

impl From<Reserve> for Element {
    fn from(reserve: Reserve) -> Self {
        Element::Reserve(reserve)
    }
}
