//! Builders for prompt trees.
//!
//! Trees are assembled inside-out: children are fully built before they are
//! handed to a parent. `build()` is where a parent settles its children,
//! handing its priority down to any child that has none and rejecting
//! children whose priority is higher than its own.
//!
//! ```
//! use prompt_peel::node::{peel, scope, system_message, top_k};
//!
//! let chain = peel([system_message()
//!     .child("1")
//!     .child(top_k(1).child(" 2").child(" 3").priority(10).build()?)
//!     .child(scope().child(" footer").priority(5).build()?)
//!     .priority(100)
//!     .build()?]);
//!
//! assert_eq!(chain.priorities().into_iter().collect::<Vec<_>>(), vec![5, 10, 100]);
//! # Ok::<(), prompt_peel::types::PriorityError>(())
//! ```

use crate::node::chain::Chain;
use crate::node::node::{settle_all, Element, Message, MinK, Node, Reserve, Scope, TopK};
use crate::types::errors::PriorityError;
use crate::types::identifiers::{Priority, MAX_PRIORITY};
use crate::types::render_bundle::Role;

/// Children and priority shared by every parent builder.
#[derive(Debug, Default)]
struct Branch {
    priority: Option<Priority>,
    children: Vec<Node>,
}

impl Branch {
    /// With a concrete priority the children are settled now. Without one
    /// they stay pending until an ancestor provides it.
    fn settle(self) -> Result<(Option<Priority>, Vec<Node>), PriorityError> {
        let children = match self.priority {
            Some(priority) => settle_all(self.children, priority)?,
            None => self.children,
        };
        Ok((self.priority, children))
    }
}

macro_rules! branch_methods {
    ($builder:ident) => {
        impl $builder {
            pub fn child(mut self, child: impl Into<Node>) -> Self {
                self.branch.children.push(child.into());
                self
            }

            pub fn children<I>(mut self, children: I) -> Self
            where
                I: IntoIterator,
                I::Item: Into<Node>,
            {
                self.branch
                    .children
                    .extend(children.into_iter().map(Into::into));
                self
            }

            pub fn priority(mut self, priority: Priority) -> Self {
                self.branch.priority = Some(priority);
                self
            }

            /// `None` leaves the priority to be inherited from the parent.
            pub fn maybe_priority(mut self, priority: Option<Priority>) -> Self {
                self.branch.priority = priority;
                self
            }
        }
    };
}

#[derive(Debug)]
pub struct MessageBuilder {
    role: Role,
    branch: Branch,
}

#[derive(Debug, Default)]
pub struct ScopeBuilder {
    branch: Branch,
}

#[derive(Debug)]
pub struct TopKBuilder {
    k: usize,
    branch: Branch,
}

#[derive(Debug)]
pub struct MinKBuilder {
    m: usize,
    branch: Branch,
}

branch_methods!(MessageBuilder);
branch_methods!(ScopeBuilder);
branch_methods!(TopKBuilder);
branch_methods!(MinKBuilder);

impl MessageBuilder {
    /// A message is always the top of its tree, so a missing priority
    /// becomes [`MAX_PRIORITY`].
    pub fn build(self) -> Result<Message, PriorityError> {
        let priority = self.branch.priority.unwrap_or(MAX_PRIORITY);
        let children = settle_all(self.branch.children, priority)?;

        Ok(Message {
            role: self.role,
            priority,
            children,
        })
    }
}

impl ScopeBuilder {
    pub fn build(self) -> Result<Scope, PriorityError> {
        let (priority, children) = self.branch.settle()?;
        Ok(Scope { priority, children })
    }
}

impl TopKBuilder {
    pub fn build(self) -> Result<TopK, PriorityError> {
        let (priority, children) = self.branch.settle()?;
        Ok(TopK {
            priority,
            k: self.k,
            children,
        })
    }
}

impl MinKBuilder {
    pub fn build(self) -> Result<MinK, PriorityError> {
        let (priority, children) = self.branch.settle()?;
        Ok(MinK {
            priority,
            m: self.m,
            children,
        })
    }
}

pub fn message(role: Role) -> MessageBuilder {
    MessageBuilder {
        role,
        branch: Branch::default(),
    }
}

pub fn system_message() -> MessageBuilder {
    message(Role::System)
}

pub fn user_message() -> MessageBuilder {
    message(Role::User)
}

pub fn assistant_message() -> MessageBuilder {
    message(Role::Assistant)
}

pub fn scope() -> ScopeBuilder {
    ScopeBuilder::default()
}

/// Keep at most `k` children, chosen by priority.
pub fn top_k(k: usize) -> TopKBuilder {
    TopKBuilder {
        k,
        branch: Branch::default(),
    }
}

/// Require at least `m` children to survive the threshold.
pub fn min_k(m: usize) -> MinKBuilder {
    MinKBuilder {
        m,
        branch: Branch::default(),
    }
}

pub fn reserve(tokens: usize) -> Reserve {
    Reserve::new(tokens)
}

/// Assemble a chain from messages and root-level reservations.
pub fn peel<I>(elements: I) -> Chain
where
    I: IntoIterator,
    I::Item: Into<Element>,
{
    Chain::new(elements.into_iter().map(Into::into).collect())
}
