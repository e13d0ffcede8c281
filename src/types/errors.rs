use thiserror::Error;

use crate::types::identifiers::Priority;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityError {
    #[error("Children cannot have higher priority than parent: child has {child}, parent has {parent}")]
    ChildExceedsParent { child: Priority, parent: Priority },

    #[error(
        "The minimum required token space is {required} which cannot satisfy the constraint of {budget} tokens. \
         Please increase token space or reduce prompt size."
    )]
    TokenSpaceExceeded { required: usize, budget: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "MinK node has {found} valid children with priority of at least {threshold} but requires at least {required}"
)]
pub struct InsufficientChildrenError {
    pub found: usize,
    pub required: usize,
    pub threshold: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown node type `{0}`")]
pub struct UnknownNodeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPromptError {
    #[error("`{0}` nodes cannot appear at the root of a chain")]
    NotAllowedAtRoot(String),

    #[error("`{0}` nodes can only appear at the root of a chain")]
    RootOnly(String),

    #[error("`{kind}` node is missing required field `{field}`")]
    MissingField {
        kind: String,
        field: &'static str,
    },

    #[error("`{0}` nodes cannot have children")]
    UnexpectedChildren(String),
}

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("Failed to load {encoding} encoding: {reason}")]
    Load {
        encoding: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error(transparent)]
    Priority(#[from] PriorityError),

    #[error(transparent)]
    InsufficientChildren(#[from] InsufficientChildrenError),

    #[error(transparent)]
    UnknownNode(#[from] UnknownNodeError),

    #[error(transparent)]
    InvalidPrompt(#[from] InvalidPromptError),

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
