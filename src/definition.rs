//! Declarative chain definitions.
//!
//! A chain can be described as JSON: a list whose entries are either plain
//! strings (text) or objects with a `type` tag. Definitions are converted
//! through the same builders as hand-written chains, so the same priority
//! rules apply.
//!
//! ```json
//! [
//!   {"type": "reserve", "tokens": 256},
//!   {"type": "system", "priority": 100, "children": [
//!     "You are a helpful assistant.",
//!     {"type": "top_k", "k": 2, "priority": 10, "children": ["a", "b", "c"]}
//!   ]}
//! ]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::node::{message, min_k, reserve, scope, top_k, Chain, Element, Node, Reserve};
use crate::types::errors::{InvalidPromptError, PromptError, UnknownNodeError};
use crate::types::identifiers::Priority;
use crate::types::render_bundle::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainDefinition {
    pub elements: Vec<NodeDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeDefinition {
    Text(String),
    Node(NodeFields),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFields {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

enum Kind {
    Message(Role),
    Scope,
    TopK,
    MinK,
    Reserve,
}

impl NodeFields {
    fn kind(&self) -> Result<Kind, UnknownNodeError> {
        let kind = match self.kind.as_str() {
            "system" => Kind::Message(Role::System),
            "user" => Kind::Message(Role::User),
            "assistant" => Kind::Message(Role::Assistant),
            "scope" => Kind::Scope,
            "top_k" => Kind::TopK,
            "min_k" => Kind::MinK,
            "reserve" => Kind::Reserve,
            other => return Err(UnknownNodeError(other.to_string())),
        };
        Ok(kind)
    }

    fn required(&self, value: Option<usize>, field: &'static str) -> Result<usize, InvalidPromptError> {
        value.ok_or_else(|| InvalidPromptError::MissingField {
            kind: self.kind.clone(),
            field,
        })
    }

    fn into_children(self) -> Result<Vec<Node>, PromptError> {
        self.children.into_iter().map(NodeDefinition::into_node).collect()
    }

    fn into_reserve(self) -> Result<Reserve, PromptError> {
        if !self.children.is_empty() {
            return Err(InvalidPromptError::UnexpectedChildren(self.kind).into());
        }
        let reservation = reserve(self.required(self.tokens, "tokens")?);
        Ok(match self.priority {
            Some(priority) => reservation.with_priority(priority),
            None => reservation,
        })
    }
}

impl NodeDefinition {
    fn into_node(self) -> Result<Node, PromptError> {
        let fields = match self {
            NodeDefinition::Text(text) => return Ok(Node::Text(text)),
            NodeDefinition::Node(fields) => fields,
        };

        let priority = fields.priority;
        let node = match fields.kind()? {
            Kind::Message(_) => return Err(InvalidPromptError::RootOnly(fields.kind).into()),
            Kind::Reserve => Node::Reserve(fields.into_reserve()?),
            Kind::Scope => {
                let builder = scope().children(fields.into_children()?);
                Node::Scope(builder.maybe_priority(priority).build()?)
            }
            Kind::TopK => {
                let k = fields.required(fields.k, "k")?;
                let builder = top_k(k).children(fields.into_children()?);
                Node::TopK(builder.maybe_priority(priority).build()?)
            }
            Kind::MinK => {
                let m = fields.required(fields.m, "m")?;
                let builder = min_k(m).children(fields.into_children()?);
                Node::MinK(builder.maybe_priority(priority).build()?)
            }
        };

        Ok(node)
    }

    fn into_element(self) -> Result<Element, PromptError> {
        let fields = match self {
            NodeDefinition::Text(_) => {
                return Err(InvalidPromptError::NotAllowedAtRoot("text".to_string()).into())
            }
            NodeDefinition::Node(fields) => fields,
        };

        let element = match fields.kind()? {
            Kind::Message(role) => {
                let priority = fields.priority;
                let builder = message(role).children(fields.into_children()?);
                Element::Message(builder.maybe_priority(priority).build()?)
            }
            Kind::Reserve => Element::Reserve(fields.into_reserve()?),
            Kind::Scope | Kind::TopK | Kind::MinK => {
                return Err(InvalidPromptError::NotAllowedAtRoot(fields.kind).into())
            }
        };

        Ok(element)
    }
}

impl ChainDefinition {
    pub fn from_json(json: &str) -> Result<Self, PromptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PromptError> {
        let raw = fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Build and validate the chain.
    pub fn into_chain(self) -> Result<Chain, PromptError> {
        let elements = self
            .elements
            .into_iter()
            .map(NodeDefinition::into_element)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Chain::new(elements))
    }
}
