pub mod builder;
pub mod chain;
pub mod node;

pub use builder::{
    assistant_message, message, min_k, peel, reserve, scope, system_message, top_k, user_message,
    MessageBuilder, MinKBuilder, ScopeBuilder, TopKBuilder,
};
pub use chain::Chain;
pub use node::{Element, Message, MinK, Node, Reserve, Scope, TopK};
