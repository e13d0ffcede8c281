//! Priority-driven prompt assembly for LLMs.
//!
//! `prompt-peel` builds multi-turn prompts from a tree of prioritized
//! fragments and renders the largest subset of that tree that fits a token
//! budget. Lower-priority branches are peeled away first; messages are never
//! dropped or reordered, only emptied. Rendering is deterministic: the same
//! chain, tokenizer and budget always produce the same messages.
//!
//! ```
//! use prompt_peel::node::{peel, scope, system_message, user_message};
//! use prompt_peel::selection::PromptRenderer;
//!
//! let chain = peel([
//!     system_message().child("You are terse.").build()?,
//!     user_message()
//!         .child(scope().child("Some background. ").priority(1).build()?)
//!         .child("The question?")
//!         .priority(50)
//!         .build()?,
//! ]);
//!
//! let messages = PromptRenderer::default().render(&chain, None)?;
//! assert_eq!(messages[1].content, "Some background. The question?");
//! # Ok::<(), prompt_peel::types::PromptError>(())
//! ```

pub mod config;
pub mod definition;
pub mod format;
pub mod node;
pub mod selection;
pub mod types;

pub use config::RenderConfig;
pub use definition::ChainDefinition;
pub use node::{peel, Chain};
pub use selection::{PromptRenderer, TokenCounter};
pub use types::{ChatMessage, PromptError, RenderResult, Role};
