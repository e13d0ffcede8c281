pub mod errors;
pub mod identifiers;
pub mod render_bundle;

pub use errors::{
    InsufficientChildrenError, InvalidPromptError, PriorityError, PromptError, TokenizerError,
    UnknownNodeError,
};
pub use identifiers::{Priority, PromptVersion, MAX_PRIORITY};
pub use render_bundle::{ChatMessage, RenderMetadata, RenderResult, Role};
