use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::selection::ranking::{ApproxTokenCounter, Cl100kTokenCounter, TokenCounter};
use crate::types::errors::{PromptError, TokenizerError};

/// Context windows of common models, rounded down for safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSpace {
    Gpt4,
    #[serde(rename = "gpt4_32k")]
    Gpt4ThirtyTwoK,
    Gpt4Turbo,
    EightK,
    TwelveK,
    SixteenK,
    /// Leaves some leeway below a 35k window.
    ThirtyFourK,
    Claude3,
}

impl TokenSpace {
    pub fn tokens(&self) -> usize {
        match self {
            TokenSpace::Gpt4 => 8_000,
            TokenSpace::Gpt4ThirtyTwoK => 32_000,
            TokenSpace::Gpt4Turbo => 120_000,
            TokenSpace::EightK => 8_000,
            TokenSpace::TwelveK => 12_000,
            TokenSpace::SixteenK => 16_000,
            TokenSpace::ThirtyFourK => 34_000,
            TokenSpace::Claude3 => 200_000,
        }
    }
}

/// A budget, either as a raw count or a named preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenBudget {
    Tokens(usize),
    Preset(TokenSpace),
}

impl TokenBudget {
    pub fn tokens(&self) -> usize {
        match self {
            TokenBudget::Tokens(tokens) => *tokens,
            TokenBudget::Preset(space) => space.tokens(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    #[default]
    Cl100kBase,
    Approx,
}

// Key point:
// Serializable
// Comparable
// Explicit defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// `None` renders unbounded.
    #[serde(default)]
    pub token_space: Option<TokenBudget>,
    #[serde(default)]
    pub tokenizer: TokenizerKind,
}

impl RenderConfig {
    pub fn v0() -> Self {
        Self {
            token_space: None,
            tokenizer: TokenizerKind::Cl100kBase,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, PromptError> {
        let raw = fs::read(path)?;
        let config = serde_json::from_slice(&raw)?;
        Ok(config)
    }

    pub fn budget(&self) -> Option<usize> {
        self.token_space.map(|space| space.tokens())
    }

    pub fn tokenizer(&self) -> Result<Box<dyn TokenCounter>, TokenizerError> {
        let tokenizer: Box<dyn TokenCounter> = match self.tokenizer {
            TokenizerKind::Cl100kBase => Box::new(Cl100kTokenCounter::new()?),
            TokenizerKind::Approx => Box::new(ApproxTokenCounter),
        };
        Ok(tokenizer)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::v0()
    }
}
