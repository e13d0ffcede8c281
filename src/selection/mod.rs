pub mod budgeting;
pub mod ranking;
pub mod render;

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::RenderConfig;
use crate::node::Chain;
use crate::types::errors::{PriorityError, PromptError, TokenizerError};
use crate::types::identifiers::{Priority, PromptVersion};
use crate::types::render_bundle::{ChatMessage, RenderMetadata, RenderResult};
pub use budgeting::{measure, reserved_tokens, CandidateCost};
pub use ranking::{ApproxTokenCounter, Cl100kTokenCounter, TokenCounter};
pub use render::{render_priority, sorted_by_priority};

/// Threshold used when a chain holds no priorities at all.
pub const TRIVIAL_THRESHOLD: Priority = 0;

pub struct PromptRenderer<T> {
	tokenizer: T,
}

impl Default for PromptRenderer<ApproxTokenCounter> {
	fn default() -> Self {
		Self {
			tokenizer: ApproxTokenCounter,
		}
	}
}

impl PromptRenderer<Cl100kTokenCounter> {
	pub fn cl100k() -> Result<Self, TokenizerError> {
		Ok(Self::new(Cl100kTokenCounter::new()?))
	}
}

impl PromptRenderer<Box<dyn TokenCounter>> {
	pub fn from_config(config: &RenderConfig) -> Result<Self, TokenizerError> {
		Ok(Self::new(config.tokenizer()?))
	}
}

/// Outcome of the threshold search, kept whole so the winning render is
/// never computed twice.
struct Accepted {
	messages: Vec<ChatMessage>,
	cost: CandidateCost,
	candidates_considered: usize,
}

impl<T> PromptRenderer<T>
where
	T: TokenCounter,
{
	pub fn new(tokenizer: T) -> Self {
		Self { tokenizer }
	}

	pub fn tokenizer(&self) -> &T {
		&self.tokenizer
	}

	/// Render the largest part of `chain` that fits in `budget` tokens.
	/// `None` means unbounded.
	pub fn render(&self, chain: &Chain, budget: Option<usize>) -> Result<Vec<ChatMessage>, PromptError> {
		let accepted = self.search(chain, &chain.priorities(), budget)?;
		Ok(accepted.messages)
	}

	/// Like [`render`](Self::render), with the chosen threshold, token
	/// accounting and a content version attached.
	pub fn render_detailed(&self, chain: &Chain, budget: Option<usize>) -> Result<RenderResult, PromptError> {
		let Accepted {
			messages,
			cost,
			candidates_considered,
		} = self.search(chain, &chain.priorities(), budget)?;

		let metadata = RenderMetadata {
			budget,
			threshold: cost.threshold,
			tokens_used: cost.total(),
			prompt_tokens: cost.prompt_tokens,
			reserved_tokens: cost.reserved_tokens,
			candidates_considered,
		};

		Ok(RenderResult {
			version: PromptVersion::from_messages(&messages),
			messages,
			render: metadata,
		})
	}

	/// The lowest candidate threshold whose render fits in `budget`.
	pub fn optimal_priority(
		&self,
		chain: &Chain,
		candidates: &BTreeSet<Priority>,
		budget: Option<usize>,
	) -> Result<Priority, PromptError> {
		Ok(self.search(chain, candidates, budget)?.cost.threshold)
	}

	fn search(
		&self,
		chain: &Chain,
		candidates: &BTreeSet<Priority>,
		budget: Option<usize>,
	) -> Result<Accepted, PromptError> {
		// 0. Nothing to prune: the budget is not consulted
		if candidates.is_empty() {
			let (messages, cost) = measure(chain, &self.tokenizer, TRIVIAL_THRESHOLD)?;
			return Ok(Accepted {
				messages,
				cost,
				candidates_considered: 0,
			});
		}

		// 1. Ascending order: the lowest threshold keeps the most content
		let mut min_required: Option<usize> = None;
		for (index, &threshold) in candidates.iter().enumerate() {
			let (messages, cost) = measure(chain, &self.tokenizer, threshold)?;
			debug!(
				threshold,
				prompt_tokens = cost.prompt_tokens,
				reserved_tokens = cost.reserved_tokens,
				budget = ?budget,
				"evaluated candidate threshold"
			);

			let fits = budget.map_or(true, |budget| cost.total() <= budget);
			if fits {
				debug!(threshold, tokens_used = cost.total(), "accepted threshold");
				return Ok(Accepted {
					messages,
					cost,
					candidates_considered: index + 1,
				});
			}

			min_required = Some(min_required.map_or(cost.total(), |min| min.min(cost.total())));
		}

		// 2. Only reachable with a bounded budget and at least one candidate
		let required = min_required.unwrap_or_default();
		let budget = budget.unwrap_or_default();
		debug!(required, budget, "no candidate threshold fits the token budget");
		Err(PriorityError::TokenSpaceExceeded { required, budget }.into())
	}
}
