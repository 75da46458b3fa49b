//! Expert Analyst Adapters
//!
//! - **AnthropicExpertAnalyst** - Anthropic Messages API
//! - **MockExpertAnalyst** - Scripted replies for tests and offline runs

mod anthropic_expert_analyst;
mod mock_expert_analyst;

pub use anthropic_expert_analyst::{AnthropicAnalystConfig, AnthropicExpertAnalyst};
pub use mock_expert_analyst::{MockExpertAnalyst, MockReply};
