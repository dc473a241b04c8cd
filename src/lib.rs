//! WWJD: scripture guidance and a prayer wall, answered by the Anthropic
//! Messages API.

pub mod config;
pub mod constants;
pub mod error;
pub mod guidance;
pub mod llm_interaction;
pub mod prayer;
pub mod prompts;
pub mod scripture;
pub mod web_server;

pub use config::ProviderConfig;
pub use llm_interaction::AnthropicClient;
pub use prayer::{PrayerType, PrayerWall};
pub use scripture::ScriptureResponse;
