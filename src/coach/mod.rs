//! AI coaching layer
//!
//! Renders trade data into prompts and calls a chat-completion API to
//! produce coaching commentary. Prompt construction is pure; only the
//! client performs I/O.

mod client;
mod prompt;


pub use client::CoachClient;
pub use prompt::{
    analysis_prompt, chat_prompt, insights_prompt, TradeSnapshot, ANALYSIS_SYSTEM_PROMPT,
    CHAT_SYSTEM_PROMPT, INSIGHTS_SYSTEM_PROMPT, NO_TRADES_INSIGHTS, RECENT_TRADES_PREVIEW,
};

use crate::error::Result;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// Response budget for single-trade analysis
pub const ANALYSIS_MAX_TOKENS: u32 = 1500;
/// Response budget for full-history insights
pub const INSIGHTS_MAX_TOKENS: u32 = 2000;
/// Response budget for chat replies
pub const CHAT_MAX_TOKENS: u32 = 1000;

/// Chat-completion backend used for coaching commentary
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CoachModel: Send + Sync {
    /// Run a single completion and return the generated text
    async fn complete(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String>;

    /// Model name for logging
    fn name(&self) -> &str;
}
