//! Token usage counters reported by the CLI result event

use serde::{Deserialize, Serialize};

/// Token usage statistics from a completed execution
///
/// The CLI reports more fields than these; anything beyond the input/output
/// counters is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens consumed
    #[serde(default)]
    pub input_tokens: u64,
    /// Output tokens produced
    #[serde(default)]
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Total tokens across input and output
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
