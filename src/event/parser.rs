//! Stream event parsing
//!
//! Decodes one line of CLI output into a [`StreamEvent`]. All "unknown
//! event" handling lives here: lines that fail to decode, or decode to an
//! event type the engine does not know, become [`StreamEvent::Unrecognized`]
//! and are logged rather than surfaced. A bad line must never abort the
//! stream.

use serde::Deserialize;

use crate::types::TokenUsage;

/// One decoded line of the CLI's stream-json output
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// System event; `subtype == "init"` carries the session identifier
    System {
        /// System event subtype
        subtype: String,
        /// Session identifier, present on `init`
        #[serde(default)]
        session_id: Option<String>,
    },
    /// Assistant output, possibly partial
    Assistant {
        /// The wrapped message payload
        message: AssistantMessage,
    },
    /// Final consolidated result with usage metrics
    Result {
        /// Authoritative final text, when present
        #[serde(default)]
        result: Option<String>,
        /// Token usage counters
        #[serde(default)]
        usage: Option<TokenUsage>,
        /// Total cost in USD
        #[serde(default)]
        total_cost_usd: Option<f64>,
    },
    /// Any other event type; ignored
    #[serde(other)]
    Unrecognized,
}

/// Assistant message payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantMessage {
    /// Ordered content blocks
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Content block inside an assistant message
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text segment
    Text {
        /// Text content
        text: String,
    },
    /// Tool invocation
    ToolUse {
        /// Tool name
        name: String,
    },
    /// Any other block type; ignored
    #[serde(other)]
    Other,
}

/// Parse one line of CLI output into a [`StreamEvent`]
///
/// Empty lines and undecodable lines yield [`StreamEvent::Unrecognized`].
#[must_use]
pub fn parse_line(line: &str) -> StreamEvent {
    let line = line.trim();
    if line.is_empty() {
        return StreamEvent::Unrecognized;
    }

    match serde_json::from_str::<StreamEvent>(line) {
        Ok(event) => event,
        Err(e) => {
            let preview: String = line.chars().take(100).collect();
            log::warn!("Failed to parse stream line ({e}): {preview}...");
            StreamEvent::Unrecognized
        }
    }
}
