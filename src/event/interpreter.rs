//! Stream event interpreter
//!
//! A pure state machine that folds [`StreamEvent`]s, in receipt order, into
//! the accumulated execution state. Applying an event may yield a progress
//! notice; the engine owns the callback and awaits it in-line so notices are
//! delivered in emission order.

use crate::types::TokenUsage;

use super::parser::{ContentBlock, StreamEvent};

/// Accumulated state of one streamed execution
///
/// Intermediate assistant text is collected as ordered segments. A `result`
/// event carrying final text is authoritative: it replaces the segments so
/// the answer never duplicates partial output.
#[derive(Debug, Default)]
pub struct StreamInterpreter {
    session_id: Option<String>,
    segments: Vec<String>,
    final_text: Option<String>,
    tools_used: Vec<String>,
    usage: Option<TokenUsage>,
    total_cost_usd: Option<f64>,
}

impl StreamInterpreter {
    /// Create an empty interpreter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the state, returning a progress notice if the
    /// event warrants one
    pub fn apply(&mut self, event: StreamEvent) -> Option<String> {
        match event {
            StreamEvent::System { subtype, session_id } => {
                if subtype == "init"
                    && let Some(id) = session_id
                {
                    // A later init overwrites; the CLI may re-announce
                    self.session_id = Some(id);
                }
                None
            }
            StreamEvent::Assistant { message } => {
                let mut notice = None;
                for block in message.content {
                    match block {
                        ContentBlock::Text { text } => {
                            if !text.is_empty() {
                                log::debug!("Assistant text segment: {:.100}", text);
                                self.segments.push(text);
                            }
                        }
                        ContentBlock::ToolUse { name } => {
                            self.tools_used.push(name.clone());
                            notice = Some(format!(
                                "🔧 Using tool: {} (#{})",
                                name,
                                self.tools_used.len()
                            ));
                        }
                        ContentBlock::Other => {}
                    }
                }
                notice
            }
            StreamEvent::Result {
                result,
                usage,
                total_cost_usd,
            } => {
                if let Some(text) = result {
                    log::debug!("Result text: {:.100}", text);
                    self.final_text = Some(text);
                }
                if usage.is_some() {
                    self.usage = usage;
                }
                if total_cost_usd.is_some() {
                    self.total_cost_usd = total_cost_usd;
                }
                Some("✅ Task completed!".to_string())
            }
            StreamEvent::Unrecognized => None,
        }
    }

    /// Session identifier captured from the `init` event, if any
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Names of the tools invoked, in order
    #[must_use]
    pub fn tools_used(&self) -> &[String] {
        &self.tools_used
    }

    /// Token usage, if the result event reported it
    #[must_use]
    pub fn usage(&self) -> Option<TokenUsage> {
        self.usage
    }

    /// Total cost in USD, if reported
    #[must_use]
    pub fn total_cost_usd(&self) -> Option<f64> {
        self.total_cost_usd
    }

    /// The assembled answer text
    ///
    /// Final result text wins; otherwise accumulated segments joined with
    /// newlines; `None` if no assistant content was ever captured.
    #[must_use]
    pub fn answer(&self) -> Option<String> {
        if let Some(text) = &self.final_text {
            return Some(text.clone());
        }
        if self.segments.is_empty() {
            None
        } else {
            Some(self.segments.join("\n"))
        }
    }
}
