//! Response formatting
//!
//! Assembles the final text returned to the caller. Every path out of the
//! engine ends here: the ordered success response, the process-failure
//! string, the benign empty-result message, and the boundary rendering of
//! internal errors.

use crate::error::AgentError;
use crate::types::TokenUsage;

/// Returned when the process exits cleanly without producing any assistant
/// content. Distinct from a hard failure.
pub const EMPTY_RESULT_MESSAGE: &str =
    "Task completed but no response message was generated.";

/// Everything the success response is assembled from
#[derive(Debug)]
pub struct ExecutionReport<'a> {
    /// Session id captured from the init event
    pub session_id: Option<&'a str>,
    /// (exchange count, max exchanges) when resume is enabled
    pub exchange: Option<(u32, u32)>,
    /// Tools invoked, in order
    pub tools_used: &'a [String],
    /// Assembled answer text
    pub answer: &'a str,
    /// Token usage, if reported
    pub usage: Option<TokenUsage>,
}

/// Render the ordered success response
///
/// Fixed order: session line, exchange-progress line, tool summary line, the
/// answer, token footer. Header lines that do not apply are omitted.
#[must_use]
pub fn render_report(report: &ExecutionReport<'_>) -> String {
    let mut out = String::new();

    if let Some(session_id) = report.session_id {
        out.push_str(&format!("Session: {session_id}\n"));
    }
    if let Some((count, max)) = report.exchange {
        out.push_str(&format!("Exchange {count}/{max}\n"));
    }
    if !report.tools_used.is_empty() {
        out.push_str(&format!("Tools used: {}\n", report.tools_used.join(", ")));
    }
    if !out.is_empty() {
        out.push('\n');
    }

    out.push_str(report.answer);

    if let Some(usage) = report.usage {
        out.push_str(&format!(
            "\n\nTokens: {} ({} in, {} out)",
            group_thousands(usage.total()),
            group_thousands(usage.input_tokens),
            group_thousands(usage.output_tokens)
        ));
    }

    out
}

/// Render a non-zero exit as an error string
///
/// Some failures still print partial output before dying, so any assembled
/// stdout text rides along under a heading.
#[must_use]
pub fn render_process_failure(exit_code: i32, stderr: &str, partial: Option<&str>) -> String {
    let error_text = if stderr.trim().is_empty() {
        "Unknown error"
    } else {
        stderr.trim_end()
    };

    let mut out =
        format!("Error executing Claude CLI (return code {exit_code}): {error_text}");
    if let Some(partial) = partial.filter(|p| !p.is_empty()) {
        out.push_str(&format!("\n\nPartial output:\n{partial}"));
    }
    out
}

/// Render an internal error at the engine boundary
///
/// The caller always receives text; configuration errors keep their
/// well-known wording.
#[must_use]
pub fn render_error(err: &AgentError) -> String {
    match err {
        AgentError::CliNotFound(_) => {
            "Error: Claude CLI not found. Please ensure 'claude' is installed and in PATH."
                .to_string()
        }
        AgentError::WorkingDirMissing(path) => {
            format!("Error: Working directory does not exist: {path}")
        }
        other => format!("Error executing task: {other}"),
    }
}

/// Format a count with thousands separators
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
