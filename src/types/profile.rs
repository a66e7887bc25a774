//! Agent profile types
//!
//! An [`AgentProfile`] is the declarative record describing one specialized
//! task persona: which capabilities it may use, which model it runs, where it
//! works, and how it is instructed. Profiles are loaded elsewhere and
//! consumed here read-only.

use serde::{Deserialize, Serialize};

use super::identifiers::ToolName;

/// Maximum exchanges per session chain when the profile enables resume
/// without an explicit bound.
pub const DEFAULT_MAX_EXCHANGES: u32 = 5;

/// Session resume policy for an agent
///
/// Profiles express this as either a boolean (`true` enables resume with the
/// default exchange bound) or an explicit maximum exchange count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumePolicy {
    /// Resume on/off with the default bound
    Enabled(bool),
    /// Resume on with an explicit maximum number of exchanges
    MaxExchanges(u32),
}

impl ResumePolicy {
    /// The effective exchange bound, or `None` if resume is disabled
    #[must_use]
    pub fn max_exchanges(&self) -> Option<u32> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(DEFAULT_MAX_EXCHANGES),
            Self::MaxExchanges(max) => Some(*max),
        }
    }
}

/// Configuration for a single agent persona
///
/// Immutable once loaded. `agent_name` is the display name and the unique
/// key under which session chains are tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Internal identifier (profile file stem)
    pub name: String,
    /// Display name, unique key for session chaining
    pub agent_name: String,
    /// Human-readable description of what this agent is for
    pub description: String,
    /// Ordered allow-list of capability names
    pub tools: Vec<ToolName>,
    /// Model identifier passed to the CLI
    pub model: String,
    /// Working directory specification: a literal path, an
    /// environment-expandable string, or `"."` meaning the parent of the
    /// profile source directory
    pub cwd: String,
    /// Base system instruction text
    pub system_prompt: String,
    /// Session resume policy; absent means disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_session: Option<ResumePolicy>,
    /// Auxiliary resource directories, resolved relative to the working
    /// directory unless absolute
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_dirs: Vec<String>,
}

impl AgentProfile {
    /// The effective resume bound, or `None` if resume is disabled
    #[must_use]
    pub fn resume_max_exchanges(&self) -> Option<u32> {
        self.resume_session.as_ref().and_then(ResumePolicy::max_exchanges)
    }
}
