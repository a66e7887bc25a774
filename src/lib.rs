//! # Task Agents
//!
//! A task delegation engine for specialized Claude Code CLI agents. Each
//! agent is described by a declarative [`AgentProfile`] (capabilities,
//! model, working directory, instructions); the engine turns a profile plus
//! a natural-language task into one CLI invocation, follows the process's
//! line-delimited JSON event stream in real time, and returns a formatted
//! text response with tool and token accounting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use task_agents::{AgentProfile, TaskEngine, progress_callback};
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = TaskEngine::builder("task-agents")
//!         .session_storage("task-agents/.sessions.json")
//!         .build();
//!
//!     let profile: AgentProfile = serde_json::from_str(
//!         r#"{
//!             "name": "code_reviewer",
//!             "agent_name": "Code Reviewer",
//!             "description": "Reviews code for defects",
//!             "tools": ["Read", "Grep", "Glob"],
//!             "model": "sonnet",
//!             "cwd": ".",
//!             "system_prompt": "You are a meticulous code reviewer.",
//!             "resume_session": true
//!         }"#,
//!     )
//!     .unwrap();
//!
//!     let progress = progress_callback(|notice| async move {
//!         log::info!("{notice}");
//!     });
//!
//!     let response = engine
//!         .execute(&profile, "Review src/lib.rs", false, Some(progress))
//!         .await;
//!     println!("{response}");
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`]: the agent profile record, newtypes, and usage counters
//! - [`event`]: stream-event decoding and the interpreter state machine
//! - [`process`]: CLI discovery, argument construction, child plumbing
//! - [`session`]: persisted session chains for conversational continuity
//! - [`engine`]: orchestration and response formatting
//! - [`error`]: error types and handling
//!
//! ## Behavior notes
//!
//! - Failures of the external process are surfaced in the returned text,
//!   never retried, and never raised to the caller as errors.
//! - Progress notices are delivered in stream order and awaited in-line.
//! - Session chains are bounded: once an agent reaches its configured
//!   exchange count the chain is archived and the next call starts fresh.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod event;
pub mod process;
pub mod session;
pub mod types;

// Re-export commonly used types for a flat public API
pub use engine::{
    EMPTY_RESULT_MESSAGE, ExecutionReport, ProgressCallback, RESOURCE_DIR_PLACEHOLDER,
    TaskEngine, TaskEngineBuilder, progress_callback,
};
pub use error::{AgentError, Result};
pub use event::{ContentBlock, StreamEvent, StreamInterpreter, parse_line};
pub use process::{AgentProcess, CommandBuilder, SystemInstruction, locate_cli};
pub use session::{ChainInfo, SessionChain, SessionChainStore};
pub use types::{AgentProfile, DEFAULT_MAX_EXCHANGES, ResumePolicy, SessionId, TokenUsage, ToolName};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
