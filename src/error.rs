//! Error types for the task execution engine

use thiserror::Error;

/// Main error type for the task execution engine
#[derive(Error, Debug)]
pub enum AgentError {
    /// Claude Code CLI not found or not installed
    #[error("Claude CLI not found: {0}")]
    CliNotFound(String),

    /// The resolved working directory does not exist
    #[error("Working directory does not exist: {0}")]
    WorkingDirMissing(String),

    /// Failed to spawn or communicate with the agent process
    #[error("Spawn error: {0}")]
    Spawn(String),

    /// Process execution error with exit code and stderr
    #[error("Process error (exit code {exit_code}): {message}")]
    Process {
        /// Error message
        message: String,
        /// Process exit code
        exit_code: i32,
        /// Standard error output
        stderr: Option<String>,
    },

    /// JSON decode error when persisting or loading state
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// Session chain persistence error
    #[error("Session store error: {0}")]
    SessionStore(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    /// Create a CLI not found error
    #[must_use]
    pub fn cli_not_found() -> Self {
        Self::CliNotFound(
            "Claude Code not found. Install with:\n\
             npm install -g @anthropic-ai/claude-code\n\
             \n\
             Or point CLAUDE_EXECUTABLE_PATH at an existing install"
                .to_string(),
        )
    }

    /// Create a spawn error
    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    /// Create a process error
    pub fn process(msg: impl Into<String>, exit_code: i32, stderr: Option<String>) -> Self {
        Self::Process {
            message: msg.into(),
            exit_code,
            stderr,
        }
    }

    /// Create a session store error
    pub fn session_store(msg: impl Into<String>) -> Self {
        Self::SessionStore(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
