//! Claude CLI executable discovery
//!
//! Priority order: explicit override path, then a system binary search, then
//! a small set of well-known install locations. Failure here is a
//! configuration error reported before any process is spawned.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{AgentError, Result};

/// Environment variable naming an explicit CLI path override
pub const CLI_PATH_ENV: &str = "CLAUDE_EXECUTABLE_PATH";

/// Locate the Claude CLI binary
///
/// `override_path` (typically from the engine builder) takes precedence over
/// the `CLAUDE_EXECUTABLE_PATH` environment variable; both take precedence
/// over the search.
///
/// # Errors
/// Returns [`AgentError::CliNotFound`] if no candidate exists.
pub fn locate_cli(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit_override(override_path) {
        return Ok(path);
    }

    if let Ok(path) = which::which("claude") {
        return Ok(path);
    }

    let home = env::var("HOME").unwrap_or_else(|_| String::from("/root"));
    let locations = [
        PathBuf::from(&home).join(".claude/local/claude"),
        PathBuf::from(&home).join(".npm-global/bin/claude"),
        PathBuf::from("/usr/local/bin/claude"),
        PathBuf::from(&home).join(".local/bin/claude"),
        PathBuf::from(&home).join("node_modules/.bin/claude"),
        PathBuf::from(&home).join(".yarn/bin/claude"),
    ];

    for path in locations {
        if path.is_file() {
            return Ok(path);
        }
    }

    Err(AgentError::cli_not_found())
}

fn explicit_override(override_path: Option<&Path>) -> Option<PathBuf> {
    let candidates = override_path
        .map(Path::to_path_buf)
        .into_iter()
        .chain(
            env::var(CLI_PATH_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        );

    for candidate in candidates {
        if candidate.is_file() {
            return Some(candidate);
        }
        log::warn!(
            "Configured CLI path {} does not exist, falling back to search",
            candidate.display()
        );
    }
    None
}
