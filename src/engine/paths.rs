//! Working-directory and resource-directory resolution
//!
//! Turns a profile's declarative directory specification into the concrete
//! paths an invocation uses, and assembles the effective system instruction:
//! the base text (with the resource-directory placeholder substituted when it
//! applies) plus the appended note telling the agent where it is working and
//! which resource directories are reachable.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::process::SystemInstruction;
use crate::types::AgentProfile;

/// Literal token in instruction text that stands for the resolved resource
/// directory path(s)
pub const RESOURCE_DIR_PLACEHOLDER: &str = "[resource_dir]";

/// Resolved paths and instruction for one invocation
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    /// Absolute working directory for the child process
    pub working_dir: PathBuf,
    /// Resource directories that exist on disk
    pub accessible_dirs: Vec<PathBuf>,
    /// Resource directories that were configured but not found
    pub missing_dirs: Vec<PathBuf>,
    /// Effective system instruction
    pub instruction: SystemInstruction,
}

/// Resolve a profile's directories and build the effective instruction
///
/// The `"."` sentinel resolves to the parent of the profile source
/// directory, not the profile directory itself. Missing resource
/// directories never fail resolution; they are surfaced textually to the
/// agent instead.
///
/// # Errors
/// Returns an error only if the process working directory cannot be read
/// while absolutizing a relative path.
pub fn resolve(profile: &AgentProfile, configs_dir: &Path) -> Result<ResolvedPaths> {
    let working_dir = resolve_working_dir(&profile.cwd, configs_dir)?;

    let mut accessible_dirs = Vec::new();
    let mut missing_dirs = Vec::new();
    for raw in &profile.resource_dirs {
        let expanded = expand_env(raw);
        let path = if Path::new(&expanded).is_absolute() {
            PathBuf::from(expanded)
        } else {
            working_dir.join(expanded)
        };
        if path.is_dir() {
            accessible_dirs.push(path);
        } else {
            log::warn!("Resource directory not found: {}", path.display());
            missing_dirs.push(path);
        }
    }

    let instruction = build_instruction(profile, &working_dir, &accessible_dirs, &missing_dirs);

    Ok(ResolvedPaths {
        working_dir,
        accessible_dirs,
        missing_dirs,
        instruction,
    })
}

fn resolve_working_dir(cwd: &str, configs_dir: &Path) -> Result<PathBuf> {
    if cwd == "." {
        let configs_dir = absolutize(configs_dir)?;
        let parent = configs_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(configs_dir);
        log::info!("Agent cwd was '.', resolved to: {}", parent.display());
        return Ok(parent);
    }

    absolutize(Path::new(&expand_env(cwd)))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn build_instruction(
    profile: &AgentProfile,
    working_dir: &Path,
    accessible: &[PathBuf],
    missing: &[PathBuf],
) -> SystemInstruction {
    let mut note = format!(
        "\n\nIMPORTANT: You are currently working in the directory: {}\n\
         When creating or saving files without an explicit path, always save \
         them in the current working directory using relative paths (e.g., \
         ./filename). Only save files elsewhere if the user explicitly \
         specifies a different path.",
        working_dir.display()
    );

    if !accessible.is_empty() {
        note.push_str("\n\nAccessible resource directories:");
        for dir in accessible {
            note.push_str(&format!("\n- {}", dir.display()));
        }
    }
    if !missing.is_empty() {
        note.push_str("\n\nMissing resource directories (configured but not found):");
        for dir in missing {
            note.push_str(&format!("\n- {}", dir.display()));
        }
    }

    let substituted = profile.system_prompt.contains(RESOURCE_DIR_PLACEHOLDER)
        && !accessible.is_empty();
    if substituted {
        let replacement = accessible
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        SystemInstruction {
            base: profile
                .system_prompt
                .replace(RESOURCE_DIR_PLACEHOLDER, &replacement),
            append: Some(note),
        }
    } else {
        SystemInstruction::combined(format!("{}{note}", profile.system_prompt))
    }
}

/// Expand `$VAR` and `${VAR}` references against the process environment
///
/// Unknown variables are left as written, matching how profile authors
/// expect shell-style paths to degrade.
pub(crate) fn expand_env(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if bytes[i] == b'$' && i + 1 < input.len() {
            if bytes[i + 1] == b'{' {
                if let Some(end) = input[i + 2..].find('}') {
                    let name = &input[i + 2..i + 2 + end];
                    match std::env::var(name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => out.push_str(&input[i..=i + 2 + end]),
                    }
                    i += end + 3;
                    continue;
                }
            } else {
                let len = input[i + 1..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();
                if len > 0 {
                    let name = &input[i + 1..=i + len];
                    match std::env::var(name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => {
                            out.push('$');
                            out.push_str(name);
                        }
                    }
                    i += 1 + len;
                    continue;
                }
            }
        }

        if let Some(ch) = input[i..].chars().next() {
            out.push(ch);
            i += ch.len_utf8();
        } else {
            break;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_env_substitutes_known_vars() {
        // SAFETY: test-local variable, no concurrent reader cares
        unsafe { std::env::set_var("TASK_AGENTS_TEST_HOME", "/srv/projects") };
        assert_eq!(
            expand_env("$TASK_AGENTS_TEST_HOME/app"),
            "/srv/projects/app"
        );
        assert_eq!(
            expand_env("${TASK_AGENTS_TEST_HOME}/app"),
            "/srv/projects/app"
        );
    }

    #[test]
    fn expand_env_leaves_unknown_vars_as_written() {
        assert_eq!(
            expand_env("$TASK_AGENTS_NO_SUCH_VAR/x"),
            "$TASK_AGENTS_NO_SUCH_VAR/x"
        );
        assert_eq!(expand_env("literal $ alone"), "literal $ alone");
        assert_eq!(expand_env("${UNCLOSED"), "${UNCLOSED");
    }
}
