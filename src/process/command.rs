//! CLI command building
//!
//! Encodes one execution as an argument vector for the Claude CLI: task
//! text, system instruction, streaming output mode, capability allow-list,
//! model, accessible directories, and the optional resume session.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::types::{AgentProfile, SessionId};

/// Effective system instruction for one invocation
///
/// `base` is the profile instruction, with the resource-directory
/// placeholder already substituted when that applies. `append` carries the
/// working-directory note and the accessible/missing resource listings; when
/// present it is passed via the separate append flag so the CLI keeps the
/// two texts distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInstruction {
    /// Base instruction text
    pub base: String,
    /// Appended note, when split delivery is in play
    pub append: Option<String>,
}

impl SystemInstruction {
    /// Single combined instruction text (no appended note)
    #[must_use]
    pub fn combined(text: impl Into<String>) -> Self {
        Self {
            base: text.into(),
            append: None,
        }
    }
}

/// Command builder for one Claude CLI execution
pub struct CommandBuilder<'a> {
    cli_path: &'a Path,
    profile: &'a AgentProfile,
    task: &'a str,
    instruction: &'a SystemInstruction,
    working_dir: &'a Path,
    resource_dirs: &'a [PathBuf],
    resume: Option<&'a SessionId>,
}

impl<'a> CommandBuilder<'a> {
    /// Create a new command builder
    pub fn new(
        cli_path: &'a Path,
        profile: &'a AgentProfile,
        task: &'a str,
        instruction: &'a SystemInstruction,
        working_dir: &'a Path,
        resource_dirs: &'a [PathBuf],
        resume: Option<&'a SessionId>,
    ) -> Self {
        Self {
            cli_path,
            profile,
            task,
            instruction,
            working_dir,
            resource_dirs,
            resume,
        }
    }

    /// Build the complete CLI command
    ///
    /// Stdin is null from the start: the CLI never receives interactive
    /// input. Stdout and stderr are piped.
    pub fn build(&self) -> Command {
        let mut cmd = Command::new(self.cli_path);

        cmd.arg("-p").arg(self.task);

        self.add_instruction_args(&mut cmd);

        // Verbose is required for stream-json to emit tool-use detail
        cmd.arg("--output-format").arg("stream-json").arg("--verbose");

        self.add_tool_args(&mut cmd);

        cmd.arg("--model").arg(&self.profile.model);

        self.add_path_args(&mut cmd);
        self.add_session_args(&mut cmd);

        cmd.current_dir(self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd
    }

    /// Render the argument vector for logging and inspection
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        let cmd = self.build();
        let std_cmd = cmd.as_std();
        std::iter::once(std_cmd.get_program())
            .chain(std_cmd.get_args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn add_instruction_args(&self, cmd: &mut Command) {
        cmd.arg("--system-prompt").arg(&self.instruction.base);
        if let Some(append) = &self.instruction.append {
            cmd.arg("--append-system-prompt").arg(append);
        }
    }

    fn add_tool_args(&self, cmd: &mut Command) {
        if !self.profile.tools.is_empty() {
            // Each capability is its own argv token, not a joined list
            cmd.arg("--allowedTools");
            for tool in &self.profile.tools {
                cmd.arg(tool.as_str());
            }
        }
    }

    fn add_path_args(&self, cmd: &mut Command) {
        cmd.arg("--add-dir").arg(self.working_dir);
        for dir in self.resource_dirs {
            cmd.arg("--add-dir").arg(dir);
        }
    }

    fn add_session_args(&self, cmd: &mut Command) {
        if let Some(session_id) = self.resume {
            cmd.arg("--resume").arg(session_id.as_str());
        }
    }
}
