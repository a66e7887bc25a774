//! Task execution engine
//!
//! Orchestrates one delegated task: resolves the resume target, locates the
//! CLI, resolves directories, spawns the process, interprets the event
//! stream in real time while forwarding progress notices, and assembles the
//! final response. All failures terminate here as plain strings; the caller
//! never sees an `Err` or a panic.

pub mod format;
pub mod paths;

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::event::{StreamInterpreter, parse_line};
use crate::process::{AgentProcess, CommandBuilder, locate_cli};
use crate::session::SessionChainStore;
use crate::types::{AgentProfile, SessionId};

pub use format::{EMPTY_RESULT_MESSAGE, ExecutionReport};
pub use paths::{RESOURCE_DIR_PLACEHOLDER, ResolvedPaths};

/// Async progress callback invoked for each notice, in emission order
///
/// The engine awaits the callback in-line, so a slow callback slows stream
/// consumption. That is the intended backpressure point.
pub type ProgressCallback =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Wrap an async closure as a [`ProgressCallback`]
pub fn progress_callback<F, Fut>(f: F) -> ProgressCallback
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |message| Box::pin(f(message)))
}

/// The task execution engine
///
/// One engine serves any number of concurrent executions. Each execution
/// owns its child process and accumulation state; the session chain store is
/// the only shared resource and is serialized per agent.
pub struct TaskEngine {
    configs_dir: PathBuf,
    store: Arc<SessionChainStore>,
    cli_path: Option<PathBuf>,
}

/// Builder for [`TaskEngine`]
#[derive(Default)]
pub struct TaskEngineBuilder {
    configs_dir: PathBuf,
    storage_path: Option<PathBuf>,
    store: Option<Arc<SessionChainStore>>,
    cli_path: Option<PathBuf>,
}

impl TaskEngineBuilder {
    /// Persist session chains at this path
    #[must_use]
    pub fn session_storage(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Share an existing session chain store
    #[must_use]
    pub fn store(mut self, store: Arc<SessionChainStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Explicit CLI path, overriding discovery
    #[must_use]
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    /// Build the engine
    #[must_use]
    pub fn build(self) -> TaskEngine {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(SessionChainStore::new(self.storage_path)));
        TaskEngine {
            configs_dir: self.configs_dir,
            store,
            cli_path: self.cli_path,
        }
    }
}

impl TaskEngine {
    /// Create an engine with an in-memory session store
    ///
    /// `configs_dir` is the directory the agent profiles were loaded from;
    /// the `"."` working-directory sentinel resolves to its parent.
    #[must_use]
    pub fn new(configs_dir: impl Into<PathBuf>) -> Self {
        Self::builder(configs_dir).build()
    }

    /// Start building an engine
    #[must_use]
    pub fn builder(configs_dir: impl Into<PathBuf>) -> TaskEngineBuilder {
        TaskEngineBuilder {
            configs_dir: configs_dir.into(),
            ..TaskEngineBuilder::default()
        }
    }

    /// The session chain store backing this engine
    #[must_use]
    pub fn session_store(&self) -> &Arc<SessionChainStore> {
        &self.store
    }

    /// Execute a task with the given agent profile
    ///
    /// Always returns text: the formatted response on success, a distinct
    /// benign message for an empty result, or an error string for any
    /// failure. There is no retry and no timeout on the external process.
    pub async fn execute(
        &self,
        profile: &AgentProfile,
        task: &str,
        session_reset: bool,
        progress: Option<ProgressCallback>,
    ) -> String {
        match self
            .execute_inner(profile, task, session_reset, progress.as_ref())
            .await
        {
            Ok(text) => text,
            Err(err) => {
                log::error!("Task execution failed for {}: {err}", profile.agent_name);
                format::render_error(&err)
            }
        }
    }

    async fn execute_inner(
        &self,
        profile: &AgentProfile,
        task: &str,
        session_reset: bool,
        progress: Option<&ProgressCallback>,
    ) -> Result<String> {
        log::info!(
            "Executing task with agent {} (model {}): {:.100}",
            profile.agent_name,
            profile.model,
            task
        );

        let resume_bound = profile.resume_max_exchanges();

        // Chain mutations for one agent must not interleave; executions for
        // different agents proceed concurrently.
        let agent_lock = resume_bound.map(|_| self.store.agent_lock(&profile.agent_name));
        let _chain_guard = match &agent_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        if session_reset {
            self.store.clear_chain(&profile.agent_name).await;
            Self::notify(
                progress,
                format!("🔄 Session reset for {}", profile.agent_name),
            )
            .await;
        }

        let resume_id = match resume_bound {
            Some(max) if !session_reset => {
                self.store
                    .get_resume_session(&profile.agent_name, max)
                    .await
            }
            _ => None,
        };

        let cli_path = locate_cli(self.cli_path.as_deref())?;

        let resolved = paths::resolve(profile, &self.configs_dir)?;
        if !resolved.working_dir.is_dir() {
            return Err(AgentError::WorkingDirMissing(
                resolved.working_dir.display().to_string(),
            ));
        }

        let builder = CommandBuilder::new(
            &cli_path,
            profile,
            task,
            &resolved.instruction,
            &resolved.working_dir,
            &resolved.accessible_dirs,
            resume_id.as_ref(),
        );
        log::info!("Executing command: {}", builder.argv().join(" "));

        Self::notify(
            progress,
            format!("🚀 Starting {} agent...", profile.agent_name),
        )
        .await;

        let mut process = AgentProcess::spawn(builder.build())?;

        let mut interpreter = StreamInterpreter::new();
        while let Some(line) = process.next_line().await {
            if let Some(notice) = interpreter.apply(parse_line(&line)) {
                Self::notify(progress, notice).await;
            }
        }

        let status = process.wait().await?;
        let stderr = process.drain_stderr().await;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            log::error!("Claude CLI error (return code {exit_code}): {}", stderr.trim_end());
            return Ok(format::render_process_failure(
                exit_code,
                &stderr,
                interpreter.answer().as_deref(),
            ));
        }

        let Some(answer) = interpreter.answer() else {
            log::warn!("No assistant message found in stream output");
            Self::notify(
                progress,
                "⚠️ Task completed but no response was generated".to_string(),
            )
            .await;
            return Ok(EMPTY_RESULT_MESSAGE.to_string());
        };

        if let Some(cost) = interpreter.total_cost_usd() {
            log::info!("Total cost: ${cost:.4}");
        }

        let mut exchange = None;
        if let (Some(max), Some(session_id)) = (resume_bound, interpreter.session_id()) {
            let was_resume = resume_id.is_some();
            self.store
                .update_chain(&profile.agent_name, SessionId::from(session_id), was_resume)
                .await;
            let count = self
                .store
                .get_chain_info(&profile.agent_name)
                .await
                .map_or(1, |info| info.exchange_count);
            exchange = Some((count, max));
        }

        let report = ExecutionReport {
            session_id: interpreter.session_id(),
            exchange,
            tools_used: interpreter.tools_used(),
            answer: &answer,
            usage: interpreter.usage(),
        };
        Ok(format::render_report(&report))
    }

    async fn notify(progress: Option<&ProgressCallback>, message: String) {
        match progress {
            Some(callback) => callback(message).await,
            None => log::debug!("Progress: {message}"),
        }
    }
}
