//! Session chain store
//!
//! Tracks conversational continuity across executions. Each resumed
//! execution produces a fresh session id from the CLI, so the store keeps a
//! chain per agent display name: the current id, how many exchanges the
//! chain has seen, and the superseded ids. The whole table is persisted as
//! one JSON snapshot after every mutation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::types::SessionId;

/// Ceiling on archived ids per chain; oldest are dropped first
const PREVIOUS_SESSIONS_CAP: usize = 50;

/// A chain of session ids for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionChain {
    /// Session id of the most recent exchange
    pub current_session_id: SessionId,
    /// Number of exchanges in this chain; 1 on creation, incremented only
    /// as part of a resume
    pub exchange_count: u32,
    /// Superseded session ids, oldest first
    #[serde(default)]
    pub previous_sessions: Vec<SessionId>,
    /// When the chain was created
    pub created_at: DateTime<Utc>,
    /// When the chain was last mutated
    pub last_updated: DateTime<Utc>,
}

impl SessionChain {
    fn new(session_id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            current_session_id: session_id,
            exchange_count: 1,
            previous_sessions: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    fn archive_current(&mut self) {
        let superseded = self.current_session_id.clone();
        self.previous_sessions.push(superseded);
        if self.previous_sessions.len() > PREVIOUS_SESSIONS_CAP {
            let excess = self.previous_sessions.len() - PREVIOUS_SESSIONS_CAP;
            self.previous_sessions.drain(..excess);
        }
    }
}

/// Read-only summary of an agent's chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    /// Current session id
    pub current_session: SessionId,
    /// Exchanges in the chain so far
    pub exchange_count: u32,
    /// How many superseded ids are archived
    pub previous_count: usize,
    /// Chain creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub last_updated: DateTime<Utc>,
}

/// Persisted map from agent display name to its session chain
///
/// All mutating operations rewrite the full snapshot to the storage path
/// after the in-memory update. A missing or malformed snapshot at startup is
/// logged and treated as empty.
pub struct SessionChainStore {
    storage_path: Option<PathBuf>,
    chains: Mutex<HashMap<String, SessionChain>>,
    locks: parking_lot::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionChainStore {
    /// Create a store, loading any persisted snapshot
    ///
    /// `storage_path` of `None` keeps chains in memory only.
    #[must_use]
    pub fn new(storage_path: Option<PathBuf>) -> Self {
        let chains = storage_path
            .as_deref()
            .map(Self::load_snapshot)
            .unwrap_or_default();

        Self {
            storage_path,
            chains: Mutex::new(chains),
            locks: parking_lot::Mutex::new(HashMap::new()),
        }
    }

    /// The session id to resume for an agent, or `None` to start fresh
    ///
    /// A chain that has already reached `max_exchanges` is archived and
    /// deleted here, so the caller starts a new chain rather than resuming
    /// indefinitely.
    pub async fn get_resume_session(
        &self,
        agent_name: &str,
        max_exchanges: u32,
    ) -> Option<SessionId> {
        let mut chains = self.chains.lock().await;
        let chain = chains.get_mut(agent_name)?;

        if chain.exchange_count >= max_exchanges {
            log::info!(
                "Session chain for {agent_name} exceeded max exchanges \
                 ({} >= {max_exchanges}), starting fresh",
                chain.exchange_count
            );
            chain.archive_current();
            chains.remove(agent_name);
            self.persist(&chains).await;
            return None;
        }

        log::info!(
            "Resuming session for {agent_name}: {} (exchange {}/{max_exchanges})",
            chain.current_session_id,
            chain.exchange_count + 1
        );
        Some(chain.current_session_id.clone())
    }

    /// Record the session id produced by an execution
    ///
    /// `was_resume` continues the existing chain; otherwise a fresh chain
    /// with exchange count 1 replaces whatever was there.
    pub async fn update_chain(
        &self,
        agent_name: &str,
        new_session_id: SessionId,
        was_resume: bool,
    ) {
        let mut chains = self.chains.lock().await;

        let fresh = !was_resume || !chains.contains_key(agent_name);
        if fresh {
            chains.insert(
                agent_name.to_string(),
                SessionChain::new(new_session_id.clone()),
            );
            log::info!("Created new session chain for {agent_name}: {new_session_id}");
        } else if let Some(chain) = chains.get_mut(agent_name) {
            chain.archive_current();
            chain.current_session_id = new_session_id.clone();
            chain.exchange_count += 1;
            chain.last_updated = Utc::now();
            log::info!(
                "Updated session chain for {agent_name}: {new_session_id} \
                 (exchange {})",
                chain.exchange_count
            );
        }

        self.persist(&chains).await;
    }

    /// Delete an agent's chain unconditionally
    pub async fn clear_chain(&self, agent_name: &str) {
        let mut chains = self.chains.lock().await;
        if chains.remove(agent_name).is_some() {
            self.persist(&chains).await;
            log::info!("Cleared session chain for {agent_name}");
        }
    }

    /// Summary of an agent's chain, if one exists
    pub async fn get_chain_info(&self, agent_name: &str) -> Option<ChainInfo> {
        let chains = self.chains.lock().await;
        chains.get(agent_name).map(|chain| ChainInfo {
            current_session: chain.current_session_id.clone(),
            exchange_count: chain.exchange_count,
            previous_count: chain.previous_sessions.len(),
            created_at: chain.created_at,
            last_updated: chain.last_updated,
        })
    }

    /// Per-agent serialization handle
    ///
    /// The engine holds this lock across the resume-resolve and chain-update
    /// pair so concurrent executions for the same agent cannot interleave
    /// chain mutations. Executions for different agents are unrestricted.
    pub fn agent_lock(&self, agent_name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(
            locks
                .entry(agent_name.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    fn load_snapshot(path: &std::path::Path) -> HashMap<String, SessionChain> {
        match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, SessionChain>>(&bytes) {
                Ok(chains) => {
                    log::info!(
                        "Loaded {} session chain(s) from {}",
                        chains.len(),
                        path.display()
                    );
                    chains
                }
                Err(e) => {
                    log::error!("Failed to parse session chains from {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                log::error!("Failed to read session chains from {}: {e}", path.display());
                HashMap::new()
            }
        }
    }

    async fn persist(&self, chains: &HashMap<String, SessionChain>) {
        let Some(path) = &self.storage_path else {
            return;
        };

        let json = match serde_json::to_vec_pretty(chains) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize session chains: {e}");
                return;
            }
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                log::error!("Failed to create {}: {e}", parent.display());
                return;
            }
        }

        if let Err(e) = tokio::fs::write(path, json).await {
            log::error!("Failed to save session chains to {}: {e}", path.display());
        } else {
            log::debug!("Saved {} session chain(s) to {}", chains.len(), path.display());
        }
    }
}
