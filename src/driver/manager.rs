//! Per-execution session registry.
//!
//! The [`SessionManager`] maps each [`ExecutionId`] to at most one live
//! [`Session`]. Parallel test workers pass distinct IDs and never observe
//! each other's sessions.
//!
//! # Example
//!
//! ```no_run
//! use swaglabs_pages::{ExecutionId, SessionConfig, SessionManager};
//!
//! # async fn example() -> swaglabs_pages::Result<()> {
//! let manager = SessionManager::new();
//! let config = SessionConfig::load("config/swaglabs.toml")?;
//! let execution = ExecutionId::for_current_thread();
//!
//! let session = manager.acquire(&execution, &config).await?;
//! let products = session.login_screen().login("standard_user", "secret_sauce").await?;
//!
//! manager.release(&execution).await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::identifiers::ExecutionId;
use crate::transport::{HttpRemote, Remote};

use super::capabilities::Capabilities;
use super::config::SessionConfig;
use super::session::Session;

// ============================================================================
// Backend
// ============================================================================

/// Where protocol clients come from.
enum Backend {
    /// One HTTP client per session, built from the session's config.
    Http,
    /// A shared client for every session.
    Fixed(Arc<dyn Remote>),
}

// ============================================================================
// SessionManager
// ============================================================================

/// Registry of live sessions keyed by execution unit.
pub struct SessionManager {
    sessions: Mutex<FxHashMap<ExecutionId, Session>>,
    backend: Backend,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match &self.backend {
            Backend::Http => "http",
            Backend::Fixed(_) => "fixed",
        };
        f.debug_struct("SessionManager")
            .field("backend", &backend)
            .field("session_count", &self.session_count())
            .finish()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SessionManager - Constructors
// ============================================================================

impl SessionManager {
    /// Creates a manager that talks HTTP to the configured endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(FxHashMap::default()),
            backend: Backend::Http,
        }
    }

    /// Creates a manager that routes every session through `remote`.
    #[must_use]
    pub fn with_remote(remote: Arc<dyn Remote>) -> Self {
        Self {
            sessions: Mutex::new(FxHashMap::default()),
            backend: Backend::Fixed(remote),
        }
    }
}

// ============================================================================
// SessionManager - Public API
// ============================================================================

impl SessionManager {
    /// Returns the execution's session, creating it if needed.
    ///
    /// Calling this again for the same execution returns the same session
    /// without contacting the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionInit`] if the app artifact is missing, the
    /// endpoint is unreachable, or the endpoint refuses the session.
    pub async fn acquire(&self, execution: &ExecutionId, config: &SessionConfig) -> Result<Session> {
        if let Some(existing) = self.get(execution) {
            debug!(execution = %execution, session_id = %existing.id(), "Reusing session");
            return Ok(existing);
        }

        let capabilities = Capabilities::from_config(config)?;
        let remote = self.remote_for(config)?;
        let endpoint = config.server_url().clone();

        info!(
            execution = %execution,
            endpoint = %endpoint,
            device = %capabilities.device_name,
            app = %capabilities.app_label(),
            "Creating session"
        );

        let id = remote
            .create_session(&capabilities)
            .await
            .map_err(|e| match e {
                Error::SessionInit { .. } => e,
                other => Error::session_init(format!("{endpoint}: {other}")),
            })?;

        if let Err(e) = remote.set_implicit_wait(&id, config.implicit_wait()).await {
            if let Err(cleanup) = remote.delete_session(&id).await {
                warn!(session_id = %id, error = %cleanup, "Failed to delete half-initialized session");
            }
            return Err(Error::session_init(format!("Failed to set timeouts: {e}")));
        }

        let session = Session::new(
            id,
            execution.clone(),
            endpoint,
            capabilities,
            remote,
            config.wait_settings(),
        );

        let raced = {
            let mut sessions = self.sessions.lock();
            match sessions.entry(execution.clone()) {
                Entry::Occupied(entry) => Some(entry.get().clone()),
                Entry::Vacant(entry) => {
                    entry.insert(session.clone());
                    None
                }
            }
        };

        if let Some(existing) = raced {
            debug!(execution = %execution, "Concurrent acquire won, discarding new session");
            if let Err(e) = session.terminate().await {
                warn!(session_id = %session.id(), error = %e, "Failed to delete discarded session");
            }
            return Ok(existing);
        }

        info!(execution = %execution, session_id = %session.id(), "Session ready");
        Ok(session)
    }

    /// Returns the execution's session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveSession`] if none was acquired, or if it
    /// was released.
    pub fn current(&self, execution: &ExecutionId) -> Result<Session> {
        self.get(execution)
            .ok_or_else(|| Error::no_active_session(execution.clone()))
    }

    /// Returns the execution's session, if one is live.
    #[must_use]
    pub fn get(&self, execution: &ExecutionId) -> Option<Session> {
        self.sessions.lock().get(execution).cloned()
    }

    /// Ends the execution's session.
    ///
    /// Never fails: teardown errors are logged and the entry is cleared
    /// regardless. Releasing without a session is a no-op.
    pub async fn release(&self, execution: &ExecutionId) {
        let Some(session) = self.sessions.lock().remove(execution) else {
            debug!(execution = %execution, "No session to release");
            return;
        };

        match session.terminate().await {
            Ok(_) => info!(execution = %execution, session_id = %session.id(), "Session released"),
            Err(e) => warn!(
                execution = %execution,
                session_id = %session.id(),
                error = %e,
                "Session teardown failed"
            ),
        }
    }

    /// Releases every live session.
    pub async fn release_all(&self) {
        let executions: Vec<ExecutionId> = self.sessions.lock().keys().cloned().collect();

        info!(count = executions.len(), "Releasing all sessions");

        for execution in executions {
            self.release(&execution).await;
        }
    }

    /// Returns the number of live sessions.
    #[inline]
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

// ============================================================================
// SessionManager - Internal
// ============================================================================

impl SessionManager {
    fn remote_for(&self, config: &SessionConfig) -> Result<Arc<dyn Remote>> {
        match &self.backend {
            Backend::Fixed(remote) => Ok(Arc::clone(remote)),
            Backend::Http => {
                let client = HttpRemote::new(config.server_url(), config.request_timeout())
                    .map_err(|e| Error::session_init(format!("HTTP client: {e}")))?;
                Ok(Arc::new(client))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
