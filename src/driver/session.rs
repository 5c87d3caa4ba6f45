//! One live automation session.
//!
//! A [`Session`] is a cheap handle around shared state. Screens, element
//! handles and wait engines each hold a clone; once the owning
//! [`SessionManager`] releases the session, every clone fails with
//! [`Error::NoActiveSession`].
//!
//! [`SessionManager`]: super::SessionManager

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::identifiers::{ExecutionId, SessionId};
use crate::screens::LoginScreen;
use crate::transport::Remote;
use crate::ui::{ElementHandle, Locator, WaitEngine, WaitSettings};

use super::capabilities::Capabilities;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a session.
pub(crate) struct SessionInner {
    /// Identifier assigned by the remote end.
    pub id: SessionId,
    /// Local identifier, unique per acquisition.
    pub uuid: Uuid,
    /// Execution unit that owns the session.
    pub execution: ExecutionId,
    /// Endpoint the session lives on.
    pub endpoint: Url,
    /// Capabilities the session was created with.
    pub capabilities: Capabilities,
    /// Creation time.
    pub created_at: SystemTime,
    /// Cleared on release.
    alive: AtomicBool,
    /// Protocol client.
    remote: Arc<dyn Remote>,
    /// Defaults for waits started from this session.
    pub wait: WaitSettings,
}

// ============================================================================
// Session
// ============================================================================

/// Handle to one live session.
#[derive(Clone)]
pub struct Session {
    pub(crate) inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("execution", &self.inner.execution)
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Constructor
// ============================================================================

impl Session {
    pub(crate) fn new(
        id: SessionId,
        execution: ExecutionId,
        endpoint: Url,
        capabilities: Capabilities,
        remote: Arc<dyn Remote>,
        wait: WaitSettings,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id,
                uuid: Uuid::new_v4(),
                execution,
                endpoint,
                capabilities,
                created_at: SystemTime::now(),
                alive: AtomicBool::new(true),
                remote,
                wait,
            }),
        }
    }
}

// ============================================================================
// Session - Accessors
// ============================================================================

impl Session {
    /// Returns the remote session ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.inner.id
    }

    /// Returns the local UUID of this acquisition.
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> &Uuid {
        &self.inner.uuid
    }

    /// Returns the owning execution unit.
    #[inline]
    #[must_use]
    pub fn execution(&self) -> &ExecutionId {
        &self.inner.execution
    }

    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Returns the negotiated capabilities.
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.inner.capabilities
    }

    /// Returns when the session was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.inner.created_at
    }

    /// Returns `false` once the session has been released.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Returns whether two handles refer to the same acquisition.
    #[inline]
    #[must_use]
    pub fn same_as(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

// ============================================================================
// Session - Public API
// ============================================================================

impl Session {
    /// Returns a wait engine with the configured defaults.
    #[inline]
    #[must_use]
    pub fn waiter(&self) -> WaitEngine {
        WaitEngine::new(self.clone(), self.inner.wait)
    }

    /// Returns the app's entry screen.
    #[inline]
    #[must_use]
    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(self.clone())
    }

    /// Looks up every element matching `locator`, without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveSession`] after release, or the remote error.
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        let remote = self.remote()?;
        let ids = remote.find_elements(self.id(), locator).await?;
        debug!(locator = %locator, count = ids.len(), "Found elements");

        Ok(ids
            .into_iter()
            .map(|id| ElementHandle::new(id, locator.clone(), self.clone()))
            .collect())
    }
}

// ============================================================================
// Session - Internal
// ============================================================================

impl Session {
    /// Returns the protocol client while the session is alive.
    pub(crate) fn remote(&self) -> Result<&dyn Remote> {
        if !self.is_alive() {
            return Err(Error::no_active_session(self.inner.execution.clone()));
        }
        Ok(self.inner.remote.as_ref())
    }

    /// Marks the session released and deletes it on the remote end.
    ///
    /// Returns `Ok(false)` if it was already released.
    pub(crate) async fn terminate(&self) -> Result<bool> {
        if !self.inner.alive.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }

        info!(
            session_id = %self.inner.id,
            execution = %self.inner.execution,
            "Deleting session"
        );
        self.inner.remote.delete_session(&self.inner.id).await?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
