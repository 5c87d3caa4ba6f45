//! The narrow interface to a remote automation endpoint.
//!
//! Everything above this trait speaks in sessions, locators and element
//! ids; everything below it speaks a wire protocol. [`HttpRemote`] is the
//! W3C WebDriver implementation; tests plug in a simulated app.
//!
//! [`HttpRemote`]: super::HttpRemote

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::Capabilities;
use crate::error::Result;
use crate::identifiers::{ElementId, SessionId};
use crate::ui::Locator;

// ============================================================================
// Remote
// ============================================================================

/// Operations consumed from the remote automation endpoint.
///
/// Implementations must tolerate many concurrent sessions. Every call is
/// attempted once; retrying is the wait engine's job.
#[async_trait]
pub trait Remote: fmt::Debug + Send + Sync {
    /// Negotiates a new session.
    async fn create_session(&self, capabilities: &Capabilities) -> Result<SessionId>;

    /// Sets the endpoint-side implicit wait for element lookups.
    async fn set_implicit_wait(&self, session: &SessionId, timeout: Duration) -> Result<()>;

    /// Finds all elements currently matching `locator`.
    ///
    /// Returns an empty list rather than an error when nothing matches.
    async fn find_elements(&self, session: &SessionId, locator: &Locator)
    -> Result<Vec<ElementId>>;

    /// Returns the visible text of an element.
    async fn element_text(&self, session: &SessionId, element: &ElementId) -> Result<String>;

    /// Returns whether the element is displayed.
    async fn element_displayed(&self, session: &SessionId, element: &ElementId) -> Result<bool>;

    /// Returns whether the element is enabled.
    async fn element_enabled(&self, session: &SessionId, element: &ElementId) -> Result<bool>;

    /// Returns an element attribute, `None` when unset.
    async fn element_attribute(
        &self,
        session: &SessionId,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>>;

    /// Taps the element.
    async fn click(&self, session: &SessionId, element: &ElementId) -> Result<()>;

    /// Clears an editable element.
    async fn clear(&self, session: &SessionId, element: &ElementId) -> Result<()>;

    /// Types text into an element.
    async fn send_keys(&self, session: &SessionId, element: &ElementId, text: &str) -> Result<()>;

    /// Terminates the session.
    async fn delete_session(&self, session: &SessionId) -> Result<()>;
}
