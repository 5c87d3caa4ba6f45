//! Handles to native elements on the current screen.
//!
//! An [`ElementHandle`] is only as fresh as the lookup that produced it:
//! the app may rebuild its view tree at any time, after which calls fail
//! with [`Error::StaleElement`]. Screens therefore look elements up again
//! for every interaction instead of keeping handles around.
//!
//! [`Error::StaleElement`]: crate::Error::StaleElement

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::debug;

use crate::driver::Session;
use crate::error::Result;
use crate::identifiers::ElementId;

use super::locator::Locator;

// ============================================================================
// ElementHandle
// ============================================================================

/// A handle to one element, bound to the session that found it.
#[derive(Clone)]
pub struct ElementHandle {
    id: ElementId,
    locator: Locator,
    session: Session,
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("id", &self.id)
            .field("locator", &self.locator)
            .field("session_id", self.session.id())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ElementHandle - Constructor & Accessors
// ============================================================================

impl ElementHandle {
    pub(crate) fn new(id: ElementId, locator: Locator, session: Session) -> Self {
        Self {
            id,
            locator,
            session,
        }
    }

    /// Returns the element reference.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Returns the locator that found this element.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

// ============================================================================
// ElementHandle - Queries
// ============================================================================

impl ElementHandle {
    /// Reads the element's visible text.
    pub async fn text(&self) -> Result<String> {
        let remote = self.session.remote()?;
        let text = remote.element_text(self.session.id(), &self.id).await?;
        debug!(element_id = %self.id, locator = %self.locator, text = %text, "Read text");
        Ok(text)
    }

    /// Checks whether the element is displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        let remote = self.session.remote()?;
        remote.element_displayed(self.session.id(), &self.id).await
    }

    /// Checks whether the element is enabled.
    pub async fn is_enabled(&self) -> Result<bool> {
        let remote = self.session.remote()?;
        remote.element_enabled(self.session.id(), &self.id).await
    }

    /// Reads an attribute; `None` when the element does not carry it.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let remote = self.session.remote()?;
        remote
            .element_attribute(self.session.id(), &self.id, name)
            .await
    }
}

// ============================================================================
// ElementHandle - Actions
// ============================================================================

impl ElementHandle {
    /// Taps the element.
    pub async fn click(&self) -> Result<()> {
        debug!(element_id = %self.id, locator = %self.locator, "Clicking");
        let remote = self.session.remote()?;
        remote.click(self.session.id(), &self.id).await
    }

    /// Clears an editable element.
    pub async fn clear(&self) -> Result<()> {
        let remote = self.session.remote()?;
        remote.clear(self.session.id(), &self.id).await
    }

    /// Types text without clearing first.
    pub async fn send_keys(&self, text: &str) -> Result<()> {
        let remote = self.session.remote()?;
        remote.send_keys(self.session.id(), &self.id, text).await
    }

    /// Clears the element, then types `text`.
    pub async fn type_text(&self, text: &str) -> Result<()> {
        debug!(element_id = %self.id, locator = %self.locator, chars = text.len(), "Typing");
        self.clear().await?;
        self.send_keys(text).await
    }
}

// ============================================================================
// Tests
// ============================================================================
