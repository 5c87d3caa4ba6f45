//! Element wait engine.
//!
//! Polls the session for elements until a [`WaitCondition`] holds or the
//! timeout elapses. Every attempt issues a fresh lookup: the app may
//! rebuild its view tree between polls, so no handle survives from one
//! attempt to the next.
//!
//! # Example
//!
//! ```ignore
//! let wait = session.waiter();
//!
//! // Direct actions propagate the timeout
//! let button = wait.clickable(&Locator::accessibility_id("test-LOGIN")).await?;
//! button.click().await?;
//!
//! // Exploratory checks turn the timeout into `false`
//! let has_error = wait.is_visible(&Locator::accessibility_id("test-Error message")).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::driver::Session;
use crate::error::{Error, Result};

use super::element::ElementHandle;
use super::locator::Locator;

// ============================================================================
// WaitCondition
// ============================================================================

/// Predicate an element must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitCondition {
    /// At least one element matches.
    Present,
    /// A matching element is displayed.
    Visible,
    /// A matching element is displayed and enabled.
    Clickable,
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
        })
    }
}

// ============================================================================
// WaitSettings
// ============================================================================

/// Default timeout and poll cadence of a wait engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    /// Timeout used when the caller does not pass one.
    pub timeout: Duration,
    /// Delay between attempts.
    pub poll_interval: Duration,
}

impl WaitSettings {
    /// Creates settings from a timeout and a poll interval.
    #[inline]
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(15), Duration::from_millis(250))
    }
}

// ============================================================================
// WaitEngine
// ============================================================================

/// Polls one session for element conditions.
#[derive(Debug, Clone)]
pub struct WaitEngine {
    session: Session,
    settings: WaitSettings,
}

impl WaitEngine {
    /// Creates an engine over a session.
    #[inline]
    #[must_use]
    pub fn new(session: Session, settings: WaitSettings) -> Self {
        Self { session, settings }
    }

    /// Returns the engine's settings.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> WaitSettings {
        self.settings
    }

    /// Returns a copy with a different default timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            session: self.session.clone(),
            settings: WaitSettings::new(timeout, self.settings.poll_interval),
        }
    }
}

// ============================================================================
// WaitEngine - Waiting
// ============================================================================

impl WaitEngine {
    /// Waits until an element matching `locator` satisfies `condition`.
    ///
    /// Fails with [`Error::ElementTimeout`] only once `timeout` has fully
    /// elapsed.
    pub async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<ElementHandle> {
        debug!(
            locator = %locator,
            %condition,
            timeout_ms = timeout.as_millis() as u64,
            "Waiting for element"
        );

        self.poll(locator, timeout, |elements| first_satisfying(elements, condition))
            .await
            .map_err(|pending| match pending {
                Pending::TimedOut(elapsed) => {
                    Error::element_timeout(locator.clone(), condition, elapsed)
                }
                Pending::Failed(e) => e,
            })
    }

    /// Waits with the default timeout until an element is present.
    pub async fn present(&self, locator: &Locator) -> Result<ElementHandle> {
        self.wait_for(locator, WaitCondition::Present, self.settings.timeout)
            .await
    }

    /// Waits with the default timeout until an element is visible.
    pub async fn visible(&self, locator: &Locator) -> Result<ElementHandle> {
        self.wait_for(locator, WaitCondition::Visible, self.settings.timeout)
            .await
    }

    /// Waits with the default timeout until an element is clickable.
    pub async fn clickable(&self, locator: &Locator) -> Result<ElementHandle> {
        self.wait_for(locator, WaitCondition::Clickable, self.settings.timeout)
            .await
    }

    /// Returns whether an element becomes visible within the default timeout.
    ///
    /// A timeout maps to `false`; any other failure propagates.
    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.is_visible_within(locator, self.settings.timeout).await
    }

    /// Returns whether an element becomes visible within `timeout`.
    pub async fn is_visible_within(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
        match self.wait_for(locator, WaitCondition::Visible, timeout).await {
            Ok(_) => Ok(true),
            Err(Error::ElementTimeout { elapsed_ms, .. }) => {
                debug!(locator = %locator, elapsed_ms, "Element not visible");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Waits until fewer than `bound` elements match `locator`.
    ///
    /// Returns the count that satisfied the bound.
    pub async fn count_below(
        &self,
        locator: &Locator,
        bound: usize,
        timeout: Duration,
    ) -> Result<usize> {
        self.poll(locator, timeout, |elements| async move {
            let count = elements.len();
            Ok((count < bound).then_some(count))
        })
        .await
        .map_err(|pending| match pending {
            Pending::TimedOut(elapsed) => Error::count_timeout(locator.clone(), bound, elapsed),
            Pending::Failed(e) => e,
        })
    }

    /// Looks up every element matching `locator` once, without waiting.
    pub async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        self.session.find_elements(locator).await
    }
}

// ============================================================================
// WaitEngine - Internal
// ============================================================================

/// Why a poll loop ended without a value.
enum Pending {
    TimedOut(Duration),
    Failed(Error),
}

impl WaitEngine {
    /// Runs fresh lookups until `check` yields a value or time runs out.
    async fn poll<T, F, Fut>(
        &self,
        locator: &Locator,
        timeout: Duration,
        mut check: F,
    ) -> StdResult<T, Pending>
    where
        F: FnMut(Vec<ElementHandle>) -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            let elements = match self.session.find_elements(locator).await {
                Ok(elements) => elements,
                Err(e) if e.is_element_error() => Vec::new(),
                Err(e) => return Err(Pending::Failed(e)),
            };

            match check(elements).await {
                Ok(Some(value)) => {
                    trace!(locator = %locator, attempts, "Wait satisfied");
                    return Ok(value);
                }
                Ok(None) => {}
                Err(e) if e.is_element_error() => {}
                Err(e) => return Err(Pending::Failed(e)),
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                debug!(
                    locator = %locator,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Wait timed out"
                );
                return Err(Pending::TimedOut(elapsed));
            }

            sleep(self.settings.poll_interval.min(timeout - elapsed)).await;
        }
    }
}

type StdResult<T, E> = std::result::Result<T, E>;

/// Returns the first element that satisfies `condition`, if any.
///
/// Elements that went stale mid-check count as unsatisfied.
async fn first_satisfying(
    elements: Vec<ElementHandle>,
    condition: WaitCondition,
) -> Result<Option<ElementHandle>> {
    for element in elements {
        let satisfied = match condition {
            WaitCondition::Present => Ok(true),
            WaitCondition::Visible => element.is_displayed().await,
            WaitCondition::Clickable => match element.is_displayed().await {
                Ok(true) => element.is_enabled().await,
                other => other,
            },
        };

        match satisfied {
            Ok(true) => return Ok(Some(element)),
            Ok(false) => {}
            Err(e) if e.is_element_error() => {}
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}

// ============================================================================
// Tests
// ============================================================================
