//! Error types for the page-object layer.
//!
//! Every fallible operation returns [`Result<T>`] which uses [`Error`].
//!
//! # Usage
//!
//! ```ignore
//! use swaglabs_pages::{Error, Result};
//!
//! async fn example(products: ProductListScreen) -> Result<()> {
//!     let details = products.select_item(0).await?;
//!     let price = details.product_price().await?;
//!     assert!(price.starts_with('$'));
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants | Recovery |
//! |----------|----------|----------|
//! | Session | [`Error::SessionInit`], [`Error::NoActiveSession`] | fatal |
//! | Waiting | [`Error::ElementTimeout`], [`Error::CountTimeout`] | caller decides |
//! | Test authoring | [`Error::IndexOutOfRange`], [`Error::MissingContext`] | fatal |
//! | Configuration | [`Error::Config`] | fatal |
//! | Remote | [`Error::NoSuchElement`], [`Error::StaleElement`], [`Error::Remote`], [`Error::Protocol`] | propagate |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Http`], [`Error::Url`], [`Error::Toml`] | propagate |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error;

use crate::identifiers::{ElementId, ExecutionId};
use crate::ui::{Locator, WaitCondition};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Session could not be created.
    ///
    /// The app artifact is missing, the endpoint is unreachable, or the
    /// remote end rejected the requested capabilities. Never retried.
    #[error("Session initialization failed: {message}")]
    SessionInit {
        /// Description of the failure.
        message: String,
    },

    /// No live session for the execution unit.
    ///
    /// Returned when a screen is used before acquisition or after release.
    #[error("No active session for execution {execution}")]
    NoActiveSession {
        /// Execution unit that asked for the session.
        execution: ExecutionId,
    },

    // ========================================================================
    // Wait Errors
    // ========================================================================
    /// Wait condition not met within the timeout.
    #[error("Timed out after {elapsed_ms}ms waiting for {locator} to be {condition}")]
    ElementTimeout {
        /// Locator that was polled.
        locator: Locator,
        /// Condition that never held.
        condition: WaitCondition,
        /// Milliseconds spent polling.
        elapsed_ms: u64,
    },

    /// Element count never dropped below the bound.
    #[error("Timed out after {elapsed_ms}ms waiting for fewer than {bound} of {locator}")]
    CountTimeout {
        /// Locator that was counted.
        locator: Locator,
        /// Exclusive upper bound on the count.
        bound: usize,
        /// Milliseconds spent polling.
        elapsed_ms: u64,
    },

    // ========================================================================
    // Test Authoring Errors
    // ========================================================================
    /// Index beyond the rendered element count.
    #[error("{what} index {index} out of range (found {len})")]
    IndexOutOfRange {
        /// What was being indexed, e.g. "product".
        what: &'static str,
        /// Requested index.
        index: usize,
        /// Number of elements available.
        len: usize,
    },

    /// Screen queried for carried context it was never given.
    #[error("{screen} has no {field}; construct it through a navigation edge that carries it")]
    MissingContext {
        /// Screen type name.
        screen: &'static str,
        /// Missing context field.
        field: &'static str,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// Remote end found no element for a direct lookup.
    #[error("No such element: {locator}")]
    NoSuchElement {
        /// Locator or element description.
        locator: String,
    },

    /// Element reference no longer attached to the UI tree.
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's ID.
        element_id: ElementId,
    },

    /// Any other error code reported by the remote end.
    #[error("Remote error ({code}): {message}")]
    Remote {
        /// W3C error code, e.g. "invalid session id".
        code: String,
        /// Message from the remote end.
        message: String,
    },

    /// Malformed or unexpected response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be parsed.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a session initialization error.
    #[inline]
    pub fn session_init(message: impl Into<String>) -> Self {
        Self::SessionInit {
            message: message.into(),
        }
    }

    /// Creates a no active session error.
    #[inline]
    pub fn no_active_session(execution: ExecutionId) -> Self {
        Self::NoActiveSession { execution }
    }

    /// Creates an element timeout error.
    #[inline]
    pub fn element_timeout(locator: Locator, condition: WaitCondition, elapsed: Duration) -> Self {
        Self::ElementTimeout {
            locator,
            condition,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Creates a count timeout error.
    #[inline]
    pub fn count_timeout(locator: Locator, bound: usize, elapsed: Duration) -> Self {
        Self::CountTimeout {
            locator,
            bound,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Creates an index out of range error.
    #[inline]
    pub fn index_out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { what, index, len }
    }

    /// Creates a missing context error.
    #[inline]
    pub fn missing_context(screen: &'static str, field: &'static str) -> Self {
        Self::MissingContext { screen, field }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a no such element error.
    #[inline]
    pub fn no_such_element(locator: impl Into<String>) -> Self {
        Self::NoSuchElement {
            locator: locator.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates a remote error from a W3C error code.
    #[inline]
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a wait timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ElementTimeout { .. } | Self::CountTimeout { .. }
        )
    }

    /// Returns `true` if the element was missing or detached.
    ///
    /// The wait engine treats these as "not yet" and polls again.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(self, Self::NoSuchElement { .. } | Self::StaleElement { .. })
    }

    /// Returns `true` if the error ends the test run.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SessionInit { .. }
                | Self::NoActiveSession { .. }
                | Self::IndexOutOfRange { .. }
                | Self::MissingContext { .. }
                | Self::Config { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
