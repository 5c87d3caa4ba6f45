//! W3C WebDriver response envelope.
//!
//! Every reply wraps its payload in `{"value": ...}`. Errors arrive with a
//! non-2xx status and a `value` object holding `error` and `message`.
//!
//! Success:
//! ```json
//! { "value": [ { "element-6066-11e4-a52e-4f735466cecf": "00000000-0000-0012" } ] }
//! ```
//!
//! Error:
//! ```json
//! { "value": { "error": "no such element", "message": "...", "stacktrace": "" } }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{ElementId, SessionId};

// ============================================================================
// Constants
// ============================================================================

/// W3C element reference key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Pre-W3C (JSON Wire) element reference key.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

// ============================================================================
// Response
// ============================================================================

/// A decoded response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Payload.
    #[serde(default)]
    pub value: Value,

    /// Top-level session id (JSON Wire servers only).
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Error payload inside `value`.
#[derive(Debug, Clone, Deserialize)]
struct ErrorValue {
    error: String,
    #[serde(default)]
    message: String,
}

impl Response {
    /// Decodes a body and checks the status.
    ///
    /// # Errors
    ///
    /// Returns the mapped remote error for non-2xx replies, or
    /// [`Error::Protocol`] when the body is not a WebDriver envelope.
    pub fn parse(status: u16, body: &str, element: Option<&ElementId>) -> Result<Self> {
        let response: Self = serde_json::from_str(body).map_err(|e| {
            Error::protocol(format!("HTTP {status}: undecodable body ({e}): {body}"))
        })?;

        let error = serde_json::from_value::<ErrorValue>(response.value.clone()).ok();
        match error {
            Some(err) => Err(map_error_code(&err.error, err.message, element)),
            None if !(200..300).contains(&status) => Err(Error::remote(
                "unknown error",
                format!("HTTP {status} without error payload"),
            )),
            None => Ok(response),
        }
    }

    /// Extracts the session id from a new-session reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if no session id is present.
    pub fn into_session_id(self) -> Result<SessionId> {
        self.value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(SessionId::new)
            .or_else(|| self.session_id.as_deref().map(SessionId::new))
            .ok_or_else(|| Error::protocol("new session reply carries no sessionId"))
    }

    /// Extracts element references from a find-elements reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the payload is not a list of references.
    pub fn into_element_ids(self) -> Result<Vec<ElementId>> {
        let Value::Array(items) = self.value else {
            return Err(Error::protocol("findElements reply is not an array"));
        };

        items
            .iter()
            .map(|item| {
                element_ref(item)
                    .map(ElementId::new)
                    .ok_or_else(|| Error::protocol(format!("not an element reference: {item}")))
            })
            .collect()
    }

    /// Extracts a string payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the payload is not a string.
    pub fn into_string(self) -> Result<String> {
        match self.value {
            Value::String(s) => Ok(s),
            other => Err(Error::protocol(format!("expected string, got {other}"))),
        }
    }

    /// Extracts an optional string payload (`null` maps to `None`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] for any other type.
    pub fn into_optional_string(self) -> Result<Option<String>> {
        match self.value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(Error::protocol(format!("expected string or null, got {other}"))),
        }
    }

    /// Extracts a boolean payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the payload is not a boolean.
    pub fn into_bool(self) -> Result<bool> {
        self.value
            .as_bool()
            .ok_or_else(|| Error::protocol(format!("expected bool, got {}", self.value)))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads an element reference under either key.
#[must_use]
pub fn element_ref(value: &Value) -> Option<&str> {
    value
        .get(ELEMENT_KEY)
        .or_else(|| value.get(LEGACY_ELEMENT_KEY))
        .and_then(Value::as_str)
}

/// Maps a W3C error code to a crate error.
fn map_error_code(code: &str, message: String, element: Option<&ElementId>) -> Error {
    match (code, element) {
        ("no such element", _) => Error::no_such_element(message),
        ("stale element reference", Some(element)) => Error::stale_element(element.clone()),
        ("session not created", _) => Error::session_init(message),
        _ => Error::remote(code, message),
    }
}

// ============================================================================
// Tests
// ============================================================================
