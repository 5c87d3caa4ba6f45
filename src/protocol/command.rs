//! W3C WebDriver commands used by the page-object layer.
//!
//! Each command knows its HTTP method, its path relative to the endpoint
//! root and its JSON body. Only the subset needed by the screens is here.
//!
//! | Command | Route |
//! |---------|-------|
//! | `NewSession` | `POST /session` |
//! | `DeleteSession` | `DELETE /session/{id}` |
//! | `SetTimeouts` | `POST /session/{id}/timeouts` |
//! | `FindElements` | `POST /session/{id}/elements` |
//! | `GetElementText` | `GET /session/{id}/element/{eid}/text` |
//! | `IsElementDisplayed` | `GET /session/{id}/element/{eid}/displayed` |
//! | `IsElementEnabled` | `GET /session/{id}/element/{eid}/enabled` |
//! | `GetElementAttribute` | `GET /session/{id}/element/{eid}/attribute/{name}` |
//! | `ElementClick` | `POST /session/{id}/element/{eid}/click` |
//! | `ElementClear` | `POST /session/{id}/element/{eid}/clear` |
//! | `ElementSendKeys` | `POST /session/{id}/element/{eid}/value` |

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};
use urlencoding::encode;

use crate::error::{Error, Result};
use crate::identifiers::{ElementId, SessionId};
use crate::ui::Locator;

// ============================================================================
// HttpMethod
// ============================================================================

/// HTTP verb of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

// ============================================================================
// Command
// ============================================================================

/// A single WebDriver command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a session from a capabilities payload.
    NewSession {
        /// Full `{"capabilities": ...}` body.
        capabilities: Value,
    },

    /// End the session.
    DeleteSession,

    /// Set the implicit element-lookup wait.
    SetTimeouts {
        /// Implicit wait in milliseconds.
        implicit_ms: u64,
    },

    /// Find every element matching a locator.
    FindElements {
        /// Locator to search with.
        locator: Locator,
    },

    /// Read an element's text.
    GetElementText {
        /// Target element.
        element: ElementId,
    },

    /// Check whether an element is displayed.
    IsElementDisplayed {
        /// Target element.
        element: ElementId,
    },

    /// Check whether an element is enabled.
    IsElementEnabled {
        /// Target element.
        element: ElementId,
    },

    /// Read an element attribute.
    GetElementAttribute {
        /// Target element.
        element: ElementId,
        /// Attribute name.
        name: String,
    },

    /// Tap an element.
    ElementClick {
        /// Target element.
        element: ElementId,
    },

    /// Clear an editable element.
    ElementClear {
        /// Target element.
        element: ElementId,
    },

    /// Type into an element.
    ElementSendKeys {
        /// Target element.
        element: ElementId,
        /// Text to type.
        text: String,
    },
}

impl Command {
    /// Returns the command name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewSession { .. } => "newSession",
            Self::DeleteSession => "deleteSession",
            Self::SetTimeouts { .. } => "setTimeouts",
            Self::FindElements { .. } => "findElements",
            Self::GetElementText { .. } => "getElementText",
            Self::IsElementDisplayed { .. } => "isElementDisplayed",
            Self::IsElementEnabled { .. } => "isElementEnabled",
            Self::GetElementAttribute { .. } => "getElementAttribute",
            Self::ElementClick { .. } => "elementClick",
            Self::ElementClear { .. } => "elementClear",
            Self::ElementSendKeys { .. } => "elementSendKeys",
        }
    }

    /// Returns the HTTP verb.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        match self {
            Self::DeleteSession => HttpMethod::Delete,
            Self::GetElementText { .. }
            | Self::IsElementDisplayed { .. }
            | Self::IsElementEnabled { .. }
            | Self::GetElementAttribute { .. } => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Returns the element this command targets, if any.
    #[must_use]
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            Self::GetElementText { element }
            | Self::IsElementDisplayed { element }
            | Self::IsElementEnabled { element }
            | Self::GetElementAttribute { element, .. }
            | Self::ElementClick { element }
            | Self::ElementClear { element }
            | Self::ElementSendKeys { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Builds the route relative to the endpoint root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if a session-scoped command is built
    /// without a session id.
    pub fn path(&self, session: Option<&SessionId>) -> Result<String> {
        let tail = match self {
            Self::NewSession { .. } => return Ok("session".to_string()),
            Self::DeleteSession => String::new(),
            Self::SetTimeouts { .. } => "/timeouts".to_string(),
            Self::FindElements { .. } => "/elements".to_string(),
            Self::GetElementText { element } => element_route(element, "text"),
            Self::IsElementDisplayed { element } => element_route(element, "displayed"),
            Self::IsElementEnabled { element } => element_route(element, "enabled"),
            Self::GetElementAttribute { element, name } => {
                element_route(element, &format!("attribute/{}", encode(name)))
            }
            Self::ElementClick { element } => element_route(element, "click"),
            Self::ElementClear { element } => element_route(element, "clear"),
            Self::ElementSendKeys { element, .. } => element_route(element, "value"),
        };

        let session = session.ok_or_else(|| {
            Error::protocol(format!("{} requires a session id", self.name()))
        })?;

        Ok(format!("session/{}{tail}", encode(session.as_str())))
    }

    /// Builds the JSON body, `None` for bodiless verbs.
    #[must_use]
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::NewSession { capabilities } => Some(capabilities.clone()),
            Self::SetTimeouts { implicit_ms } => Some(json!({ "implicit": implicit_ms })),
            Self::FindElements { locator } => Some(json!({
                "using": locator.strategy(),
                "value": locator.value(),
            })),
            Self::ElementClick { .. } | Self::ElementClear { .. } => Some(json!({})),
            Self::ElementSendKeys { text, .. } => Some(json!({
                "text": text,
                "value": text.chars().map(String::from).collect::<Vec<_>>(),
            })),
            _ => None,
        }
    }
}

/// Builds the `/element/{eid}/{tail}` suffix.
fn element_route(element: &ElementId, tail: &str) -> String {
    format!("/element/{}/{tail}", encode(element.as_str()))
}

// ============================================================================
// Tests
// ============================================================================
