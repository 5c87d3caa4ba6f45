//! Element locator strategies.
//!
//! A [`Locator`] names zero or more elements on the current screen. It is
//! immutable once built; screens keep their locators as constants or build
//! one per query when the selector carries a product name.
//!
//! # Example
//!
//! ```ignore
//! use swaglabs_pages::Locator;
//!
//! // Accessibility id (content-desc on Android)
//! let login = Locator::accessibility_id("test-LOGIN");
//!
//! // XPath
//! let title = Locator::xpath("//android.widget.TextView[@text='PRODUCTS']");
//!
//! // UiAutomator expression
//! let scroll = Locator::android_uiautomator("new UiScrollable(...)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Locator Enum
// ============================================================================

/// Element locator strategy (like Selenium's `By`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "using", content = "value")]
pub enum Locator {
    /// Accessibility id (`content-desc` on Android).
    #[serde(rename = "accessibility id")]
    AccessibilityId(String),

    /// XPath over the native view hierarchy.
    #[serde(rename = "xpath")]
    XPath(String),

    /// Resource id.
    #[serde(rename = "id")]
    Id(String),

    /// Native widget class name.
    #[serde(rename = "class name")]
    ClassName(String),

    /// UiAutomator Java expression (Android only).
    #[serde(rename = "-android uiautomator")]
    AndroidUiAutomator(String),
}

impl Locator {
    /// Creates an accessibility id locator.
    #[inline]
    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Self::AccessibilityId(id.into())
    }

    /// Creates an XPath locator.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates a resource id locator.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a class name locator.
    #[inline]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::ClassName(class.into())
    }

    /// Creates a UiAutomator locator.
    #[inline]
    pub fn android_uiautomator(expr: impl Into<String>) -> Self {
        Self::AndroidUiAutomator(expr.into())
    }

    /// Locates a `TextView` whose text equals `text` exactly.
    #[must_use]
    pub fn text_view(text: &str) -> Self {
        Self::XPath(format!(
            "//android.widget.TextView[@text={}]",
            xpath_literal(text)
        ))
    }

    /// Returns the W3C strategy name sent to the endpoint.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::AccessibilityId(_) => "accessibility id",
            Self::XPath(_) => "xpath",
            Self::Id(_) => "id",
            Self::ClassName(_) => "class name",
            Self::AndroidUiAutomator(_) => "-android uiautomator",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::AccessibilityId(v)
            | Self::XPath(v)
            | Self::Id(v)
            | Self::ClassName(v)
            | Self::AndroidUiAutomator(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Quotes `text` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text holding both quote kinds is
/// split into a `concat()` call.
pub(crate) fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }

    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

// ============================================================================
// Tests
// ============================================================================
