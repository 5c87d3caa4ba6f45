//! Session capabilities negotiated with the endpoint.
//!
//! Built from a [`SessionConfig`]; serialized as a W3C new-session payload
//! with Appium vendor-prefixed keys.
//!
//! ```json
//! {
//!   "capabilities": {
//!     "alwaysMatch": {
//!       "platformName": "Android",
//!       "appium:deviceName": "emulator-5554",
//!       "appium:app": "/abs/path/app.apk",
//!       "appium:appWaitActivity": "*"
//!     },
//!     "firstMatch": [{}]
//!   }
//! }
//! ```
//!
//! [`SessionConfig`]: super::SessionConfig

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{Error, Result};

use super::config::SessionConfig;

// ============================================================================
// AppSource
// ============================================================================

/// How the app under test reaches the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSource {
    /// Install from a local artifact (`.apk`).
    Artifact(PathBuf),

    /// Launch an already installed app.
    Installed {
        /// Android package name.
        package: String,
        /// Launch activity.
        activity: String,
    },
}

// ============================================================================
// Capabilities
// ============================================================================

/// Capabilities sent when creating a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capabilities {
    /// Target platform.
    #[serde(rename = "platformName")]
    pub platform_name: String,

    /// Device serial or emulator name.
    #[serde(rename = "appium:deviceName")]
    pub device_name: String,

    /// OS version.
    #[serde(rename = "appium:platformVersion")]
    pub platform_version: String,

    /// Automation backend.
    #[serde(rename = "appium:automationName")]
    pub automation_name: String,

    /// Artifact path, when installing.
    #[serde(rename = "appium:app", skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    /// Package, when launching an installed app.
    #[serde(rename = "appium:appPackage", skip_serializing_if = "Option::is_none")]
    pub app_package: Option<String>,

    /// Activity, when launching an installed app.
    #[serde(rename = "appium:appActivity", skip_serializing_if = "Option::is_none")]
    pub app_activity: Option<String>,

    /// Activity pattern to wait for after launch.
    #[serde(rename = "appium:appWaitActivity")]
    pub app_wait_activity: String,

    /// Keep app state between sessions.
    #[serde(rename = "appium:noReset")]
    pub no_reset: bool,

    /// Uninstall the app after the session.
    #[serde(rename = "appium:fullReset")]
    pub full_reset: bool,

    /// Idle seconds before the endpoint ends the session.
    #[serde(rename = "appium:newCommandTimeout")]
    pub new_command_timeout_secs: u64,

    /// Grant runtime permissions on install.
    #[serde(rename = "appium:autoGrantPermissions")]
    pub auto_grant_permissions: bool,

    /// Milliseconds to wait for the launch activity.
    #[serde(rename = "appium:appWaitDuration")]
    pub app_wait_duration_ms: u64,
}

impl Capabilities {
    /// Derives capabilities from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionInit`] if the configured artifact does not exist.
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let (app, app_package, app_activity) = match config.app() {
            AppSource::Artifact(path) => {
                if !path.exists() {
                    return Err(Error::session_init(format!(
                        "App artifact not found: {}",
                        path.display()
                    )));
                }
                (Some(path.display().to_string()), None, None)
            }
            AppSource::Installed { package, activity } => {
                (None, Some(package.clone()), Some(activity.clone()))
            }
        };

        Ok(Self {
            platform_name: config.platform_name().to_string(),
            device_name: config.device_name().to_string(),
            platform_version: config.platform_version().to_string(),
            automation_name: config.automation_name().to_string(),
            app,
            app_package,
            app_activity,
            app_wait_activity: "*".to_string(),
            no_reset: config.no_reset(),
            full_reset: config.full_reset(),
            new_command_timeout_secs: config.new_command_timeout().as_secs(),
            auto_grant_permissions: true,
            app_wait_duration_ms: config.app_wait_duration().as_millis() as u64,
        })
    }

    /// Returns a short description of the app for logs.
    #[must_use]
    pub fn app_label(&self) -> &str {
        self.app
            .as_deref()
            .or(self.app_package.as_deref())
            .unwrap_or("<none>")
    }

    /// Builds the W3C new-session body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_payload(&self) -> Result<Value> {
        Ok(json!({
            "capabilities": {
                "alwaysMatch": serde_json::to_value(self)?,
                "firstMatch": [{}],
            }
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================
