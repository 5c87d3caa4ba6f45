//! Builder pattern for session configuration.
//!
//! Provides a fluent API on top of the flat-map defaults, for callers that
//! configure sessions in code rather than from a file.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use swaglabs_pages::SessionConfig;
//!
//! # fn example() -> swaglabs_pages::Result<()> {
//! let config = SessionConfig::builder()
//!     .server_url("http://127.0.0.1:4723")
//!     .device_name("Pixel_7_API_34")
//!     .installed_app("com.swaglabsmobileapp", "com.swaglabsmobileapp.MainActivity")
//!     .explicit_wait(Duration::from_secs(20))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

use super::capabilities::AppSource;
use super::config::{ConfigMap, SessionConfig, keys, resolve_app_path};

// ============================================================================
// SessionConfigBuilder
// ============================================================================

/// Builder for a [`SessionConfig`].
///
/// Unset fields take the value from the base map, then the defaults.
#[derive(Debug, Default, Clone)]
pub struct SessionConfigBuilder {
    base: ConfigMap,
    server_url: Option<String>,
    device_name: Option<String>,
    platform_version: Option<String>,
    app: Option<AppSource>,
    app_path: Option<PathBuf>,
    credentials: Option<(String, String)>,
    implicit_wait: Option<Duration>,
    explicit_wait: Option<Duration>,
    poll_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    no_reset: Option<bool>,
}

// ============================================================================
// SessionConfigBuilder Implementation
// ============================================================================

impl SessionConfigBuilder {
    /// Creates a builder over the built-in defaults.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder over a loaded map.
    #[inline]
    #[must_use]
    pub fn from_map(base: ConfigMap) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Sets the remote endpoint URL.
    #[inline]
    #[must_use]
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Sets the device serial or emulator name.
    #[inline]
    #[must_use]
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Sets the platform version.
    #[inline]
    #[must_use]
    pub fn platform_version(mut self, version: impl Into<String>) -> Self {
        self.platform_version = Some(version.into());
        self
    }

    /// Installs the app from a local artifact.
    #[inline]
    #[must_use]
    pub fn app_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = Some(path.into());
        self.app = None;
        self
    }

    /// Launches an already installed app.
    #[inline]
    #[must_use]
    pub fn installed_app(mut self, package: impl Into<String>, activity: impl Into<String>) -> Self {
        self.app = Some(AppSource::Installed {
            package: package.into(),
            activity: activity.into(),
        });
        self.app_path = None;
        self
    }

    /// Sets the login credentials.
    #[inline]
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the endpoint-side implicit wait.
    #[inline]
    #[must_use]
    pub fn implicit_wait(mut self, timeout: Duration) -> Self {
        self.implicit_wait = Some(timeout);
        self
    }

    /// Sets the default explicit wait timeout.
    #[inline]
    #[must_use]
    pub fn explicit_wait(mut self, timeout: Duration) -> Self {
        self.explicit_wait = Some(timeout);
        self
    }

    /// Sets the wait engine poll interval.
    #[inline]
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Sets the per-request HTTP timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Keeps app state between sessions.
    #[inline]
    #[must_use]
    pub fn no_reset(mut self, no_reset: bool) -> Self {
        self.no_reset = Some(no_reset);
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the URL is invalid or the device name is empty
    /// - [`Error::Config`] if the explicit wait or poll interval is zero
    pub fn build(self) -> Result<SessionConfig> {
        let mut base = self.base;
        if let Some(url) = self.server_url {
            base.insert(keys::SERVER_URL, url);
        }

        let mut config = SessionConfig::read_map(&base)?;

        if let Some(name) = self.device_name {
            config.device_name = name;
        }
        if let Some(version) = self.platform_version {
            config.platform_version = version;
        }
        if let Some(app) = self.app {
            config.app = app;
        }
        if let Some(path) = self.app_path {
            config.app = AppSource::Artifact(resolve_app_path(&path.to_string_lossy())?);
        }
        if let Some((username, password)) = self.credentials {
            config.username = username;
            config.password = password;
        }
        if let Some(timeout) = self.implicit_wait {
            config.implicit_wait = timeout;
        }
        if let Some(timeout) = self.explicit_wait {
            config.explicit_wait = timeout;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval = interval;
        }
        if let Some(timeout) = self.request_timeout {
            config.request_timeout = timeout;
        }
        if let Some(no_reset) = self.no_reset {
            config.no_reset = no_reset;
        }

        validate(&config)?;
        Ok(config)
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Rejects settings the wait engine cannot run with.
pub(super) fn validate(config: &SessionConfig) -> Result<()> {
    if config.device_name.trim().is_empty() {
        return Err(Error::config(
            "Device name is required. Use .device_name() or set android.device.name.",
        ));
    }

    if config.explicit_wait.is_zero() {
        return Err(Error::config("Explicit wait must be greater than zero"));
    }

    if config.poll_interval.is_zero() {
        return Err(Error::config("Poll interval must be greater than zero"));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
