//! Session configuration.
//!
//! Settings come from a flat key→value [`ConfigMap`], usually loaded from a
//! TOML file. Nested tables and dotted keys flatten to `a.b.c` keys, so
//! both of these set `appium.server.url`:
//!
//! ```toml
//! appium.server.url = "http://127.0.0.1:4723"
//!
//! [appium.server]
//! url = "http://127.0.0.1:4723"
//! ```
//!
//! Missing keys fall back to the defaults in [`keys`]. Malformed numbers
//! and booleans fall back silently.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::ui::WaitSettings;

use super::builder::{SessionConfigBuilder, validate};
use super::capabilities::AppSource;

// ============================================================================
// Keys
// ============================================================================

/// Recognized configuration keys and their defaults.
pub mod keys {
    /// Remote endpoint URL.
    pub const SERVER_URL: &str = "appium.server.url";
    /// Device serial or emulator name.
    pub const DEVICE_NAME: &str = "android.device.name";
    /// Platform name.
    pub const PLATFORM_NAME: &str = "android.platform.name";
    /// Platform version.
    pub const PLATFORM_VERSION: &str = "android.platform.version";
    /// Automation backend.
    pub const AUTOMATION_NAME: &str = "android.automation.name";
    /// App artifact path; empty selects package/activity.
    pub const APP_PATH: &str = "app.path";
    /// Installed app package.
    pub const APP_PACKAGE: &str = "app.package";
    /// Installed app launch activity.
    pub const APP_ACTIVITY: &str = "app.activity";
    /// Login user name.
    pub const USERNAME: &str = "test.username";
    /// Login password.
    pub const PASSWORD: &str = "test.password";
    /// Endpoint-side implicit wait, seconds.
    pub const IMPLICIT_WAIT: &str = "implicit.wait";
    /// Explicit wait default, seconds.
    pub const EXPLICIT_WAIT: &str = "explicit.wait";
    /// Wait engine poll interval, milliseconds.
    pub const POLL_INTERVAL_MS: &str = "poll.interval.ms";
    /// Idle timeout before the endpoint drops the session, seconds.
    pub const NEW_COMMAND_TIMEOUT: &str = "new.command.timeout";
    /// Launch activity wait, seconds.
    pub const APP_WAIT_DURATION: &str = "app.wait.duration";
    /// Per-request HTTP timeout, seconds.
    pub const REQUEST_TIMEOUT: &str = "remote.request.timeout";
    /// Keep app state between sessions.
    pub const NO_RESET: &str = "app.no.reset";
    /// Reinstall the app for every session.
    pub const FULL_RESET: &str = "app.full.reset";

    pub(crate) const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:4723";
    pub(crate) const DEFAULT_DEVICE_NAME: &str = "emulator-5554";
    pub(crate) const DEFAULT_PLATFORM_NAME: &str = "Android";
    pub(crate) const DEFAULT_PLATFORM_VERSION: &str = "13";
    pub(crate) const DEFAULT_AUTOMATION_NAME: &str = "UiAutomator2";
    pub(crate) const DEFAULT_APP_PATH: &str =
        "src/main/resources/app/Android.SauceLabs.Mobile.Sample.app.2.7.1.apk";
    pub(crate) const DEFAULT_APP_PACKAGE: &str = "com.swaglabsmobileapp";
    pub(crate) const DEFAULT_APP_ACTIVITY: &str = "com.swaglabsmobileapp.MainActivity";
    pub(crate) const DEFAULT_USERNAME: &str = "standard_user";
    pub(crate) const DEFAULT_PASSWORD: &str = "secret_sauce";
    pub(crate) const DEFAULT_IMPLICIT_WAIT_SECS: u64 = 10;
    pub(crate) const DEFAULT_EXPLICIT_WAIT_SECS: u64 = 15;
    pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
    pub(crate) const DEFAULT_NEW_COMMAND_TIMEOUT_SECS: u64 = 300;
    pub(crate) const DEFAULT_APP_WAIT_DURATION_SECS: u64 = 30;
    pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
}

// ============================================================================
// ConfigMap
// ============================================================================

/// Flat key→string configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMap {
    entries: FxHashMap<String, String>,
}

impl ConfigMap {
    /// Creates an empty map (every key takes its default).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from key/value pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses TOML text, flattening tables into dotted keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] if the text is not valid TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(text)?;
        let mut map = Self::new();
        map.flatten_table("", &table);
        Ok(map)
    }

    /// Loads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::Toml`]
    /// if it is not valid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let map = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), keys = map.len(), "Loaded configuration");
        Ok(map)
    }

    /// Sets a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the raw value of a key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns a string value or the default.
    #[must_use]
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Returns an unsigned integer value or the default.
    ///
    /// Malformed values fall back without error.
    #[must_use]
    pub fn get_u64(&self, key: &str, default: u64) -> u64 {
        match self.get(key) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                debug!(key, value = raw, default, "Malformed integer, using default");
                default
            }),
            None => default,
        }
    }

    /// Returns a boolean value or the default.
    ///
    /// Malformed values fall back without error.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(raw) if raw == "true" => true,
            Some(raw) if raw == "false" => false,
            Some(raw) => {
                debug!(key, value = %raw, default, "Malformed boolean, using default");
                default
            }
            None => default,
        }
    }

    /// Returns the number of keys set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flatten_table(&mut self, prefix: &str, table: &toml::Table) {
        for (key, value) in table {
            let full = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            match value {
                toml::Value::Table(nested) => self.flatten_table(&full, nested),
                toml::Value::String(s) => self.insert(full, s.clone()),
                toml::Value::Integer(i) => self.insert(full, i.to_string()),
                toml::Value::Float(f) => self.insert(full, f.to_string()),
                toml::Value::Boolean(b) => self.insert(full, b.to_string()),
                toml::Value::Datetime(d) => self.insert(full, d.to_string()),
                toml::Value::Array(_) => {
                    debug!(key = %full, "Ignoring array value in flat configuration");
                }
            }
        }
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Everything needed to acquire a session and drive the screens.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub(crate) server_url: Url,
    pub(crate) device_name: String,
    pub(crate) platform_name: String,
    pub(crate) platform_version: String,
    pub(crate) automation_name: String,
    pub(crate) app: AppSource,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) implicit_wait: Duration,
    pub(crate) explicit_wait: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) new_command_timeout: Duration,
    pub(crate) app_wait_duration: Duration,
    pub(crate) request_timeout: Duration,
    pub(crate) no_reset: bool,
    pub(crate) full_reset: bool,
}

impl SessionConfig {
    /// Creates a fluent builder starting from the defaults.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }

    /// Reads every setting from a flat map, applying defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the endpoint URL is invalid or the device name is empty
    /// - [`Error::Config`] if the explicit wait or poll interval is zero
    /// - [`Error::Io`] if a relative app path cannot be resolved
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        let config = Self::read_map(map)?;
        validate(&config)?;
        Ok(config)
    }

    /// Reads the map without validating, so builder overrides apply first.
    pub(crate) fn read_map(map: &ConfigMap) -> Result<Self> {
        let raw_url = map.get_or(keys::SERVER_URL, keys::DEFAULT_SERVER_URL);
        let server_url = Url::parse(&raw_url)
            .map_err(|e| Error::config(format!("invalid {}: {raw_url:?}: {e}", keys::SERVER_URL)))?;

        let app_path = map.get_or(keys::APP_PATH, keys::DEFAULT_APP_PATH);
        let app = if app_path.trim().is_empty() {
            AppSource::Installed {
                package: map.get_or(keys::APP_PACKAGE, keys::DEFAULT_APP_PACKAGE),
                activity: map.get_or(keys::APP_ACTIVITY, keys::DEFAULT_APP_ACTIVITY),
            }
        } else {
            AppSource::Artifact(resolve_app_path(app_path.trim())?)
        };

        Ok(Self {
            server_url,
            device_name: map.get_or(keys::DEVICE_NAME, keys::DEFAULT_DEVICE_NAME),
            platform_name: map.get_or(keys::PLATFORM_NAME, keys::DEFAULT_PLATFORM_NAME),
            platform_version: map.get_or(keys::PLATFORM_VERSION, keys::DEFAULT_PLATFORM_VERSION),
            automation_name: map.get_or(keys::AUTOMATION_NAME, keys::DEFAULT_AUTOMATION_NAME),
            app,
            username: map.get_or(keys::USERNAME, keys::DEFAULT_USERNAME),
            password: map.get_or(keys::PASSWORD, keys::DEFAULT_PASSWORD),
            implicit_wait: secs(map, keys::IMPLICIT_WAIT, keys::DEFAULT_IMPLICIT_WAIT_SECS),
            explicit_wait: secs(map, keys::EXPLICIT_WAIT, keys::DEFAULT_EXPLICIT_WAIT_SECS),
            poll_interval: Duration::from_millis(
                map.get_u64(keys::POLL_INTERVAL_MS, keys::DEFAULT_POLL_INTERVAL_MS),
            ),
            new_command_timeout: secs(
                map,
                keys::NEW_COMMAND_TIMEOUT,
                keys::DEFAULT_NEW_COMMAND_TIMEOUT_SECS,
            ),
            app_wait_duration: secs(
                map,
                keys::APP_WAIT_DURATION,
                keys::DEFAULT_APP_WAIT_DURATION_SECS,
            ),
            request_timeout: secs(map, keys::REQUEST_TIMEOUT, keys::DEFAULT_REQUEST_TIMEOUT_SECS),
            no_reset: map.get_bool(keys::NO_RESET, false),
            full_reset: map.get_bool(keys::FULL_RESET, false),
        })
    }

    /// Loads a TOML file and reads it with [`from_map`](Self::from_map).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_map(&ConfigMap::load(path)?)
    }
}

// ============================================================================
// SessionConfig - Accessors
// ============================================================================

impl SessionConfig {
    /// Remote endpoint URL.
    #[inline]
    #[must_use]
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Device serial or emulator name.
    #[inline]
    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Platform name.
    #[inline]
    #[must_use]
    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// Platform version.
    #[inline]
    #[must_use]
    pub fn platform_version(&self) -> &str {
        &self.platform_version
    }

    /// Automation backend.
    #[inline]
    #[must_use]
    pub fn automation_name(&self) -> &str {
        &self.automation_name
    }

    /// App under test.
    #[inline]
    #[must_use]
    pub fn app(&self) -> &AppSource {
        &self.app
    }

    /// Login user name.
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password.
    #[inline]
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Endpoint-side implicit wait.
    #[inline]
    #[must_use]
    pub fn implicit_wait(&self) -> Duration {
        self.implicit_wait
    }

    /// Default timeout of every explicit wait.
    #[inline]
    #[must_use]
    pub fn explicit_wait(&self) -> Duration {
        self.explicit_wait
    }

    /// Delay between wait engine polls.
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Idle timeout before the endpoint drops the session.
    #[inline]
    #[must_use]
    pub fn new_command_timeout(&self) -> Duration {
        self.new_command_timeout
    }

    /// Launch activity wait.
    #[inline]
    #[must_use]
    pub fn app_wait_duration(&self) -> Duration {
        self.app_wait_duration
    }

    /// Per-request HTTP timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Keep app state between sessions.
    #[inline]
    #[must_use]
    pub fn no_reset(&self) -> bool {
        self.no_reset
    }

    /// Reinstall the app for every session.
    #[inline]
    #[must_use]
    pub fn full_reset(&self) -> bool {
        self.full_reset
    }

    /// Wait engine settings derived from this configuration.
    #[inline]
    #[must_use]
    pub fn wait_settings(&self) -> WaitSettings {
        WaitSettings::new(self.explicit_wait, self.poll_interval)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn secs(map: &ConfigMap, key: &str, default: u64) -> Duration {
    Duration::from_secs(map.get_u64(key, default))
}

/// Resolves a relative artifact path against the working directory.
///
/// Absolute paths and paths with a drive or scheme separator are kept.
pub(crate) fn resolve_app_path(raw: &str) -> Result<PathBuf> {
    let path = PathBuf::from(raw);
    if path.is_absolute() || raw.starts_with('/') || raw.contains(':') {
        return Ok(path);
    }
    Ok(std::env::current_dir()?.join(path))
}

// ============================================================================
// Tests
// ============================================================================
