//! Session configuration and lifecycle.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SessionManager`] | Per-execution session registry |
//! | [`Session`] | Handle to one live session |
//! | [`SessionConfig`] | Validated session settings |
//! | [`SessionConfigBuilder`] | Fluent configuration builder |
//! | [`ConfigMap`] | Flat key/value settings loaded from TOML |
//! | [`Capabilities`] | New-session capabilities |
//!
//! # Example
//!
//! ```no_run
//! use swaglabs_pages::{ExecutionId, SessionConfig, SessionManager};
//!
//! # async fn example() -> swaglabs_pages::Result<()> {
//! let config = SessionConfig::builder()
//!     .device_name("emulator-5554")
//!     .installed_app("com.swaglabsmobileapp", "com.swaglabsmobileapp.MainActivity")
//!     .build()?;
//!
//! let manager = SessionManager::new();
//! let session = manager.acquire(&ExecutionId::new("smoke"), &config).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for session configuration.
pub mod builder;

/// New-session capabilities.
pub mod capabilities;

/// Configuration map and settings.
pub mod config;

/// Per-execution session registry.
pub mod manager;

/// Live session handle.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionConfigBuilder;
pub use capabilities::{AppSource, Capabilities};
pub use config::{ConfigMap, SessionConfig, keys};
pub use manager::SessionManager;
pub use session::Session;
