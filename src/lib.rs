//! Swag Labs Pages - screen objects for driving the Swag Labs Android app.
//!
//! This library wraps a W3C WebDriver (Appium) endpoint in typed screen
//! objects. Tests move between screens only through action methods, so
//! the app's navigation graph is checked at compile time.
//!
//! # Architecture
//!
//! - **Session layer**: [`SessionManager`] keeps one [`Session`] per
//!   [`ExecutionId`] and always completes teardown
//! - **Wait layer**: [`WaitEngine`] polls with a fresh lookup each attempt
//! - **Screen layer**: [`LoginScreen`], [`ProductListScreen`],
//!   [`ItemDetailScreen`], [`CartScreen`]
//! - **Transport**: the [`Remote`] trait, implemented over HTTP by
//!   [`HttpRemote`]
//!
//! # Quick Start
//!
//! ```no_run
//! use swaglabs_pages::{ExecutionId, Result, SessionConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SessionConfig::load("config/swaglabs.toml")?;
//!     let manager = SessionManager::new();
//!     let execution = ExecutionId::new("smoke");
//!
//!     let session = manager.acquire(&execution, &config).await?;
//!     let details = session
//!         .login_screen()
//!         .login(config.username(), config.password())
//!         .await?
//!         .select_first_item()
//!         .await?;
//!
//!     println!("{} costs {}", details.product_name().await?, details.product_price().await?);
//!
//!     manager.release(&execution).await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`driver`] | Configuration, capabilities, sessions |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | WebDriver commands and responses (internal) |
//! | [`screens`] | Screen objects and the navigation graph |
//! | [`transport`] | Endpoint trait and HTTP client |
//! | [`ui`] | Locators, element handles, waits |

// ============================================================================
// Modules
// ============================================================================

/// Session configuration and lifecycle.
///
/// Use [`SessionManager::acquire()`] to obtain a live session.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for sessions, elements and execution units.
pub mod identifiers;

/// WebDriver wire types.
///
/// Internal module defining command and response structures.
pub mod protocol;

/// Screen objects and navigation.
pub mod screens;

/// Endpoint transport.
///
/// [`Remote`] is the seam for plugging in a different backend.
pub mod transport;

/// Locators, element handles and the wait engine.
pub mod ui;

// ============================================================================
// Re-exports
// ============================================================================

// Driver types
pub use driver::{
    AppSource, Capabilities, ConfigMap, Session, SessionConfig, SessionConfigBuilder,
    SessionManager,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ElementId, ExecutionId, SessionId};

// Screen types
pub use screens::{
    AnyScreen, CartScreen, ItemDetailScreen, LoginScreen, ProductListScreen, Screen, ScreenKind,
    Transition,
};

// Transport types
pub use transport::{HttpRemote, Remote};

// UI types
pub use ui::{ElementHandle, Locator, WaitCondition, WaitEngine, WaitSettings};
