//! Endpoint transport.
//!
//! ```text
//! ┌──────────────────┐                         ┌──────────────────┐
//! │  Screens (Rust)  │                         │  Automation      │
//! │                  │     W3C WebDriver       │  endpoint        │
//! │  Session         │────────────────────────►│  (Appium)        │
//! │  → dyn Remote    │     HTTP + JSON         │                  │
//! └──────────────────┘                         └──────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `remote` | The [`Remote`] trait every backend implements |
//! | `http` | [`HttpRemote`], the HTTP backend |

// ============================================================================
// Submodules
// ============================================================================

/// HTTP WebDriver backend.
pub mod http;

/// Endpoint operations trait.
pub mod remote;

// ============================================================================
// Re-exports
// ============================================================================

pub use http::HttpRemote;
pub use remote::Remote;
