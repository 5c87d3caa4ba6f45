//! WebDriver wire types.
//!
//! # Protocol Overview
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | [`Command`] | Local → Remote | HTTP method, route and JSON body |
//! | [`Response`] | Remote → Local | `{"value": ...}` envelope |
//!
//! Errors arrive as `{"value": {"error": code, "message": ...}}` and are
//! mapped onto [`crate::Error`] by [`Response::parse`].
//!
//! Element references are objects keyed by [`ELEMENT_KEY`], or by
//! [`LEGACY_ELEMENT_KEY`] on older servers.

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions.
pub mod command;

/// Response decoding.
pub mod response;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, HttpMethod};
pub use response::{ELEMENT_KEY, LEGACY_ELEMENT_KEY, Response, element_ref};
