//! Element lookup, handles, and waiting.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Locator`] | Lookup strategy and value |
//! | [`ElementHandle`] | Handle to one native element |
//! | [`WaitEngine`] | Polls until a [`WaitCondition`] holds |
//! | [`WaitSettings`] | Default timeout and poll cadence |

// ============================================================================
// Submodules
// ============================================================================

/// Element handles.
pub mod element;

/// Locator strategies.
pub mod locator;

/// Polling waits.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::ElementHandle;
pub use locator::Locator;
pub use wait::{WaitCondition, WaitEngine, WaitSettings};
