//! Screen objects for the Swag Labs app.
//!
//! Each screen is bound to a [`Session`](crate::Session) and exposes:
//!
//! - **Queries** (`&self`): read text, counts and flags; never change the app
//! - **Actions** (`self`): perform one gesture, then return this screen or
//!   the destination screen
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LoginScreen`] | Credential entry, the entry point |
//! | [`ProductListScreen`] | Product catalog |
//! | [`ItemDetailScreen`] | One product, carrying its expected name |
//! | [`CartScreen`] | Cart contents |
//! | [`Transition`] | Action outcome that may stay or move on |
//! | [`AnyScreen`] | Any one of the above |

// ============================================================================
// Submodules
// ============================================================================

/// Cart screen.
pub mod cart;

/// Product detail screen.
pub mod details;

/// Login screen.
pub mod login;

/// Navigation graph and shared screen types.
pub mod navigation;

/// Product list screen.
pub mod products;

// ============================================================================
// Re-exports
// ============================================================================

pub use cart::CartScreen;
pub use details::ItemDetailScreen;
pub use login::LoginScreen;
pub use navigation::{AnyScreen, EDGES, Edge, Screen, ScreenKind, Transition};
pub use products::ProductListScreen;
