//! The app's navigation graph.
//!
//! Screens only move through their action methods, and every action has a
//! concrete return type, so an illegal move does not compile. The table in
//! [`EDGES`] mirrors those methods for reporting and for tests that walk
//! the graph.
//!
//! ```text
//! Login ──login──► ProductList ◄──back── ItemDetail ⟲ add_to_cart
//!                   │  ▲   └──select_item(i)──►│
//!          open_cart│  │continue_shopping      │open_cart
//!                   ▼  │                       ▼
//!                   Cart ⟲ remove_item(i) ◄────┘
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use crate::driver::Session;
use crate::error::Result;

use super::cart::CartScreen;
use super::details::ItemDetailScreen;
use super::login::LoginScreen;
use super::products::ProductListScreen;

// ============================================================================
// ScreenKind
// ============================================================================

/// The screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    /// Credential entry; the entry point.
    Login,
    /// Product catalog.
    ProductList,
    /// One product.
    ItemDetail,
    /// Cart contents.
    Cart,
}

impl ScreenKind {
    /// All screens, entry point first.
    pub const ALL: [ScreenKind; 4] = [
        ScreenKind::Login,
        ScreenKind::ProductList,
        ScreenKind::ItemDetail,
        ScreenKind::Cart,
    ];

    /// Returns the edges leaving this screen.
    pub fn edges(self) -> impl Iterator<Item = &'static Edge> {
        EDGES.iter().filter(move |edge| edge.from == self)
    }

    /// Returns the destination of `action` from this screen.
    #[must_use]
    pub fn target(self, action: &str) -> Option<ScreenKind> {
        self.edges()
            .find(|edge| edge.action == action)
            .map(|edge| edge.to)
    }

    /// Returns whether `to` can be reached from this screen.
    #[must_use]
    pub fn reaches(self, to: ScreenKind) -> bool {
        let mut seen = vec![self];
        let mut frontier = vec![self];

        while let Some(kind) = frontier.pop() {
            if kind == to {
                return true;
            }
            for edge in kind.edges() {
                if !seen.contains(&edge.to) {
                    seen.push(edge.to);
                    frontier.push(edge.to);
                }
            }
        }

        false
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Login => "login",
            Self::ProductList => "product list",
            Self::ItemDetail => "item detail",
            Self::Cart => "cart",
        })
    }
}

// ============================================================================
// Edges
// ============================================================================

/// One labelled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Source screen.
    pub from: ScreenKind,
    /// Action method name.
    pub action: &'static str,
    /// Destination screen.
    pub to: ScreenKind,
}

const fn edge(from: ScreenKind, action: &'static str, to: ScreenKind) -> Edge {
    Edge { from, action, to }
}

/// Every navigation edge, keyed by the method that performs it.
///
/// Chained field entry (`enter_username`, `enter_password`) is not a
/// transition and is left out; `attempt_login` appears once per outcome.
pub const EDGES: &[Edge] = &[
    edge(ScreenKind::Login, "login", ScreenKind::ProductList),
    edge(ScreenKind::Login, "tap_login", ScreenKind::ProductList),
    edge(ScreenKind::Login, "attempt_login", ScreenKind::ProductList),
    edge(ScreenKind::Login, "attempt_login", ScreenKind::Login),
    edge(ScreenKind::ProductList, "select_item", ScreenKind::ItemDetail),
    edge(ScreenKind::ProductList, "select_first_item", ScreenKind::ItemDetail),
    edge(ScreenKind::ProductList, "select_item_by_name", ScreenKind::ItemDetail),
    edge(ScreenKind::ProductList, "open_cart", ScreenKind::Cart),
    edge(ScreenKind::ItemDetail, "add_to_cart", ScreenKind::ItemDetail),
    edge(ScreenKind::ItemDetail, "remove_from_cart", ScreenKind::ItemDetail),
    edge(ScreenKind::ItemDetail, "open_cart", ScreenKind::Cart),
    edge(ScreenKind::ItemDetail, "back", ScreenKind::ProductList),
    edge(ScreenKind::Cart, "continue_shopping", ScreenKind::ProductList),
    edge(ScreenKind::Cart, "remove_item", ScreenKind::Cart),
    edge(ScreenKind::Cart, "remove_first_item", ScreenKind::Cart),
];

// ============================================================================
// Screen
// ============================================================================

/// A screen object bound to a live session.
pub trait Screen: fmt::Debug + Clone + Send + Sync {
    /// Which screen this is.
    const KIND: ScreenKind;

    /// Returns the session this screen drives.
    fn session(&self) -> &Session;

    /// Returns [`Self::KIND`].
    #[inline]
    fn kind(&self) -> ScreenKind {
        Self::KIND
    }
}

// ============================================================================
// Transition
// ============================================================================

/// Outcome of an action that may or may not leave the screen.
#[derive(Debug, Clone)]
pub enum Transition<S, N> {
    /// Still on the source screen.
    Same(S),
    /// Moved to the next screen.
    Next(N),
}

impl<S: Screen, N: Screen> Transition<S, N> {
    /// Returns the kind of the screen now showing.
    #[must_use]
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Same(_) => S::KIND,
            Self::Next(_) => N::KIND,
        }
    }

    /// Returns `true` if the action moved on.
    #[inline]
    #[must_use]
    pub fn is_next(&self) -> bool {
        matches!(self, Self::Next(_))
    }

    /// Returns the next screen, if the action moved on.
    #[must_use]
    pub fn into_next(self) -> Option<N> {
        match self {
            Self::Next(next) => Some(next),
            Self::Same(_) => None,
        }
    }

    /// Returns the source screen, if the action stayed.
    #[must_use]
    pub fn into_same(self) -> Option<S> {
        match self {
            Self::Same(same) => Some(same),
            Self::Next(_) => None,
        }
    }
}

// ============================================================================
// AnyScreen
// ============================================================================

/// Any one of the app's screens.
#[derive(Debug, Clone)]
pub enum AnyScreen {
    /// Login screen.
    Login(LoginScreen),
    /// Product list screen.
    ProductList(ProductListScreen),
    /// Item detail screen.
    ItemDetail(ItemDetailScreen),
    /// Cart screen.
    Cart(CartScreen),
}

impl AnyScreen {
    /// Returns which screen this is.
    #[must_use]
    pub fn kind(&self) -> ScreenKind {
        match self {
            Self::Login(_) => ScreenKind::Login,
            Self::ProductList(_) => ScreenKind::ProductList,
            Self::ItemDetail(_) => ScreenKind::ItemDetail,
            Self::Cart(_) => ScreenKind::Cart,
        }
    }

    /// Returns the session behind the screen.
    #[must_use]
    pub fn session(&self) -> &Session {
        match self {
            Self::Login(screen) => screen.session(),
            Self::ProductList(screen) => screen.session(),
            Self::ItemDetail(screen) => screen.session(),
            Self::Cart(screen) => screen.session(),
        }
    }

    /// Checks that the screen is actually showing.
    ///
    /// # Errors
    ///
    /// Propagates any failure other than a wait timeout.
    pub async fn is_displayed(&self) -> Result<bool> {
        match self {
            Self::Login(screen) => screen.is_displayed().await,
            Self::ProductList(screen) => screen.is_displayed().await,
            Self::ItemDetail(screen) => screen.is_displayed().await,
            Self::Cart(screen) => screen.is_displayed().await,
        }
    }
}

impl From<LoginScreen> for AnyScreen {
    fn from(screen: LoginScreen) -> Self {
        Self::Login(screen)
    }
}

impl From<ProductListScreen> for AnyScreen {
    fn from(screen: ProductListScreen) -> Self {
        Self::ProductList(screen)
    }
}

impl From<ItemDetailScreen> for AnyScreen {
    fn from(screen: ItemDetailScreen) -> Self {
        Self::ItemDetail(screen)
    }
}

impl From<CartScreen> for AnyScreen {
    fn from(screen: CartScreen) -> Self {
        Self::Cart(screen)
    }
}

impl<S, N> From<Transition<S, N>> for AnyScreen
where
    S: Into<AnyScreen>,
    N: Into<AnyScreen>,
{
    fn from(transition: Transition<S, N>) -> Self {
        match transition {
            Transition::Same(same) => same.into(),
            Transition::Next(next) => next.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
