//! Product detail screen.
//!
//! The detail view has no stable locator for "the product shown here", so
//! the screen carries the name learned on the list and locates the title
//! text by it.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{debug, info, warn};

use crate::driver::Session;
use crate::error::{Error, Result};
use crate::ui::{Locator, WaitEngine};

use super::cart::CartScreen;
use super::navigation::{Screen, ScreenKind};
use super::products::{self, ProductListScreen};

// ============================================================================
// Locators
// ============================================================================

fn price_label() -> Locator {
    Locator::accessibility_id("test-Price")
}

fn description_label() -> Locator {
    Locator::accessibility_id("test-Description")
}

fn add_to_cart_button() -> Locator {
    Locator::accessibility_id("test-ADD TO CART")
}

fn add_to_cart_button_alt() -> Locator {
    Locator::xpath("//*[@content-desc='test-ADD TO CART']")
}

fn remove_button() -> Locator {
    Locator::accessibility_id("test-REMOVE")
}

fn back_button() -> Locator {
    Locator::accessibility_id("test-BACK TO PRODUCTS")
}

// ============================================================================
// ItemDetailScreen
// ============================================================================

/// One product's detail view.
#[derive(Clone)]
pub struct ItemDetailScreen {
    session: Session,
    wait: WaitEngine,
    expected_name: Option<String>,
}

impl fmt::Debug for ItemDetailScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDetailScreen")
            .field("session_id", self.session.id())
            .field("expected_name", &self.expected_name)
            .finish()
    }
}

impl Screen for ItemDetailScreen {
    const KIND: ScreenKind = ScreenKind::ItemDetail;

    #[inline]
    fn session(&self) -> &Session {
        &self.session
    }
}

// ============================================================================
// ItemDetailScreen - Constructors
// ============================================================================

impl ItemDetailScreen {
    /// Binds the detail screen without knowing which product it shows.
    #[must_use]
    pub fn new(session: Session) -> Self {
        debug!(session_id = %session.id(), "Item detail screen");
        let wait = session.waiter();
        Self {
            session,
            wait,
            expected_name: None,
        }
    }

    /// Binds the detail screen for the product named `name`.
    #[must_use]
    pub fn with_expected_name(session: Session, name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(session_id = %session.id(), expected_name = %name, "Item detail screen");
        let wait = session.waiter();
        Self {
            session,
            wait,
            expected_name: Some(name),
        }
    }

    /// Returns the product name carried from the previous screen.
    #[inline]
    #[must_use]
    pub fn expected_name(&self) -> Option<&str> {
        self.expected_name.as_deref()
    }
}

// ============================================================================
// ItemDetailScreen - Queries
// ============================================================================

impl ItemDetailScreen {
    /// Checks that the expected product is showing.
    ///
    /// Without a carried name, checks for the add-to-cart button instead.
    pub async fn is_displayed(&self) -> Result<bool> {
        match &self.expected_name {
            Some(name) => self.wait.is_visible(&Locator::text_view(name)).await,
            None => self.wait.is_visible(&add_to_cart_button()).await,
        }
    }

    /// Reads the title of the carried product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingContext`] if the screen carries no name.
    pub async fn product_name(&self) -> Result<String> {
        let name = self
            .expected_name
            .as_deref()
            .ok_or_else(|| Error::missing_context("ItemDetailScreen", "expected_name"))?;
        self.product_name_for(name).await
    }

    /// Reads the title text equal to `name`.
    pub async fn product_name_for(&self, name: &str) -> Result<String> {
        self.wait
            .visible(&Locator::text_view(name))
            .await?
            .text()
            .await
    }

    /// Reads the price, e.g. `"$29.99"`.
    pub async fn product_price(&self) -> Result<String> {
        let price = self.wait.visible(&price_label()).await?.text().await?;
        debug!(price = %price, "Product price");
        Ok(price)
    }

    /// Reads the description.
    pub async fn product_description(&self) -> Result<String> {
        self.wait
            .visible(&description_label())
            .await?
            .text()
            .await
    }

    /// Checks whether the add-to-cart button is showing.
    pub async fn is_add_to_cart_displayed(&self) -> Result<bool> {
        self.wait.is_visible(&add_to_cart_button()).await
    }

    /// Checks whether the remove button is showing.
    pub async fn is_remove_displayed(&self) -> Result<bool> {
        self.wait.is_visible(&remove_button()).await
    }
}

// ============================================================================
// ItemDetailScreen - Actions
// ============================================================================

impl ItemDetailScreen {
    /// Adds the product to the cart.
    ///
    /// Retries once through the content-desc XPath if the accessibility
    /// lookup fails.
    pub async fn add_to_cart(self) -> Result<Self> {
        info!(product = ?self.expected_name, "Adding to cart");

        let tapped = match self.wait.clickable(&add_to_cart_button()).await {
            Ok(button) => button.click().await,
            Err(e) => Err(e),
        };

        if let Err(e) = tapped {
            if e.is_fatal() {
                return Err(e);
            }
            warn!(error = %e, "Add to cart failed, retrying by content-desc");
            self.wait
                .clickable(&add_to_cart_button_alt())
                .await?
                .click()
                .await?;
        }

        Ok(self)
    }

    /// Removes the product from the cart.
    pub async fn remove_from_cart(self) -> Result<Self> {
        info!(product = ?self.expected_name, "Removing from cart");
        self.wait.clickable(&remove_button()).await?.click().await?;
        Ok(self)
    }

    /// Returns to the catalog.
    pub async fn back(self) -> Result<ProductListScreen> {
        self.wait.clickable(&back_button()).await?.click().await?;
        Ok(ProductListScreen::new(self.session))
    }

    /// Opens the cart.
    pub async fn open_cart(self) -> Result<CartScreen> {
        self.wait
            .clickable(&products::cart_icon())
            .await?
            .click()
            .await?;
        Ok(CartScreen::new(self.session))
    }
}

// ============================================================================
// Tests
// ============================================================================
