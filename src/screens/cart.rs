//! Cart screen.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::driver::Session;
use crate::error::{Error, Result};
use crate::ui::{ElementHandle, Locator, WaitEngine};

use super::navigation::{Screen, ScreenKind};
use super::products::ProductListScreen;

// ============================================================================
// Locators
// ============================================================================

fn page_title() -> Locator {
    Locator::text_view("YOUR CART")
}

fn item_rows() -> Locator {
    Locator::accessibility_id("test-Item")
}

fn item_titles() -> Locator {
    Locator::accessibility_id("test-Item title")
}

fn item_prices() -> Locator {
    Locator::accessibility_id("test-Price")
}

fn remove_buttons() -> Locator {
    Locator::accessibility_id("test-REMOVE")
}

fn continue_shopping_button() -> Locator {
    Locator::accessibility_id("test-CONTINUE SHOPPING")
}

/// Every text view inside a cart row.
fn row_text_views() -> Locator {
    Locator::xpath("//android.view.ViewGroup[@content-desc='test-Item']//android.widget.TextView")
}

/// Quantity labels are bare digits.
static QUANTITY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d+$").ok());

/// Returns `true` for row text that can be a product name.
fn is_name_text(text: &str) -> bool {
    !text.is_empty()
        && !text.starts_with('$')
        && !QUANTITY.as_ref().is_some_and(|re| re.is_match(text))
}

// ============================================================================
// CartScreen
// ============================================================================

/// The cart contents.
#[derive(Clone)]
pub struct CartScreen {
    session: Session,
    wait: WaitEngine,
}

impl fmt::Debug for CartScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartScreen")
            .field("session_id", self.session.id())
            .finish()
    }
}

impl Screen for CartScreen {
    const KIND: ScreenKind = ScreenKind::Cart;

    #[inline]
    fn session(&self) -> &Session {
        &self.session
    }
}

// ============================================================================
// CartScreen - Constructor
// ============================================================================

impl CartScreen {
    /// Binds the cart screen to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        debug!(session_id = %session.id(), "Cart screen");
        let wait = session.waiter();
        Self { session, wait }
    }
}

// ============================================================================
// CartScreen - Queries
// ============================================================================

impl CartScreen {
    /// Checks that the cart title is showing.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.wait.is_visible(&page_title()).await
    }

    /// Counts the rows in the cart.
    pub async fn item_count(&self) -> Result<usize> {
        let count = self.find_loaded(&item_rows()).await?.len();
        debug!(count, "Cart rows");
        Ok(count)
    }

    /// Returns `true` if the cart has no rows.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.item_count().await? == 0)
    }

    /// Reads the name of row `index`, or `None` past the last row.
    pub async fn item_name(&self, index: usize) -> Result<Option<String>> {
        self.text_at(&item_titles(), index).await
    }

    /// Reads the price of row `index`, or `None` past the last row.
    pub async fn item_price(&self, index: usize) -> Result<Option<String>> {
        self.text_at(&item_prices(), index).await
    }

    /// Reads the first row's name.
    ///
    /// Falls back to the row's text views when the title label is missing
    /// or blank, skipping prices and quantities.
    pub async fn first_item_name(&self) -> Result<Option<String>> {
        if let Some(name) = self.item_name(0).await?
            && !name.is_empty()
        {
            return Ok(Some(name));
        }

        debug!("No item title, scanning row text views");
        for view in self.wait.find_all(&row_text_views()).await? {
            let text = view.text().await?;
            if is_name_text(&text) {
                return Ok(Some(text));
            }
        }

        Ok(None)
    }

    /// Reads the first row's price.
    pub async fn first_item_price(&self) -> Result<Option<String>> {
        self.item_price(0).await
    }

    /// Checks whether a text view reading exactly `name` becomes visible.
    pub async fn contains_product(&self, name: &str) -> Result<bool> {
        self.wait.is_visible(&Locator::text_view(name)).await
    }

    /// Checks whether any row title equals `name`.
    pub async fn has_item(&self, name: &str) -> Result<bool> {
        for title in self.find_loaded(&item_titles()).await? {
            if title.text().await? == name {
                return Ok(true);
            }
        }
        debug!(name, "Item not in cart");
        Ok(false)
    }
}

// ============================================================================
// CartScreen - Actions
// ============================================================================

impl CartScreen {
    /// Removes row `index` and waits for the row count to drop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the last row.
    pub async fn remove_item(self, index: usize) -> Result<Self> {
        let before = self.find_loaded(&item_rows()).await?.len();
        let buttons = self.wait.find_all(&remove_buttons()).await?;
        let Some(button) = buttons.get(index) else {
            return Err(Error::index_out_of_range("cart item", index, buttons.len()));
        };

        info!(index, before, "Removing cart item");
        button.click().await?;

        let timeout = self.wait.settings().timeout;
        let after = self.wait.count_below(&item_rows(), before, timeout).await?;
        debug!(after, "Cart item removed");
        Ok(self)
    }

    /// Removes the first row.
    pub async fn remove_first_item(self) -> Result<Self> {
        self.remove_item(0).await
    }

    /// Returns to the catalog.
    pub async fn continue_shopping(self) -> Result<ProductListScreen> {
        self.wait
            .clickable(&continue_shopping_button())
            .await?
            .click()
            .await?;
        Ok(ProductListScreen::new(self.session))
    }
}

// ============================================================================
// CartScreen - Internal
// ============================================================================

impl CartScreen {
    /// Waits for the cart title, then looks `locator` up once.
    async fn find_loaded(&self, locator: &Locator) -> Result<Vec<ElementHandle>> {
        self.wait.visible(&page_title()).await?;
        self.wait.find_all(locator).await
    }

    async fn text_at(&self, locator: &Locator, index: usize) -> Result<Option<String>> {
        let elements = self.find_loaded(locator).await?;
        match elements.get(index) {
            Some(element) => element.text().await.map(Some),
            None => Ok(None),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
