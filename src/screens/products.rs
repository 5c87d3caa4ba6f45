//! Product catalog screen.
//!
//! Index-based queries read the rows the app has rendered so far. An index
//! past the rendered rows yields `None` from the queries and
//! [`Error::IndexOutOfRange`] from [`ProductListScreen::select_item`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{debug, info};

use crate::driver::Session;
use crate::error::{Error, Result};
use crate::ui::locator::xpath_literal;
use crate::ui::{ElementHandle, Locator, WaitEngine};

use super::cart::CartScreen;
use super::details::ItemDetailScreen;
use super::navigation::{Screen, ScreenKind};

// ============================================================================
// Locators
// ============================================================================

pub(super) fn page_title() -> Locator {
    Locator::text_view("PRODUCTS")
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

pub(super) fn cart_icon() -> Locator {
    Locator::accessibility_id("test-Cart")
}

fn cart_badge() -> Locator {
    Locator::accessibility_id("test-Cart drop zone")
}

/// Row whose title text equals `name`.
fn row_named(name: &str) -> Locator {
    Locator::xpath(format!(
        "//android.widget.TextView[@text={}]/ancestor::android.view.ViewGroup[@content-desc='test-Item']",
        xpath_literal(name)
    ))
}

/// Scrolls the first scrollable container until `text` is on screen.
fn scroll_into_view(text: &str) -> Locator {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    Locator::android_uiautomator(format!(
        "new UiScrollable(new UiSelector().scrollable(true)).scrollIntoView(new UiSelector().textContains(\"{escaped}\"))"
    ))
}

// ============================================================================
// ProductListScreen
// ============================================================================

/// The catalog shown after login.
#[derive(Clone)]
pub struct ProductListScreen {
    session: Session,
    wait: WaitEngine,
}

impl fmt::Debug for ProductListScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductListScreen")
            .field("session_id", self.session.id())
            .finish()
    }
}

impl Screen for ProductListScreen {
    const KIND: ScreenKind = ScreenKind::ProductList;

    #[inline]
    fn session(&self) -> &Session {
        &self.session
    }
}

// ============================================================================
// ProductListScreen - Constructor
// ============================================================================

impl ProductListScreen {
    /// Binds the product list to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        debug!(session_id = %session.id(), "Product list screen");
        let wait = session.waiter();
        Self { session, wait }
    }
}

// ============================================================================
// ProductListScreen - Queries
// ============================================================================

impl ProductListScreen {
    /// Checks that the catalog title is showing.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.wait.is_visible(&page_title()).await
    }

    /// Reads the screen title.
    pub async fn title(&self) -> Result<String> {
        self.wait.visible(&page_title()).await?.text().await
    }

    /// Counts the rendered product rows.
    pub async fn item_count(&self) -> Result<usize> {
        let count = self.rows().await?.len();
        debug!(count, "Product rows");
        Ok(count)
    }

    /// Reads the name of row `index`, or `None` past the rendered rows.
    pub async fn item_name(&self, index: usize) -> Result<Option<String>> {
        self.text_at(&item_titles(), index).await
    }

    /// Reads the price of row `index`, or `None` past the rendered rows.
    pub async fn item_price(&self, index: usize) -> Result<Option<String>> {
        self.text_at(&item_prices(), index).await
    }

    /// Reads the cart badge; `"0"` when the cart is empty.
    pub async fn cart_badge_count(&self) -> Result<String> {
        match self.wait.visible(&cart_badge()).await {
            Ok(badge) => badge.text().await,
            Err(e) if e.is_timeout() => Ok("0".to_string()),
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// ProductListScreen - Actions
// ============================================================================

impl ProductListScreen {
    /// Opens product `index`.
    ///
    /// The destination carries the name read from the row before tapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the rendered rows.
    pub async fn select_item(self, index: usize) -> Result<ItemDetailScreen> {
        let name = self.text_at(&item_titles(), index).await?;
        let rows = self.rows().await?;
        let (Some(row), Some(name)) = (rows.get(index), name) else {
            return Err(Error::index_out_of_range("product", index, rows.len()));
        };

        info!(index, name = %name, "Selecting product");
        row.click().await?;
        Ok(ItemDetailScreen::with_expected_name(self.session, name))
    }

    /// Opens the first product.
    pub async fn select_first_item(self) -> Result<ItemDetailScreen> {
        self.select_item(0).await
    }

    /// Opens the product titled `name`.
    pub async fn select_item_by_name(self, name: &str) -> Result<ItemDetailScreen> {
        info!(name, "Selecting product by name");
        self.wait.clickable(&row_named(name)).await?.click().await?;
        Ok(ItemDetailScreen::with_expected_name(self.session, name))
    }

    /// Scrolls until a product containing `text` is on screen.
    pub async fn scroll_to_product(self, text: &str) -> Result<Self> {
        debug!(text, "Scrolling to product");
        self.wait.present(&scroll_into_view(text)).await?;
        Ok(self)
    }

    /// Opens the cart.
    pub async fn open_cart(self) -> Result<CartScreen> {
        self.wait.clickable(&cart_icon()).await?.click().await?;
        Ok(CartScreen::new(self.session))
    }
}

// ============================================================================
// ProductListScreen - Internal
// ============================================================================

impl ProductListScreen {
    /// Waits for the catalog, then looks up its rows once.
    async fn rows(&self) -> Result<Vec<ElementHandle>> {
        self.wait.visible(&page_title()).await?;
        self.wait.find_all(&item_rows()).await
    }

    async fn text_at(&self, locator: &Locator, index: usize) -> Result<Option<String>> {
        self.wait.visible(&page_title()).await?;
        let elements = self.wait.find_all(locator).await?;
        match elements.get(index) {
            Some(element) => element.text().await.map(Some),
            None => {
                debug!(locator = %locator, index, len = elements.len(), "No element at index");
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
