//! Login screen.
//!
//! # Example
//!
//! ```ignore
//! let products = session
//!     .login_screen()
//!     .enter_username("standard_user").await?
//!     .enter_password("secret_sauce").await?
//!     .tap_login().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::driver::Session;
use crate::error::{Error, Result};
use crate::ui::{Locator, WaitCondition, WaitEngine};

use super::navigation::{Screen, ScreenKind, Transition};
use super::products::{self, ProductListScreen};

// ============================================================================
// Locators
// ============================================================================

fn username_field() -> Locator {
    Locator::accessibility_id("test-Username")
}

fn password_field() -> Locator {
    Locator::accessibility_id("test-Password")
}

fn login_button() -> Locator {
    Locator::accessibility_id("test-LOGIN")
}

fn error_banner() -> Locator {
    Locator::accessibility_id("test-Error message")
}

// ============================================================================
// LoginScreen
// ============================================================================

/// The credential entry screen shown at app launch.
#[derive(Clone)]
pub struct LoginScreen {
    session: Session,
    wait: WaitEngine,
}

impl fmt::Debug for LoginScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginScreen")
            .field("session_id", self.session.id())
            .finish()
    }
}

impl Screen for LoginScreen {
    const KIND: ScreenKind = ScreenKind::Login;

    #[inline]
    fn session(&self) -> &Session {
        &self.session
    }
}

// ============================================================================
// LoginScreen - Constructor
// ============================================================================

impl LoginScreen {
    /// Binds the login screen to a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        debug!(session_id = %session.id(), "Login screen");
        let wait = session.waiter();
        Self { session, wait }
    }
}

// ============================================================================
// LoginScreen - Queries
// ============================================================================

impl LoginScreen {
    /// Checks that the username field is showing.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.wait.is_visible(&username_field()).await
    }

    /// Checks whether the login error banner is showing.
    pub async fn is_error_displayed(&self) -> Result<bool> {
        self.wait.is_visible(&error_banner()).await
    }

    /// Reads the login error banner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementTimeout`] if no banner appears.
    pub async fn error_message(&self) -> Result<String> {
        let message = self.wait.visible(&error_banner()).await?.text().await?;
        debug!(message = %message, "Login error");
        Ok(message)
    }
}

// ============================================================================
// LoginScreen - Actions
// ============================================================================

impl LoginScreen {
    /// Types the username.
    pub async fn enter_username(self, username: &str) -> Result<Self> {
        debug!(username, "Entering username");
        self.wait
            .visible(&username_field())
            .await?
            .type_text(username)
            .await?;
        Ok(self)
    }

    /// Types the password.
    pub async fn enter_password(self, password: &str) -> Result<Self> {
        debug!("Entering password");
        self.wait
            .visible(&password_field())
            .await?
            .type_text(password)
            .await?;
        Ok(self)
    }

    /// Taps the login button.
    pub async fn tap_login(self) -> Result<ProductListScreen> {
        self.wait.clickable(&login_button()).await?.click().await?;
        Ok(ProductListScreen::new(self.session))
    }

    /// Enters both credentials and taps login.
    pub async fn login(self, username: &str, password: &str) -> Result<ProductListScreen> {
        info!(username, "Logging in");
        self.enter_username(username)
            .await?
            .enter_password(password)
            .await?
            .tap_login()
            .await
    }

    /// Logs in, staying on this screen if the app rejects the credentials.
    ///
    /// Polls for either the product list or the error banner, whichever
    /// shows first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementTimeout`] if neither appears in time.
    pub async fn attempt_login(
        self,
        username: &str,
        password: &str,
    ) -> Result<Transition<LoginScreen, ProductListScreen>> {
        info!(username, "Attempting login");
        let screen = self
            .enter_username(username)
            .await?
            .enter_password(password)
            .await?;
        screen.wait.clickable(&login_button()).await?.click().await?;

        let settings = screen.wait.settings();
        let title = products::page_title();
        let banner = error_banner();
        let started = Instant::now();

        loop {
            if screen.wait.is_visible_within(&banner, Duration::ZERO).await? {
                info!(username, "Login rejected");
                return Ok(Transition::Same(screen));
            }
            if screen.wait.is_visible_within(&title, Duration::ZERO).await? {
                return Ok(Transition::Next(ProductListScreen::new(screen.session)));
            }

            let elapsed = started.elapsed();
            if elapsed >= settings.timeout {
                return Err(Error::element_timeout(title, WaitCondition::Visible, elapsed));
            }
            sleep(settings.poll_interval.min(settings.timeout - elapsed)).await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
