//! Shared fixtures for integration tests.
//!
//! [`FakeApp`] implements [`Remote`] by simulating the Swag Labs screens in
//! memory. Element ids carry a generation number that changes whenever the
//! simulated view tree is rebuilt, so stale handles fail the way they do on
//! a device.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use swaglabs_pages::{
    Capabilities, ElementId, Error, Locator, Result, SessionConfig, SessionId, SessionManager,
};
use swaglabs_pages::transport::Remote;

// ============================================================================
// Catalog
// ============================================================================

/// Products in display order.
pub const PRODUCTS: &[(&str, &str)] = &[
    ("Sauce Labs Backpack", "$29.99"),
    ("Sauce Labs Bike Light", "$9.99"),
    ("Sauce Labs Bolt T-Shirt", "$15.99"),
    ("Sauce Labs Fleece Jacket", "$49.99"),
    ("Sauce Labs Onesie", "$7.99"),
    ("Test.allTheThings() T-Shirt (Red)", "$15.99"),
];

pub const USERNAME: &str = "standard_user";
pub const PASSWORD: &str = "secret_sauce";
pub const LOCKED_OUT: &str = "locked_out_user";

const BAD_CREDENTIALS: &str = "Username and password do not match any user in this service.";
const LOCKED_OUT_MESSAGE: &str = "Sorry, this user has been locked out.";

fn description(index: usize) -> String {
    format!("Description of {}", PRODUCTS[index].0)
}

// ============================================================================
// Behaviour
// ============================================================================

/// Knobs for simulating a misbehaving app or endpoint.
#[derive(Debug, Clone, Default)]
pub struct Behaviour {
    /// Product screen lookups that return nothing after each login.
    pub render_delay: u32,
    /// Reject session creation.
    pub fail_create: bool,
    /// Fail every session deletion.
    pub fail_delete: bool,
    /// Reject the implicit-wait timeout after a session opens.
    pub fail_implicit_wait: bool,
    /// Time session creation takes.
    pub create_delay: Duration,
    /// Hide the add-to-cart button from accessibility lookups.
    pub hide_add_to_cart_a11y: bool,
    /// Render cart row titles as blank labels.
    pub blank_cart_titles: bool,
}

// ============================================================================
// Simulated UI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Login,
    Products,
    Detail(usize),
    Cart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    UsernameField,
    PasswordField,
    LoginButton,
    ErrorBanner,
    CartIcon,
    CartBadge,
    ProductRow(usize),
    AddToCart,
    Remove,
    Back,
    CartRemove(usize),
    ContinueShopping,
    Label(String),
}

#[derive(Debug)]
struct AppSession {
    view: View,
    username: String,
    password: String,
    login_error: Option<&'static str>,
    cart: Vec<usize>,
    generation: u64,
    nodes: Vec<Node>,
    pending_renders: u32,
    implicit_wait: Duration,
}

impl AppSession {
    fn new() -> Self {
        Self {
            view: View::Login,
            username: String::new(),
            password: String::new(),
            login_error: None,
            cart: Vec::new(),
            generation: 1,
            nodes: Vec::new(),
            pending_renders: 0,
            implicit_wait: Duration::ZERO,
        }
    }

    fn rebuild(&mut self) {
        self.generation += 1;
        self.nodes.clear();
    }

    fn go(&mut self, view: View) {
        self.view = view;
        self.rebuild();
    }

    fn register(&mut self, nodes: Vec<Node>) -> Vec<ElementId> {
        nodes
            .into_iter()
            .map(|node| {
                self.nodes.push(node);
                ElementId::new(format!("{}-{}", self.generation, self.nodes.len() - 1))
            })
            .collect()
    }

    fn node(&self, element: &ElementId) -> Result<Node> {
        let stale = || Error::stale_element(element.clone());
        let (generation, index) = element.as_str().split_once('-').ok_or_else(stale)?;
        if generation.parse::<u64>().ok() != Some(self.generation) {
            return Err(stale());
        }
        let index: usize = index.parse().map_err(|_| stale())?;
        self.nodes.get(index).cloned().ok_or_else(stale)
    }

    fn resolve(&mut self, locator: &Locator, behaviour: &Behaviour) -> Vec<Node> {
        if self.view == View::Products && self.pending_renders > 0 {
            self.pending_renders -= 1;
            return Vec::new();
        }

        let value = locator.value();
        match (locator.strategy(), self.view) {
            ("accessibility id", View::Login) => match value {
                "test-Username" => vec![Node::UsernameField],
                "test-Password" => vec![Node::PasswordField],
                "test-LOGIN" => vec![Node::LoginButton],
                "test-Error message" if self.login_error.is_some() => vec![Node::ErrorBanner],
                _ => Vec::new(),
            },
            ("accessibility id", View::Products) => match value {
                "test-Item" => (0..PRODUCTS.len()).map(Node::ProductRow).collect(),
                "test-Item title" => PRODUCTS.iter().map(|p| Node::Label(p.0.into())).collect(),
                "test-Price" => PRODUCTS.iter().map(|p| Node::Label(p.1.into())).collect(),
                "test-Cart" => vec![Node::CartIcon],
                "test-Cart drop zone" if !self.cart.is_empty() => vec![Node::CartBadge],
                _ => Vec::new(),
            },
            ("accessibility id", View::Detail(i)) => match value {
                "test-Price" => vec![Node::Label(PRODUCTS[i].1.into())],
                "test-Description" => vec![Node::Label(description(i))],
                "test-ADD TO CART" if !self.cart.contains(&i) && !behaviour.hide_add_to_cart_a11y => {
                    vec![Node::AddToCart]
                }
                "test-REMOVE" if self.cart.contains(&i) => vec![Node::Remove],
                "test-BACK TO PRODUCTS" => vec![Node::Back],
                "test-Cart" => vec![Node::CartIcon],
                _ => Vec::new(),
            },
            ("accessibility id", View::Cart) => match value {
                "test-Item" => self.cart.iter().map(|&i| Node::ProductRow(i)).collect(),
                "test-Item title" => self
                    .cart
                    .iter()
                    .map(|&i| {
                        let title = if behaviour.blank_cart_titles { "" } else { PRODUCTS[i].0 };
                        Node::Label(title.into())
                    })
                    .collect(),
                "test-Price" => self.cart.iter().map(|&i| Node::Label(PRODUCTS[i].1.into())).collect(),
                "test-Amount" => self.cart.iter().map(|_| Node::Label("1".into())).collect(),
                "test-REMOVE" => (0..self.cart.len()).map(Node::CartRemove).collect(),
                "test-CONTINUE SHOPPING" => vec![Node::ContinueShopping],
                _ => Vec::new(),
            },
            ("xpath", View::Detail(i)) if value == "//*[@content-desc='test-ADD TO CART']" => {
                if self.cart.contains(&i) {
                    Vec::new()
                } else {
                    vec![Node::AddToCart]
                }
            }
            ("xpath", View::Products) if value.contains("/ancestor::") => {
                PRODUCTS
                    .iter()
                    .position(|p| value == row_xpath(p.0))
                    .map(Node::ProductRow)
                    .into_iter()
                    .collect()
            }
            ("xpath", View::Cart) if value.ends_with("//android.widget.TextView") => self
                .cart
                .iter()
                .flat_map(|&i| {
                    [
                        Node::Label("1".into()),
                        Node::Label(PRODUCTS[i].0.into()),
                        Node::Label(description(i)),
                        Node::Label(PRODUCTS[i].1.into()),
                    ]
                })
                .collect(),
            ("xpath", view) => match text_view_target(value) {
                Some(text) => self
                    .texts(view)
                    .into_iter()
                    .filter(|t| *t == text)
                    .map(Node::Label)
                    .collect(),
                None => Vec::new(),
            },
            ("-android uiautomator", View::Products) => match scroll_target(value) {
                Some(text) => PRODUCTS
                    .iter()
                    .filter(|p| p.0.contains(text))
                    .take(1)
                    .map(|p| Node::Label(p.0.into()))
                    .collect(),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Text of every label on a view.
    fn texts(&self, view: View) -> Vec<String> {
        match view {
            View::Login => self.login_error.iter().map(|m| m.to_string()).collect(),
            View::Products => std::iter::once("PRODUCTS".to_string())
                .chain(PRODUCTS.iter().flat_map(|p| [p.0.to_string(), p.1.to_string()]))
                .collect(),
            View::Detail(i) => vec![PRODUCTS[i].0.into(), PRODUCTS[i].1.into(), description(i)],
            View::Cart => std::iter::once("YOUR CART".to_string())
                .chain(self.cart.iter().flat_map(|&i| {
                    [PRODUCTS[i].0.to_string(), PRODUCTS[i].1.to_string(), "1".to_string()]
                }))
                .collect(),
        }
    }

    fn text(&self, node: &Node) -> String {
        match node {
            Node::Label(text) => text.clone(),
            Node::ErrorBanner => self.login_error.unwrap_or_default().to_string(),
            Node::CartBadge => self.cart.len().to_string(),
            Node::UsernameField => self.username.clone(),
            Node::PasswordField => "•".repeat(self.password.len()),
            Node::LoginButton => "LOGIN".into(),
            Node::AddToCart => "ADD TO CART".into(),
            Node::Remove | Node::CartRemove(_) => "REMOVE".into(),
            Node::Back => "BACK TO PRODUCTS".into(),
            Node::ContinueShopping => "CONTINUE SHOPPING".into(),
            Node::CartIcon | Node::ProductRow(_) => String::new(),
        }
    }

    fn click(&mut self, node: Node, render_delay: u32) {
        match (node, self.view) {
            (Node::LoginButton, View::Login) => {
                let accepted = self.password == PASSWORD && self.username != LOCKED_OUT;
                if accepted && !self.username.is_empty() {
                    self.login_error = None;
                    self.pending_renders = render_delay;
                    self.go(View::Products);
                } else {
                    self.login_error = Some(if self.username == LOCKED_OUT {
                        LOCKED_OUT_MESSAGE
                    } else {
                        BAD_CREDENTIALS
                    });
                    self.rebuild();
                }
            }
            (Node::ProductRow(i), View::Products) => self.go(View::Detail(i)),
            (Node::CartIcon, _) => self.go(View::Cart),
            (Node::AddToCart, View::Detail(i)) => {
                if !self.cart.contains(&i) {
                    self.cart.push(i);
                }
                self.rebuild();
            }
            (Node::Remove, View::Detail(i)) => {
                self.cart.retain(|&c| c != i);
                self.rebuild();
            }
            (Node::Back, View::Detail(_)) | (Node::ContinueShopping, View::Cart) => {
                self.go(View::Products);
            }
            (Node::CartRemove(position), View::Cart) => {
                if position < self.cart.len() {
                    self.cart.remove(position);
                }
                self.rebuild();
            }
            _ => {}
        }
    }
}

/// Extracts `X` from `//android.widget.TextView[@text='X']`.
fn text_view_target(xpath: &str) -> Option<String> {
    let inner = xpath
        .strip_prefix("//android.widget.TextView[@text=")?
        .strip_suffix(']')?;
    let unquoted = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))?;
    Some(unquoted.to_string())
}

/// Extracts `X` from `...textContains("X"))`.
fn scroll_target(expr: &str) -> Option<&str> {
    let start = expr.find("textContains(\"")? + "textContains(\"".len();
    let len = expr[start..].find("\")")?;
    Some(&expr[start..start + len])
}

fn row_xpath(name: &str) -> String {
    format!(
        "//android.widget.TextView[@text='{name}']/ancestor::android.view.ViewGroup[@content-desc='test-Item']"
    )
}

// ============================================================================
// FakeApp
// ============================================================================

/// In-memory Swag Labs app behind the [`Remote`] trait.
#[derive(Debug, Default)]
pub struct FakeApp {
    behaviour: Behaviour,
    sessions: Mutex<FxHashMap<String, AppSession>>,
    next_id: AtomicUsize,
    created: AtomicUsize,
    deleted: AtomicUsize,
    finds: AtomicUsize,
}

impl FakeApp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            ..Self::default()
        })
    }

    /// Sessions ever created.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Delete calls received.
    pub fn deleted(&self) -> usize {
        self.deleted.load(Ordering::SeqCst)
    }

    /// Sessions currently open on the endpoint.
    pub fn open_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Element lookups served.
    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    /// Implicit wait applied to `session`.
    pub fn implicit_wait(&self, session: &SessionId) -> Option<Duration> {
        self.sessions
            .lock()
            .get(session.as_str())
            .map(|s| s.implicit_wait)
    }

    /// Puts a product in the cart behind the app's back.
    pub fn seed_cart(&self, session: &SessionId, product: usize) {
        if let Some(state) = self.sessions.lock().get_mut(session.as_str()) {
            state.cart.push(product);
            state.rebuild();
        }
    }

    fn with_session<T>(
        &self,
        session: &SessionId,
        f: impl FnOnce(&mut AppSession) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.lock();
        let state = sessions
            .get_mut(session.as_str())
            .ok_or_else(|| Error::remote("invalid session id", format!("{session} is not open")))?;
        f(state)
    }
}

#[async_trait]
impl Remote for FakeApp {
    async fn create_session(&self, capabilities: &Capabilities) -> Result<SessionId> {
        if self.behaviour.fail_create {
            return Err(Error::remote(
                "unknown error",
                format!("device {} is offline", capabilities.device_name),
            ));
        }
        if !self.behaviour.create_delay.is_zero() {
            tokio::time::sleep(self.behaviour.create_delay).await;
        }
        let id = format!("fake-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.sessions.lock().insert(id.clone(), AppSession::new());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(SessionId::new(id))
    }

    async fn set_implicit_wait(&self, session: &SessionId, timeout: Duration) -> Result<()> {
        if self.behaviour.fail_implicit_wait {
            return Err(Error::remote("invalid argument", "timeouts not supported"));
        }
        self.with_session(session, |state| {
            state.implicit_wait = timeout;
            Ok(())
        })
    }

    async fn find_elements(&self, session: &SessionId, locator: &Locator) -> Result<Vec<ElementId>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let behaviour = self.behaviour.clone();
        self.with_session(session, |state| {
            let nodes = state.resolve(locator, &behaviour);
            Ok(state.register(nodes))
        })
    }

    async fn element_text(&self, session: &SessionId, element: &ElementId) -> Result<String> {
        self.with_session(session, |state| {
            let node = state.node(element)?;
            Ok(state.text(&node))
        })
    }

    async fn element_displayed(&self, session: &SessionId, element: &ElementId) -> Result<bool> {
        self.with_session(session, |state| state.node(element).map(|_| true))
    }

    async fn element_enabled(&self, session: &SessionId, element: &ElementId) -> Result<bool> {
        self.with_session(session, |state| state.node(element).map(|_| true))
    }

    async fn element_attribute(
        &self,
        session: &SessionId,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>> {
        self.with_session(session, |state| {
            let node = state.node(element)?;
            Ok(match name {
                "text" => Some(state.text(&node)),
                _ => None,
            })
        })
    }

    async fn click(&self, session: &SessionId, element: &ElementId) -> Result<()> {
        let render_delay = self.behaviour.render_delay;
        self.with_session(session, |state| {
            let node = state.node(element)?;
            state.click(node, render_delay);
            Ok(())
        })
    }

    async fn clear(&self, session: &SessionId, element: &ElementId) -> Result<()> {
        self.with_session(session, |state| {
            match state.node(element)? {
                Node::UsernameField => state.username.clear(),
                Node::PasswordField => state.password.clear(),
                _ => {}
            }
            Ok(())
        })
    }

    async fn send_keys(&self, session: &SessionId, element: &ElementId, text: &str) -> Result<()> {
        self.with_session(session, |state| {
            match state.node(element)? {
                Node::UsernameField => state.username.push_str(text),
                Node::PasswordField => state.password.push_str(text),
                other => {
                    return Err(Error::remote(
                        "element not interactable",
                        format!("{other:?} does not accept text"),
                    ));
                }
            }
            Ok(())
        })
    }

    async fn delete_session(&self, session: &SessionId) -> Result<()> {
        self.deleted.fetch_add(1, Ordering::SeqCst);
        if self.behaviour.fail_delete {
            return Err(Error::remote("unknown error", "instrumentation crashed"));
        }
        self.sessions.lock().remove(session.as_str());
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Configuration with short waits, launching the installed app.
pub fn config() -> SessionConfig {
    config_with_wait(Duration::from_millis(400))
}

/// Configuration with the given explicit wait.
pub fn config_with_wait(explicit_wait: Duration) -> SessionConfig {
    SessionConfig::builder()
        .installed_app("com.swaglabsmobileapp", "com.swaglabsmobileapp.MainActivity")
        .explicit_wait(explicit_wait)
        .poll_interval(Duration::from_millis(10))
        .implicit_wait(Duration::from_secs(10))
        .build()
        .expect("test config")
}

/// A manager routed through `app`.
pub fn manager(app: &Arc<FakeApp>) -> SessionManager {
    SessionManager::with_remote(Arc::clone(app) as Arc<dyn Remote>)
}

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
