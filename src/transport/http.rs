//! W3C WebDriver over HTTP.
//!
//! One [`HttpRemote`] wraps a pooled `reqwest` client bound to a single
//! endpoint. Commands are sent once; there is no retry at this layer.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, trace};
use url::Url;

use crate::driver::Capabilities;
use crate::error::Result;
use crate::identifiers::{ElementId, SessionId};
use crate::protocol::{Command, HttpMethod, Response};
use crate::ui::Locator;

use super::remote::Remote;

// ============================================================================
// HttpRemote
// ============================================================================

/// WebDriver client for one endpoint.
#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base: Url,
}

impl fmt::Debug for HttpRemote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRemote")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpRemote {
    /// Creates a client for `endpoint`.
    ///
    /// A path prefix such as `/wd/hub` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`](crate::Error::Http) if the client cannot be built.
    pub fn new(endpoint: &Url, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base: normalize_base(endpoint),
        })
    }

    /// Returns the endpoint root, always with a trailing slash.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Sends one command and decodes the reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`](crate::Error::Http) on transport failure, or the remote error
    /// carried by the reply.
    pub async fn execute(&self, command: Command, session: Option<&SessionId>) -> Result<Response> {
        let url = self.base.join(&command.path(session)?)?;
        let started = Instant::now();

        trace!(command = command.name(), url = %url, "Sending command");

        let request = match command.method() {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        let request = match command.body() {
            Some(body) => request.json(&body),
            None => request,
        };

        let reply = request.send().await?;
        let status = reply.status().as_u16();
        let body = reply.text().await?;

        debug!(
            command = command.name(),
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command completed"
        );

        Response::parse(status, &body, command.element())
    }
}

// ============================================================================
// Remote Implementation
// ============================================================================

#[async_trait]
impl Remote for HttpRemote {
    async fn create_session(&self, capabilities: &Capabilities) -> Result<SessionId> {
        let command = Command::NewSession {
            capabilities: capabilities.to_payload()?,
        };
        self.execute(command, None).await?.into_session_id()
    }

    async fn set_implicit_wait(&self, session: &SessionId, timeout: Duration) -> Result<()> {
        let command = Command::SetTimeouts {
            implicit_ms: timeout.as_millis() as u64,
        };
        self.execute(command, Some(session)).await?;
        Ok(())
    }

    async fn find_elements(
        &self,
        session: &SessionId,
        locator: &Locator,
    ) -> Result<Vec<ElementId>> {
        let command = Command::FindElements {
            locator: locator.clone(),
        };
        self.execute(command, Some(session))
            .await?
            .into_element_ids()
    }

    async fn element_text(&self, session: &SessionId, element: &ElementId) -> Result<String> {
        let command = Command::GetElementText {
            element: element.clone(),
        };
        self.execute(command, Some(session)).await?.into_string()
    }

    async fn element_displayed(&self, session: &SessionId, element: &ElementId) -> Result<bool> {
        let command = Command::IsElementDisplayed {
            element: element.clone(),
        };
        self.execute(command, Some(session)).await?.into_bool()
    }

    async fn element_enabled(&self, session: &SessionId, element: &ElementId) -> Result<bool> {
        let command = Command::IsElementEnabled {
            element: element.clone(),
        };
        self.execute(command, Some(session)).await?.into_bool()
    }

    async fn element_attribute(
        &self,
        session: &SessionId,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>> {
        let command = Command::GetElementAttribute {
            element: element.clone(),
            name: name.to_string(),
        };
        self.execute(command, Some(session))
            .await?
            .into_optional_string()
    }

    async fn click(&self, session: &SessionId, element: &ElementId) -> Result<()> {
        let command = Command::ElementClick {
            element: element.clone(),
        };
        self.execute(command, Some(session)).await?;
        Ok(())
    }

    async fn clear(&self, session: &SessionId, element: &ElementId) -> Result<()> {
        let command = Command::ElementClear {
            element: element.clone(),
        };
        self.execute(command, Some(session)).await?;
        Ok(())
    }

    async fn send_keys(&self, session: &SessionId, element: &ElementId, text: &str) -> Result<()> {
        let command = Command::ElementSendKeys {
            element: element.clone(),
            text: text.to_string(),
        };
        self.execute(command, Some(session)).await?;
        Ok(())
    }

    async fn delete_session(&self, session: &SessionId) -> Result<()> {
        self.execute(Command::DeleteSession, Some(session)).await?;
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Ensures the path ends with `/` so relative joins keep any prefix.
fn normalize_base(endpoint: &Url) -> Url {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base
}

// ============================================================================
// Tests
// ============================================================================
