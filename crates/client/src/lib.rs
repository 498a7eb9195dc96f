//! Typed client for the finance REST backend.
//!
//! The client is thin: every operation is one round trip through a shared
//! [`Transport`], which attaches the bearer credential held by the injected
//! [`Session`]. Records are returned exactly as the server represents them.
//!
//! ```no_run
//! # async fn demo() -> client::Result<()> {
//! use client::{Client, Session, TransportConfig};
//!
//! let client = Client::new(
//!     &TransportConfig::new("http://127.0.0.1:8000/api"),
//!     Session::in_memory(),
//! )?;
//! client.auth().login("alice", "pw").await?;
//! let goals = client.savings_goals().list(&Default::default()).await?;
//! # let _ = goals;
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, time::Duration};

mod auth;
mod budgets;
mod categories;
mod error;
mod resource;
mod savings_goals;
mod session;
mod tags;
mod transactions;
mod transport;

pub use auth::{AuthClient, LogoutOutcome};
pub use budgets::{Budgets, BudgetsClient};
pub use categories::{Categories, CategoriesClient};
pub use error::{ClientError, Result, payload_message};
pub use resource::{Resource, ResourceClient};
pub use savings_goals::{SavingsGoals, SavingsGoalsClient};
pub use session::{Credentials, Session, SessionError};
pub use tags::{Tags, TagsClient};
pub use transactions::{Transactions, TransactionsClient};
pub use transport::{Transport, TransportConfig};

pub use api_types as types;

#[derive(Clone, Debug)]
pub struct Client {
    transport: Transport,
}

impl Client {
    pub fn new(config: &TransportConfig, session: Session) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, session)?,
        })
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn session(&self) -> &Session {
        self.transport.session()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.transport)
    }

    pub fn transactions(&self) -> TransactionsClient<'_> {
        ResourceClient::new(&self.transport)
    }

    pub fn categories(&self) -> CategoriesClient<'_> {
        ResourceClient::new(&self.transport)
    }

    pub fn tags(&self) -> TagsClient<'_> {
        ResourceClient::new(&self.transport)
    }

    pub fn budgets(&self) -> BudgetsClient<'_> {
        ResourceClient::new(&self.transport)
    }

    pub fn savings_goals(&self) -> SavingsGoalsClient<'_> {
        ResourceClient::new(&self.transport)
    }
}

#[derive(Default, Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    session_path: Option<PathBuf>,
    session: Option<Session>,
}

impl ClientBuilder {
    pub fn base_url(mut self, base_url: &str) -> ClientBuilder {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> ClientBuilder {
        self.timeout = Some(timeout);
        self
    }

    /// Persist credentials to `path` (ignored when [`ClientBuilder::session`]
    /// is also set).
    pub fn session_path(mut self, path: impl Into<PathBuf>) -> ClientBuilder {
        self.session_path = Some(path.into());
        self
    }

    pub fn session(mut self, session: Session) -> ClientBuilder {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<Client> {
        let mut config = TransportConfig::default();
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }

        let session = match (self.session, self.session_path) {
            (Some(session), _) => session,
            (None, Some(path)) => Session::load_or_empty(path),
            (None, None) => Session::in_memory(),
        };

        tracing::debug!(base_url = %config.base_url, "building client");
        Client::new(&config, session)
    }
}
