//! `DrupalClient` builder and the client itself.
//!
//! The client ties the layers together: one transport (and so one cookie
//! jar) is shared by the account manager and both resources, so the
//! anti-forgery token the session layer stores is what the resources send.

use std::sync::Arc;

use drupal_rest_resource::{NodeResource, Resource, UserResource};
use drupal_rest_session::{AccountManager, AuthPredicate, SessionHandle};
use drupal_rest_transport::{HttpTransport, Transport};

use crate::{ClientConfig, DrupalError};

/// Builder for configuring and starting a client.
///
/// # Example
///
/// ```rust,no_run
/// use drupal_rest::prelude::*;
///
/// # async fn run() -> Result<(), DrupalError> {
/// let client = DrupalClient::builder()
///     .endpoint("http://localhost/drupal7/api/v1")
///     .page_size(20)
///     .start()
///     .await?;
/// println!("logged in: {}", client.is_authenticated());
/// # Ok(())
/// # }
/// ```
pub struct DrupalClientBuilder {
    config: ClientConfig,
}

impl DrupalClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the services endpoint.
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.endpoint = endpoint.to_string();
        self
    }

    /// Sets the base URL for node images.
    pub fn image_root(mut self, root: &str) -> Self {
        self.config.image_root = root.to_string();
        self
    }

    /// Sets the node listing page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    /// Sets the rule `is_authenticated` uses.
    pub fn auth_predicate(mut self, predicate: AuthPredicate) -> Self {
        self.config.session.auth_predicate = predicate;
        self
    }

    /// Builds the client over an HTTP transport without contacting the site.
    pub fn build(self) -> Result<DrupalClient, DrupalError> {
        self.config.validate()?;
        let transport = Arc::new(HttpTransport::new(&self.config.endpoint)?);
        Ok(DrupalClient::with_transport(transport, self.config))
    }

    /// Builds the client and recovers any existing login.
    ///
    /// Only configuration errors are reported; a site that cannot be
    /// reached leaves the client with an empty session.
    pub async fn start(self) -> Result<DrupalClient, DrupalError> {
        let client = self.build()?;
        client.start().await;
        Ok(client)
    }
}

impl Default for DrupalClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A client for one Drupal site.
pub struct DrupalClient<T = Arc<HttpTransport>> {
    pub(crate) config: ClientConfig,
    pub(crate) account: AccountManager<T>,
    pub(crate) nodes: NodeResource<T>,
    pub(crate) users: UserResource<T>,
}

impl DrupalClient {
    /// Creates a new builder.
    pub fn builder() -> DrupalClientBuilder {
        DrupalClientBuilder::new()
    }
}

impl<T: Transport + Clone> DrupalClient<T> {
    /// Assembles a client over an existing transport. Every clone of
    /// `transport` must share the same cookie state.
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        let resources = config.resource_config();
        Self {
            account: AccountManager::new(transport.clone(), config.session.clone()),
            nodes: Resource::new(transport.clone(), resources.clone()),
            users: Resource::new(transport, resources),
            config,
        }
    }

    /// Recovers login state from the site (token check, then connect).
    pub async fn start(&self) {
        tracing::info!(endpoint = %self.config.endpoint, "starting client");
        self.account.initialize().await;
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn account(&self) -> &AccountManager<T> {
        &self.account
    }

    /// A read-only view of the session for display code.
    pub fn session(&self) -> SessionHandle {
        self.account.handle()
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_authenticated()
    }

    pub fn nodes(&self) -> &NodeResource<T> {
        &self.nodes
    }

    pub fn users(&self) -> &UserResource<T> {
        &self.users
    }
}
