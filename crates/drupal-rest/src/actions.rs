//! Page actions: what each view of the client loads and does.

use drupal_rest_protocol::{Node, NodeDraft, NodeId, User, UserId};
use drupal_rest_session::Session;
use drupal_rest_transport::Transport;

use crate::{DrupalClient, DrupalError, Route};

/// The data behind one route.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// The login form; shows the current session.
    Login { session: Session },
    /// One page of the node listing.
    NodeList { page: u32, nodes: Vec<Node> },
    /// The node form. `author` is the uid a new node will be attributed
    /// to; without one the form cannot be submitted.
    NodeAdd { author: Option<UserId> },
    /// One node, with its image resolved against the image root.
    Node {
        node: Box<Node>,
        image_url: Option<String>,
    },
    /// A user profile.
    User(Box<User>),
}

impl<T: Transport + Clone> DrupalClient<T> {
    /// Loads the data for `route`.
    pub async fn open(&self, route: Route) -> Result<Page, DrupalError> {
        tracing::debug!(%route, "opening page");
        let page = match route {
            Route::Login => Page::Login {
                session: self.account.session(),
            },
            Route::NodeList { page } => Page::NodeList {
                page,
                nodes: self.list_nodes(page).await?,
            },
            Route::NodeAdd => Page::NodeAdd {
                author: self.account.handle().uid(),
            },
            Route::Node(nid) => {
                let node = self.node(nid).await?;
                let image_url = self.image_url(&node);
                Page::Node {
                    node: Box::new(node),
                    image_url,
                }
            }
            Route::User(uid) => Page::User(Box::new(self.user(uid).await?)),
        };
        Ok(page)
    }

    /// One page of the node listing.
    pub async fn list_nodes(&self, page: u32) -> Result<Vec<Node>, DrupalError> {
        Ok(self.nodes.page(page).await?)
    }

    /// Deletes a node, then reloads listing page `page`.
    ///
    /// The listing is only reloaded when the delete succeeded.
    pub async fn delete_node(
        &self,
        nid: NodeId,
        page: u32,
    ) -> Result<Vec<Node>, DrupalError> {
        self.nodes.delete(nid).await?;
        self.list_nodes(page).await
    }

    pub async fn node(&self, nid: NodeId) -> Result<Node, DrupalError> {
        Ok(self.nodes.get(nid).await?)
    }

    /// Full URL of the node's first image, if it has one.
    pub fn image_url(&self, node: &Node) -> Option<String> {
        node.image_filename()
            .map(|filename| self.config.image_url(filename))
    }

    /// Creates an article owned by the session's user and returns the
    /// route of the new node.
    pub async fn add_node(
        &self,
        title: &str,
        body: &str,
    ) -> Result<Route, DrupalError> {
        let uid = self.account.handle().uid().ok_or(DrupalError::NotLoggedIn)?;
        let draft = NodeDraft::article(title, body, uid);
        let created = self.nodes.create(&draft).await?;
        Ok(Route::Node(created.nid))
    }

    pub async fn user(&self, uid: UserId) -> Result<User, DrupalError> {
        Ok(self.users.get(uid).await?)
    }

    /// Logs in and reports whether the session is active afterwards.
    ///
    /// Failures are logged by the account manager and leave the session
    /// as it was.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        self.account.login(username, password).await;
        self.account.is_authenticated()
    }

    /// Ends the server session; the local session is cleared on success.
    pub async fn logout(&self) {
        self.account.logout().await;
    }
}
