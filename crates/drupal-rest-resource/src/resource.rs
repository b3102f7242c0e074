//! The generic resource client and its node/user specializations.

use std::marker::PhantomData;

use drupal_rest_protocol::{
    Codec, JsonCodec, Node, NodeCreated, NodeDraft, NodeQuery, User, endpoints,
};
use drupal_rest_transport::{Request, Transport};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Entity, ResourceConfig, ResourceError};

/// One resource collection on the services endpoint.
///
/// `E` decides the collection path and the record type. The transport is
/// usually an `Arc` shared with the account manager, so requests carry the
/// same cookies and anti-forgery header.
pub struct Resource<E, T, C = JsonCodec> {
    transport: T,
    codec: C,
    config: ResourceConfig,
    _entity: PhantomData<fn() -> E>,
}

/// The `node` collection.
pub type NodeResource<T, C = JsonCodec> = Resource<Node, T, C>;

/// The `user` collection.
pub type UserResource<T, C = JsonCodec> = Resource<User, T, C>;

impl<E: Entity, T: Transport> Resource<E, T> {
    pub fn new(transport: T, config: ResourceConfig) -> Self {
        Self::with_codec(transport, JsonCodec, config)
    }
}

impl<E: Entity, T: Transport, C: Codec> Resource<E, T, C> {
    pub fn with_codec(transport: T, codec: C, config: ResourceConfig) -> Self {
        Self {
            transport,
            codec,
            config,
            _entity: PhantomData,
        }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// `GET <collection>/<id>`.
    pub async fn get(&self, id: E::Id) -> Result<E, ResourceError> {
        let path = endpoints::item(E::COLLECTION, id);
        tracing::debug!(%path, "fetching item");
        self.fetch(Request::get(path)).await
    }

    /// `GET <collection>?<params>`.
    pub async fn query(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<Vec<E>, ResourceError> {
        tracing::debug!(collection = E::COLLECTION, ?params, "querying");
        self.fetch(Request::get(E::COLLECTION).with_query(params))
            .await
    }

    /// `POST <collection>` with `draft` as the body.
    pub async fn save<D, R>(&self, draft: &D) -> Result<R, ResourceError>
    where
        D: Serialize + Sync,
        R: DeserializeOwned,
    {
        let body = self.codec.encode(draft)?;
        tracing::debug!(collection = E::COLLECTION, "saving item");
        self.fetch(Request::post(E::COLLECTION, body)).await
    }

    /// `DELETE <collection>/<id>`. The response body is ignored.
    pub async fn delete(&self, id: E::Id) -> Result<(), ResourceError> {
        let path = endpoints::item(E::COLLECTION, id);
        self.transport.send(Request::delete(path.as_str())).await?;
        tracing::info!(%path, "item deleted");
        Ok(())
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<R, ResourceError> {
        let response = self.transport.send(request).await?;
        Ok(self.codec.decode(&response.body)?)
    }
}

impl<T: Transport, C: Codec> Resource<Node, T, C> {
    /// One page of the node listing, `config.page_size` items per page.
    pub async fn page(&self, page: u32) -> Result<Vec<Node>, ResourceError> {
        let query = NodeQuery {
            pagesize: self.config.page_size,
            page,
        };
        self.query(query.to_pairs()).await
    }

    /// Creates a node and returns its new id.
    pub async fn create(
        &self,
        draft: &NodeDraft,
    ) -> Result<NodeCreated, ResourceError> {
        let created: NodeCreated = self.save(draft).await?;
        tracing::info!(nid = %created.nid, "node created");
        Ok(created)
    }
}

// =========================================================================
// Tests
// =========================================================================
