use std::marker::PhantomData;

use api_types::{Id, QueryFilters};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{ClientError, Result},
    transport::Transport,
};

/// A backend collection exposed as `/<PATH>/` and `/<PATH>/{id}/`.
pub trait Resource {
    const PATH: &'static str;

    type Record: DeserializeOwned;
    type New: Serialize;
    type Patch: Serialize;
    type Filters: QueryFilters;

    /// Local check run before a create request leaves. Default: accept.
    fn validate_new(_new: &Self::New) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// CRUD operations shared by every collection.
///
/// Each call is a single round trip: no caching, retry or pagination.
pub struct ResourceClient<'a, R> {
    transport: &'a Transport,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> ResourceClient<'a, R> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    pub(crate) fn transport(&self) -> &'a Transport {
        self.transport
    }

    pub(crate) fn collection_path() -> String {
        format!("/{}/", R::PATH)
    }

    pub(crate) fn item_path(id: Id) -> String {
        format!("/{}/{id}/", R::PATH)
    }

    pub async fn list(&self, filters: &R::Filters) -> Result<Vec<R::Record>> {
        self.transport
            .get(&Self::collection_path(), &filters.to_query())
            .await
    }

    /// A missing id surfaces as `RequestFailed` with status 404.
    pub async fn get(&self, id: Id) -> Result<R::Record> {
        self.transport.get(&Self::item_path(id), &[]).await
    }

    /// The server assigns id and timestamps; the returned record is canonical.
    pub async fn create(&self, new: &R::New) -> Result<R::Record> {
        R::validate_new(new).map_err(ClientError::InvalidRequest)?;
        self.transport.post(&Self::collection_path(), new).await
    }

    /// Partial update: only the fields present in `patch` change.
    pub async fn update(&self, id: Id, patch: &R::Patch) -> Result<R::Record> {
        self.transport.patch(&Self::item_path(id), patch).await
    }

    /// Repeating a delete yields `NotFound`.
    pub async fn delete(&self, id: Id) -> Result<()> {
        self.transport.delete(&Self::item_path(id)).await
    }
}
