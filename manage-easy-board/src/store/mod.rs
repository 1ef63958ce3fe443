//! Work item store: the remote collaborator that owns persisted order and status
//!
//! The board engine never mutates work items directly. It reads a listing,
//! keeps a local snapshot, and pushes changes back through [`WorkStore`].

mod http;
mod memory;

pub use http::HttpWorkStore;
pub use memory::{MemoryWorkStore, StoreCall};

use crate::error::Result;
use crate::types::{NewWork, WorkFilter, WorkId, WorkItem, WorkPatch};
use async_trait::async_trait;
use std::sync::Arc;

/// CRUD surface of the work item store
#[async_trait]
pub trait WorkStore: Send + Sync {
    /// List work items matching `filter`
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>>;

    /// Create a work item and return it with its assigned id
    async fn create_work(&self, work: &NewWork) -> Result<WorkItem>;

    /// Write the set fields of `patch` to one work item
    async fn update_work(&self, id: &WorkId, patch: &WorkPatch) -> Result<()>;

    /// Delete a work item
    async fn delete_work(&self, id: &WorkId) -> Result<()>;
}

#[async_trait]
impl<S: WorkStore + ?Sized> WorkStore for Arc<S> {
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>> {
        (**self).list_works(filter).await
    }

    async fn create_work(&self, work: &NewWork) -> Result<WorkItem> {
        (**self).create_work(work).await
    }

    async fn update_work(&self, id: &WorkId, patch: &WorkPatch) -> Result<()> {
        (**self).update_work(id, patch).await
    }

    async fn delete_work(&self, id: &WorkId) -> Result<()> {
        (**self).delete_work(id).await
    }
}
