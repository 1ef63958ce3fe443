//! In-process work item store with a call log and failure injection

use super::WorkStore;
use crate::error::{BoardError, Result};
use crate::types::{NewWork, WorkFilter, WorkId, WorkItem, WorkPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, trace};

/// One call received by a [`MemoryWorkStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List(WorkFilter),
    Create(NewWork),
    Update(WorkId, WorkPatch),
    Delete(WorkId),
}

/// Work item store held entirely in memory
///
/// Every call is appended to a log so callers can check exactly which
/// remote operations a board session issued.
#[derive(Debug, Default)]
pub struct MemoryWorkStore {
    works: RwLock<HashMap<WorkId, WorkItem>>,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<HashSet<WorkId>>,
}

impl MemoryWorkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing items
    pub fn with_works(works: impl IntoIterator<Item = WorkItem>) -> Self {
        let works = works
            .into_iter()
            .map(|w| (w.id.clone(), w))
            .collect::<HashMap<_, _>>();
        Self {
            works: RwLock::new(works),
            ..Self::default()
        }
    }

    /// Make every later `update_work` for `id` fail
    pub async fn fail_updates_for(&self, id: impl Into<WorkId>) {
        self.failing.lock().await.insert(id.into());
    }

    /// Read one item as currently stored
    pub async fn get(&self, id: &WorkId) -> Option<WorkItem> {
        self.works.read().await.get(id).cloned()
    }

    /// All calls received so far, oldest first
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    /// Only the `update_work` calls, oldest first
    pub async fn updates(&self) -> Vec<(WorkId, WorkPatch)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                StoreCall::Update(id, patch) => Some((id.clone(), patch.clone())),
                _ => None,
            })
            .collect()
    }

    /// Forget the call log
    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    async fn record(&self, call: StoreCall) {
        trace!(?call, "memory store call");
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl WorkStore for MemoryWorkStore {
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>> {
        self.record(StoreCall::List(filter.clone())).await;
        let works = self.works.read().await;
        Ok(works.values().filter(|w| filter.matches(w)).cloned().collect())
    }

    async fn create_work(&self, work: &NewWork) -> Result<WorkItem> {
        self.record(StoreCall::Create(work.clone())).await;
        work.validate()?;

        let item = WorkItem::from_new(WorkId::new(), work, Utc::now());
        debug!(id = %item.id, status = %item.status, "created work item");
        self.works.write().await.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update_work(&self, id: &WorkId, patch: &WorkPatch) -> Result<()> {
        self.record(StoreCall::Update(id.clone(), patch.clone()))
            .await;

        if self.failing.lock().await.contains(id) {
            return Err(BoardError::store(format!("update rejected for {}", id)));
        }

        let mut works = self.works.write().await;
        let item = works.get_mut(id).ok_or_else(|| BoardError::not_found(id.as_str()))?;
        item.apply(patch);
        Ok(())
    }

    async fn delete_work(&self, id: &WorkId) -> Result<()> {
        self.record(StoreCall::Delete(id.clone())).await;
        self.works
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BoardError::not_found(id.as_str()))
    }
}
