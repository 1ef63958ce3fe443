//! Optimistic overlay and the write batch that reconciles it with the store

use crate::error::BoardError;
use crate::store::WorkStore;
use crate::types::{Lane, WorkId, WorkItem, WorkPatch};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

/// Display order of one lane, published before the store confirms it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimisticOrder {
    pub lane: Lane,
    pub items: Vec<WorkId>,
}

/// One planned update: a new `order`, plus `status` for a cross-lane move
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderWrite {
    pub id: WorkId,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Lane>,
}

impl OrderWrite {
    pub fn patch(&self) -> WorkPatch {
        let patch = WorkPatch::order(self.order);
        match self.status {
            Some(lane) => patch.with_status(lane),
            None => patch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReorderPlan {
    pub(crate) order: OptimisticOrder,
    pub(crate) writes: Vec<OrderWrite>,
}

/// Splice `moved` into `neighbours` at `target_index` and list the writes
/// needed for every item's `order` to equal its new position.
///
/// `neighbours` is the target lane in display order without `moved`. Items
/// already at the right order are skipped. `moved` gets a `status` write
/// when its known status differs from `target_lane`, and is then written
/// even if its order is unchanged.
pub(crate) fn plan_reorder(
    neighbours: &[&WorkItem],
    moved: &WorkItem,
    target_lane: Lane,
    target_index: usize,
) -> ReorderPlan {
    let mut final_list: Vec<&WorkItem> = neighbours.to_vec();
    final_list.insert(target_index.min(neighbours.len()), moved);

    let new_status = (moved.status != target_lane).then_some(target_lane);

    let writes = final_list
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let order = index as i64;
            let status = if item.id == moved.id { new_status } else { None };
            (item.order != order || status.is_some()).then(|| OrderWrite {
                id: item.id.clone(),
                order,
                status,
            })
        })
        .collect();

    ReorderPlan {
        order: OptimisticOrder {
            lane: target_lane,
            items: final_list.iter().map(|w| w.id.clone()).collect(),
        },
        writes,
    }
}

/// The write batch for one finished gesture
///
/// Running it does not borrow the board session, so the session keeps
/// rendering the optimistic overlay while the writes are in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub(crate) gesture: u64,
    pub(crate) moved: WorkId,
    pub(crate) source_lane: Lane,
    pub(crate) target_lane: Lane,
    pub(crate) writes: Vec<OrderWrite>,
}

impl Reconciliation {
    pub fn moved(&self) -> &WorkId {
        &self.moved
    }

    pub fn writes(&self) -> &[OrderWrite] {
        &self.writes
    }

    pub fn is_cross_lane(&self) -> bool {
        self.source_lane != self.target_lane
    }

    /// Issue every write concurrently and wait for all of them to settle
    pub async fn run<S: WorkStore + ?Sized>(self, store: &S) -> ReconcileOutcome {
        debug!(
            gesture = self.gesture,
            moved = %self.moved,
            writes = self.writes.len(),
            "issuing reconciliation writes"
        );

        let results = join_all(self.writes.iter().map(|w| {
            let patch = w.patch();
            async move { store.update_work(&w.id, &patch).await }
        }))
        .await;

        let mut applied = Vec::new();
        let mut failed = Vec::new();
        for (write, result) in self.writes.into_iter().zip(results) {
            match result {
                Ok(()) => applied.push(write),
                Err(e) => {
                    warn!(id = %write.id, error = %e, "reconciliation write failed");
                    failed.push((write, e));
                }
            }
        }

        ReconcileOutcome {
            gesture: self.gesture,
            moved: self.moved,
            source_lane: self.source_lane,
            target_lane: self.target_lane,
            applied,
            failed,
        }
    }
}

/// Result of running a [`Reconciliation`]
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub(crate) gesture: u64,
    pub moved: WorkId,
    pub source_lane: Lane,
    pub target_lane: Lane,
    pub applied: Vec<OrderWrite>,
    pub failed: Vec<(OrderWrite, BoardError)>,
}

impl ReconcileOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_cross_lane(&self) -> bool {
        self.source_lane != self.target_lane
    }

    /// Total writes issued
    pub fn write_count(&self) -> usize {
        self.applied.len() + self.failed.len()
    }
}
