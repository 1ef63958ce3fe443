//! Board session: drag-and-drop reordering with optimistic display
//!
//! A [`BoardSession`] is created per board view and dropped when the view
//! goes away. It owns everything ephemeral about the board: the item
//! snapshot, the drag state machine, the optimistic overlay, the inline
//! draft, and the notification queue.
//!
//! A gesture runs like this:
//!
//! 1. [`BoardSession::begin_drag`] picks a card up.
//! 2. [`BoardSession::update_drag_target`] follows the pointer.
//! 3. [`BoardSession::end_drag`] publishes the optimistic order and returns a
//!    [`Reconciliation`].
//! 4. [`Reconciliation::run`] writes to the store while the view keeps
//!    rendering the overlay.
//! 5. [`BoardSession::settle`] folds the results back in and clears the
//!    overlay.
//!
//! [`BoardSession::finish_drag`] chains steps 3 to 5.

mod draft;
mod drag;
mod notify;
mod reconcile;
pub mod sort;

pub use draft::Draft;
pub use drag::{DragState, ListenerGuard, ListenerId, NoopPointerHub, PointerHub};
pub use notify::{Notification, NotificationLevel};
pub use reconcile::{OptimisticOrder, OrderWrite, ReconcileOutcome, Reconciliation};

use crate::config::LayoutConfig;
use crate::error::{BoardError, Result};
use crate::store::WorkStore;
use crate::types::{Lane, LaneRegion, NewWork, Point, WorkFilter, WorkId, WorkItem, WorkKind};
use drag::{ActiveDrag, DragPhase};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// One renderable slot in a lane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneEntry<'a> {
    Item(&'a WorkItem),
    /// Where the dragged card will land
    Placeholder,
    Draft(&'a Draft),
}

impl<'a> LaneEntry<'a> {
    pub fn as_item(&self) -> Option<&'a WorkItem> {
        match *self {
            Self::Item(w) => Some(w),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct PendingOverlay {
    gesture: u64,
    order: OptimisticOrder,
}

/// Ephemeral state of one board view
#[derive(Debug)]
pub struct BoardSession {
    layout: LayoutConfig,
    scope: WorkFilter,
    items: HashMap<WorkId, WorkItem>,
    regions: Vec<LaneRegion>,
    drag: DragPhase,
    overlay: Option<PendingOverlay>,
    draft: Option<Draft>,
    notifications: VecDeque<Notification>,
    pointer_hub: Arc<dyn PointerHub>,
    next_gesture: u64,
    needs_refresh: bool,
}

impl BoardSession {
    /// Create an empty session
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            scope: WorkFilter::all(),
            items: HashMap::new(),
            regions: Vec::new(),
            drag: DragPhase::Idle,
            overlay: None,
            draft: None,
            notifications: VecDeque::new(),
            pointer_hub: Arc::new(NoopPointerHub),
            next_gesture: 0,
            needs_refresh: false,
        }
    }

    /// Restrict the board to one feature and/or kind
    pub fn with_scope(mut self, scope: WorkFilter) -> Self {
        self.scope = scope;
        self
    }

    /// Use `hub` to register pointer listeners during gestures
    pub fn with_pointer_hub(mut self, hub: Arc<dyn PointerHub>) -> Self {
        self.pointer_hub = hub;
        self
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Replace the item snapshot
    pub fn load(&mut self, items: impl IntoIterator<Item = WorkItem>) {
        self.items = items
            .into_iter()
            .filter(|w| self.scope.matches(w))
            .map(|w| (w.id.clone(), w))
            .collect();
        self.needs_refresh = false;
        debug!(count = self.items.len(), "loaded board snapshot");
    }

    /// Re-list the board from the store
    pub async fn refresh<S: WorkStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let items = store.list_works(&self.scope).await?;
        self.load(items);
        Ok(())
    }

    /// Look up one item in the snapshot
    pub fn item(&self, id: &WorkId) -> Option<&WorkItem> {
        self.items.get(id)
    }

    /// Number of items in the snapshot
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Set when a reconciliation failed and the snapshot may disagree with the store
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Delete an item in the store and drop it from the snapshot
    pub async fn delete<S: WorkStore + ?Sized>(&mut self, store: &S, id: &WorkId) -> Result<()> {
        store.delete_work(id).await?;
        self.items.remove(id);
        if let Some(ref mut pending) = self.overlay {
            pending.order.items.retain(|i| i != id);
        }
        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Record the current drop regions of the lanes
    pub fn set_lane_regions(&mut self, regions: impl IntoIterator<Item = LaneRegion>) {
        self.regions = regions.into_iter().collect();
    }

    /// Items of `lane` in display order, with the optimistic overlay applied
    pub fn lane_view(&self, lane: Lane) -> Vec<&WorkItem> {
        match &self.overlay {
            Some(pending) if pending.order.lane == lane => {
                let listed: HashSet<&WorkId> = pending.order.items.iter().collect();
                let mut view: Vec<&WorkItem> = pending
                    .order
                    .items
                    .iter()
                    .filter_map(|id| self.items.get(id))
                    .collect();
                // Items that arrived in this lane after the overlay was published
                view.extend(sort::base_sort(
                    self.items
                        .values()
                        .filter(|w| w.status == lane && !listed.contains(&w.id)),
                ));
                view
            }
            Some(pending) => {
                let hidden: HashSet<&WorkId> = pending.order.items.iter().collect();
                sort::base_sort(
                    self.items
                        .values()
                        .filter(|w| w.status == lane && !hidden.contains(&w.id)),
                )
            }
            None => sort::base_sort(self.items.values().filter(|w| w.status == lane)),
        }
    }

    /// Everything the presentation layer renders for `lane`
    ///
    /// During a drag the dragged card is left out of every lane and a
    /// placeholder marks the drop target. A draft in this lane comes last.
    pub fn lane_items(&self, lane: Lane) -> Vec<LaneEntry<'_>> {
        let dragging = match &self.drag {
            DragPhase::Dragging(active) => Some(&active.state),
            DragPhase::Idle => None,
        };

        let mut entries: Vec<LaneEntry<'_>> = self
            .lane_view(lane)
            .into_iter()
            .filter(|w| dragging.is_none_or(|d| d.active_item_id != w.id))
            .map(LaneEntry::Item)
            .collect();

        if let Some(d) = dragging {
            if d.has_target && d.target_lane == lane {
                let at = d.target_index.min(entries.len());
                entries.insert(at, LaneEntry::Placeholder);
            }
        }

        if let Some(ref draft) = self.draft {
            if draft.lane == lane {
                entries.push(LaneEntry::Draft(draft));
            }
        }

        entries
    }

    /// The open gesture, if any
    pub fn drag_state(&self) -> Option<&DragState> {
        match &self.drag {
            DragPhase::Dragging(active) => Some(&active.state),
            DragPhase::Idle => None,
        }
    }

    /// Last pointer position of the open gesture, for placing the floating card
    pub fn drag_pointer(&self) -> Option<Point> {
        match &self.drag {
            DragPhase::Dragging(active) => Some(active.pointer),
            DragPhase::Idle => None,
        }
    }

    /// True between `end_drag` and the `settle` of its batch
    pub fn is_reconciling(&self) -> bool {
        self.overlay.is_some()
    }

    /// The overlay awaiting confirmation, if any
    pub fn optimistic_order(&self) -> Option<&OptimisticOrder> {
        self.overlay.as_ref().map(|p| &p.order)
    }

    /// Drain queued notifications, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    // =========================================================================
    // Drag gesture
    // =========================================================================

    /// Pick up a card
    ///
    /// Rejected while another gesture is open, and while the writes of the
    /// previous gesture are still pending. Every gesture is therefore planned
    /// against a snapshot that already holds the previous gesture's result.
    pub fn begin_drag(&mut self, id: &WorkId, pointer: Point) -> Result<DragState> {
        if matches!(self.drag, DragPhase::Dragging(_)) {
            return Err(BoardError::GestureInProgress);
        }
        if let Some(ref pending) = self.overlay {
            debug!(gesture = pending.gesture, id = %id, "drag refused while saving");
            return Err(BoardError::ReconciliationPending);
        }
        let item = self
            .items
            .get(id)
            .ok_or_else(|| BoardError::not_found(id.as_str()))?;
        let source_lane = item.status;

        let mut lane_counts = [0usize; 4];
        let mut source_index = 0;
        for lane in Lane::ALL {
            let view = self.lane_view(lane);
            if lane == source_lane {
                source_index = view.iter().position(|w| &w.id == id).unwrap_or(view.len());
                lane_counts[lane.index()] = view.len().saturating_sub(1);
            } else {
                lane_counts[lane.index()] = view.len();
            }
        }

        let state = DragState {
            active_item_id: id.clone(),
            source_lane,
            target_lane: source_lane,
            target_index: source_index,
            has_target: false,
        };
        let listeners = ListenerGuard::acquire(&self.pointer_hub);
        self.drag = DragPhase::Dragging(ActiveDrag::new(
            state.clone(),
            pointer,
            lane_counts,
            listeners,
        ));

        debug!(id = %id, lane = %source_lane, index = source_index, "drag started");
        Ok(state)
    }

    /// Pointer-down on a card; starts a gesture
    pub fn on_card_pointer_down(&mut self, id: &WorkId, pointer: Point) -> Result<DragState> {
        self.begin_drag(id, pointer)
    }

    /// Follow the pointer. Returns the new state only when the target changed.
    ///
    /// Outside every lane the previous target is kept.
    pub fn update_drag_target(&mut self, pointer: Point) -> Option<DragState> {
        let DragPhase::Dragging(active) = &mut self.drag else {
            return None;
        };
        active.pointer = pointer;

        let Some(region) = drag::hit_test(&self.regions, pointer) else {
            trace!(x = pointer.x, y = pointer.y, "pointer outside lanes");
            return None;
        };
        let count = active.lane_counts[region.lane.index()];
        let index = drag::index_at(&self.layout, region, pointer, count);

        let changed = active.retarget(region.lane, index);
        if let Some(ref state) = changed {
            trace!(lane = %state.target_lane, index = state.target_index, "drag target moved");
        }
        changed
    }

    /// Point the open gesture at `lane`/`index` without geometry
    pub fn set_drag_target(&mut self, lane: Lane, index: usize) -> Option<DragState> {
        match &mut self.drag {
            DragPhase::Dragging(active) => active.retarget(lane, index),
            DragPhase::Idle => None,
        }
    }

    /// Abandon the open gesture without touching the store
    pub fn cancel_drag(&mut self) {
        if let DragPhase::Dragging(active) = std::mem::take(&mut self.drag) {
            debug!(id = %active.state.active_item_id, "drag cancelled");
        }
    }

    /// Release the card
    ///
    /// Returns `None` if no gesture was open or the pointer never entered a
    /// lane. Otherwise the optimistic order is published and the writes that
    /// make it durable are returned.
    pub fn end_drag(&mut self) -> Option<Reconciliation> {
        let DragPhase::Dragging(active) = std::mem::take(&mut self.drag) else {
            return None;
        };
        let state = &active.state;

        if !state.has_target {
            debug!(id = %state.active_item_id, "released outside any lane; nothing to do");
            return None;
        }
        let Some(moved) = self.items.get(&state.active_item_id) else {
            warn!(id = %state.active_item_id, "dragged item vanished from the snapshot");
            return None;
        };

        let neighbours: Vec<&WorkItem> = self
            .lane_view(state.target_lane)
            .into_iter()
            .filter(|w| w.id != moved.id)
            .collect();
        let plan = reconcile::plan_reorder(&neighbours, moved, state.target_lane, state.target_index);
        // Same lane the status write is compared against
        let source_lane = moved.status;

        self.next_gesture += 1;
        let gesture = self.next_gesture;
        self.overlay = Some(PendingOverlay {
            gesture,
            order: plan.order,
        });

        debug!(
            gesture,
            id = %state.active_item_id,
            from = %source_lane,
            to = %state.target_lane,
            index = state.target_index,
            writes = plan.writes.len(),
            "drag ended"
        );

        Some(Reconciliation {
            gesture,
            moved: state.active_item_id.clone(),
            source_lane,
            target_lane: state.target_lane,
            writes: plan.writes,
        })
    }

    /// Fold a finished batch back into the session and drop its overlay
    pub fn settle(&mut self, outcome: &ReconcileOutcome) {
        for write in &outcome.applied {
            if let Some(item) = self.items.get_mut(&write.id) {
                item.apply(&write.patch());
            }
        }

        if self
            .overlay
            .as_ref()
            .is_some_and(|p| p.gesture == outcome.gesture)
        {
            self.overlay = None;
        }

        if !outcome.is_success() {
            warn!(
                gesture = outcome.gesture,
                failed = outcome.failed.len(),
                total = outcome.write_count(),
                "reconciliation incomplete"
            );
            self.needs_refresh = true;
            self.notifications.push_back(Notification::error(format!(
                "Could not save the new order: {} of {} updates failed",
                outcome.failed.len(),
                outcome.write_count()
            )));
            return;
        }

        info!(
            gesture = outcome.gesture,
            moved = %outcome.moved,
            writes = outcome.write_count(),
            "reconciliation complete"
        );
        if outcome.is_cross_lane() {
            self.notifications.push_back(Notification::success(format!(
                "Moved to {}",
                outcome.target_lane.title()
            )));
        }
    }

    /// Release the card, write the result, and settle
    pub async fn finish_drag<S: WorkStore + ?Sized>(&mut self, store: &S) -> Option<ReconcileOutcome> {
        let reconciliation = self.end_drag()?;
        let outcome = reconciliation.run(store).await;
        self.settle(&outcome);
        Some(outcome)
    }

    // =========================================================================
    // Draft
    // =========================================================================

    /// Open an inline draft in `lane`. No-op if a draft already exists anywhere.
    pub fn begin_draft(&mut self, lane: Lane) -> bool {
        if let Some(ref existing) = self.draft {
            debug!(pending = %existing.lane, requested = %lane, "draft already open");
            return false;
        }
        let mut draft = Draft::new(lane);
        if let Some(kind) = self.scope.kind {
            draft.kind = kind;
        }
        self.draft = Some(draft);
        true
    }

    /// The open draft, if any
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Replace the draft title. Returns false if no draft is open.
    pub fn set_draft_title(&mut self, title: impl Into<String>) -> bool {
        match self.draft {
            Some(ref mut draft) => {
                draft.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Choose task or bug for the draft. Returns false if no draft is open.
    pub fn set_draft_kind(&mut self, kind: WorkKind) -> bool {
        match self.draft {
            Some(ref mut draft) => {
                draft.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Discard the draft without a remote call
    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }

    /// Create the drafted item at the end of its lane
    ///
    /// A blank title cancels the draft and returns `Ok(None)` without
    /// touching the store. If the store call fails the draft stays open.
    pub async fn commit_draft<S: WorkStore + ?Sized>(&mut self, store: &S) -> Result<Option<WorkItem>> {
        let Some(ref draft) = self.draft else {
            return Ok(None);
        };
        let Some(title) = draft.committed_title() else {
            debug!(lane = %draft.lane, "empty draft discarded");
            self.draft = None;
            return Ok(None);
        };

        let order = self
            .lane_view(draft.lane)
            .iter()
            .map(|w| w.order + 1)
            .max()
            .unwrap_or(0);
        let mut work = NewWork::new(title, draft.lane, order).with_kind(draft.kind);
        work.feature_id = self.scope.feature_id.clone();

        let created = store.create_work(&work).await?;
        debug!(id = %created.id, lane = %created.status, order, "draft committed");

        self.draft = None;
        self.items.insert(created.id.clone(), created.clone());
        Ok(Some(created))
    }

    /// Tear the view down, releasing any open gesture
    pub fn unmount(mut self) {
        self.cancel_drag();
    }
}
