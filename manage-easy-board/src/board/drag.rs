//! Drag gesture state machine: `Idle` or `Dragging`
//!
//! Entering `Dragging` attaches pointer listeners through a [`PointerHub`].
//! The returned [`ListenerGuard`] detaches them when the gesture is dropped,
//! so every exit path (release, cancel, unmount) releases them.

use crate::config::LayoutConfig;
use crate::types::{Lane, LaneRegion, Point, WorkId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// What the presentation layer needs to render an in-flight drag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragState {
    pub active_item_id: WorkId,
    pub source_lane: Lane,
    pub target_lane: Lane,
    pub target_index: usize,
    /// Set once the pointer has entered a lane during this gesture
    pub has_target: bool,
}

/// Handle for one registered set of move/release listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Registers document-level pointer listeners for the duration of a gesture
pub trait PointerHub: Send + Sync {
    /// Start delivering pointer move/release events to the board
    fn attach(&self) -> ListenerId;

    /// Stop delivering events for `id`
    fn detach(&self, id: ListenerId);
}

impl fmt::Debug for dyn PointerHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PointerHub")
    }
}

/// Hub for sessions that receive pointer events some other way
#[derive(Debug, Default)]
pub struct NoopPointerHub;

impl PointerHub for NoopPointerHub {
    fn attach(&self) -> ListenerId {
        ListenerId(0)
    }

    fn detach(&self, _id: ListenerId) {}
}

/// Detaches its listeners on drop
pub struct ListenerGuard {
    hub: Arc<dyn PointerHub>,
    id: ListenerId,
}

impl ListenerGuard {
    pub(crate) fn acquire(hub: &Arc<dyn PointerHub>) -> Self {
        let id = hub.attach();
        Self {
            hub: Arc::clone(hub),
            id,
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.hub.detach(self.id);
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

/// An open gesture
#[derive(Debug)]
pub(crate) struct ActiveDrag {
    pub(crate) state: DragState,
    pub(crate) pointer: Point,
    /// Items per lane, excluding the dragged one, indexed by `Lane::index`
    pub(crate) lane_counts: [usize; 4],
    _listeners: ListenerGuard,
}

impl ActiveDrag {
    pub(crate) fn new(
        state: DragState,
        pointer: Point,
        lane_counts: [usize; 4],
        listeners: ListenerGuard,
    ) -> Self {
        Self {
            state,
            pointer,
            lane_counts,
            _listeners: listeners,
        }
    }

    /// Point the drop target at `lane`/`index`, clamped to the lane's size.
    /// Returns the new state only if something changed.
    pub(crate) fn retarget(&mut self, lane: Lane, index: usize) -> Option<DragState> {
        let index = index.min(self.lane_counts[lane.index()]);
        let changed = !self.state.has_target
            || self.state.target_lane != lane
            || self.state.target_index != index;

        if !changed {
            return None;
        }
        self.state.has_target = true;
        self.state.target_lane = lane;
        self.state.target_index = index;
        Some(self.state.clone())
    }
}

#[derive(Debug, Default)]
pub(crate) enum DragPhase {
    #[default]
    Idle,
    Dragging(ActiveDrag),
}

/// Find the lane whose bounds contain `pointer`
pub(crate) fn hit_test(regions: &[LaneRegion], pointer: Point) -> Option<&LaneRegion> {
    regions.iter().find(|r| r.bounds.contains(pointer))
}

/// Card slot under `pointer` in `region`, clamped to `[0, count]`
pub(crate) fn index_at(
    layout: &LayoutConfig,
    region: &LaneRegion,
    pointer: Point,
    count: usize,
) -> usize {
    let offset = pointer.y - region.bounds.top - layout.padding_top + region.scroll_top;
    if offset <= 0.0 {
        return 0;
    }
    let slot = (offset / layout.card_stride()).floor() as usize;
    slot.min(count)
}
