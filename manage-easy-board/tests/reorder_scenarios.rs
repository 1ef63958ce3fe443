//! End-to-end drag-and-drop scenarios against the in-memory store

use async_trait::async_trait;
use manage_easy_board::{
    BoardSession, LaneEntry, LaneRegion, LayoutConfig, MemoryWorkStore, NewWork, Point, Rect,
    StoreCall, WorkFilter, WorkId, WorkItem, WorkPatch, WorkStore,
};
use manage_easy_board::{BoardError, Lane, Result};
use std::sync::Arc;
use tokio::sync::Notify;

fn item(id: &str, lane: Lane, order: i64) -> WorkItem {
    WorkItem::new(id.to_uppercase(), lane, order).with_id(id)
}

fn regions() -> Vec<LaneRegion> {
    Lane::ALL
        .into_iter()
        .map(|lane| {
            let left = lane.index() as f64 * 300.0;
            LaneRegion::new(lane, Rect::new(left, 0.0, 280.0, 1200.0))
        })
        .collect()
}

/// Pointer over card slot `slot` of `lane` with the default layout
fn over(lane: Lane, slot: usize) -> Point {
    Point::new(lane.index() as f64 * 300.0 + 40.0, slot as f64 * 96.0 + 20.0)
}

fn board(items: &[WorkItem]) -> BoardSession {
    let mut board = BoardSession::new(LayoutConfig::default());
    board.load(items.to_vec());
    board.set_lane_regions(regions());
    board
}

fn lane_ids(board: &BoardSession, lane: Lane) -> Vec<String> {
    board
        .lane_items(lane)
        .iter()
        .filter_map(LaneEntry::as_item)
        .map(|w| w.id.to_string())
        .collect()
}

fn patch_for(updates: &[(WorkId, WorkPatch)], id: &str) -> Option<WorkPatch> {
    updates
        .iter()
        .find(|(w, _)| w.as_str() == id)
        .map(|(_, p)| p.clone())
}

#[test_log::test(tokio::test)]
async fn test_move_first_to_last_in_lane() {
    let items = [
        item("a", Lane::Todo, 0),
        item("b", Lane::Todo, 1),
        item("c", Lane::Todo, 2),
    ];
    let store = MemoryWorkStore::with_works(items.clone());
    let mut board = board(&items);

    board.begin_drag(&"a".into(), over(Lane::Todo, 0)).unwrap();
    board.update_drag_target(over(Lane::Todo, 5));
    assert_eq!(board.drag_state().unwrap().target_index, 2);

    let outcome = board.finish_drag(&store).await.unwrap();
    assert!(outcome.is_success());

    assert_eq!(lane_ids(&board, Lane::Todo), vec!["b", "c", "a"]);
    let updates = store.updates().await;
    // Every item shifted, so each one carries a new order
    assert_eq!(updates.len(), 3);
    assert_eq!(patch_for(&updates, "a"), Some(WorkPatch::order(2)));
    assert_eq!(patch_for(&updates, "b"), Some(WorkPatch::order(0)));
    assert_eq!(patch_for(&updates, "c"), Some(WorkPatch::order(1)));
    assert!(updates.iter().all(|(_, p)| p.status.is_none()));
}

#[test_log::test(tokio::test)]
async fn test_move_into_empty_lane() {
    let items = [item("a", Lane::Todo, 0)];
    let store = MemoryWorkStore::with_works(items.clone());
    let mut board = board(&items);

    board.begin_drag(&"a".into(), over(Lane::Todo, 0)).unwrap();
    board.update_drag_target(over(Lane::Done, 0));
    board.finish_drag(&store).await.unwrap();

    assert_eq!(
        store.updates().await,
        vec![(WorkId::from("a"), WorkPatch::order(0).with_status(Lane::Done))]
    );
    assert!(lane_ids(&board, Lane::Todo).is_empty());
    assert_eq!(lane_ids(&board, Lane::Done), vec!["a"]);
    assert_eq!(store.get(&"a".into()).await.unwrap().status, Lane::Done);
}

#[test_log::test(tokio::test)]
async fn test_same_lane_writes_are_bounded_by_distance() {
    let items: Vec<WorkItem> = (0..8).map(|i| item(&format!("w{}", i), Lane::Todo, i)).collect();

    for (from, to) in [(1usize, 4usize), (6, 2), (3, 3), (0, 7), (5, 4)] {
        let store = MemoryWorkStore::with_works(items.clone());
        let mut board = board(&items);

        board.begin_drag(&items[from].id, Point::ORIGIN).unwrap();
        board.set_drag_target(Lane::Todo, to);
        board.finish_drag(&store).await;

        let updates = store.updates().await;
        assert_eq!(
            updates.len(),
            from.abs_diff(to) + usize::from(from != to),
            "move {} -> {}",
            from,
            to
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_cross_lane_only_moved_item_gets_status() {
    let items = [
        item("t0", Lane::Todo, 0),
        item("t1", Lane::Todo, 1),
        item("t2", Lane::Todo, 2),
        item("p0", Lane::InProgress, 0),
        item("p1", Lane::InProgress, 1),
    ];
    let store = MemoryWorkStore::with_works(items.clone());
    let mut board = board(&items);

    board.begin_drag(&"t1".into(), over(Lane::Todo, 1)).unwrap();
    board.update_drag_target(over(Lane::InProgress, 0));
    let outcome = board.finish_drag(&store).await.unwrap();
    assert!(outcome.is_cross_lane());

    let updates = store.updates().await;
    assert_eq!(
        patch_for(&updates, "t1"),
        Some(WorkPatch::order(0).with_status(Lane::InProgress))
    );
    assert_eq!(patch_for(&updates, "p0"), Some(WorkPatch::order(1)));
    assert_eq!(patch_for(&updates, "p1"), Some(WorkPatch::order(2)));
    assert!(updates
        .iter()
        .filter(|(id, _)| id.as_str() != "t1")
        .all(|(_, p)| p.status.is_none()));

    assert_eq!(lane_ids(&board, Lane::InProgress), vec!["t1", "p0", "p1"]);
    // The source lane keeps its gap; nothing there is rewritten
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["t0", "t2"]);
    assert!(patch_for(&updates, "t2").is_none());
}

#[test_log::test(tokio::test)]
async fn test_release_outside_lanes_issues_nothing() {
    let items = [item("a", Lane::Todo, 0), item("b", Lane::Todo, 1)];
    let store = MemoryWorkStore::with_works(items.clone());
    let mut board = board(&items);

    board.begin_drag(&"a".into(), over(Lane::Todo, 0)).unwrap();
    board.update_drag_target(Point::new(-10.0, -10.0));
    board.update_drag_target(Point::new(9000.0, 50.0));

    assert!(board.finish_drag(&store).await.is_none());
    assert!(store.calls().await.is_empty());
    assert!(board.drag_state().is_none());
    assert!(board.optimistic_order().is_none());
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["a", "b"]);
    assert_eq!(store.get(&"a".into()).await.unwrap().order, 0);
}

#[test_log::test(tokio::test)]
async fn test_index_never_counts_dragged_item() {
    let items = [
        item("a", Lane::Todo, 0),
        item("b", Lane::Todo, 1),
        item("c", Lane::Done, 0),
    ];
    let mut board = board(&items);
    board.begin_drag(&"b".into(), over(Lane::Todo, 1)).unwrap();

    for lane in Lane::ALL {
        let excluding_dragged = items
            .iter()
            .filter(|w| w.status == lane && w.id.as_str() != "b")
            .count();
        for slot in 0..6 {
            board.update_drag_target(over(lane, slot));
            let state = board.drag_state().unwrap();
            assert_eq!(state.target_lane, lane);
            assert!(state.target_index <= excluding_dragged);
            assert_eq!(state.target_index, slot.min(excluding_dragged));
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_new_gesture_rejected_while_dragging() {
    let items = [item("a", Lane::Todo, 0), item("b", Lane::Todo, 1)];
    let mut board = board(&items);

    board.on_card_pointer_down(&"a".into(), over(Lane::Todo, 0)).unwrap();
    assert!(board.on_card_pointer_down(&"b".into(), over(Lane::Todo, 1)).is_err());
    assert_eq!(board.drag_state().unwrap().active_item_id.as_str(), "a");
}

/// Store whose updates wait until released
#[derive(Default)]
struct GatedStore {
    inner: MemoryWorkStore,
    gate: Notify,
}

#[async_trait]
impl WorkStore for GatedStore {
    async fn list_works(&self, filter: &WorkFilter) -> Result<Vec<WorkItem>> {
        self.inner.list_works(filter).await
    }

    async fn create_work(&self, work: &NewWork) -> Result<WorkItem> {
        self.inner.create_work(work).await
    }

    async fn update_work(&self, id: &WorkId, patch: &WorkPatch) -> Result<()> {
        self.gate.notified().await;
        self.inner.update_work(id, patch).await
    }

    async fn delete_work(&self, id: &WorkId) -> Result<()> {
        self.inner.delete_work(id).await
    }
}

#[test_log::test(tokio::test)]
async fn test_overlay_held_until_writes_settle() {
    let items = [
        item("a", Lane::Todo, 0),
        item("b", Lane::Todo, 1),
        item("c", Lane::Todo, 2),
    ];
    let store = Arc::new(GatedStore {
        inner: MemoryWorkStore::with_works(items.clone()),
        gate: Notify::new(),
    });
    let mut board = board(&items);

    board.begin_drag(&"c".into(), over(Lane::Todo, 2)).unwrap();
    board.set_drag_target(Lane::Todo, 0);
    let reconciliation = board.end_drag().unwrap();

    // Published before any write is issued
    assert!(board.optimistic_order().is_some());
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["c", "a", "b"]);

    let task = tokio::spawn({
        let store = Arc::clone(&store);
        async move { reconciliation.run(store.as_ref()).await }
    });

    // Writes are in flight: the view must not fall back to the persisted order
    tokio::task::yield_now().await;
    assert!(!task.is_finished());
    assert!(board.optimistic_order().is_some());
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["c", "a", "b"]);
    assert!(matches!(
        board.begin_drag(&"a".into(), Point::ORIGIN),
        Err(BoardError::ReconciliationPending)
    ));
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["c", "a", "b"]);

    store.gate.notify_waiters();
    let outcome = task.await.unwrap();
    assert!(board.optimistic_order().is_some());

    board.settle(&outcome);
    assert!(board.optimistic_order().is_none());
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["c", "a", "b"]);
}

#[test_log::test(tokio::test)]
async fn test_failed_reconciliation_clears_overlay_and_notifies_once() {
    let items = [
        item("a", Lane::Todo, 0),
        item("b", Lane::Todo, 1),
        item("c", Lane::Done, 0),
    ];
    let store = MemoryWorkStore::with_works(items.clone());
    store.fail_updates_for("a").await;
    store.fail_updates_for("c").await;
    let mut board = board(&items);

    board.begin_drag(&"a".into(), over(Lane::Todo, 0)).unwrap();
    board.update_drag_target(over(Lane::Done, 0));
    let outcome = board.finish_drag(&store).await.unwrap();

    assert!(!outcome.is_success());
    assert!(board.optimistic_order().is_none());
    assert!(board.needs_refresh());

    let notes = board.take_notifications();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_error());
    assert!(board.take_notifications().is_empty());

    board.refresh(&store).await.unwrap();
    assert_eq!(lane_ids(&board, Lane::Todo), vec!["a", "b"]);
    assert_eq!(lane_ids(&board, Lane::Done), vec!["c"]);
}

#[test_log::test(tokio::test)]
async fn test_draft_singleton_and_commit() {
    let items = [item("a", Lane::Todo, 0)];
    let store = MemoryWorkStore::with_works(items.clone());
    let mut board = board(&items);

    assert!(board.begin_draft(Lane::Created));
    assert!(!board.begin_draft(Lane::Todo));
    assert!(board
        .lane_items(Lane::Todo)
        .iter()
        .all(|e| !matches!(e, LaneEntry::Draft(_))));

    board.set_draft_title("Ship it");
    let created = board.commit_draft(&store).await.unwrap().unwrap();
    assert_eq!(created.status, Lane::Created);
    assert_eq!(created.order, 0);

    let creates: Vec<_> = store
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Create(_)))
        .collect();
    assert_eq!(creates.len(), 1);
    assert!(board.draft().is_none());
}

#[test_log::test(tokio::test)]
async fn test_unmount_mid_gesture_leaves_store_untouched() {
    let items = [item("a", Lane::Todo, 0)];
    let store = MemoryWorkStore::with_works(items.clone());
    let mut board = board(&items);

    board.begin_drag(&"a".into(), over(Lane::Todo, 0)).unwrap();
    board.update_drag_target(over(Lane::Done, 0));
    board.unmount();

    assert!(store.calls().await.is_empty());
}
