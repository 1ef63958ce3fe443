//! Command handlers
//!
//! Each handler loads a fresh [`BoardSession`], runs one engine operation
//! against the store, and returns the text to print.

use anyhow::{bail, Context, Result};
use manage_easy_board::{
    BoardSession, Lane, LayoutConfig, Point, ReconcileOutcome, WorkFilter, WorkId, WorkItem,
    WorkKind, WorkStore,
};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

use crate::table::{lane_table, write_table};

#[derive(Serialize)]
struct LaneListing<'a> {
    lane: Lane,
    title: &'static str,
    items: Vec<&'a WorkItem>,
}

async fn open_board<S: WorkStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
    scope: WorkFilter,
) -> Result<BoardSession> {
    let mut board = BoardSession::new(*layout).with_scope(scope);
    board
        .refresh(store)
        .await
        .context("failed to list work items")?;
    debug!(items = board.len(), "board loaded");
    Ok(board)
}

/// `lanes`: every lane in board order
pub async fn run_lanes<S: WorkStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
    feature: Option<&str>,
    json: bool,
) -> Result<String> {
    let scope = feature.map(WorkFilter::for_feature).unwrap_or_default();
    let board = open_board(store, layout, scope).await?;

    let lanes: Vec<LaneListing<'_>> = Lane::ALL
        .into_iter()
        .map(|lane| LaneListing {
            lane,
            title: lane.title(),
            items: board.lane_view(lane),
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&lanes)?);
    }

    let table = lane_table(lanes.iter().map(|l| (l.lane, l.items.as_slice())));

    let total: usize = lanes.iter().map(|l| l.items.len()).sum();
    let mut out = String::new();
    if total == 0 {
        out.push_str("No work items.");
    } else {
        writeln!(out, "{table}")?;
        write!(out, "\n{} item(s).", total)?;
    }
    Ok(out)
}

/// `move`: drop an item at `index` of `lane` (end of lane by default)
pub async fn run_move<S: WorkStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
    id: &str,
    lane: Lane,
    index: Option<usize>,
) -> Result<String> {
    let mut board = open_board(store, layout, WorkFilter::all()).await?;
    let id = WorkId::from(id);

    board
        .begin_drag(&id, Point::ORIGIN)
        .with_context(|| format!("cannot move {}", id))?;
    // Out-of-range indices clamp to the end of the lane
    board.set_drag_target(lane, index.unwrap_or(usize::MAX));

    let Some(outcome) = board.finish_drag(store).await else {
        bail!("move of {} produced no drop target", id);
    };

    let out = describe_outcome(&outcome)?;
    if !outcome.is_success() {
        bail!(
            "{} of {} updates failed; run `manage-easy lanes` to see the stored order\n{}",
            outcome.failed.len(),
            outcome.write_count(),
            out
        );
    }
    Ok(out)
}

fn describe_outcome(outcome: &ReconcileOutcome) -> Result<String> {
    let mut out = String::new();
    if outcome.write_count() == 0 {
        write!(out, "{} is already in place; nothing written.", outcome.moved)?;
        return Ok(out);
    }

    writeln!(out, "{}", write_table(outcome))?;
    write!(out, "\n{} write(s) issued.", outcome.write_count())?;
    if outcome.is_success() && outcome.is_cross_lane() {
        write!(out, " Moved to {}.", outcome.target_lane.title())?;
    }
    Ok(out)
}

/// `add`: create an item at the end of `lane` through the draft flow
pub async fn run_add<S: WorkStore + ?Sized>(
    store: &S,
    layout: &LayoutConfig,
    title: &str,
    lane: Lane,
    kind: WorkKind,
) -> Result<String> {
    let mut board = open_board(store, layout, WorkFilter::all()).await?;

    board.begin_draft(lane);
    board.set_draft_kind(kind);
    board.set_draft_title(title);

    match board.commit_draft(store).await? {
        Some(created) => Ok(format!(
            "Created {} {} in {} at position {}.",
            created.kind,
            created.id,
            created.status.title(),
            created.order
        )),
        None => bail!("title must not be empty"),
    }
}

/// `delete`: remove one item
pub async fn run_delete<S: WorkStore + ?Sized>(store: &S, id: &str) -> Result<String> {
    let id = WorkId::from(id);
    store
        .delete_work(&id)
        .await
        .with_context(|| format!("failed to delete {}", id))?;
    Ok(format!("Deleted {}.", id))
}
