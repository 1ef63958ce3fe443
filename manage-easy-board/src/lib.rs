//! Kanban board reorder engine
//!
//! Work items (tasks and bugs) live in four lanes: `CREATED`, `TODO`,
//! `IN_PROGRESS` and `DONE`. Inside a lane they are ordered by an integer
//! `order` field. Dragging a card rewrites `order` (and `status`, for a
//! cross-lane move) on every item whose position changed.
//!
//! ## Overview
//!
//! - **Optimistic display** - the new order shows immediately and stays
//!   until the store writes settle
//! - **Minimal writes** - only items whose position actually changed are updated
//! - **Pluggable store** - [`WorkStore`] has an HTTP implementation for the
//!   Cloud Functions backend and an in-memory one for tests and demos
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use manage_easy_board::{BoardSession, HttpWorkStore, Lane, LayoutConfig, StoreConfig, WorkId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpWorkStore::new(&StoreConfig::default())?;
//! let mut board = BoardSession::new(LayoutConfig::default());
//! board.refresh(&store).await?;
//!
//! let id = WorkId::from("01J0000000000000000000000A");
//! board.begin_drag(&id, Default::default())?;
//! board.set_drag_target(Lane::Done, 0);
//! if let Some(outcome) = board.finish_drag(&store).await {
//!     println!("{} writes, success: {}", outcome.write_count(), outcome.is_success());
//! }
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod config;
mod error;
pub mod store;
pub mod types;

pub use board::{
    BoardSession, DragState, Draft, LaneEntry, Notification, NotificationLevel, OptimisticOrder,
    OrderWrite, PointerHub, ReconcileOutcome, Reconciliation,
};
pub use config::{AppConfig, ConfigError, ConfigProvider, LayoutConfig, StoreConfig};
pub use error::{BoardError, Result};
pub use store::{HttpWorkStore, MemoryWorkStore, StoreCall, WorkStore};

pub use types::{
    FeatureId, Lane, LaneRegion, NewWork, Point, Rect, WorkFilter, WorkId, WorkItem, WorkKind,
    WorkPatch,
};
