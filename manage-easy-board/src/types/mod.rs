//! Core types for the board engine

mod geometry;
mod ids;
mod lane;
mod work;

// Re-export all types
pub use geometry::{LaneRegion, Point, Rect};
pub use ids::{FeatureId, WorkId};
pub use lane::Lane;
pub use work::{NewWork, WorkFilter, WorkItem, WorkKind, WorkPatch};
