//! Inline-creation draft shown after a lane's real items

use crate::types::{Lane, WorkKind};

/// An uncommitted entry. At most one exists per board session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub lane: Lane,
    pub title: String,
    pub kind: WorkKind,
}

impl Draft {
    pub fn new(lane: Lane) -> Self {
        Self {
            lane,
            title: String::new(),
            kind: WorkKind::Task,
        }
    }

    /// Title with surrounding whitespace removed, or `None` if nothing is left
    pub fn committed_title(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }
}
