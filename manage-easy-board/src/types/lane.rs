//! Lanes: the four fixed status columns of the board

use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-status column. Variant order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lane {
    Created,
    Todo,
    InProgress,
    Done,
}

impl Lane {
    /// Every lane in display order
    pub const ALL: [Lane; 4] = [Lane::Created, Lane::Todo, Lane::InProgress, Lane::Done];

    /// Position of this lane in [`Lane::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::Created => 0,
            Self::Todo => 1,
            Self::InProgress => 2,
            Self::Done => 3,
        }
    }

    /// Wire name as stored in the `status` field
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Column heading
    pub fn title(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Lane::ALL
            .into_iter()
            .find(|lane| lane.as_str() == normalized)
            .ok_or_else(|| {
                BoardError::invalid_value(
                    "lane",
                    format!("'{}' is not one of CREATED, TODO, IN_PROGRESS, DONE", s),
                )
            })
    }
}
