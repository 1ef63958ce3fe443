//! Work item types: WorkItem, NewWork, WorkPatch, WorkFilter

use super::ids::{FeatureId, WorkId};
use super::lane::Lane;
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminates the two kinds of work item that share one board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkKind {
    #[default]
    Task,
    Bug,
}

impl fmt::Display for WorkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task => f.write_str("TASK"),
            Self::Bug => f.write_str("BUG"),
        }
    }
}

impl FromStr for WorkKind {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TASK" => Ok(Self::Task),
            "BUG" => Ok(Self::Bug),
            _ => Err(BoardError::invalid_value(
                "kind",
                format!("'{}' is not TASK or BUG", s),
            )),
        }
    }
}

/// A task or bug as persisted by the work item store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: WorkId,
    pub status: Lane,
    /// Position within the lane; lower sorts first
    pub order: i64,
    #[serde(rename = "type", default)]
    pub kind: WorkKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<FeatureId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Tie-break key for equal `order` values
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    /// Create a work item with a fresh id in the given lane
    pub fn new(title: impl Into<String>, status: Lane, order: i64) -> Self {
        Self {
            id: WorkId::new(),
            status,
            order,
            kind: WorkKind::Task,
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            feature_id: None,
            assignee: None,
            created_at: Utc::now(),
        }
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<WorkId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: WorkKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Build the stored item for a creation payload once the store has assigned an id
    pub fn from_new(id: WorkId, work: &NewWork, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: work.status,
            order: work.order,
            kind: work.kind,
            title: work.title.clone(),
            description: work.description.clone(),
            tags: work.tags.clone(),
            feature_id: work.feature_id.clone(),
            assignee: work.assignee.clone(),
            created_at,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &WorkPatch) {
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref tags) = patch.tags {
            self.tags = tags.clone();
        }
        if let Some(ref assignee) = patch.assignee {
            self.assignee = Some(assignee.clone());
        }
    }
}

/// Payload for creating a work item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWork {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: WorkKind,
    pub status: Lane,
    pub order: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<FeatureId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl NewWork {
    /// Create a payload for a task in `status` at `order`
    pub fn new(title: impl Into<String>, status: Lane, order: i64) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            kind: WorkKind::Task,
            status,
            order,
            tags: Vec::new(),
            feature_id: None,
            assignee: None,
        }
    }

    /// Set the kind
    pub fn with_kind(mut self, kind: WorkKind) -> Self {
        self.kind = kind;
        self
    }

    /// Reject payloads the store would refuse, before any remote call
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(BoardError::missing_field("title"));
        }
        if self.order < 0 {
            return Err(BoardError::invalid_value("order", "must not be negative"));
        }
        Ok(())
    }
}

/// Partial update; only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Lane>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl WorkPatch {
    /// Patch that only moves an item to `order`
    pub fn order(order: i64) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    /// Also set the status
    pub fn with_status(mut self, status: Lane) -> Self {
        self.status = Some(status);
        self
    }
}

/// Narrows `list_works` to one feature and/or one kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<FeatureId>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkKind>,
}

impl WorkFilter {
    /// Filter that matches everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one feature
    pub fn for_feature(feature_id: impl Into<FeatureId>) -> Self {
        Self {
            feature_id: Some(feature_id.into()),
            kind: None,
        }
    }

    /// Check whether an item passes the filter
    pub fn matches(&self, item: &WorkItem) -> bool {
        let feature_ok = match &self.feature_id {
            Some(f) => item.feature_id.as_ref() == Some(f),
            None => true,
        };
        let kind_ok = self.kind.is_none_or(|k| item.kind == k);
        feature_ok && kind_ok
    }
}
