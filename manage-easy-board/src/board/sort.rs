//! Base ordering of items within a lane

use crate::types::WorkItem;
use std::cmp::Ordering;

/// Total order for items in one lane: `order`, then `created_at`, then `id`.
///
/// The id key only matters when two items share both order and timestamp;
/// it keeps the result independent of the input permutation.
pub fn compare(a: &WorkItem, b: &WorkItem) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort borrowed items into display order
pub fn base_sort<'a>(items: impl IntoIterator<Item = &'a WorkItem>) -> Vec<&'a WorkItem> {
    let mut sorted: Vec<&WorkItem> = items.into_iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
}
