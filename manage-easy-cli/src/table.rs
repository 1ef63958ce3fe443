//! Tables for lane listings and reconciliation writes.

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use manage_easy_board::{Lane, OrderWrite, ReconcileOutcome, WorkItem};

/// Used when stdout is not a terminal
const FALLBACK_WIDTH: u16 = 120;

/// Lane, order, type and id columns plus borders
const FIXED_COLUMNS_WIDTH: usize = 56;

const MIN_TITLE_WIDTH: usize = 12;

fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(FALLBACK_WIDTH)
}

fn sized_table(width: u16, header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width);
    table.set_header(header.to_vec());
    table
}

/// Characters left for the title column on a terminal `width` columns wide
pub fn title_width(width: u16) -> usize {
    usize::from(width)
        .saturating_sub(FIXED_COLUMNS_WIDTH)
        .max(MIN_TITLE_WIDTH)
}

/// A card title on one line of at most `width` characters
///
/// Line breaks and runs of whitespace collapse to single spaces. A cut title
/// ends in `…`.
pub fn card_title(title: &str, width: usize) -> String {
    let flat = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// One row per item, lanes in board order
///
/// The lane name is printed on the first row of each lane only.
pub fn lane_table<'a, 'w: 'a>(
    lanes: impl IntoIterator<Item = (Lane, &'a [&'w WorkItem])>,
) -> Table {
    let width = terminal_width();
    let titles = title_width(width);
    let mut table = sized_table(width, &["Lane", "Order", "Type", "Id", "Title"]);

    for (lane, items) in lanes {
        for (row, item) in items.iter().enumerate() {
            let lane_cell = if row == 0 { lane.title() } else { "" };
            table.add_row(vec![
                lane_cell.to_string(),
                item.order.to_string(),
                item.kind.to_string(),
                item.id.to_string(),
                card_title(&item.title, titles),
            ]);
        }
    }
    table
}

fn write_row(write: &OrderWrite, result: String) -> Vec<String> {
    let status = match write.status {
        Some(lane) => format!("→ {}", lane.title()),
        None => String::new(),
    };
    vec![write.id.to_string(), write.order.to_string(), status, result]
}

/// Every write of a finished batch, applied ones first
pub fn write_table(outcome: &ReconcileOutcome) -> Table {
    let mut table = sized_table(terminal_width(), &["Id", "Order", "Status", "Result"]);
    for write in &outcome.applied {
        table.add_row(write_row(write, "ok".to_string()));
    }
    for (write, err) in &outcome.failed {
        table.add_row(write_row(write, format!("failed: {}", err)));
    }
    table
}
