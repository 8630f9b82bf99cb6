use crate::domain::StatEntry;
use crate::stats::aggregator::CountTable;

/// Orders a table by count, highest first.
///
/// Equal counts keep the table's iteration order.
pub fn rank(table: &CountTable) -> Vec<StatEntry> {
    let entries = table
        .iter()
        .map(|(label, count)| StatEntry::new(label.clone(), *count))
        .collect();
    rank_entries(entries)
}

pub fn rank_entries(mut entries: Vec<StatEntry>) -> Vec<StatEntry> {
    // `sort_by` is stable.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
