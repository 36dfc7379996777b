// Time-series reconciliation: merge an old and a new snapshot of the same series.
// From the earliest date both snapshots share, the new snapshot's rows are taken
// wholesale; strictly before it, the old snapshot's rows are kept.
use chrono::NaiveDate;
use shared::models::TimeSeriesTable;

/// Which merge path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Every date of the new snapshot already exists in the old one; the new snapshot is returned as is.
    UpToDate,
    /// Old rows before `split` followed by new rows from `split` on.
    Spliced { split: NaiveDate },
    /// No shared dates: both snapshots concatenated and sorted by date.
    Appended,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub table: TimeSeriesTable,
    pub outcome: ReconcileOutcome,
    pub only_old: usize,
    pub only_new: usize,
}

pub fn reconcile(old: &TimeSeriesTable, new: &TimeSeriesTable) -> TimeSeriesTable {
    reconcile_detailed(old, new).table
}

/// Duplicate dates inside one input are not collapsed; they flow into the result.
pub fn reconcile_detailed(old: &TimeSeriesTable, new: &TimeSeriesTable) -> Reconciliation {
    let old_keys = old.key_set();
    let new_keys = new.key_set();

    let only_old: Vec<NaiveDate> = old_keys.difference(&new_keys).copied().collect();
    let only_new: Vec<NaiveDate> = new_keys.difference(&old_keys).copied().collect();
    log_unique_span("old", &only_old);
    log_unique_span("new", &only_new);

    // An empty new snapshot brings nothing but must not erase history, so it
    // falls through to the append path instead of the up-to-date shortcut.
    let (table, outcome) = if !new_keys.is_empty() && new_keys.is_subset(&old_keys) {
        tracing::info!("No update is needed; the new data is already included in the old data");
        (new.clone(), ReconcileOutcome::UpToDate)
    } else if let Some(split) = old_keys.intersection(&new_keys).next().copied() {
        let before = old.filter_rows(|r| r.date < split);
        let after = new.filter_rows(|r| r.date >= split);
        tracing::info!(split = %split, kept_old = before.len(), taken_new = after.len(), "Spliced snapshots");
        (before.concat(&after), ReconcileOutcome::Spliced { split })
    } else {
        let mut merged = old.concat(new);
        merged.sort_by_date();
        tracing::info!(rows = merged.len(), "Snapshots do not overlap; appended");
        (merged, ReconcileOutcome::Appended)
    };

    Reconciliation {
        table,
        outcome,
        only_old: only_old.len(),
        only_new: only_new.len(),
    }
}

fn log_unique_span(side: &str, dates: &[NaiveDate]) {
    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        tracing::info!(side, from = %first, to = %last, days = dates.len(), "Dates unique to one snapshot");
    }
}
