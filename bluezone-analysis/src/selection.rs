//! Most-recent-first selection of runs per mode.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::record::RunRecord;
use crate::timestamp::resolve_timestamp;

/// Runs grouped by mode, most recent first within each mode.
pub type ModeGroups<'a> = BTreeMap<String, Vec<&'a RunRecord>>;

/// Group `runs` by mode and keep at most `limit` per mode, newest first.
///
/// Ties on the resolved timestamp keep input order. Runs without any
/// resolvable time sort after every dated run. Modes left without runs are
/// not present in the result.
#[must_use]
pub fn select_recent(runs: &[RunRecord], limit: usize) -> ModeGroups<'_> {
    let mut by_mode: BTreeMap<String, Vec<_>> = BTreeMap::new();
    for run in runs {
        by_mode
            .entry(run.mode().to_string())
            .or_default()
            .push((resolve_timestamp(run), run));
    }

    by_mode
        .into_iter()
        .filter_map(|(mode, mut dated)| {
            dated.sort_by_key(|(resolved, _)| Reverse(*resolved));
            let selected: Vec<&RunRecord> =
                dated.into_iter().take(limit).map(|(_, run)| run).collect();
            (!selected.is_empty()).then_some((mode, selected))
        })
        .collect()
}
