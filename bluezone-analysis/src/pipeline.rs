//! End-to-end comparison of already loaded runs.

use std::path::PathBuf;

use serde::Serialize;

use crate::aggregate::aggregate_runs;
use crate::compare::{ADAPTIVE_MODE, ComparisonResult, RANDOM_MODE, compare_aggregates};
use crate::error::CompareError;
use crate::record::RunRecord;
use crate::selection::select_recent;

/// Runs per mode used when the caller gives no usable limit.
pub const DEFAULT_RUN_LIMIT: usize = 10;

/// The summary document: the comparison plus the runs it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub comparison: ComparisonResult,
    /// Sources of the adaptive runs used, newest first.
    pub adaptive_runs: Vec<PathBuf>,
    /// Sources of the random runs used, newest first.
    pub random_runs: Vec<PathBuf>,
}

/// Select the `limit` most recent runs of each mode and compare adaptive against random.
///
/// # Errors
///
/// Returns [`CompareError::MissingModes`] when either mode has no runs; no
/// partial comparison is produced.
pub fn build_comparison(
    runs: &[RunRecord],
    limit: usize,
) -> Result<ComparisonSummary, CompareError> {
    let groups = select_recent(runs, limit);
    let adaptive = groups.get(ADAPTIVE_MODE);
    let random = groups.get(RANDOM_MODE);
    let (Some(adaptive), Some(random)) = (adaptive, random) else {
        return Err(CompareError::MissingModes {
            baseline: ADAPTIVE_MODE.to_string(),
            candidate: RANDOM_MODE.to_string(),
            found: groups.keys().cloned().collect(),
        });
    };

    log::debug!(
        "comparing {} adaptive and {} random runs",
        adaptive.len(),
        random.len()
    );
    let comparison = compare_aggregates(
        &aggregate_runs(adaptive.iter().copied()),
        &aggregate_runs(random.iter().copied()),
    );
    let sources = |selected: &[&RunRecord]| -> Vec<PathBuf> {
        selected
            .iter()
            .filter_map(|run| run.source().map(PathBuf::from))
            .collect()
    };

    Ok(ComparisonSummary {
        comparison,
        adaptive_runs: sources(adaptive),
        random_runs: sources(random),
    })
}
