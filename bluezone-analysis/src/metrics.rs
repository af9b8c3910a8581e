//! Canonical per-run metrics: the embedded summary when present, otherwise
//! values derived from the per-player records.

use std::collections::BTreeMap;

use crate::numbers::{count_to_f64, lenient_f64};
use crate::record::{RunRecord, ids_match};

/// Metric name → value for one run. `None` marks a metric the run names but
/// whose value is not numeric; it still counts toward the union of names.
pub type MetricMap = BTreeMap<String, Option<f64>>;

pub const AVG_DISTANCE_TO_CENTER: &str = "avgDistanceToCenter";
pub const ALIVE_COUNT: &str = "aliveCount";
pub const AVG_KILLS: &str = "avgKills";
pub const KILL_VARIANCE: &str = "killVariance";
pub const AVG_ACTIVITY: &str = "avgActivity";
pub const WINNER_KILLS: &str = "winnerKills";
pub const ROUNDS_PLAYED: &str = "roundsPlayed";
pub const ELIMINATIONS_PER_ROUND: &str = "eliminationsPerRound";

/// Precomputed upstream and never trusted; recompute from players if needed.
pub const ALIVE_RATIO: &str = "aliveRatio";

/// Metrics computed from `players` when a run has no embedded summary.
pub const DERIVED_METRICS: &[&str] = &[
    AVG_DISTANCE_TO_CENTER,
    ALIVE_COUNT,
    AVG_KILLS,
    KILL_VARIANCE,
    AVG_ACTIVITY,
    WINNER_KILLS,
    ROUNDS_PLAYED,
    ELIMINATIONS_PER_ROUND,
];

/// Produce the metric map for one run.
#[must_use]
pub fn extract_metrics(record: &RunRecord) -> MetricMap {
    match record.metrics() {
        Some(embedded) if !embedded.is_empty() => embedded
            .iter()
            .filter(|(name, _)| name.as_str() != ALIVE_RATIO)
            .map(|(name, value)| (name.clone(), lenient_f64(value)))
            .collect(),
        _ => derive_from_players(record),
    }
}

fn derive_from_players(record: &RunRecord) -> MetricMap {
    let players = record.players();
    let total = players.len();
    let alive_count = players.iter().filter(|p| p.alive).count();

    let distances: Vec<f64> = players.iter().filter_map(|p| p.distance).collect();
    let kills: Vec<f64> = players.iter().map(|p| p.kills()).collect();
    let activity: Vec<f64> = players.iter().map(|p| p.activity()).collect();

    let avg_kills = mean_or_zero(&kills);
    let kill_variance = if kills.is_empty() {
        0.0
    } else {
        kills.iter().map(|k| (k - avg_kills).powi(2)).sum::<f64>() / count_to_f64(kills.len())
    };

    let winner_kills = record
        .winner_left_id()
        .and_then(|winner| {
            players
                .iter()
                .find(|p| p.id.as_ref().is_some_and(|id| ids_match(id, winner)))
        })
        .map_or(0.0, |p| p.kills());

    let rounds = record.rounds().unwrap_or(0.0);
    let eliminations_per_round = if rounds == 0.0 {
        0.0
    } else {
        count_to_f64(total - alive_count) / rounds
    };

    [
        (AVG_DISTANCE_TO_CENTER, mean_or_zero(&distances)),
        (ALIVE_COUNT, count_to_f64(alive_count)),
        (AVG_KILLS, avg_kills),
        (KILL_VARIANCE, kill_variance),
        (AVG_ACTIVITY, mean_or_zero(&activity)),
        (WINNER_KILLS, winner_kills),
        (ROUNDS_PLAYED, rounds),
        (ELIMINATIONS_PER_ROUND, eliminations_per_round),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), Some(value)))
    .collect()
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / count_to_f64(values.len())
    }
}
