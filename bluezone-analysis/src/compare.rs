//! Adaptive-vs-random comparison of two per-mode aggregates.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::aggregate::{AggregateMap, MetricAggregate};
use crate::metrics::{AVG_DISTANCE_TO_CENTER, KILL_VARIANCE};

pub const ADAPTIVE_MODE: &str = "adaptive";
pub const RANDOM_MODE: &str = "random";

/// One mode's view of a metric inside a comparison.
///
/// A mode that never exposed the metric has `mean`, `std` and `count` absent
/// and a `total` of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSide {
    pub values: Vec<Option<f64>>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub count: Option<usize>,
    pub total: usize,
}

impl ModeSide {
    #[must_use]
    pub fn absent() -> Self {
        Self {
            values: Vec::new(),
            mean: None,
            std: None,
            count: None,
            total: 0,
        }
    }
}

impl From<&MetricAggregate> for ModeSide {
    fn from(aggregate: &MetricAggregate) -> Self {
        Self {
            values: aggregate.values.clone(),
            mean: aggregate.mean,
            std: aggregate.std,
            count: Some(aggregate.count),
            total: aggregate.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub adaptive: ModeSide,
    pub random: ModeSide,
    /// `random.mean - adaptive.mean`, when both exist.
    pub diff: Option<f64>,
}

/// Values computed from the two modes' means rather than from a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Adaptive minus random mean distance to the zone center.
    pub fairness_improvement: Option<f64>,
    /// Adaptive minus random mean kill variance.
    pub stability_gain: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub per_metric: BTreeMap<String, MetricComparison>,
    pub derived: DerivedMetrics,
}

impl ComparisonResult {
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<&MetricComparison> {
        self.per_metric.get(name)
    }
}

/// Merge the adaptive and random aggregates over the union of their metric names.
#[must_use]
pub fn compare_aggregates(adaptive: &AggregateMap, random: &AggregateMap) -> ComparisonResult {
    let names: BTreeSet<&String> = adaptive.keys().chain(random.keys()).collect();
    let per_metric = names
        .into_iter()
        .map(|name| {
            let adaptive_side = adaptive
                .get(name)
                .map_or_else(ModeSide::absent, ModeSide::from);
            let random_side = random
                .get(name)
                .map_or_else(ModeSide::absent, ModeSide::from);
            let diff = difference(random_side.mean, adaptive_side.mean);
            let comparison = MetricComparison {
                adaptive: adaptive_side,
                random: random_side,
                diff,
            };
            (name.clone(), comparison)
        })
        .collect();

    let mean_of = |map: &AggregateMap, name: &str| map.get(name).and_then(|a| a.mean);
    let derived = DerivedMetrics {
        fairness_improvement: difference(
            mean_of(adaptive, AVG_DISTANCE_TO_CENTER),
            mean_of(random, AVG_DISTANCE_TO_CENTER),
        ),
        stability_gain: difference(
            mean_of(adaptive, KILL_VARIANCE),
            mean_of(random, KILL_VARIANCE),
        ),
    };

    ComparisonResult {
        per_metric,
        derived,
    }
}

fn difference(minuend: Option<f64>, subtrahend: Option<f64>) -> Option<f64> {
    Some(minuend? - subtrahend?)
}
