//! Per-metric descriptive statistics over the runs of one mode.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::metrics::{MetricMap, extract_metrics};
use crate::numbers::count_to_f64;
use crate::record::RunRecord;

/// Statistics of one metric across a list of runs.
///
/// `values` is aligned with the input runs; a run that does not expose the
/// metric (or exposes a non-numeric value) holds `None` there. `mean` and
/// `std` only see present values and are `None` when there are none, which
/// keeps "no data" apart from "data is zero".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAggregate {
    pub values: Vec<Option<f64>>,
    pub mean: Option<f64>,
    /// Population standard deviation.
    pub std: Option<f64>,
    pub count: usize,
    pub total: usize,
}

impl MetricAggregate {
    #[must_use]
    pub fn from_values(values: Vec<Option<f64>>) -> Self {
        let mut stats = RunningStats::default();
        for value in values.iter().flatten() {
            stats.add(*value);
        }
        Self {
            mean: stats.mean(),
            std: stats.std_dev(),
            count: stats.count,
            total: values.len(),
            values,
        }
    }

    /// Runs that did not contribute a value.
    #[must_use]
    pub const fn missing(&self) -> usize {
        self.total - self.count
    }
}

/// Metric name → aggregate, for one mode.
pub type AggregateMap = BTreeMap<String, MetricAggregate>;

/// Aggregate the extracted metrics of `runs`.
#[must_use]
pub fn aggregate_runs<'a, I>(runs: I) -> AggregateMap
where
    I: IntoIterator<Item = &'a RunRecord>,
{
    let maps: Vec<MetricMap> = runs.into_iter().map(extract_metrics).collect();
    aggregate_metric_maps(&maps)
}

/// Aggregate already extracted metric maps. Names are the union over all maps.
#[must_use]
pub fn aggregate_metric_maps(maps: &[MetricMap]) -> AggregateMap {
    let names: BTreeSet<&String> = maps.iter().flat_map(BTreeMap::keys).collect();
    names
        .into_iter()
        .map(|name| {
            let values = maps
                .iter()
                .map(|map| map.get(name).copied().flatten())
                .collect();
            (name.clone(), MetricAggregate::from_values(values))
        })
        .collect()
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = count_to_f64(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    fn variance(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.m2 / count_to_f64(self.count)).max(0.0))
    }

    fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}
