//! Bluezone Run Analysis
//!
//! Loads simulation run documents, normalizes their metrics, and compares the
//! most recent adaptive-zone runs against random-zone runs.
//! This crate holds no CLI, terminal or chart concerns.

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod numbers;
pub mod pipeline;
pub mod record;
pub mod selection;
pub mod timestamp;

// Re-export commonly used types
pub use aggregate::{AggregateMap, MetricAggregate, aggregate_metric_maps, aggregate_runs};
pub use compare::{
    ADAPTIVE_MODE, ComparisonResult, DerivedMetrics, MetricComparison, ModeSide, RANDOM_MODE,
    compare_aggregates,
};
pub use error::{CompareError, LoadError};
pub use loader::{
    LoadFailure, LoadReport, ParsedDocument, load_run_file, load_runs_from_dir, parse_document,
    parse_run, repair_decimal_commas,
};
pub use metrics::{MetricMap, extract_metrics};
pub use pipeline::{ComparisonSummary, DEFAULT_RUN_LIMIT, build_comparison};
pub use record::{DEFAULT_MODE, PlayerRecord, Provenance, RunRecord};
pub use selection::{ModeGroups, select_recent};
pub use timestamp::{parse_timestamp, resolve_timestamp};
