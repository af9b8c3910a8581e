use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

/// File-name safe stamp for one invocation: RFC 3339 with `:` replaced by `-`.
pub fn report_stamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
        .replace(':', "-")
}

/// Where the reports of one invocation go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub chart: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path, stamp: &str) -> Self {
        Self {
            json: dir.join(format!("comparison-{stamp}.json")),
            csv: dir.join(format!("comparison-{stamp}.csv")),
            chart: dir.join(format!("comparison-{stamp}-metrics.png")),
        }
    }
}
