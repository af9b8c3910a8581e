//! Point-in-time resolution for runs, falling back to the artifact's mtime.

use chrono::{DateTime, Utc};

use crate::record::RunRecord;

/// ISO 8601 variants with an explicit offset, tried after RFC 3339.
const FLEXIBLE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Microsecond timestamps with a compact `±HHMM` offset.
const FIXED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%z";

/// Parse a run timestamp. A trailing `Z` means UTC. Strings without an
/// offset are not accepted.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.with_timezone(&Utc));
    }
    FLEXIBLE_FORMATS
        .iter()
        .chain(std::iter::once(&FIXED_FORMAT))
        .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// When the run happened: its own timestamp if parseable, else the source
/// file's last-modified time.
///
/// Every record produced by the loader has provenance, so this only returns
/// `None` for in-memory records without a usable timestamp.
#[must_use]
pub fn resolve_timestamp(record: &RunRecord) -> Option<DateTime<Utc>> {
    if let Some(parsed) = record.timestamp().and_then(parse_timestamp) {
        return Some(parsed);
    }
    let provenance = record.provenance()?;
    if let Some(raw) = record.timestamp() {
        log::debug!(
            "unparseable timestamp {raw:?} in {}, using file mtime",
            provenance.path.display()
        );
    }
    Some(provenance.modified)
}
