//! Run documents as written by the simulator, decoded leniently.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::numbers::lenient_f64;

/// Mode assumed for documents that do not declare one.
pub const DEFAULT_MODE: &str = "adaptive";

/// Where a run document came from. Attached by the loader, never read from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub path: PathBuf,
    /// Last-modified time of the artifact, used when the run carries no usable timestamp.
    pub modified: DateTime<Utc>,
}

impl Provenance {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            modified,
        }
    }
}

/// One simulation run.
///
/// Only the fields the comparison needs are decoded; anything else in the
/// document (histories, `maxRounds`, ...) is ignored. Numeric fields accept
/// numbers or numeric strings and read anything else as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    timestamp: Option<String>,
    #[serde(default)]
    metrics: Option<Value>,
    #[serde(default, deserialize_with = "player_objects")]
    players: Option<Vec<PlayerRecord>>,
    #[serde(default, deserialize_with = "lenient_number")]
    rounds: Option<f64>,
    #[serde(default)]
    winner_left_id: Option<Value>,
    #[serde(skip)]
    provenance: Option<Provenance>,
}

/// Per-player entry of a run. Entries without an `id` still count.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub alive: bool,
    #[serde(default, deserialize_with = "lenient_number")]
    pub kills: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub activity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub distance: Option<f64>,
}

impl PlayerRecord {
    #[must_use]
    pub fn kills(&self) -> f64 {
        self.kills.unwrap_or(0.0)
    }

    #[must_use]
    pub fn activity(&self) -> f64 {
        self.activity.unwrap_or(0.0)
    }
}

impl RunRecord {
    /// Decode an already parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Shape`] when the value is not an object or a known
    /// field has an unusable structure (e.g. `players` that is not a list).
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        if !value.is_object() {
            return Err(LoadError::Shape {
                source: serde_json::Error::custom(format!(
                    "expected a run object, found {}",
                    json_kind(&value)
                )),
            });
        }
        serde_json::from_value(value).map_err(|source| LoadError::Shape { source })
    }

    /// Attach the source location. The rest of the record stays as loaded.
    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    #[must_use]
    pub fn mode(&self) -> &str {
        self.mode.as_deref().unwrap_or(DEFAULT_MODE)
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// The embedded metrics block, when the document carries one as an object.
    #[must_use]
    pub fn metrics(&self) -> Option<&Map<String, Value>> {
        self.metrics.as_ref().and_then(Value::as_object)
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerRecord] {
        self.players.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub const fn rounds(&self) -> Option<f64> {
        self.rounds
    }

    #[must_use]
    pub const fn winner_left_id(&self) -> Option<&Value> {
        self.winner_left_id.as_ref()
    }

    #[must_use]
    pub const fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.provenance.as_ref().map(|p| p.path.as_path())
    }
}

/// Identifier equality as the simulator means it: numbers compare by value,
/// so `3` and `3.0` name the same player.
#[must_use]
pub fn ids_match(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => a == b,
        },
        _ => left == right,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Player entries must be objects; positional entries like `[7, true, 3]` are rejected.
fn player_objects<'de, D>(deserializer: D) -> Result<Option<Vec<PlayerRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(entries) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };
    entries
        .into_iter()
        .map(|entry| {
            if !entry.is_object() {
                return Err(D::Error::custom(format!(
                    "expected a player object, found {}",
                    json_kind(&entry)
                )));
            }
            PlayerRecord::deserialize(entry).map_err(D::Error::custom)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_f64(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        other => lenient_f64(&other).is_some_and(|n| n != 0.0),
    })
}
