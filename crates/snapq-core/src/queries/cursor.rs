//! Sort keys, sort order and the resume cursor.
//!
//! A cursor token is URL-safe base64 of `value,repository,name` where `value`
//! is the sort-key value of the last snapshot on the previous page.

use std::cmp::Ordering;
use std::str::FromStr;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::errors::{ExError, Result, SnapqError};
use crate::model::SnapshotDescriptor;

/// Column a listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    StartTime,
    Name,
    Duration,
    IndexCount,
    ShardCount,
    FailedShardCount,
    Repository,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::StartTime,
        SortKey::Name,
        SortKey::Duration,
        SortKey::IndexCount,
        SortKey::ShardCount,
        SortKey::FailedShardCount,
        SortKey::Repository,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::StartTime => "start_time",
            SortKey::Name => "name",
            SortKey::Duration => "duration",
            SortKey::IndexCount => "index_count",
            SortKey::ShardCount => "shard_count",
            SortKey::FailedShardCount => "failed_shard_count",
            SortKey::Repository => "repository",
        }
    }

    /// Keys whose cursor value is an integer
    pub fn is_numeric(&self) -> bool {
        !matches!(self, SortKey::Name | SortKey::Repository)
    }

    /// Integer value of a numeric key; `None` for name and repository
    pub fn numeric_value(&self, d: &SnapshotDescriptor) -> Option<i64> {
        match self {
            SortKey::StartTime => Some(d.start_time()),
            SortKey::Duration => Some(d.duration()),
            SortKey::IndexCount => Some(d.index_count()),
            SortKey::ShardCount => Some(d.total_shards()),
            SortKey::FailedShardCount => Some(d.failed_shards()),
            SortKey::Name | SortKey::Repository => None,
        }
    }

    /// Value written into a cursor for this snapshot
    pub fn sort_value(&self, d: &SnapshotDescriptor) -> String {
        match self {
            SortKey::Name => d.identity.name.clone(),
            SortKey::Repository => d.repository.clone(),
            _ => self.numeric_value(d).unwrap_or_default().to_string(),
        }
    }
}

impl FromStr for SortKey {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| {
                SnapqError::InvalidRequest {
                    reason: format!("unknown sort key [{}]", s),
                }
                .into()
            })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Apply this order to an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(SnapqError::InvalidRequest {
                reason: format!("unknown sort order [{}]", other),
            }
            .into()),
        }
    }
}

/// Raw resume position: sort value plus the tie-break identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub value: String,
    pub repository: String,
    pub name: String,
}

impl Cursor {
    /// Cursor pointing at `d` under `key`
    pub fn from_descriptor(d: &SnapshotDescriptor, key: SortKey) -> Self {
        Self {
            value: key.sort_value(d),
            repository: d.repository.clone(),
            name: d.identity.name.clone(),
        }
    }

    pub fn encode(&self) -> String {
        let raw = format!("{},{},{}", self.value, self.repository, self.name);
        base64::engine::general_purpose::URL_SAFE.encode(raw.as_bytes())
    }

    /// Decode a token produced by [`Cursor::encode`]
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the token is not base64, not UTF-8, or does not have
    /// exactly three comma-separated parts.
    pub fn decode(token: &str) -> Result<Self> {
        let invalid = |reason: &str| -> ExError {
            SnapqError::InvalidCursor {
                reason: format!("[{}]: {}", token, reason),
            }
            .into()
        };
        let bytes = base64::engine::general_purpose::URL_SAFE
            .decode(token)
            .map_err(|_| invalid("base64 decode failed"))?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid("not UTF-8"))?;
        let parts: Vec<&str> = raw.split(',').collect();
        match parts.as_slice() {
            [value, repository, name] => Ok(Self {
                value: value.to_string(),
                repository: repository.to_string(),
                name: name.to_string(),
            }),
            _ => Err(invalid("expected value,repository,name")),
        }
    }
}

/// A sort value parsed for a specific key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortValue {
    Numeric(i64),
    Text(String),
}

impl SortValue {
    /// # Errors
    ///
    /// `InvalidInput` if `key` is numeric and `raw` is not an integer.
    pub fn parse(key: SortKey, raw: &str) -> Result<Self> {
        if key.is_numeric() {
            raw.parse::<i64>().map(SortValue::Numeric).map_err(|_| {
                SnapqError::InvalidRequest {
                    reason: format!("sort value [{}] is not an integer for [{}]", raw, key),
                }
                .into()
            })
        } else {
            Ok(SortValue::Text(raw.to_string()))
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SortValue::Numeric(v) => Some(*v),
            SortValue::Text(_) => None,
        }
    }
}

/// A cursor validated against the request's sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct After {
    pub key: SortKey,
    pub value: SortValue,
    pub repository: String,
    pub name: String,
}

impl After {
    /// # Errors
    ///
    /// `InvalidInput` if the cursor value does not parse for `key`.
    pub fn new(cursor: &Cursor, key: SortKey) -> Result<Self> {
        Ok(Self {
            key,
            value: SortValue::parse(key, &cursor.value)?,
            repository: cursor.repository.clone(),
            name: cursor.name.clone(),
        })
    }

    /// Decode and validate a token in one step
    ///
    /// # Errors
    ///
    /// See [`Cursor::decode`] and [`After::new`].
    pub fn from_token(token: &str, key: SortKey) -> Result<Self> {
        Self::new(&Cursor::decode(token)?, key)
    }

    /// Position of `d` relative to this cursor under the ascending comparator
    pub fn compare(&self, d: &SnapshotDescriptor) -> Ordering {
        let by_repository_then_name = || {
            d.repository
                .as_str()
                .cmp(self.repository.as_str())
                .then_with(|| d.identity.name.as_str().cmp(self.name.as_str()))
        };
        match (&self.value, self.key) {
            (_, SortKey::Name) => d
                .identity
                .name
                .as_str()
                .cmp(self.name.as_str())
                .then_with(|| d.repository.as_str().cmp(self.repository.as_str())),
            (_, SortKey::Repository) => by_repository_then_name(),
            (SortValue::Numeric(v), key) => key
                .numeric_value(d)
                .unwrap_or_default()
                .cmp(v)
                .then_with(by_repository_then_name),
            (SortValue::Text(_), _) => by_repository_then_name(),
        }
    }

    /// Strictly after the cursor in the requested order
    pub fn matches(&self, order: SortOrder, d: &SnapshotDescriptor) -> bool {
        order.apply(self.compare(d)) == Ordering::Greater
    }
}
