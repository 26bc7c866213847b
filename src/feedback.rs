//! Feedback and alert records as served by the café backend.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::error::FeedbackError;

/// A date as it arrives over the wire.
///
/// The backend sends ISO strings for feedback and epoch milliseconds for
/// alerts; anything else is kept but never matches a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Text(String),
    EpochMillis(i64),
    Other(serde_json::Value),
}

impl RawDate {
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        match self {
            RawDate::Text(s) => parse_timestamp(s),
            RawDate::EpochMillis(ms) => {
                DateTime::<Utc>::from_timestamp_millis(*ms).map(|dt| dt.naive_utc())
            }
            RawDate::Other(_) => None,
        }
    }
}

/// Parses the timestamp shapes the backend and exported files use.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Reads a JSON `null` as the field's default, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Table identifier; the backend stores it as text but older clients post numbers.
///
/// Equality, hashing and ordering all go through the numeric value when there
/// is one, so `"3"` and `3` are the same table. An unassigned table (`null` on
/// the wire) is the empty text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableNumber {
    Number(i64),
    Text(String),
}

impl Default for TableNumber {
    fn default() -> Self {
        TableNumber::Text(String::new())
    }
}

impl TableNumber {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            TableNumber::Number(n) => Some(*n),
            TableNumber::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical form used for grouping: `"3"` and `3` are the same table.
    pub fn canonical(&self) -> TableNumber {
        match self.as_number() {
            Some(n) => TableNumber::Number(n),
            None => self.clone(),
        }
    }
}

impl fmt::Display for TableNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableNumber::Number(n) => write!(f, "{}", n),
            TableNumber::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for TableNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TableNumber {}

impl Hash for TableNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.as_number() {
            Some(n) => {
                0u8.hash(state);
                n.hash(state);
            }
            None => {
                1u8.hash(state);
                self.to_string().hash(state);
            }
        }
    }
}

impl PartialOrd for TableNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TableNumber {
    /// Numeric tables first in numeric order, then the rest lexically.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.to_string().cmp(&other.to_string()),
        }
    }
}

/// One customer review. Read-only for everything in this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub rating: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub table_number: TableNumber,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl FeedbackRecord {
    /// `None` when the date is missing or unreadable.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date.as_ref().and_then(RawDate::to_naive)
    }

    pub fn comment_text(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

/// Decodes a `GET /feedback` payload.
///
/// A wrongly typed field (a numeric comment, a string rating) rejects the
/// whole batch here instead of surfacing later during analysis.
pub fn parse_records(json: &str) -> Result<Vec<FeedbackRecord>, FeedbackError> {
    serde_json::from_str(json).map_err(|e| FeedbackError::InvalidInput(e.to_string()))
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<FeedbackRecord>, FeedbackError> {
    let json = std::fs::read_to_string(path)?;
    parse_records(&json)
}

/// Dashboard notification as served by `GET /alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub read: bool,
}

/// Unread alerts first; relative order otherwise unchanged.
pub fn sort_unread_first(alerts: &mut [Alert]) {
    alerts.sort_by_key(|alert| alert.read);
}

pub fn unread_count(alerts: &[Alert]) -> usize {
    alerts.iter().filter(|alert| !alert.read).count()
}
