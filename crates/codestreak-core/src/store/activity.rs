//! Per-user activity records and the in-memory store.
//!
//! The store is a single insertion-ordered map from user identifier to
//! [`ActivityRecord`]. Insertion order is load-bearing: leaderboard ties
//! break by first-seen order, matching the order of keys in the persisted
//! document. Records are created lazily on first reference and never
//! deleted.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tracked state for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Total problems solved. Only admin adjustments may move this down,
    /// and never below zero.
    #[serde(default)]
    pub problems_solved: u64,

    /// Most recent activity timestamp. `None` means the user has never
    /// been active; serialized as the literal string "Never" for
    /// compatibility with the existing data file.
    #[serde(default, with = "last_active_format")]
    pub last_active: Option<DateTime<Utc>>,

    /// Events per UTC calendar day.
    #[serde(default)]
    pub activity: BTreeMap<NaiveDate, u32>,

    /// Target problems-solved count. 0 means unset.
    #[serde(default)]
    pub goal: u64,
}

impl ActivityRecord {
    /// Count of events on the given day (0 if the day has no entry).
    pub fn events_on(&self, date: NaiveDate) -> u32 {
        self.activity.get(&date).copied().unwrap_or(0)
    }
}

/// The full user-id -> record mapping.
///
/// Owned by a single writer per process; mutated in-memory and flushed
/// through a [`StorePersistence`](super::StorePersistence) after every
/// mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityStore {
    records: IndexMap<String, ActivityRecord>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.records.contains_key(user_id)
    }

    pub fn get(&self, user_id: &str) -> Option<&ActivityRecord> {
        self.records.get(user_id)
    }

    /// Returns the existing record, or inserts a zeroed one.
    ///
    /// Insertion is visible to every subsequent call in the process; a
    /// user's position in iteration order is fixed at first reference.
    pub fn get_or_create(&mut self, user_id: &str) -> &mut ActivityRecord {
        self.records
            .entry(user_id.to_string())
            .or_insert_with(ActivityRecord::default)
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivityRecord)> {
        self.records.iter().map(|(id, rec)| (id.as_str(), rec))
    }
}

/// Serialize `Option<DateTime<Utc>>` as ISO-8601 or the "Never" sentinel.
///
/// The original data file stores naive local-less timestamps for some
/// users, so parsing falls back to a naive format interpreted as UTC.
mod last_active_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NEVER: &str = "Never";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => ser.serialize_str(&ts.to_rfc3339()),
            None => ser.serialize_str(NEVER),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(de)?;
        if raw == NEVER {
            return Ok(None);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(serde::de::Error::custom)
    }
}
