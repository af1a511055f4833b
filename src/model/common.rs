use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Store-assigned row identifier. Immutable once a record is created.
pub type Id = i64;

pub type Timestamp = DateTime<Utc>;

/// The record types the store knows about. Used to label errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Article,
    User,
    Pokemon,
    Trainer,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Article => "Article",
            EntityKind::User => "User",
            EntityKind::Pokemon => "Pokemon",
            EntityKind::Trainer => "Trainer",
        };
        f.write_str(name)
    }
}

/// Current time at the resolution PostgreSQL keeps for `timestamptz`.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// A refreshed timestamp that is guaranteed to sort after `previous`,
/// even when the clock has not advanced past it.
pub fn next_timestamp(previous: Timestamp) -> Timestamp {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Treats a missing value and an empty string alike.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Keeps an explicit `null` apart from an absent field. Pair with
/// `#[serde(default)]` so absence stays `None` and `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
