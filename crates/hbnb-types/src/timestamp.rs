use std::fmt;

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Fixed on-disk timestamp format: `YYYY-MM-DDTHH:MM:SS.ffffff`.
///
/// Microsecond precision, zero-padded, no timezone.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Local wall-clock time truncated to microseconds.
///
/// Truncation happens on construction so that a timestamp always survives a
/// format/parse round trip unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// The current local time.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Wrap a naive datetime, dropping sub-microsecond precision.
    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        Self(datetime.trunc_subsecs(6))
    }

    /// Parse from the fixed on-disk format.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Self::from_naive)
            .map_err(|_| TypeError::InvalidTimestamp(s.to_string()))
    }

    /// A timestamp strictly after `previous`.
    ///
    /// Normally the current time; when the clock has not moved past
    /// `previous` (same microsecond, or the wall clock stepped back) it is
    /// `previous` plus one microsecond.
    pub fn after(previous: &Self) -> Self {
        let now = Self::now();
        if now > *previous {
            now
        } else {
            Self(previous.0 + Duration::microseconds(1))
        }
    }

    /// The underlying naive datetime.
    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
