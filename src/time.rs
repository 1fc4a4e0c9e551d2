use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Date format used by the API, e.g. `2024-03-01T12:30:00.000Z`
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Timestamp field of an entity, (de)serialized in the API date format.
/// RFC 3339 strings with an explicit offset are accepted on input too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub DateTime<Utc>);

impl Time {
    pub fn new(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }

    /// Create a Time from a unix timestamp in milliseconds
    pub fn from_unix_milli(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Time)
    }

    /// Parse a timestamp in the API date format
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        match NaiveDateTime::parse_from_str(s, DATE_FORMAT) {
            Ok(naive) => Ok(Time(Utc.from_utc_datetime(&naive))),
            Err(e) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Time(dt.with_timezone(&Utc)))
                .map_err(|_| e),
        }
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn unix_milli(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Deref for Time {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }
}

impl From<Time> for DateTime<Utc> {
    fn from(t: Time) -> Self {
        t.0
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Time::parse(&s).map_err(de::Error::custom)
    }
}
