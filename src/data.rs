//! Serialization helpers for response payloads.
//!
//! JSON has no date type. Any date/time a handler returns is written as an
//! integer count of seconds since the Unix epoch, normalized to UTC.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};

/// A point in time that serializes as epoch seconds.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use restview::data::Timestamp;
///
/// let at = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
/// assert_eq!(serde_json::to_string(&at).unwrap(), "1704067200");
/// ```
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.0.timestamp()
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(at: DateTime<Tz>) -> Self {
        Self(at.with_timezone(&Utc))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.epoch_seconds())
    }
}

/// `#[serde(serialize_with = "epoch_seconds")]` for plain `DateTime` fields.
pub fn epoch_seconds<Tz, S>(at: &DateTime<Tz>, serializer: S) -> Result<S::Ok, S::Error>
where
    Tz: TimeZone,
    S: Serializer,
{
    serializer.serialize_i64(at.timestamp())
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Event {
        name: &'static str,
        at: Timestamp,
        #[serde(serialize_with = "epoch_seconds")]
        local: DateTime<FixedOffset>,
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = tz.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
        let event = Event { name: "deploy", at: local.into(), local };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({ "name": "deploy", "at": 1_704_067_200, "local": 1_704_067_200 }));
    }
}
