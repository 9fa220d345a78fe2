//! Serde helper for dates.
//!
//! Use with `#[serde(deserialize_with = "tessera_procure::date::deserialize")]`
//! on a [`Timestamp`] field. Strings are parsed with the date format of the
//! active [`DecodeConfig`](crate::DecodeConfig), or as RFC 3339 when none is
//! set. Integers are taken as milliseconds since the epoch.

use crate::decode::active_date_format;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use tessera_core::Timestamp;

/// Parses `text` with `format`. Date-only formats yield midnight UTC.
pub fn parse(text: &str, format: Option<&str>) -> Result<Timestamp, String> {
    let millis = match format {
        Some(format) => match NaiveDateTime::parse_from_str(text, format) {
            Ok(datetime) => datetime.and_utc().timestamp_millis(),
            Err(_) => NaiveDate::parse_from_str(text, format)
                .map_err(|err| format!("{:?} does not match {:?}: {}", text, format, err))?
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| format!("{:?} has no midnight", text))?
                .and_utc()
                .timestamp_millis(),
        },
        None => DateTime::parse_from_rfc3339(text)
            .map_err(|err| format!("{:?} is not an RFC 3339 date-time: {}", text, err))?
            .timestamp_millis(),
    };
    Ok(Timestamp::from_millis(millis))
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a formatted date or milliseconds since the epoch")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Timestamp, E> {
        parse(text, active_date_format().as_deref()).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, millis: i64) -> Result<Timestamp, E> {
        Ok(Timestamp::from_millis(millis))
    }

    fn visit_u64<E: de::Error>(self, millis: u64) -> Result<Timestamp, E> {
        i64::try_from(millis)
            .map(Timestamp::from_millis)
            .map_err(|_| E::custom("timestamp out of range"))
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TimestampVisitor)
}
