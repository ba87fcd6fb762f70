//! Date handling shared by every collection.
//!
//! Clients send either full RFC 3339 timestamps or bare `YYYY-MM-DD`
//! dates; everything is stored and returned as RFC 3339 in UTC.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    Time,
};

use crate::error::ApiError;

/// Parse an RFC 3339 timestamp or a calendar date (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(raw, &fmt)
        .ok()
        .map(|d| d.with_time(Time::MIDNIGHT).assume_utc())
}

fn is_bare_date(raw: &str) -> bool {
    raw.trim().len() == 10
}

/// Inclusive `[start, end]` window taken from `startDate` / `endDate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    /// A bare end date covers that whole day.
    pub fn bounds(&self) -> Result<(OffsetDateTime, OffsetDateTime), ApiError> {
        let start_raw = self
            .start_date
            .as_deref()
            .ok_or_else(|| ApiError::Validation("startDate is required".into()))?;
        let end_raw = self
            .end_date
            .as_deref()
            .ok_or_else(|| ApiError::Validation("endDate is required".into()))?;
        let start = parse_instant(start_raw)
            .ok_or_else(|| ApiError::Validation(format!("invalid startDate: {start_raw}")))?;
        let mut end = parse_instant(end_raw)
            .ok_or_else(|| ApiError::Validation(format!("invalid endDate: {end_raw}")))?;
        if is_bare_date(end_raw) {
            end += time::Duration::days(1) - time::Duration::nanoseconds(1);
        }
        if end < start {
            return Err(ApiError::Validation(
                "endDate must not be before startDate".into(),
            ));
        }
        Ok((start, end))
    }
}

/// `#[serde(with = "crate::dates::flexible")]`
pub mod flexible {
    use super::*;

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(value, s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_instant(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    /// `#[serde(default, with = "crate::dates::flexible::option")]`
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<OffsetDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            time::serde::rfc3339::option::serialize(value, s)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<OffsetDateTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) => parse_instant(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
            }
        }
    }
}
