// src/project/dates.rs

//! Serde helpers for date fields in the project file.
//!
//! Both spellings load the same way:
//!
//! ```toml
//! start = "2024-01-01"
//! start = 2024-01-01
//! created_at = "2024-01-01T09:00:00Z"
//! created_at = 2024-01-01T09:00:00Z
//! ```
//!
//! Files are always written back with quoted strings.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use toml::value::Datetime;

struct DateVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for DateVisitor<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a TOML date or a quoted RFC 3339 date")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.trim()
            .parse()
            .map_err(|e| E::custom(format!("invalid date '{v}': {e}")))
    }

    // Native TOML dates reach serde as a single-entry map.
    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<T, A::Error> {
        let native = Datetime::deserialize(de::value::MapAccessDeserializer::new(map))?;
        self.visit_str(&native.to_string())
    }
}

/// `YYYY-MM-DD`, quoted or as a TOML local date.
pub fn naive_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DateVisitor(PhantomData))
}

/// RFC 3339 timestamp with an offset, quoted or as a TOML offset date-time.
pub fn utc_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DateVisitor(PhantomData))
}
