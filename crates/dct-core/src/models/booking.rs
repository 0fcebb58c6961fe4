//! Booking model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque unique identifier of a booking, generated client-side.
///
/// New ids are UUID v7 strings, but any non-empty string read back from a
/// store is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingId(String);

impl BookingId {
    /// Create a new unique booking ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BookingId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::ValidationFailed(
                "booking id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<BookingId> for String {
    fn from(value: BookingId) -> Self {
        value.0
    }
}

impl FromStr for BookingId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s.to_string())
    }
}

/// A reservation of the DCT for a time span on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub date: NaiveDate,
    #[serde(with = "wall_time")]
    pub from_time: NaiveTime,
    #[serde(with = "wall_time")]
    pub to_time: NaiveTime,
    pub user: String,
    pub team: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remarks: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Check the `from_time < to_time` invariant.
    pub fn validate(&self) -> Result<()> {
        validate_time_span(self.from_time, self.to_time)
    }

    /// Same check as [`NewBooking::ensure_not_in_past`], for edits.
    pub fn ensure_not_in_past(&self, now: NaiveDateTime) -> Result<()> {
        ensure_starts_after(self.date, self.from_time, now)
    }

    /// Render the span as `HH:MM - HH:MM`.
    pub fn time_span_label(&self) -> String {
        format!(
            "{} - {}",
            self.from_time.format("%H:%M"),
            self.to_time.format("%H:%M")
        )
    }
}

/// Caller-supplied booking fields; the id and creation timestamp are stamped
/// when the draft is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub date: NaiveDate,
    #[serde(with = "wall_time")]
    pub from_time: NaiveTime,
    #[serde(with = "wall_time")]
    pub to_time: NaiveTime,
    pub user: String,
    pub team: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub remarks: String,
}

impl NewBooking {
    pub fn validate(&self) -> Result<()> {
        validate_time_span(self.from_time, self.to_time)
    }

    /// Reject a draft whose start lies before `now` (local wall-clock).
    ///
    /// Interactive front ends apply this on top of [`NewBooking::validate`].
    pub fn ensure_not_in_past(&self, now: NaiveDateTime) -> Result<()> {
        ensure_starts_after(self.date, self.from_time, now)
    }

    /// Stamp a fresh id and creation time.
    #[must_use]
    pub fn into_booking(self) -> Booking {
        Booking {
            id: BookingId::new(),
            date: self.date,
            from_time: truncate_to_seconds(self.from_time),
            to_time: truncate_to_seconds(self.to_time),
            user: self.user,
            team: self.team,
            remarks: self.remarks,
            created_at: Utc::now(),
        }
    }
}

/// Partial edit of an existing booking. `id` and `created_at` are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub date: Option<NaiveDate>,
    pub from_time: Option<NaiveTime>,
    pub to_time: Option<NaiveTime>,
    pub user: Option<String>,
    pub team: Option<String>,
    pub remarks: Option<String>,
}

impl BookingPatch {
    pub const fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.from_time.is_none()
            && self.to_time.is_none()
            && self.user.is_none()
            && self.team.is_none()
            && self.remarks.is_none()
    }

    #[must_use]
    pub fn apply_to(self, booking: &Booking) -> Booking {
        Booking {
            id: booking.id.clone(),
            date: self.date.unwrap_or(booking.date),
            from_time: self
                .from_time
                .map_or(booking.from_time, truncate_to_seconds),
            to_time: self.to_time.map_or(booking.to_time, truncate_to_seconds),
            user: self.user.unwrap_or_else(|| booking.user.clone()),
            team: self.team.unwrap_or_else(|| booking.team.clone()),
            remarks: self.remarks.unwrap_or_else(|| booking.remarks.clone()),
            created_at: booking.created_at,
        }
    }
}

/// Enforce that `from` strictly precedes `to`.
pub fn validate_time_span(from: NaiveTime, to: NaiveTime) -> Result<()> {
    if from < to {
        Ok(())
    } else {
        Err(Error::ValidationFailed(format!(
            "'to' time {} must be later than 'from' time {}",
            to.format("%H:%M:%S"),
            from.format("%H:%M:%S")
        )))
    }
}

fn ensure_starts_after(date: NaiveDate, from_time: NaiveTime, now: NaiveDateTime) -> Result<()> {
    if date.and_time(from_time) < now {
        return Err(Error::ValidationFailed(
            "booking cannot be set in the past".to_string(),
        ));
    }
    Ok(())
}

/// Nullable text columns come back as `null` when empty.
fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn truncate_to_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Wall-clock times are stored as `HH:MM:SS`; `HH:MM` and fractional seconds
/// are accepted on input.
pub(crate) mod wall_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid wall-clock time '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
            .map(|time| time.with_nanosecond(0).unwrap_or(time))
    }
}

pub use wall_time::parse as parse_wall_time;
