// Data model for the booking intake workflow

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Raw booking payload as submitted by the reservation form.
///
/// Everything is optional here: the validator is responsible for reporting
/// every missing or malformed field at once, so deserialization must never
/// reject a payload on its own. Numeric fields arrive either as JSON numbers
/// or as numeric strings (the form posts strings).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBooking {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub arrival_date: Option<String>,
    pub nights: Option<Value>,
    pub room_type: Option<String>,
    pub guests: Option<Value>,
    pub special_requests: Option<String>,
    pub newsletter: Option<bool>,
}

// Room categories offered by the hotel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Family,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Standard => "standard",
            RoomType::Deluxe => "deluxe",
            RoomType::Suite => "suite",
            RoomType::Family => "family",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(RoomType::Standard),
            "deluxe" => Ok(RoomType::Deluxe),
            "suite" => Ok(RoomType::Suite),
            "family" => Ok(RoomType::Family),
            _ => Err(()),
        }
    }
}

/// Sanitized booking payload produced by the validator.
///
/// Strings are trimmed, angle brackets stripped and whitespace runs collapsed;
/// the email is lower-cased. All range constraints (nights 1-30, guests 1-4)
/// already hold.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub arrival_date: NaiveDate,
    pub nights: u32,
    pub room_type: RoomType,
    pub guests: u32,
    pub special_requests: Option<String>,
    pub newsletter: bool,
}

/// Transient per-request record: the sanitized booking stamped with submission
/// metadata. Nothing retains it after the response is sent; persistence is a
/// stated TODO of the original backend.
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub booking: Booking,
    pub booking_time: DateTime<Utc>,
    pub source_ip: String,
    pub user_agent: Option<String>,
}

/// Outcome of a successful confirmation dispatch.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    /// `HE` + 6-digit millisecond suffix + 3 random uppercase alphanumerics.
    pub booking_id: String,
    /// Identifier assigned by the mail transport.
    pub message_id: String,
    /// Arrival date plus the booked number of nights, calendar-correct.
    pub checkout_date: NaiveDate,
}
