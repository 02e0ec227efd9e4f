use bson::{oid::ObjectId, DateTime};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Upcoming => "upcoming",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(BookingStatus::Upcoming),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    FirstClass,
}

impl CabinClass {
    /// Unknown class names are an error, not a default.
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "economy" => Ok(CabinClass::Economy),
            "premium-economy" => Ok(CabinClass::PremiumEconomy),
            "business" => Ok(CabinClass::Business),
            "first-class" => Ok(CabinClass::FirstClass),
            other => Err(ApiError::UnknownClass(other.to_string())),
        }
    }

    pub fn multiplier(&self) -> Decimal {
        match self {
            CabinClass::Economy => dec!(1.0),
            CabinClass::PremiumEconomy => dec!(1.3),
            CabinClass::Business => dec!(2.0),
            CabinClass::FirstClass => dec!(3.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassengerType {
    Adult,
    Child,
}

impl PassengerType {
    /// Anything other than "child" gets no discount.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("child") => PassengerType::Child,
            _ => PassengerType::Adult,
        }
    }

    pub fn discount(&self) -> Decimal {
        match self {
            PassengerType::Child => dec!(0.75),
            PassengerType::Adult => dec!(1.0),
        }
    }
}

/// Persisted booking record. `final_price_cents` is immutable once set;
/// status moves only upcoming -> cancelled or upcoming -> completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub pnr: String,
    pub flight_id: String,
    pub user_id: String,
    pub passenger_name: String,
    pub passenger_age: i32,
    pub passenger_gender: String,
    pub passenger_type: PassengerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    pub phone_number: String,
    pub class_type: CabinClass,
    pub final_price_cents: i64,
    pub flight_date: NaiveDate,
    pub booking_date: DateTime,
    pub booking_status: BookingStatus,
}

/// Client-facing shape of a booking: identical to the stored record except
/// the price surfaces as a two-decimal amount instead of raw cents, matching
/// every other monetary field in the API.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub pnr: String,
    pub flight_id: String,
    pub user_id: String,
    pub passenger_name: String,
    pub passenger_age: i32,
    pub passenger_gender: String,
    pub passenger_type: PassengerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    pub phone_number: String,
    pub class_type: CabinClass,
    pub final_price: f64,
    pub flight_date: NaiveDate,
    pub booking_date: DateTime,
    pub booking_status: BookingStatus,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        BookingResponse {
            id: booking.id,
            pnr: booking.pnr.clone(),
            flight_id: booking.flight_id.clone(),
            user_id: booking.user_id.clone(),
            passenger_name: booking.passenger_name.clone(),
            passenger_age: booking.passenger_age,
            passenger_gender: booking.passenger_gender.clone(),
            passenger_type: booking.passenger_type,
            document_number: booking.document_number.clone(),
            phone_number: booking.phone_number.clone(),
            class_type: booking.class_type,
            final_price: booking.final_price_cents as f64 / 100.0,
            flight_date: booking.flight_date,
            booking_date: booking.booking_date,
            booking_status: booking.booking_status,
        }
    }
}

/// Validated request body for booking creation. Unknown class names and
/// malformed passenger details are rejected before any side effect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub flight_id: String,
    pub passenger_name: String,
    pub passenger_age: i32,
    pub passenger_gender: String,
    pub passenger_type: Option<String>,
    pub document_number: Option<String>,
    pub phone_number: String,
    pub class_type: Option<String>,
    pub flight_date: NaiveDate,
    pub session_id: String,
    /// Price quoted to the client during the surge-quote step. When present
    /// it is the amount actually charged; the authoritative server price is
    /// still computed and returned for reconciliation.
    pub final_price: Option<f64>,
}
