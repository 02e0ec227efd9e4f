use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Catalog record, read-only to this service. Base prices are stored in
/// cents so pricing arithmetic never touches binary floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub flight_id: String,
    pub airline: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: i32,
    pub base_price_cents: i64,
}

/// Client-facing flight snapshot: base price as a two-decimal amount.
#[derive(Debug, Serialize)]
pub struct FlightResponse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub flight_id: String,
    pub airline: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: i32,
    pub base_price: f64,
}

impl From<&Flight> for FlightResponse {
    fn from(flight: &Flight) -> Self {
        FlightResponse {
            id: flight.id,
            flight_id: flight.flight_id.clone(),
            airline: flight.airline.clone(),
            departure_city: flight.departure_city.clone(),
            arrival_city: flight.arrival_city.clone(),
            departure_time: flight.departure_time.clone(),
            arrival_time: flight.arrival_time.clone(),
            duration_minutes: flight.duration_minutes,
            base_price: flight.base_price_cents as f64 / 100.0,
        }
    }
}

/// Schedule metadata joined onto booking listings for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSchedule {
    pub airline: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: i32,
}

impl From<&Flight> for FlightSchedule {
    fn from(flight: &Flight) -> Self {
        FlightSchedule {
            airline: flight.airline.clone(),
            departure_city: flight.departure_city.clone(),
            arrival_city: flight.arrival_city.clone(),
            departure_time: flight.departure_time.clone(),
            arrival_time: flight.arrival_time.clone(),
            duration_minutes: flight.duration_minutes,
        }
    }
}
