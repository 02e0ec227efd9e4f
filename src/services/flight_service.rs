use bson::doc;
use mongodb::{Client, Collection};

use crate::db::mongo::DB_NAME;
use crate::errors::ApiError;
use crate::models::flight::Flight;

/// Read-only view onto the flight catalog. Search, sorting and seeding are
/// owned by the catalog system; this service only resolves flight ids.
pub struct FlightService;

impl FlightService {
    fn flights(client: &Client) -> Collection<Flight> {
        client.database(DB_NAME).collection("Flights")
    }

    pub async fn lookup_flight(client: &Client, flight_id: &str) -> Result<Flight, ApiError> {
        Self::flights(client)
            .find_one(doc! { "flight_id": flight_id })
            .await?
            .ok_or(ApiError::FlightNotFound)
    }

    pub async fn lookup_many(
        client: &Client,
        flight_ids: &[String],
    ) -> Result<Vec<Flight>, ApiError> {
        use futures::TryStreamExt;

        if flight_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = Self::flights(client)
            .find(doc! { "flight_id": { "$in": flight_ids } })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
