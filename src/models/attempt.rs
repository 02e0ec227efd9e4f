use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// One row per quote/price-check request. Append-only: rows are never
/// mutated or deleted, only counted over a trailing window.
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingAttempt {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub flight_id: String,
    pub user_id: String,
    pub session_id: String,
    pub attempt_time: DateTime,
}
