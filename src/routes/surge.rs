use actix_web::{web, HttpResponse};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::booking::{CabinClass, PassengerType};
use crate::services::flight_service::FlightService;
use crate::services::pricing_service::{cents_to_amount, PricingService};
use crate::services::surge_service::{
    SurgeService, SURGE_RESET_EXTEND_SECS, SURGE_WINDOW_SECS,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptInput {
    pub flight_id: String,
    pub session_id: Option<String>,
}

/// POST /api/bookings/attempt — fire-and-forget pressure signal.
pub async fn record_attempt(
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
    input: web::Json<AttemptInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let session_id = input.session_id.as_deref().unwrap_or("unknown");

    SurgeService::record_attempt(&data, &input.flight_id, &user.user_id, session_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "recorded": true,
        "userId": user.user_id,
        "flightId": input.flight_id,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgeQuoteQuery {
    pub flight_id: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SurgeQuoteResponse {
    success: bool,
    base_price: f64,
    final_price: f64,
    attempt_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_attempt_count: Option<i64>,
    surge_applied: bool,
    surge_percentage: i64,
    reset_time_seconds: Option<i64>,
}

/// GET /api/bookings/surge — read-only quote. The quoted final price is the
/// economy-adult surge price; class and passenger adjustments are applied at
/// booking time. No side effects on bookings or wallets.
pub async fn surge_quote(
    data: web::Data<Arc<Client>>,
    query: web::Query<SurgeQuoteQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    if query.flight_id.trim().is_empty() {
        return Err(ApiError::validation("flightId"));
    }

    let flight = FlightService::lookup_flight(&data, &query.flight_id).await?;

    // the global count is what pricing charges; the session count is shown
    // to the user but never trusted
    let attempt_count =
        SurgeService::count_recent_attempts(&data, &query.flight_id, SURGE_WINDOW_SECS, None)
            .await?;
    let session_attempt_count = match query.session_id.as_deref() {
        Some(session_id) => Some(
            SurgeService::count_recent_attempts(
                &data,
                &query.flight_id,
                SURGE_WINDOW_SECS,
                Some(session_id),
            )
            .await?,
        ),
        None => None,
    };

    let final_price_cents = PricingService::final_price_cents(
        flight.base_price_cents,
        CabinClass::Economy,
        PassengerType::Adult,
        attempt_count,
    );

    let reset_time_seconds = SurgeService::time_until_reset(
        &data,
        &query.flight_id,
        SURGE_WINDOW_SECS,
        SURGE_RESET_EXTEND_SECS,
    )
    .await?;

    Ok(HttpResponse::Ok().json(SurgeQuoteResponse {
        success: true,
        base_price: cents_to_amount(flight.base_price_cents),
        final_price: cents_to_amount(final_price_cents),
        attempt_count,
        session_attempt_count,
        surge_applied: PricingService::surge_applied(attempt_count),
        surge_percentage: PricingService::surge_percentage(attempt_count),
        reset_time_seconds,
    }))
}
