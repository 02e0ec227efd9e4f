use actix_web::{web, HttpResponse};
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::errors::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::booking::{BookingInput, BookingResponse};
use crate::models::flight::FlightResponse;
use crate::services::booking_service::BookingService;
use crate::services::pricing_service::cents_to_amount;

/// POST /api/bookings — the surge-priced booking transaction.
pub async fn create_booking(
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
    input: web::Json<BookingInput>,
) -> Result<HttpResponse, ApiError> {
    let receipt = BookingService::create_booking(&data, &user.user_id, input.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "booking": BookingResponse::from(&receipt.booking),
        "flight": FlightResponse::from(&receipt.flight),
        "pricing": receipt.pricing,
        "newBalance": cents_to_amount(receipt.new_balance_cents),
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<String>,
}

/// GET /api/bookings?status= — the user's bookings, newest first.
pub async fn list_bookings(
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
    query: web::Query<ListBookingsQuery>,
) -> Result<HttpResponse, ApiError> {
    let bookings =
        BookingService::list_bookings(&data, &user.user_id, query.status.as_deref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "bookings": bookings,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingInput {
    pub booking_id: String,
}

/// POST /api/bookings/cancel — flip to cancelled and refund 90%.
pub async fn cancel_booking(
    data: web::Data<Arc<Client>>,
    user: AuthenticatedUser,
    input: web::Json<CancelBookingInput>,
) -> Result<HttpResponse, ApiError> {
    let receipt = BookingService::cancel_booking(&data, &user.user_id, &input.booking_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Booking cancelled successfully",
        "newStatus": receipt.new_status,
        "refundAmount": cents_to_amount(receipt.refund_cents),
        "newBalance": cents_to_amount(receipt.new_balance_cents),
    })))
}
