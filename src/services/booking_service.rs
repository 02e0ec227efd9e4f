use std::collections::HashMap;
use std::sync::OnceLock;

use bson::{doc, oid::ObjectId, DateTime};
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{Client, Collection};
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::db::mongo::{is_duplicate_key_error, DB_NAME};
use crate::errors::ApiError;
use crate::models::booking::{
    Booking, BookingInput, BookingResponse, BookingStatus, CabinClass, PassengerType,
};
use crate::models::flight::{Flight, FlightSchedule};
use crate::services::flight_service::FlightService;
use crate::services::pricing_service::{self, PricingService};
use crate::services::surge_service::{SurgeService, SURGE_WINDOW_SECS};
use crate::services::wallet_service::WalletService;

const PNR_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PNR_LENGTH: usize = 6;
// collisions are negligible at 36^6 codes, but the unique index can still
// refuse an insert and the booking must survive that
const PNR_MAX_ATTEMPTS: usize = 5;

/// Flat 10% cancellation fee regardless of how far in advance.
const REFUND_RATE: Decimal = dec!(0.90);

/// Price audit trail returned with every booking: what the surge model said
/// the price was, what was actually charged, and why.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub base_price: f64,
    pub final_price: f64,
    pub charged_price: f64,
    pub attempt_count: i64,
    pub surge_applied: bool,
    pub surge_percentage: i64,
}

impl PricingBreakdown {
    fn new(base_cents: i64, authoritative_cents: i64, charged_cents: i64, attempts: i64) -> Self {
        PricingBreakdown {
            base_price: pricing_service::cents_to_amount(base_cents),
            final_price: pricing_service::cents_to_amount(authoritative_cents),
            charged_price: pricing_service::cents_to_amount(charged_cents),
            attempt_count: attempts,
            surge_applied: PricingService::surge_applied(attempts),
            surge_percentage: PricingService::surge_percentage(attempts),
        }
    }
}

#[derive(Debug)]
pub struct BookingReceipt {
    pub booking: Booking,
    pub flight: Flight,
    pub pricing: PricingBreakdown,
    pub new_balance_cents: i64,
}

/// Booking joined with its flight's schedule metadata for display.
#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: BookingResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightSchedule>,
}

#[derive(Debug)]
pub struct CancellationReceipt {
    pub new_status: BookingStatus,
    pub refund_cents: i64,
    pub new_balance_cents: i64,
}

pub struct BookingService;

impl BookingService {
    fn bookings(client: &Client) -> Collection<Booking> {
        client.database(DB_NAME).collection("Bookings")
    }

    /// The full booking transaction: record pressure, price authoritatively,
    /// debit atomically, persist with a unique PNR.
    pub async fn create_booking(
        client: &Client,
        user_id: &str,
        input: BookingInput,
    ) -> Result<BookingReceipt, ApiError> {
        let today = Utc::now().date_naive();
        validate_input(&input, today)?;
        let class_type = CabinClass::parse(input.class_type.as_deref().unwrap_or("economy"))?;
        let passenger_type = PassengerType::parse(input.passenger_type.as_deref());

        // Best-effort pressure signal; a lost attempt only means the surge
        // model sees one fewer data point.
        if let Err(err) =
            SurgeService::record_attempt(client, &input.flight_id, user_id, &input.session_id)
                .await
        {
            log::warn!(
                "Failed to record attempt for flight {}: {}",
                input.flight_id,
                err
            );
        }

        let flight = FlightService::lookup_flight(client, &input.flight_id).await?;

        // The price charged follows the global attempt count, never the
        // session-scoped one a client could reset at will.
        let attempt_count =
            SurgeService::count_recent_attempts(client, &input.flight_id, SURGE_WINDOW_SECS, None)
                .await?;
        let authoritative_cents = PricingService::final_price_cents(
            flight.base_price_cents,
            class_type,
            passenger_type,
            attempt_count,
        );

        // A quoted price from the quote step is honored as the charged
        // amount; the authoritative figure still travels back with the
        // receipt and divergence is flagged in the logs.
        let charged_cents = match input.final_price {
            Some(quoted) => {
                let quoted_cents = pricing_service::amount_to_cents(quoted, "finalPrice")?;
                if quoted_cents != authoritative_cents {
                    log::warn!(
                        "Client-quoted price {} diverges from authoritative {} (flight {}, user {})",
                        quoted_cents,
                        authoritative_cents,
                        input.flight_id,
                        user_id
                    );
                }
                quoted_cents
            }
            None => authoritative_cents,
        };

        let new_balance = WalletService::debit(client, user_id, charged_cents).await?;

        let booking = match Self::insert_with_unique_pnr(
            client,
            user_id,
            &input,
            class_type,
            passenger_type,
            charged_cents,
        )
        .await
        {
            Ok(booking) => booking,
            Err(err) => {
                // the debit already landed; give it back before failing
                if let Err(credit_err) =
                    WalletService::credit(client, user_id, charged_cents).await
                {
                    log::error!(
                        "Failed to reverse debit of {} for user {} after booking insert failure: {}",
                        charged_cents,
                        user_id,
                        credit_err
                    );
                }
                return Err(err);
            }
        };

        log::info!(
            "Booking {} created for user {} on flight {} at {} cents",
            booking.pnr,
            user_id,
            booking.flight_id,
            charged_cents
        );

        Ok(BookingReceipt {
            pricing: PricingBreakdown::new(
                flight.base_price_cents,
                authoritative_cents,
                charged_cents,
                attempt_count,
            ),
            booking,
            flight,
            new_balance_cents: new_balance,
        })
    }

    async fn insert_with_unique_pnr(
        client: &Client,
        user_id: &str,
        input: &BookingInput,
        class_type: CabinClass,
        passenger_type: PassengerType,
        charged_cents: i64,
    ) -> Result<Booking, ApiError> {
        let bookings = Self::bookings(client);

        for _ in 0..PNR_MAX_ATTEMPTS {
            let mut booking = Booking {
                id: None,
                pnr: generate_pnr(),
                flight_id: input.flight_id.clone(),
                user_id: user_id.to_string(),
                passenger_name: input.passenger_name.trim().to_string(),
                passenger_age: input.passenger_age,
                passenger_gender: input.passenger_gender.clone(),
                passenger_type,
                document_number: input.document_number.clone(),
                phone_number: input.phone_number.clone(),
                class_type,
                final_price_cents: charged_cents,
                flight_date: input.flight_date,
                booking_date: DateTime::now(),
                booking_status: BookingStatus::Upcoming,
            };

            match bookings.insert_one(&booking).await {
                Ok(result) => {
                    booking.id = result.inserted_id.as_object_id();
                    return Ok(booking);
                }
                Err(err) if is_duplicate_key_error(&err) => {
                    log::warn!("PNR {} collided, regenerating", booking.pnr);
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApiError::PnrRetryExhausted)
    }

    /// All bookings for the user, newest first, optionally filtered by
    /// status ("all" disables the filter). Read-only.
    pub async fn list_bookings(
        client: &Client,
        user_id: &str,
        status_filter: Option<&str>,
    ) -> Result<Vec<BookingView>, ApiError> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(status) = status_filter.filter(|s| *s != "all") {
            let status =
                BookingStatus::parse(status).ok_or_else(|| ApiError::validation("status"))?;
            filter.insert("booking_status", status.as_str());
        }

        let cursor = Self::bookings(client)
            .find(filter)
            .sort(doc! { "booking_date": -1 })
            .await?;
        let bookings: Vec<Booking> = cursor.try_collect().await?;

        let mut flight_ids: Vec<String> =
            bookings.iter().map(|b| b.flight_id.clone()).collect();
        flight_ids.sort();
        flight_ids.dedup();

        let schedules: HashMap<String, FlightSchedule> =
            FlightService::lookup_many(client, &flight_ids)
                .await?
                .iter()
                .map(|f| (f.flight_id.clone(), FlightSchedule::from(f)))
                .collect();

        Ok(bookings
            .iter()
            .map(|booking| {
                let flight = schedules.get(&booking.flight_id).cloned();
                BookingView {
                    booking: BookingResponse::from(booking),
                    flight,
                }
            })
            .collect())
    }

    /// Cancel an upcoming booking before its flight date and refund 90% of
    /// the charged price. The status flip is a conditional update pinned to
    /// `upcoming`, so a concurrent double-cancel loses; a failed refund
    /// rolls the flip back so cancelled-without-refund never persists.
    pub async fn cancel_booking(
        client: &Client,
        user_id: &str,
        booking_id: &str,
    ) -> Result<CancellationReceipt, ApiError> {
        let object_id =
            ObjectId::parse_str(booking_id).map_err(|_| ApiError::validation("bookingId"))?;
        let bookings = Self::bookings(client);

        let booking = bookings
            .find_one(doc! { "_id": object_id, "user_id": user_id })
            .await?
            .ok_or(ApiError::BookingNotFound)?;

        match booking.booking_status {
            BookingStatus::Cancelled => return Err(ApiError::AlreadyCancelled),
            BookingStatus::Completed => return Err(ApiError::AlreadyCompleted),
            BookingStatus::Upcoming => {}
        }

        // date-only comparison: same-day cancellation is still allowed
        let today = Utc::now().date_naive();
        if booking.flight_date < today {
            return Err(ApiError::PastFlight);
        }

        let refund = refund_cents(booking.final_price_cents);

        let flipped = bookings
            .update_one(
                doc! {
                    "_id": object_id,
                    "user_id": user_id,
                    "booking_status": BookingStatus::Upcoming.as_str(),
                },
                doc! { "$set": { "booking_status": BookingStatus::Cancelled.as_str() } },
            )
            .await?;
        if flipped.modified_count == 0 {
            // someone else flipped it between our read and this update;
            // re-read to report what the booking actually became
            let current = bookings
                .find_one(doc! { "_id": object_id, "user_id": user_id })
                .await?;
            return Err(lost_cancel_race_error(current.map(|b| b.booking_status)));
        }

        let new_balance = match WalletService::credit(client, user_id, refund).await {
            Ok(balance) => balance,
            Err(err) => {
                let revert = bookings
                    .update_one(
                        doc! {
                            "_id": object_id,
                            "booking_status": BookingStatus::Cancelled.as_str(),
                        },
                        doc! { "$set": { "booking_status": BookingStatus::Upcoming.as_str() } },
                    )
                    .await;
                if let Err(revert_err) = revert {
                    log::error!(
                        "Failed to revert cancellation of booking {} after refund failure: {}",
                        booking_id,
                        revert_err
                    );
                }
                return Err(err);
            }
        };

        log::info!(
            "Booking {} cancelled for user {}, refunded {} cents",
            booking.pnr,
            user_id,
            refund
        );

        Ok(CancellationReceipt {
            new_status: BookingStatus::Cancelled,
            refund_cents: refund,
            new_balance_cents: new_balance,
        })
    }
}

fn generate_pnr() -> String {
    let mut rng = rand::thread_rng();
    (0..PNR_LENGTH)
        .map(|_| PNR_ALPHABET[rng.gen_range(0..PNR_ALPHABET.len())] as char)
        .collect()
}

/// What to report when the conditional cancel flip matched nothing: the
/// booking is whatever the concurrent writer made it, not necessarily
/// cancelled.
fn lost_cancel_race_error(current_status: Option<BookingStatus>) -> ApiError {
    match current_status {
        Some(BookingStatus::Completed) => ApiError::AlreadyCompleted,
        _ => ApiError::AlreadyCancelled,
    }
}

fn refund_cents(final_price_cents: i64) -> i64 {
    pricing_service::decimal_to_cents(Decimal::new(final_price_cents, 2) * REFUND_RATE)
}

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("phone regex is valid"))
}

fn validate_input(input: &BookingInput, today: NaiveDate) -> Result<(), ApiError> {
    if input.flight_id.trim().is_empty() {
        return Err(ApiError::validation("flightId"));
    }
    if input.passenger_name.trim().is_empty() {
        return Err(ApiError::validation("passengerName"));
    }
    if !(1..=120).contains(&input.passenger_age) {
        return Err(ApiError::validation("passengerAge"));
    }
    if input.passenger_gender.trim().is_empty() {
        return Err(ApiError::validation("passengerGender"));
    }
    if !phone_regex().is_match(&input.phone_number) {
        return Err(ApiError::validation("phoneNumber"));
    }
    if input.session_id.trim().is_empty() {
        return Err(ApiError::validation("sessionId"));
    }
    if input.flight_date < today {
        return Err(ApiError::validation("flightDate"));
    }
    Ok(())
}
