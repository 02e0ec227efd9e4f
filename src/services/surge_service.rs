use bson::{doc, DateTime};
use mongodb::{Client, Collection};

use crate::db::mongo::DB_NAME;
use crate::errors::ApiError;
use crate::models::attempt::BookingAttempt;

/// Trailing window over which attempts count toward surge.
pub const SURGE_WINDOW_SECS: i64 = 300;
/// Secondary window used only for the client-facing reset countdown.
pub const SURGE_RESET_EXTEND_SECS: i64 = 600;

pub struct SurgeService;

impl SurgeService {
    fn attempts(client: &Client) -> Collection<BookingAttempt> {
        client.database(DB_NAME).collection("BookingAttempts")
    }

    /// Append a pressure signal. Callers treat this as best-effort: a failed
    /// insert is logged and must never block pricing or booking.
    pub async fn record_attempt(
        client: &Client,
        flight_id: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), ApiError> {
        if flight_id.trim().is_empty() {
            return Err(ApiError::validation("flightId"));
        }

        let attempt = BookingAttempt {
            id: None,
            flight_id: flight_id.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            attempt_time: DateTime::now(),
        };

        Self::attempts(client).insert_one(&attempt).await?;
        log::info!(
            "Attempt recorded: user {}, flight {}, session {}",
            user_id,
            flight_id,
            session_id
        );
        Ok(())
    }

    /// Count attempts for a flight with `attempt_time > now - window`. With a
    /// session id this is the informational per-session signal; without one
    /// it is the global count actually charged. Session identifiers are
    /// client-claimed and spoofable, which is why pricing only ever uses the
    /// global count.
    pub async fn count_recent_attempts(
        client: &Client,
        flight_id: &str,
        window_secs: i64,
        session_id: Option<&str>,
    ) -> Result<i64, ApiError> {
        let cutoff = DateTime::from_millis(DateTime::now().timestamp_millis() - window_secs * 1000);

        let mut filter = doc! {
            "flight_id": flight_id,
            "attempt_time": { "$gt": cutoff },
        };
        if let Some(session_id) = session_id {
            filter.insert("session_id", session_id);
        }

        let count = Self::attempts(client).count_documents(filter).await?;
        Ok(count as i64)
    }

    /// Advisory countdown: seconds until the oldest in-window attempt exits
    /// the secondary window measured from its own timestamp. `None` when the
    /// window is empty. Never authoritative for pricing, which always
    /// recomputes from current counts.
    pub async fn time_until_reset(
        client: &Client,
        flight_id: &str,
        window_secs: i64,
        extend_secs: i64,
    ) -> Result<Option<i64>, ApiError> {
        let now_millis = DateTime::now().timestamp_millis();
        let cutoff = DateTime::from_millis(now_millis - window_secs * 1000);

        let oldest = Self::attempts(client)
            .find_one(doc! {
                "flight_id": flight_id,
                "attempt_time": { "$gt": cutoff },
            })
            .sort(doc! { "attempt_time": 1 })
            .await?;

        Ok(oldest.map(|attempt| {
            seconds_until_reset(attempt.attempt_time.timestamp_millis(), now_millis, extend_secs)
        }))
    }
}

fn seconds_until_reset(oldest_millis: i64, now_millis: i64, extend_secs: i64) -> i64 {
    let reset_at = oldest_millis + extend_secs * 1000;
    ((reset_at - now_millis) / 1000).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_counts_down_from_the_oldest_attempt() {
        let oldest = 1_000_000;
        // 600s extension, 100s elapsed -> 500s remaining
        assert_eq!(seconds_until_reset(oldest, oldest + 100_000, 600), 500);
        // exactly at the boundary
        assert_eq!(seconds_until_reset(oldest, oldest + 600_000, 600), 0);
    }

    #[test]
    fn reset_never_goes_negative() {
        let oldest = 1_000_000;
        assert_eq!(seconds_until_reset(oldest, oldest + 900_000, 600), 0);
    }
}
