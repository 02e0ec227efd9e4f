use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::ApiError;
use crate::models::booking::{CabinClass, PassengerType};

/// Every 3 attempts inside the window adds 10% to the price. A coarse step
/// function keeps the surcharge predictable and explainable to the user.
const ATTEMPTS_PER_SURGE_STEP: i64 = 3;
const SURGE_STEP: Decimal = dec!(0.10);

pub struct PricingService;

impl PricingService {
    pub fn surge_multiplier(attempt_count: i64) -> Decimal {
        Decimal::from(attempt_count / ATTEMPTS_PER_SURGE_STEP) * SURGE_STEP
    }

    /// Integer percentage for the quote payload: 0, 10, 20, ...
    pub fn surge_percentage(attempt_count: i64) -> i64 {
        (attempt_count / ATTEMPTS_PER_SURGE_STEP) * 10
    }

    pub fn surge_applied(attempt_count: i64) -> bool {
        attempt_count >= ATTEMPTS_PER_SURGE_STEP
    }

    /// Deterministic final price in cents. Class multiplier, child discount
    /// and surge are independent flat scalars, each applied exactly once.
    pub fn final_price_cents(
        base_price_cents: i64,
        class_type: CabinClass,
        passenger_type: PassengerType,
        attempt_count: i64,
    ) -> i64 {
        let base = Decimal::new(base_price_cents, 2);
        let price = base
            * class_type.multiplier()
            * passenger_type.discount()
            * (Decimal::ONE + Self::surge_multiplier(attempt_count));

        decimal_to_cents(price)
    }
}

/// Round to two decimal places (half away from zero) and convert to cents.
pub fn decimal_to_cents(amount: Decimal) -> i64 {
    (amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero) * dec!(100))
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Display form of a cent amount; only ever used at the JSON boundary.
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Parse a client-supplied monetary amount into cents. Rejects values that
/// are not representable money (NaN, infinities, negatives).
pub fn amount_to_cents(amount: f64, field: &str) -> Result<i64, ApiError> {
    let decimal = Decimal::try_from(amount).map_err(|_| ApiError::validation(field))?;
    if decimal < Decimal::ZERO {
        return Err(ApiError::validation(field));
    }
    Ok(decimal_to_cents(decimal))
}
