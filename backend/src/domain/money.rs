//! Monetary amount helpers.
//!
//! All monetary values are fixed-point decimals with two fractional digits,
//! matching the `NUMERIC(10,2)` columns in storage. Helpers here normalise
//! and validate amounts at the domain boundary.

use rust_decimal::Decimal;

use super::error::Error;

/// Round an amount to the two fractional digits storage carries.
pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Validate that a caller-supplied amount is strictly positive.
///
/// Returns the amount normalised to two fractional digits. The normalised
/// amount is re-checked so values like `0.001` do not round down to zero
/// after passing the raw check.
pub fn require_positive(field: &str, amount: Decimal) -> Result<Decimal, Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid_amount(format!(
            "{field} must be greater than 0"
        )));
    }
    let normalised = to_cents(amount);
    if normalised <= Decimal::ZERO {
        return Err(Error::invalid_amount(format!(
            "{field} must be at least 0.01"
        )));
    }
    Ok(normalised)
}
