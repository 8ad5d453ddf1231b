//! Shared arithmetic for money values.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tab_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(12.754)), dec!(12.75));
/// assert_eq!(round_half_up(dec!(12.755)), dec!(12.76));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Adds up money values, saturating at [`Decimal::MAX`] (or
/// [`Decimal::MIN`]) where plain addition would overflow.
pub fn capped_sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    let mut total = Decimal::ZERO;
    for value in values {
        match total.checked_add(value) {
            Some(sum) => total = sum,
            None => {
                let capped = if value.is_sign_negative() { Decimal::MIN } else { Decimal::MAX };
                warn!(%total, %value, "amount out of range; capped at {}", capped);
                return capped;
            }
        }
    }
    total
}

/// Formats an amount with exactly two decimals, e.g. `12.5` -> `"12.50"`.
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}
