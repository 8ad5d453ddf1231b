//! Per-guest and per-table totals.
//!
//! A guest's total is the sum of their menu, drink and dessert prices,
//! reduced by 15% when they pay cash, rounded half-up to cents. The total is
//! computed once when the line is committed and stored with it; the table's
//! grand total is the plain sum of those stored totals.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tab_core::PaymentMethod;
//! use tab_core::calculations::entry_total;
//!
//! let total = entry_total(dec!(10), dec!(5), dec!(0), PaymentMethod::Cash);
//! assert_eq!(total, dec!(12.75));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tracing::warn;

use crate::calculations::common::{capped_sum, round_half_up};
use crate::models::{Entry, PaymentMethod};

/// Multiplier applied to a cash-paid subtotal (15% off).
pub const CASH_DISCOUNT_FACTOR: Decimal = dec!(0.85);

/// Discounted, rounded total for one guest.
pub fn entry_total(
    menu_price: Decimal,
    drink_price: Decimal,
    dessert_price: Decimal,
    payment_method: PaymentMethod,
) -> Decimal {
    let subtotal = capped_sum([menu_price, drink_price, dessert_price]);
    let factor = if payment_method.is_discounted() {
        CASH_DISCOUNT_FACTOR
    } else {
        Decimal::ONE
    };
    let discounted = subtotal.checked_mul(factor).unwrap_or_else(|| {
        warn!(%subtotal, "discounted total out of range; charging the subtotal");
        subtotal
    });
    round_half_up(discounted)
}

/// Sum of the frozen totals of every entry.
pub fn grand_total(entries: &[Entry]) -> Decimal {
    capped_sum(entries.iter().map(|e| e.total))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{EntryId, NewEntry};

    fn entry(
        menu: Decimal,
        drink: Decimal,
        dessert: Decimal,
        method: PaymentMethod,
    ) -> Entry {
        let mut line = NewEntry::new("guest", method);
        line.menu_price = menu;
        line.drink_price = drink;
        line.dessert_price = dessert;
        line.into_entry(EntryId::new())
    }

    #[test]
    fn cash_gets_fifteen_percent_off() {
        assert_eq!(
            entry_total(dec!(10), dec!(5), dec!(0), PaymentMethod::Cash),
            dec!(12.75)
        );
    }

    #[test]
    fn card_and_other_pay_full_price() {
        assert_eq!(
            entry_total(dec!(20), dec!(0), dec!(0), PaymentMethod::Card),
            dec!(20.00)
        );
        assert_eq!(
            entry_total(dec!(8.40), dec!(3.10), dec!(4.50), PaymentMethod::Other),
            dec!(16.00)
        );
    }

    #[test]
    fn cash_total_is_rounded_to_cents() {
        // 7.35 * 0.85 = 6.2475
        assert_eq!(
            entry_total(dec!(7.35), dec!(0), dec!(0), PaymentMethod::Cash),
            dec!(6.25)
        );
    }

    #[test]
    fn all_zero_prices_total_zero() {
        assert_eq!(
            entry_total(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, PaymentMethod::Cash),
            Decimal::ZERO
        );
    }

    #[test]
    fn grand_total_sums_frozen_totals() {
        let entries = vec![
            entry(dec!(10), dec!(5), dec!(0), PaymentMethod::Cash),
            entry(dec!(10), dec!(5), dec!(0), PaymentMethod::Cash),
            entry(dec!(20), dec!(0), dec!(0), PaymentMethod::Card),
        ];

        assert_eq!(grand_total(&entries), dec!(45.50));
    }

    #[test]
    fn huge_prices_cap_instead_of_overflowing() {
        assert_eq!(
            entry_total(Decimal::MAX, dec!(1), dec!(0), PaymentMethod::Card),
            Decimal::MAX
        );
        assert!(entry_total(Decimal::MAX, Decimal::MAX, Decimal::MAX, PaymentMethod::Cash) > dec!(0));
    }

    #[test]
    fn grand_total_caps_instead_of_overflowing() {
        let entries = vec![
            entry(Decimal::MAX, dec!(0), dec!(0), PaymentMethod::Card),
            entry(Decimal::MAX, dec!(0), dec!(0), PaymentMethod::Card),
        ];

        assert_eq!(grand_total(&entries), Decimal::MAX);
    }

    #[test]
    fn grand_total_of_empty_list_is_zero() {
        assert_eq!(grand_total(&[]), Decimal::ZERO);
    }
}
