//! Money arithmetic for the table tab.

pub mod common;
pub mod totals;

pub use common::{capped_sum, format_amount, round_half_up};
pub use totals::{CASH_DISCOUNT_FACTOR, entry_total, grand_total};
