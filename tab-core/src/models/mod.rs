mod drink_item;
mod entry;
mod payment_method;
mod settlement_status;

pub use drink_item::DrinkItem;
pub use entry::{Entry, EntryId, NewEntry};
pub use payment_method::PaymentMethod;
pub use settlement_status::SettlementStatus;
