use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{DrinkItem, PaymentMethod, SettlementStatus};
use crate::calculations::common::capped_sum;
use crate::calculations::entry_total;

/// Stable identity of an entry. Generated once when the entry is first
/// committed and kept across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One guest's order line as stored and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub id: EntryId,
    pub guest_name: String,

    #[serde(default)]
    pub menu_item: String,
    #[serde(default)]
    pub menu_price: Decimal,

    #[serde(default, deserialize_with = "deserialize_optional_drink")]
    pub drink_item: Option<DrinkItem>,
    #[serde(default)]
    pub drink_price: Decimal,

    #[serde(default)]
    pub dessert_item: String,
    #[serde(default)]
    pub dessert_price: Decimal,

    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "deserialize_optional_status")]
    pub settlement_status: Option<SettlementStatus>,

    // Frozen at commit time; never recomputed on display.
    pub total: Decimal,
}

impl Entry {
    /// Sum of the three prices before any discount.
    pub fn subtotal(&self) -> Decimal {
        capped_sum([self.menu_price, self.drink_price, self.dessert_price])
    }
}

/// For committing a line (no id, no total yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub guest_name: String,
    pub menu_item: String,
    pub menu_price: Decimal,
    pub drink_item: Option<DrinkItem>,
    pub drink_price: Decimal,
    pub dessert_item: String,
    pub dessert_price: Decimal,
    pub payment_method: PaymentMethod,
    pub settlement_status: Option<SettlementStatus>,
}

impl NewEntry {
    /// A line with only the required fields set; everything else blank.
    pub fn new(
        guest_name: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            guest_name: guest_name.into(),
            menu_item: String::new(),
            menu_price: Decimal::ZERO,
            drink_item: None,
            drink_price: Decimal::ZERO,
            dessert_item: String::new(),
            dessert_price: Decimal::ZERO,
            payment_method,
            settlement_status: None,
        }
    }

    /// Freezes the discounted total and attaches the given identity.
    pub fn into_entry(
        self,
        id: EntryId,
    ) -> Entry {
        let total = entry_total(
            self.menu_price,
            self.drink_price,
            self.dessert_price,
            self.payment_method,
        );

        Entry {
            id,
            guest_name: self.guest_name,
            menu_item: self.menu_item,
            menu_price: self.menu_price,
            drink_item: self.drink_item,
            drink_price: self.drink_price,
            dessert_item: self.dessert_item,
            dessert_price: self.dessert_price,
            payment_method: self.payment_method,
            settlement_status: self.settlement_status,
            total,
        }
    }
}

fn deserialize_optional_drink<'de, D>(deserializer: D) -> Result<Option<DrinkItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => DrinkItem::parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown drink '{s}'"))),
        None => Ok(None),
    }
}

fn deserialize_optional_status<'de, D>(
    deserializer: D
) -> Result<Option<SettlementStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => SettlementStatus::parse(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown settlement status '{s}'"))),
        None => Ok(None),
    }
}
