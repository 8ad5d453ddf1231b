//! Pending (uncommitted) entry state and the submit flow.
//!
//! The controller keeps a working copy of one entry while it is being typed
//! in. On submit it checks the two required fields, freezes the discounted
//! total, hands the entry to the [`EntryRepository`] and starts over blank.
//!
//! Price fields are lenient on purpose: anything that is not a non-negative
//! number becomes zero instead of an error.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{DrinkItem, Entry, EntryId, NewEntry, PaymentMethod, SettlementStatus};
use crate::repository::{EntryRepository, RepositoryError};

/// The editable fields of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    GuestName,
    MenuItem,
    MenuPrice,
    DrinkItem,
    DrinkPrice,
    DessertItem,
    DessertPrice,
    PaymentMethod,
    SettlementStatus,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::GuestName,
            FormField::MenuItem,
            FormField::MenuPrice,
            FormField::DrinkItem,
            FormField::DrinkPrice,
            FormField::DessertItem,
            FormField::DessertPrice,
            FormField::PaymentMethod,
            FormField::SettlementStatus,
        ]
    }

    /// Name as used in the stored payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuestName => "guestName",
            Self::MenuItem => "menuItem",
            Self::MenuPrice => "menuPrice",
            Self::DrinkItem => "drinkItem",
            Self::DrinkPrice => "drinkPrice",
            Self::DessertItem => "dessertItem",
            Self::DessertPrice => "dessertPrice",
            Self::PaymentMethod => "paymentMethod",
            Self::SettlementStatus => "settlementStatus",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::GuestName => "Guest name",
            Self::MenuItem => "Menu",
            Self::MenuPrice => "Menu price",
            Self::DrinkItem => "Drink",
            Self::DrinkPrice => "Drink price",
            Self::DessertItem => "Dessert",
            Self::DessertPrice => "Dessert price",
            Self::PaymentMethod => "Payment method",
            Self::SettlementStatus => "Status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownFieldError(String);

impl FromStr for FormField {
    type Err = UnknownFieldError;

    /// Accepts either the camelCase payload name or its snake_case form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "").to_ascii_lowercase();
        FormField::all()
            .iter()
            .copied()
            .find(|field| field.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| UnknownFieldError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Required => f.write_str("is required"),
        }
    }
}

/// Per-field validation failures, ordered by field.
pub type FieldErrors = BTreeMap<FormField, FieldError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{} field(s) need attention", .0.len())]
    Validation(FieldErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Working copy of an entry. Select fields keep the raw selection text;
/// prices are already coerced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingEntry {
    pub guest_name: String,
    pub menu_item: String,
    pub menu_price: Decimal,
    pub drink_item: String,
    pub drink_price: Decimal,
    pub dessert_item: String,
    pub dessert_price: Decimal,
    pub payment_method: String,
    pub settlement_status: String,

    /// Total of the entry being edited, for display only. Submitting always
    /// recomputes it from the prices.
    pub total: Decimal,
}

impl PendingEntry {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            guest_name: entry.guest_name.clone(),
            menu_item: entry.menu_item.clone(),
            menu_price: entry.menu_price,
            drink_item: entry
                .drink_item
                .map(|d| d.as_str().to_string())
                .unwrap_or_default(),
            drink_price: entry.drink_price,
            dessert_item: entry.dessert_item.clone(),
            dessert_price: entry.dessert_price,
            payment_method: entry.payment_method.as_str().to_string(),
            settlement_status: entry
                .settlement_status
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            total: entry.total,
        }
    }
}

/// Turns raw price input into a non-negative amount.
///
/// Empty, non-numeric or negative input becomes zero. Plain and scientific
/// notation are accepted (`"12.5"`, `"1e2"`).
pub fn coerce_price(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed));
    match parsed {
        Ok(value) if value.is_sign_negative() => {
            warn!(input = %raw, "negative price treated as 0");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            warn!(input = %raw, "invalid price treated as 0: {}", e);
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Default)]
pub struct FormController {
    pending: PendingEntry,
    edit_target: Option<EntryId>,
    errors: FieldErrors,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingEntry {
        &self.pending
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_editing(&self) -> bool {
        self.edit_target.is_some()
    }

    pub fn edit_target(&self) -> Option<EntryId> {
        self.edit_target
    }

    /// Current position of the entry being edited, if it still exists.
    pub fn edit_index(
        &self,
        repo: &EntryRepository,
    ) -> Option<usize> {
        self.edit_target.and_then(|id| repo.position(id))
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() { "Save changes" } else { "Add" }
    }

    /// Stores raw input for `field`. Prices are coerced; everything else is
    /// kept exactly as given.
    pub fn update_field(
        &mut self,
        field: FormField,
        raw: &str,
    ) {
        let p = &mut self.pending;
        match field {
            FormField::GuestName => p.guest_name = raw.to_string(),
            FormField::MenuItem => p.menu_item = raw.to_string(),
            FormField::MenuPrice => p.menu_price = coerce_price(raw),
            FormField::DrinkItem => p.drink_item = raw.to_string(),
            FormField::DrinkPrice => p.drink_price = coerce_price(raw),
            FormField::DessertItem => p.dessert_item = raw.to_string(),
            FormField::DessertPrice => p.dessert_price = coerce_price(raw),
            FormField::PaymentMethod => p.payment_method = raw.to_string(),
            FormField::SettlementStatus => p.settlement_status = raw.to_string(),
        }
    }

    /// Validates and commits the pending entry.
    ///
    /// All failing fields are collected in one pass and left in
    /// [`errors`](Self::errors). On success the form is blank again and back
    /// in add mode; the id of the committed entry is returned.
    pub fn submit(
        &mut self,
        repo: &mut EntryRepository,
    ) -> Result<EntryId, FormError> {
        let mut errors = FieldErrors::new();

        if self.pending.guest_name.trim().is_empty() {
            errors.insert(FormField::GuestName, FieldError::Required);
        }
        let payment_method = PaymentMethod::parse(&self.pending.payment_method);
        if payment_method.is_none() {
            errors.insert(FormField::PaymentMethod, FieldError::Required);
        }

        let payment_method = match payment_method {
            Some(method) if errors.is_empty() => method,
            _ => {
                debug!(?errors, "submit rejected");
                self.errors = errors.clone();
                return Err(FormError::Validation(errors));
            }
        };

        let p = &self.pending;
        let line = NewEntry {
            guest_name: p.guest_name.clone(),
            menu_item: p.menu_item.clone(),
            menu_price: p.menu_price,
            drink_item: DrinkItem::parse(&p.drink_item),
            drink_price: p.drink_price,
            dessert_item: p.dessert_item.clone(),
            dessert_price: p.dessert_price,
            payment_method,
            settlement_status: SettlementStatus::parse(&p.settlement_status),
        };
        let id = self.edit_target.unwrap_or_default();

        repo.commit(line.into_entry(id), self.edit_target)?;

        self.reset();
        Ok(id)
    }

    /// Loads the entry shown at `index` for editing.
    pub fn begin_edit(
        &mut self,
        repo: &EntryRepository,
        index: usize,
    ) -> Result<(), RepositoryError> {
        let id = repo.id_at(index)?;
        self.begin_edit_by_id(repo, id)
    }

    pub fn begin_edit_by_id(
        &mut self,
        repo: &EntryRepository,
        id: EntryId,
    ) -> Result<(), RepositoryError> {
        let entry = repo.find(id).ok_or(RepositoryError::NotFound(id))?;
        self.pending = PendingEntry::from_entry(entry);
        self.edit_target = Some(id);
        self.errors.clear();
        Ok(())
    }

    /// Drops pending input, errors and edit mode.
    pub fn reset(&mut self) {
        self.pending = PendingEntry::default();
        self.edit_target = None;
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::store::MemoryStore;

    fn repository() -> EntryRepository {
        EntryRepository::new(Arc::new(MemoryStore::new()))
    }

    fn fill(
        form: &mut FormController,
        fields: &[(FormField, &str)],
    ) {
        for (field, raw) in fields {
            form.update_field(*field, raw);
        }
    }

    #[test]
    fn coerce_price_accepts_plain_and_scientific_numbers() {
        assert_eq!(coerce_price("12.5"), dec!(12.5));
        assert_eq!(coerce_price(" 7 "), dec!(7));
        assert_eq!(coerce_price("1e2"), dec!(100));
    }

    #[test]
    fn coerce_price_turns_junk_into_zero() {
        assert_eq!(coerce_price(""), Decimal::ZERO);
        assert_eq!(coerce_price("   "), Decimal::ZERO);
        assert_eq!(coerce_price("abc"), Decimal::ZERO);
        assert_eq!(coerce_price("-5"), Decimal::ZERO);
    }

    #[test]
    fn form_field_parses_camel_and_snake_case() {
        assert_eq!("menuPrice".parse(), Ok(FormField::MenuPrice));
        assert_eq!("menu_price".parse(), Ok(FormField::MenuPrice));
        assert_eq!("settlement_status".parse(), Ok(FormField::SettlementStatus));
        assert!("tip".parse::<FormField>().is_err());
    }

    #[test]
    fn update_field_keeps_text_raw_and_coerces_prices() {
        let mut form = FormController::new();
        fill(
            &mut form,
            &[
                (FormField::GuestName, "  Ana "),
                (FormField::DrinkItem, "Vino"),
                (FormField::DrinkPrice, "cinco"),
                (FormField::DessertPrice, "4.25"),
            ],
        );

        assert_eq!(form.pending().guest_name, "  Ana ");
        assert_eq!(form.pending().drink_item, "Vino");
        assert_eq!(form.pending().drink_price, Decimal::ZERO);
        assert_eq!(form.pending().dessert_price, dec!(4.25));
    }

    #[tokio::test]
    async fn submit_with_both_required_fields_missing_reports_both() {
        let mut repo = repository();
        let mut form = FormController::new();
        form.update_field(FormField::MenuPrice, "10");

        let result = form.submit(&mut repo);

        let expected = FieldErrors::from([
            (FormField::GuestName, FieldError::Required),
            (FormField::PaymentMethod, FieldError::Required),
        ]);
        assert_eq!(result, Err(FormError::Validation(expected.clone())));
        assert_eq!(form.errors(), &expected);
        assert!(repo.is_empty());
        assert_eq!(form.pending().menu_price, dec!(10));
    }

    #[tokio::test]
    async fn whitespace_guest_name_and_unknown_method_are_missing() {
        let mut repo = repository();
        let mut form = FormController::new();
        fill(
            &mut form,
            &[(FormField::GuestName, "   "), (FormField::PaymentMethod, "IOU")],
        );

        assert!(matches!(form.submit(&mut repo), Err(FormError::Validation(_))));
        assert_eq!(form.errors().len(), 2);
    }

    #[tokio::test]
    async fn submit_in_add_mode_appends_and_resets() {
        let mut repo = repository();
        let mut form = FormController::new();
        fill(
            &mut form,
            &[
                (FormField::GuestName, "Ana"),
                (FormField::MenuPrice, "10"),
                (FormField::DrinkItem, "Wine"),
                (FormField::DrinkPrice, "5"),
                (FormField::DessertPrice, "0"),
                (FormField::PaymentMethod, "Cash"),
                (FormField::SettlementStatus, "Paid"),
            ],
        );

        let id = form.submit(&mut repo).unwrap();

        let entry = &repo.entries()[0];
        assert_eq!(entry.id, id);
        assert_eq!(entry.total, dec!(12.75));
        assert_eq!(entry.drink_item, Some(DrinkItem::Wine));
        assert_eq!(entry.settlement_status, Some(SettlementStatus::Paid));
        assert_eq!(form.pending(), &PendingEntry::default());
        assert_eq!(form.edit_target(), None);
        assert!(form.errors().is_empty());
        assert_eq!(form.submit_label(), "Add");
    }

    #[tokio::test]
    async fn successful_submit_clears_previous_errors() {
        let mut repo = repository();
        let mut form = FormController::new();
        let _ = form.submit(&mut repo);
        assert_eq!(form.errors().len(), 2);

        fill(
            &mut form,
            &[(FormField::GuestName, "Leo"), (FormField::PaymentMethod, "Card")],
        );
        form.submit(&mut repo).unwrap();

        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn prices_at_the_decimal_limit_are_capped_not_fatal() {
        let mut repo = repository();
        let mut form = FormController::new();
        fill(
            &mut form,
            &[
                (FormField::GuestName, "Ana"),
                (FormField::MenuPrice, "79228162514264337593543950335"),
                (FormField::DrinkPrice, "1"),
                (FormField::PaymentMethod, "Card"),
            ],
        );
        form.submit(&mut repo).unwrap();
        assert_eq!(repo.entries()[0].total, Decimal::MAX);

        fill(
            &mut form,
            &[
                (FormField::GuestName, "Leo"),
                (FormField::MenuPrice, "79228162514264337593543950335"),
                (FormField::PaymentMethod, "Card"),
            ],
        );
        form.submit(&mut repo).unwrap();

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.grand_total(), Decimal::MAX);
    }

    #[tokio::test]
    async fn begin_edit_copies_frozen_total_and_enters_edit_mode() {
        let mut repo = repository();
        let mut form = FormController::new();
        fill(
            &mut form,
            &[
                (FormField::GuestName, "Ana"),
                (FormField::MenuPrice, "10"),
                (FormField::DrinkPrice, "5"),
                (FormField::PaymentMethod, "Cash"),
            ],
        );
        let id = form.submit(&mut repo).unwrap();

        form.begin_edit(&repo, 0).unwrap();

        assert_eq!(form.edit_target(), Some(id));
        assert_eq!(form.edit_index(&repo), Some(0));
        assert_eq!(form.pending().payment_method, "Cash");
        assert_eq!(form.pending().total, dec!(12.75));
        assert_eq!(form.submit_label(), "Save changes");
    }

    #[tokio::test]
    async fn resubmitting_an_edit_replaces_and_recomputes() {
        let mut repo = repository();
        let mut form = FormController::new();
        fill(
            &mut form,
            &[
                (FormField::GuestName, "Ana"),
                (FormField::MenuPrice, "10"),
                (FormField::DrinkPrice, "5"),
                (FormField::PaymentMethod, "Cash"),
            ],
        );
        let id = form.submit(&mut repo).unwrap();
        fill(
            &mut form,
            &[(FormField::GuestName, "Leo"), (FormField::MenuPrice, "20"), (FormField::PaymentMethod, "Card")],
        );
        form.submit(&mut repo).unwrap();

        form.begin_edit(&repo, 0).unwrap();
        form.update_field(FormField::PaymentMethod, "Card");
        let edited = form.submit(&mut repo).unwrap();

        assert_eq!(edited, id);
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.entries()[0].guest_name, "Ana");
        assert_eq!(repo.entries()[0].total, dec!(15));
        assert_eq!(repo.grand_total(), dec!(35));
        assert!(!form.is_editing());
    }

    #[tokio::test]
    async fn unchanged_edit_keeps_length_and_position() {
        let mut repo = repository();
        let mut form = FormController::new();
        for name in ["Ana", "Leo", "Sol"] {
            fill(
                &mut form,
                &[(FormField::GuestName, name), (FormField::MenuPrice, "10"), (FormField::PaymentMethod, "Cash")],
            );
            form.submit(&mut repo).unwrap();
        }
        let before: Vec<_> = repo.entries().to_vec();

        form.begin_edit(&repo, 1).unwrap();
        form.submit(&mut repo).unwrap();

        assert_eq!(repo.entries(), before.as_slice());
    }

    #[tokio::test]
    async fn begin_edit_out_of_range_leaves_form_alone() {
        let repo = repository();
        let mut form = FormController::new();
        form.update_field(FormField::GuestName, "Ana");

        assert_eq!(
            form.begin_edit(&repo, 0),
            Err(RepositoryError::IndexOutOfRange { index: 0, len: 0 })
        );
        assert_eq!(form.pending().guest_name, "Ana");
        assert!(!form.is_editing());
    }

    #[tokio::test]
    async fn submitting_an_edit_of_a_removed_entry_fails() {
        let mut repo = repository();
        let mut form = FormController::new();
        fill(
            &mut form,
            &[(FormField::GuestName, "Ana"), (FormField::PaymentMethod, "Card")],
        );
        let id = form.submit(&mut repo).unwrap();
        form.begin_edit(&repo, 0).unwrap();
        repo.remove(id).unwrap();

        let result = form.submit(&mut repo);

        assert_eq!(
            result,
            Err(FormError::Repository(RepositoryError::NotFound(id)))
        );
        assert!(repo.is_empty());
        assert!(form.is_editing());
    }

    #[test]
    fn reset_discards_everything() {
        let mut form = FormController::new();
        form.update_field(FormField::GuestName, "Ana");

        form.reset();

        assert_eq!(form.pending(), &PendingEntry::default());
        assert!(!form.is_editing());
    }
}
