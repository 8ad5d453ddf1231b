//! CSV export of the tab.
//!
//! One row per entry, in display order, with a header row. Amounts are
//! written with two decimals; unset selections are empty cells.
//!
//! | Column              | Notes                          |
//! |---------------------|--------------------------------|
//! | `row`               | 1-based, as shown by `list`    |
//! | `guest_name`        |                                |
//! | `menu_item`         |                                |
//! | `menu_price`        |                                |
//! | `drink_item`        | `Water`, `Soda`, `Wine` or empty |
//! | `drink_price`       |                                |
//! | `dessert_item`      |                                |
//! | `dessert_price`     |                                |
//! | `payment_method`    | `Cash`, `Card`, `Other`        |
//! | `settlement_status` | `Paid`, `Unpaid` or empty      |
//! | `total`             | after any cash discount        |

use std::io;
use std::path::Path;

use serde::Serialize;
use tab_core::Entry;
use tab_core::calculations::format_amount;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    row: usize,
    guest_name: &'a str,
    menu_item: &'a str,
    menu_price: String,
    drink_item: &'static str,
    drink_price: String,
    dessert_item: &'a str,
    dessert_price: String,
    payment_method: &'static str,
    settlement_status: &'static str,
    total: String,
}

impl<'a> CsvRow<'a> {
    fn new(
        row: usize,
        entry: &'a Entry,
    ) -> Self {
        Self {
            row,
            guest_name: &entry.guest_name,
            menu_item: &entry.menu_item,
            menu_price: format_amount(entry.menu_price),
            drink_item: entry.drink_item.map(|d| d.as_str()).unwrap_or_default(),
            drink_price: format_amount(entry.drink_price),
            dessert_item: &entry.dessert_item,
            dessert_price: format_amount(entry.dessert_price),
            payment_method: entry.payment_method.as_str(),
            settlement_status: entry.settlement_status.map(|s| s.as_str()).unwrap_or_default(),
            total: format_amount(entry.total),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Writes `entries` as CSV to any writer.
pub fn write_csv<W: io::Write>(
    entries: &[Entry],
    writer: W,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (i, entry) in entries.iter().enumerate() {
        csv.serialize(CsvRow::new(i + 1, entry))?;
    }
    if entries.is_empty() {
        // serialize() emits the header with the first record only.
        csv.write_record([
            "row",
            "guest_name",
            "menu_item",
            "menu_price",
            "drink_item",
            "drink_price",
            "dessert_item",
            "dessert_price",
            "payment_method",
            "settlement_status",
            "total",
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes `entries` to the file at `path`, replacing it.
pub fn export_to_path(
    entries: &[Entry],
    path: &Path,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(entries, file)
}
