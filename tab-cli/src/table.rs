//! Plain-text rendering of the tab for the terminal.

use tab_core::Entry;
use tab_core::calculations::format_amount;

use rust_decimal::Decimal;

struct Column {
    title: &'static str,
    numeric: bool,
}

const COLUMNS: [Column; 11] = [
    Column { title: "#", numeric: true },
    Column { title: "Guest", numeric: false },
    Column { title: "Menu", numeric: false },
    Column { title: "Menu $", numeric: true },
    Column { title: "Drink", numeric: false },
    Column { title: "Drink $", numeric: true },
    Column { title: "Dessert", numeric: false },
    Column { title: "Dessert $", numeric: true },
    Column { title: "Payment", numeric: false },
    Column { title: "Status", numeric: false },
    Column { title: "Total", numeric: true },
];

fn cells(
    row: usize,
    entry: &Entry,
) -> [String; 11] {
    [
        row.to_string(),
        entry.guest_name.clone(),
        entry.menu_item.clone(),
        format_amount(entry.menu_price),
        entry.drink_item.map(|d| d.as_str()).unwrap_or_default().to_string(),
        format_amount(entry.drink_price),
        entry.dessert_item.clone(),
        format_amount(entry.dessert_price),
        entry.payment_method.as_str().to_string(),
        entry
            .settlement_status
            .map(|s| s.as_str())
            .unwrap_or_default()
            .to_string(),
        format_amount(entry.total),
    ]
}

fn push_line(
    out: &mut String,
    values: &[String],
    widths: &[usize],
) {
    let line = COLUMNS
        .iter()
        .zip(values.iter().zip(widths))
        .map(|(column, (value, &width))| {
            if column.numeric {
                format!("{value:>width$}")
            } else {
                format!("{value:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Renders entries with 1-based row numbers, followed by the grand total.
pub fn render(
    entries: &[Entry],
    grand_total: Decimal,
) -> String {
    let mut out = String::new();

    if entries.is_empty() {
        out.push_str("No entries yet.\n");
    } else {
        let header: Vec<String> = COLUMNS.iter().map(|c| c.title.to_string()).collect();
        let rows: Vec<[String; 11]> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| cells(i + 1, entry))
            .collect();

        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        push_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        push_line(&mut out, &rule, &widths);
        for row in &rows {
            push_line(&mut out, row, &widths);
        }
    }

    out.push_str(&format!("Grand total: {}\n", format_amount(grand_total)));
    out
}
