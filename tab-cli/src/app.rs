use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use tab_core::calculations::format_amount;
use tab_core::store::{MemoryStoreFactory, StoreConfig, StoreRegistry};
use tab_core::{EntryRepository, FieldErrors, FormController, FormError, FormField, KeyValueStore};
use tab_store_sqlite::SqliteStoreFactory;
use tracing::{debug, info};

use crate::{export, table};

/// Builds the store registry with every compiled-in backend.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Opens the configured store and loads whatever it holds.
///
/// A store that opens but cannot be read leaves the tab empty; the failure
/// is logged, not returned.
pub async fn open_repository(
    registry: &StoreRegistry,
    config: &StoreConfig,
) -> Result<EntryRepository> {
    debug!(backend = %config.backend, location = %config.location, "opening store");
    let store: Arc<dyn KeyValueStore> = Arc::from(
        registry
            .create(config)
            .await
            .with_context(|| format!("Failed to open '{}' store at '{}'", config.backend, config.location))?,
    );

    let mut repo = EntryRepository::new(store);
    repo.load().await;
    Ok(repo)
}

/// Field values given on the command line. Omitted options leave the field
/// untouched; prices accept any number and fall back to 0.
#[derive(Debug, Clone, Default, Args)]
pub struct EntryFields {
    /// Guest name (required)
    #[arg(long)]
    pub guest: Option<String>,

    #[arg(long)]
    pub menu: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    pub menu_price: Option<String>,

    /// Water, Soda or Wine
    #[arg(long)]
    pub drink: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    pub drink_price: Option<String>,

    #[arg(long)]
    pub dessert: Option<String>,

    #[arg(long, value_name = "AMOUNT")]
    pub dessert_price: Option<String>,

    /// Cash, Card or Other (required). Cash gets 15% off.
    #[arg(long)]
    pub payment: Option<String>,

    /// Paid or Unpaid
    #[arg(long)]
    pub status: Option<String>,
}

impl EntryFields {
    fn values(&self) -> [(FormField, Option<&String>); 9] {
        [
            (FormField::GuestName, self.guest.as_ref()),
            (FormField::MenuItem, self.menu.as_ref()),
            (FormField::MenuPrice, self.menu_price.as_ref()),
            (FormField::DrinkItem, self.drink.as_ref()),
            (FormField::DrinkPrice, self.drink_price.as_ref()),
            (FormField::DessertItem, self.dessert.as_ref()),
            (FormField::DessertPrice, self.dessert_price.as_ref()),
            (FormField::PaymentMethod, self.payment.as_ref()),
            (FormField::SettlementStatus, self.status.as_ref()),
        ]
    }

    pub fn apply(
        &self,
        form: &mut FormController,
    ) {
        for (field, value) in self.values() {
            if let Some(value) = value {
                form.update_field(field, value);
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every entry and the grand total
    List,
    /// Add an entry
    Add(EntryFields),
    /// Change an entry; options not given keep their current value
    Edit {
        /// Row number as shown by `list`
        row: usize,
        #[command(flatten)]
        fields: EntryFields,
    },
    /// Remove an entry
    Remove {
        /// Row number as shown by `list`
        row: usize,
    },
    /// Remove every entry
    Clear,
    /// Write the tab to a CSV file
    Export { path: PathBuf },
}

/// Runs `command` and returns what should be printed. Queued writes are
/// flushed before returning.
pub async fn execute(
    repo: &mut EntryRepository,
    command: Command,
) -> Result<String> {
    let result = dispatch(repo, command);
    repo.flush().await;
    result
}

fn dispatch(
    repo: &mut EntryRepository,
    command: Command,
) -> Result<String> {
    match command {
        Command::List => Ok(table::render(repo.entries(), repo.grand_total())),
        Command::Add(fields) => {
            let mut form = FormController::new();
            fields.apply(&mut form);
            submit(&mut form, repo, "add")?;
            let row = repo.len();
            Ok(summary(repo, "Added", row))
        }
        Command::Edit { row, fields } => {
            let index = row_index(repo, row)?;
            let mut form = FormController::new();
            form.begin_edit(repo, index)?;
            fields.apply(&mut form);
            let id = submit(&mut form, repo, "save")?;
            let row = repo.position(id).map_or(row, |i| i + 1);
            Ok(summary(repo, "Updated", row))
        }
        Command::Remove { row } => {
            let index = row_index(repo, row)?;
            let removed = repo.remove_at(index)?;
            Ok(format!(
                "Removed row {} ({}). Grand total: {}",
                row,
                removed.guest_name,
                format_amount(repo.grand_total())
            ))
        }
        Command::Clear => {
            let count = repo.len();
            repo.clear();
            Ok(format!("Cleared {}.", counted(count, "entry", "entries")))
        }
        Command::Export { path } => {
            export::export_to_path(repo.entries(), &path)
                .with_context(|| format!("Failed to export to '{}'", path.display()))?;
            info!(path = %path.display(), rows = repo.len(), "exported tab");
            Ok(format!("Exported {} to {}", counted(repo.len(), "entry", "entries"), path.display()))
        }
    }
}

fn submit(
    form: &mut FormController,
    repo: &mut EntryRepository,
    action: &str,
) -> Result<tab_core::EntryId> {
    match form.submit(repo) {
        Ok(id) => Ok(id),
        Err(FormError::Validation(errors)) => {
            bail!("Cannot {action} entry: {}", describe(&errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// `"Guest name is required; Payment method is required"`
pub fn describe(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("{} {}", field.label(), error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// `"1 entry"`, `"3 entries"`.
fn counted(
    count: usize,
    one: &str,
    many: &str,
) -> String {
    if count == 1 {
        format!("1 {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Converts a 1-based row number to a list index.
fn row_index(
    repo: &EntryRepository,
    row: usize,
) -> Result<usize> {
    if row == 0 || row > repo.len() {
        bail!("There is no row {row} (the tab has {})", counted(repo.len(), "row", "rows"));
    }
    Ok(row - 1)
}

fn summary(
    repo: &EntryRepository,
    verb: &str,
    row: usize,
) -> String {
    match repo.get(row - 1) {
        Some(entry) => format!(
            "{verb} row {row} for {} ({}). Grand total: {}",
            entry.guest_name,
            format_amount(entry.total),
            format_amount(repo.grand_total())
        ),
        None => format!("{verb} row {row}."),
    }
}
