//! The canonical list of entries and the table's grand total.
//!
//! Every mutation recomputes the grand total and queues the full list for
//! persistence without waiting for the write. Entries are addressed by their
//! stable [`EntryId`]; the `*_at` variants resolve a display position to an
//! id first.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::grand_total;
use crate::models::{Entry, EntryId};
use crate::payload;
use crate::persistence::{PersistenceError, PersistenceObserver, Persister, TracingObserver};
use crate::store::{ENTRIES_KEY, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("row {index} is out of range (table has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("entry {0} not found")]
    NotFound(EntryId),
}

pub struct EntryRepository {
    store: Arc<dyn KeyValueStore>,
    observer: Arc<dyn PersistenceObserver>,
    persister: Persister,
    entries: Vec<Entry>,
    grand_total: Decimal,
}

impl EntryRepository {
    /// Empty repository backed by `store`, logging storage failures.
    ///
    /// Must be called from within a tokio runtime: the background writer is
    /// spawned here.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_observer(store, Arc::new(TracingObserver))
    }

    pub fn with_observer(
        store: Arc<dyn KeyValueStore>,
        observer: Arc<dyn PersistenceObserver>,
    ) -> Self {
        let persister = Persister::spawn(store.clone(), observer.clone());
        Self {
            store,
            observer,
            persister,
            entries: Vec::new(),
            grand_total: Decimal::ZERO,
        }
    }

    /// Seeds the list from the store.
    ///
    /// Nothing stored leaves the repository as it is. A read or decode
    /// failure is reported to the observer and also leaves it untouched.
    pub async fn load(&mut self) {
        // Pending writes from this repository land first.
        self.persister.flush().await;

        let raw = match self.store.get(ENTRIES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no saved entries");
                return;
            }
            Err(e) => {
                self.observer.on_load_failed(&PersistenceError::Store(e));
                return;
            }
        };

        match payload::decode(&raw) {
            Ok(entries) => {
                self.entries = entries;
                self.recompute_total();
                info!(
                    count = self.entries.len(),
                    grand_total = %self.grand_total,
                    "entries loaded"
                );
            }
            Err(e) => self.observer.on_load_failed(&PersistenceError::Payload(e)),
        }
    }

    /// Appends `entry`, or replaces the entry identified by `edit_target`
    /// in place.
    ///
    /// # Errors
    /// [`RepositoryError::NotFound`] when `edit_target` no longer exists.
    /// Nothing is changed in that case.
    pub fn commit(
        &mut self,
        entry: Entry,
        edit_target: Option<EntryId>,
    ) -> Result<(), RepositoryError> {
        match edit_target {
            None => {
                debug!(id = %entry.id, guest = %entry.guest_name, total = %entry.total, "adding entry");
                self.entries.push(entry);
            }
            Some(id) => {
                let position = self.position(id).ok_or(RepositoryError::NotFound(id))?;
                debug!(%id, position, total = %entry.total, "replacing entry");
                self.entries[position] = entry;
            }
        }
        self.after_mutation();
        Ok(())
    }

    pub fn remove(
        &mut self,
        id: EntryId,
    ) -> Result<Entry, RepositoryError> {
        let position = self.position(id).ok_or(RepositoryError::NotFound(id))?;
        let removed = self.entries.remove(position);
        debug!(%id, position, "removed entry");
        self.after_mutation();
        Ok(removed)
    }

    pub fn remove_at(
        &mut self,
        index: usize,
    ) -> Result<Entry, RepositoryError> {
        let id = self.id_at(index)?;
        self.remove(id)
    }

    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "clearing entries");
        self.entries.clear();
        self.after_mutation();
    }

    /// Waits until every queued write has been attempted.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn find(
        &self,
        id: EntryId,
    ) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(
        &self,
        id: EntryId,
    ) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Resolves a display position to the id of the entry shown there.
    pub fn id_at(
        &self,
        index: usize,
    ) -> Result<EntryId, RepositoryError> {
        self.entries
            .get(index)
            .map(|e| e.id)
            .ok_or(RepositoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    fn recompute_total(&mut self) {
        self.grand_total = grand_total(&self.entries);
    }

    fn after_mutation(&mut self) {
        self.recompute_total();
        match payload::encode(&self.entries) {
            Ok(raw) => self.persister.save(raw),
            Err(e) => self.observer.on_save_failed(&PersistenceError::Payload(e)),
        }
    }
}
