//! Write-behind persistence of the entry list.
//!
//! Mutations hand the encoded list to a single background writer over an
//! unbounded channel and return immediately. The writer applies writes in the
//! order they were queued, so the store always ends up holding the most
//! recent list. Failures are reported to a [`PersistenceObserver`] and never
//! undo the in-memory change that triggered them.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::payload::PayloadError;
use crate::store::{ENTRIES_KEY, KeyValueStore, StoreError};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Receives storage failures that are otherwise swallowed.
pub trait PersistenceObserver: Send + Sync {
    fn on_load_failed(
        &self,
        error: &PersistenceError,
    );

    fn on_save_failed(
        &self,
        error: &PersistenceError,
    );
}

/// Default observer: logs and moves on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PersistenceObserver for TracingObserver {
    fn on_load_failed(
        &self,
        error: &PersistenceError,
    ) {
        error!(%error, "failed to load entries; starting with an empty table");
    }

    fn on_save_failed(
        &self,
        error: &PersistenceError,
    ) {
        error!(%error, "failed to save entries; changes are kept for this session only");
    }
}

enum WriteRequest {
    Save(String),
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Dropping it closes the channel and lets
/// the writer finish the queued writes and exit.
#[derive(Debug)]
pub struct Persister {
    tx: mpsc::UnboundedSender<WriteRequest>,
}

impl Persister {
    /// Spawns the writer on the current tokio runtime.
    pub fn spawn(
        store: Arc<dyn KeyValueStore>,
        observer: Arc<dyn PersistenceObserver>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, observer, rx));
        Self { tx }
    }

    /// Queues `raw` to be written under [`ENTRIES_KEY`]. Does not wait.
    pub fn save(
        &self,
        raw: String,
    ) {
        if self.tx.send(WriteRequest::Save(raw)).is_err() {
            error!("entry writer has stopped; change not persisted");
        }
    }

    /// Resolves once every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriteRequest::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

async fn run_writer(
    store: Arc<dyn KeyValueStore>,
    observer: Arc<dyn PersistenceObserver>,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Save(raw) => match store.set(ENTRIES_KEY, &raw).await {
                Ok(()) => debug!(bytes = raw.len(), "entries saved"),
                Err(e) => observer.on_save_failed(&PersistenceError::Store(e)),
            },
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("entry writer stopped");
}
