pub mod calculations;
pub mod form;
pub mod models;
pub mod payload;
pub mod persistence;
pub mod repository;
pub mod store;

pub use form::{FieldError, FieldErrors, FormController, FormError, FormField, PendingEntry};
pub use models::*;
pub use persistence::{PersistenceError, PersistenceObserver, TracingObserver};
pub use repository::{EntryRepository, RepositoryError};
pub use store::{ENTRIES_KEY, KeyValueStore, StoreError};
