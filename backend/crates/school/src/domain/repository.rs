//! Repository Traits
//!
//! Interface for record persistence. Implementation is in infrastructure layer.

use crate::domain::records::Record;
use crate::error::SchoolResult;

/// Record store keyed by integer identifier
#[trait_variant::make(RecordStore: Send)]
pub trait LocalRecordStore<T: Record> {
    /// Find record by ID
    async fn find_by_id(&self, id: i64) -> SchoolResult<Option<T>>;

    /// Insert records, assigning identifiers in input order
    async fn insert_many(&self, records: Vec<T>) -> SchoolResult<Vec<T>>;

    /// Replace an existing record; fails with `NotFound` if it is gone
    async fn update(&self, record: T) -> SchoolResult<T>;
}
