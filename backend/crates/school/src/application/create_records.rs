//! Create Records Use Case

use std::sync::Arc;

use crate::domain::records::Record;
use crate::domain::repository::RecordStore;
use crate::error::SchoolResult;

pub struct CreateRecordsUseCase<S> {
    store: Arc<S>,
}

impl<S> CreateRecordsUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Insert `records`; identifiers in the input are ignored
    pub async fn execute<T>(&self, records: Vec<T>) -> SchoolResult<Vec<T>>
    where
        T: Record,
        S: RecordStore<T>,
    {
        let created = self.store.insert_many(records).await?;

        tracing::info!(kind = T::KIND, count = created.len(), "Records created");

        Ok(created)
    }
}
