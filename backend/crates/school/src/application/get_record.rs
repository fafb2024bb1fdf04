//! Get Record Use Case

use std::sync::Arc;

use crate::domain::records::Record;
use crate::domain::repository::RecordStore;
use crate::error::{SchoolError, SchoolResult};

pub struct GetRecordUseCase<S> {
    store: Arc<S>,
}

impl<S> GetRecordUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute<T>(&self, id: i64) -> SchoolResult<T>
    where
        T: Record,
        S: RecordStore<T>,
    {
        if id <= 0 {
            return Err(SchoolError::InvalidId { kind: T::KIND, id });
        }

        self.store
            .find_by_id(id)
            .await?
            .ok_or(SchoolError::NotFound { kind: T::KIND, id })
    }
}
