//! Patch Record Use Case
//!
//! Looks the record up by the patch document's identifier, merges the set
//! fields onto it and saves the result. A missing record is reported before
//! any merge happens.

use std::sync::Arc;

use kernel::patch::merge;

use crate::domain::records::Record;
use crate::domain::repository::RecordStore;
use crate::error::{SchoolError, SchoolResult};

pub struct PatchRecordUseCase<S> {
    store: Arc<S>,
}

impl<S> PatchRecordUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute<T>(&self, patch: T) -> SchoolResult<T>
    where
        T: Record,
        S: RecordStore<T>,
    {
        let id = patch.id();
        if id <= 0 {
            return Err(SchoolError::InvalidId { kind: T::KIND, id });
        }

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(SchoolError::NotFound { kind: T::KIND, id })?;

        let fields = patch.set_fields();
        let updated = self.store.update(merge(existing, patch)).await?;

        tracing::info!(kind = T::KIND, id, fields = ?fields, "Record patched");

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::Teacher;
    use crate::infra::memory::MemoryStore;

    async fn seeded() -> (Arc<MemoryStore<Teacher>>, Teacher) {
        let store = Arc::new(MemoryStore::new());
        let created = store
            .insert_many(vec![Teacher {
                first_name: "A".into(),
                last_name: "B".into(),
                class: "9C".into(),
                subject: "History".into(),
                email: "ab@example.net".into(),
                ..Default::default()
            }])
            .await
            .unwrap();
        (store, created[0].clone())
    }

    #[tokio::test]
    async fn test_patch_merges_and_saves() {
        let (store, existing) = seeded().await;
        let use_case = PatchRecordUseCase::new(Arc::clone(&store));

        let patch = Teacher {
            id: existing.id,
            last_name: "C".into(),
            ..Default::default()
        };
        let updated = use_case.execute(patch).await.unwrap();

        assert_eq!(updated.first_name, "A");
        assert_eq!(updated.last_name, "C");
        assert_eq!(store.find_by_id(existing.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_record_unchanged() {
        let (store, existing) = seeded().await;
        let use_case = PatchRecordUseCase::new(store);

        let patch = Teacher {
            id: existing.id,
            ..Default::default()
        };
        assert_eq!(use_case.execute(patch).await.unwrap(), existing);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let (store, _) = seeded().await;
        let use_case = PatchRecordUseCase::new(store);

        let patch = Teacher {
            id: 42,
            first_name: "X".into(),
            ..Default::default()
        };
        let result = use_case.execute(patch).await;
        assert!(matches!(result, Err(SchoolError::NotFound { kind: "teacher", id: 42 })));
    }

    #[tokio::test]
    async fn test_non_positive_id_is_rejected() {
        let (store, _) = seeded().await;
        let use_case = PatchRecordUseCase::new(store);

        for id in [0, -1] {
            let patch = Teacher {
                id,
                first_name: "X".into(),
                ..Default::default()
            };
            assert!(matches!(
                use_case.execute(patch).await,
                Err(SchoolError::InvalidId { .. })
            ));
        }
    }
}
