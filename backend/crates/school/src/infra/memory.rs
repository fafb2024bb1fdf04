//! In-Memory Record Store
//!
//! Records live in a `BTreeMap` behind one `RwLock`; identifiers start at 1
//! and are never reused. Clones share the same map.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::records::Record;
use crate::domain::repository::RecordStore;
use crate::error::{SchoolError, SchoolResult};

#[derive(Debug)]
struct StoreState<T> {
    records: BTreeMap<i64, T>,
    next_id: i64,
}

/// Shared in-memory store for one record type
#[derive(Debug)]
pub struct MemoryStore<T> {
    state: Arc<RwLock<StoreState<T>>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                records: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }

    fn read(&self) -> SchoolResult<RwLockReadGuard<'_, StoreState<T>>> {
        self.state
            .read()
            .map_err(|_| SchoolError::Store("record store lock poisoned".to_string()))
    }

    fn write(&self) -> SchoolResult<RwLockWriteGuard<'_, StoreState<T>>> {
        self.state
            .write()
            .map_err(|_| SchoolError::Store("record store lock poisoned".to_string()))
    }

    pub fn len(&self) -> SchoolResult<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> SchoolResult<bool> {
        Ok(self.read()?.records.is_empty())
    }
}

impl<T: Record> MemoryStore<T> {
    /// First record (in identifier order) matching `predicate`
    pub fn find_first<P>(&self, predicate: P) -> SchoolResult<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.read()?.records.values().find(|r| predicate(*r)).cloned())
    }

    /// Insert all records under one write lock
    ///
    /// `check` sees each record before anything is written; an error aborts
    /// the whole batch.
    pub fn insert_all_checked<E, C>(&self, records: Vec<T>, check: C) -> Result<Vec<T>, E>
    where
        E: From<SchoolError>,
        C: Fn(&BTreeMap<i64, T>, &T) -> Result<(), E>,
    {
        let mut state = self.write()?;

        for record in &records {
            check(&state.records, record)?;
        }

        let mut inserted = Vec::with_capacity(records.len());
        for mut record in records {
            let id = state.next_id;
            state.next_id += 1;
            record.set_id(id);
            state.records.insert(id, record.clone());
            inserted.push(record);
        }

        Ok(inserted)
    }

    /// Replace a stored record under one write lock
    ///
    /// `check` sees the other stored records before the write; an error
    /// leaves the store unchanged.
    pub fn update_checked<E, C>(&self, record: T, check: C) -> Result<T, E>
    where
        E: From<SchoolError>,
        C: Fn(&BTreeMap<i64, T>, &T) -> Result<(), E>,
    {
        let mut state = self.write()?;
        let id = record.id();
        if !state.records.contains_key(&id) {
            return Err(SchoolError::NotFound { kind: T::KIND, id }.into());
        }

        check(&state.records, &record)?;
        state.records.insert(id, record.clone());
        Ok(record)
    }
}

fn reject_duplicates<T: Record>(records: &BTreeMap<i64, T>, record: &T) -> SchoolResult<()> {
    let taken = records
        .values()
        .filter(|other| other.id() != record.id())
        .find_map(|other| record.duplicate_field(other));

    match taken {
        Some(field) => Err(SchoolError::Duplicate {
            kind: T::KIND,
            field,
        }),
        None => Ok(()),
    }
}

impl<T: Record> RecordStore<T> for MemoryStore<T> {
    async fn find_by_id(&self, id: i64) -> SchoolResult<Option<T>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    async fn insert_many(&self, records: Vec<T>) -> SchoolResult<Vec<T>> {
        self.insert_all_checked(records, |_, _| Ok::<(), SchoolError>(()))
    }

    async fn update(&self, record: T) -> SchoolResult<T> {
        self.update_checked(record, reject_duplicates)
    }
}
