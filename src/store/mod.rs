//! In-memory, insertion-ordered collections.
//!
//! A [`Store`] owns one `Vec` of records behind a lock. Every operation
//! takes the lock for a single synchronous statement and never across an
//! `.await`, so handlers mutate the store atomically relative to one another.
//! Concurrent writers to the same id are last-write-wins.

pub mod recipes;
pub mod shopping_list;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub use recipes::{Recipe, RecipeDraft};
pub use shopping_list::{ShoppingListDraft, ShoppingListItem};

/// Failures a store reports back to its router.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
}

/// An entity a [`Store`] can hold.
///
/// `Draft` is everything a client supplies: all fields except the id, which
/// the store always assigns.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    type Draft: DeserializeOwned + Send;

    /// Human-readable name used in logs and not-found messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    fn from_draft(id: Uuid, draft: Self::Draft) -> Self;
}

/// Shape-checks a JSON payload into a draft.
pub fn parse_draft<D: DeserializeOwned>(body: &[u8]) -> Result<D, StoreError> {
    serde_json::from_slice(body).map_err(|e| StoreError::Validation(e.to_string()))
}

/// Resolves a path segment to an id. Ids are handed out in canonical
/// lowercase hyphenated form, so anything else (including an uppercase
/// spelling of a live id) cannot name a record.
pub fn parse_id<T: Record>(raw: &str) -> Result<Uuid, StoreError> {
    raw.parse::<Uuid>()
        .ok()
        .filter(|id| id.to_string() == raw)
        .ok_or_else(|| StoreError::NotFound { kind: T::KIND, id: raw.to_owned() })
}

/// An ordered collection of `T` with list/create/update/remove.
pub struct Store<T> {
    items: RwLock<Vec<T>>,
}

impl<T: Record> Store<T> {
    pub fn new() -> Self {
        Self { items: RwLock::new(Vec::new()) }
    }

    /// A store pre-populated with `drafts`, in order.
    pub fn seeded(drafts: impl IntoIterator<Item = T::Draft>) -> Self {
        let store = Self::new();
        for draft in drafts {
            store.create(draft);
        }
        store
    }

    /// Every record in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Appends a record built from `draft` under a fresh id.
    pub fn create(&self, draft: T::Draft) -> T {
        let record = T::from_draft(Uuid::new_v4(), draft);
        self.write().push(record.clone());
        debug!(kind = T::KIND, id = %record.id(), "created");
        record
    }

    /// Replaces every field of the record with `id`, keeping its position.
    pub fn update(&self, id: Uuid, draft: T::Draft) -> Result<T, StoreError> {
        let record = T::from_draft(id, draft);
        let mut items = self.write();
        let slot = items.iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        *slot = record.clone();
        debug!(kind = T::KIND, %id, "updated");
        Ok(record)
    }

    pub fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut items = self.write();
        let index = items.iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))?;
        items.remove(index);
        debug!(kind = T::KIND, %id, "removed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic can only interrupt a single push/assign/remove, which leaves the
    // Vec consistent, so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self { Self::new() }
}

fn not_found<T: Record>(id: Uuid) -> StoreError {
    StoreError::NotFound { kind: T::KIND, id: id.to_string() }
}
