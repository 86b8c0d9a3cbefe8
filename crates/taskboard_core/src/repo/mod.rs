//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the `EntityStore` capability shared by every backend.
//! - Provide in-memory and SQLite implementations of that capability.
//!
//! # Invariants
//! - Stores assign ids on insert; ids are monotonic and never reused.
//! - Stores do not validate; validation happens in the service layer.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   storage transport errors.

use crate::db::DbError;
use crate::model::task::Task;
use crate::model::{Entity, EntityId, EntityKind};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryStore, MemoryTaskStore};
pub use sqlite::{SharedConnection, SqliteProjectStore, SqliteTaskStore, SqliteUserStore};

/// One store behind its per-kind mutual-exclusion scope.
///
/// Every insert, update, delete and integrity sweep of a kind happens while
/// holding the write side of this lock.
pub type Shared<S> = Arc<RwLock<S>>;

/// Wraps a store into its shared lock.
pub fn shared<S>(store: S) -> Shared<S> {
    Arc::new(RwLock::new(store))
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target entity does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage capability for one entity kind.
///
/// Implementations hold the authoritative collection and the next-id
/// counter. Callers serialize access through [`Shared`].
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Assigns the next id, stores the entity and returns the stored copy.
    fn insert(&mut self, entity: E) -> RepoResult<E>;

    /// Loads one entity by id.
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;

    /// Applies `mutator` to the stored entity and returns the result.
    ///
    /// Returns `RepoError::NotFound` when `id` is absent. The mutator must
    /// not change the id.
    fn update(&mut self, id: EntityId, mutator: &mut dyn FnMut(&mut E)) -> RepoResult<E>;

    /// Removes one entity; returns whether it existed.
    fn delete(&mut self, id: EntityId) -> RepoResult<bool>;

    /// Returns every stored entity in insertion (id) order.
    fn all(&self) -> RepoResult<Vec<E>>;

    /// Returns the number of stored entities.
    fn len(&self) -> RepoResult<usize> {
        Ok(self.all()?.len())
    }

    /// Returns whether the store holds no entities.
    fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Task store with the narrow parent-reference surface used by the
/// referential integrity coordinator.
pub trait TaskStore: EntityStore<Task> {
    /// Ids of tasks whose `project_id` equals `project_id`, ascending.
    fn ids_referencing(&self, project_id: EntityId) -> RepoResult<Vec<EntityId>>;

    /// Sets `project_id` on the listed tasks without touching `updated_at`.
    fn set_parent(&mut self, ids: &[EntityId], project_id: Option<EntityId>) -> RepoResult<()>;
}
