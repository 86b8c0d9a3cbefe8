//! Wiring of stores, locks and façades.
//!
//! # Responsibility
//! - Own one shared lock per entity kind.
//! - Hand out façades that share those locks and one clock.
//! - Build in-memory and SQLite-backed catalogs.
//!
//! # Invariants
//! - Every façade of one catalog sees the same stores.
//! - Cross-kind reads take locks in the order projects, tasks.

use super::integrity::IntegrityCoordinator;
use super::project_service::ProjectService;
use super::task_service::TaskService;
use super::user_service::UserService;
use crate::clock::{Clock, SystemClock};
use crate::db::{open_db, open_db_in_memory};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::user::User;
use crate::repo::sqlite::share_connection;
use crate::repo::{
    shared, EntityStore, MemoryStore, MemoryTaskStore, RepoResult, Shared, SqliteProjectStore,
    SqliteTaskStore, SqliteUserStore, TaskStore,
};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Catalog over in-process collections.
pub type MemoryCatalog = Catalog<MemoryStore<Project>, MemoryTaskStore, MemoryStore<User>>;

/// Catalog over one migrated SQLite connection.
pub type SqliteCatalog = Catalog<SqliteProjectStore, SqliteTaskStore, SqliteUserStore>;

/// Consistent cross-kind view of projects and tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSnapshot {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

/// Stores of all kinds plus the façades composed over them.
pub struct Catalog<P, T, U>
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    projects: Shared<P>,
    tasks: Shared<T>,
    clock: Arc<dyn Clock>,
    task_service: TaskService<T, P>,
    project_service: ProjectService<P, T>,
    user_service: UserService<U>,
}

impl<P, T, U> Catalog<P, T, U>
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    /// Composes a catalog from empty or pre-populated stores.
    pub fn new(projects: P, tasks: T, users: U, clock: Arc<dyn Clock>) -> Self {
        let projects = shared(projects);
        let tasks = shared(tasks);
        let integrity = IntegrityCoordinator::new(tasks.clone());
        Self {
            task_service: TaskService::new(tasks.clone(), projects.clone(), clock.clone()),
            project_service: ProjectService::new(
                projects.clone(),
                tasks.clone(),
                integrity,
                clock.clone(),
            ),
            user_service: UserService::new(shared(users)),
            projects,
            tasks,
            clock,
        }
    }

    pub fn tasks(&self) -> &TaskService<T, P> {
        &self.task_service
    }

    pub fn projects(&self) -> &ProjectService<P, T> {
        &self.project_service
    }

    pub fn users(&self) -> &UserService<U> {
        &self.user_service
    }

    /// Clock stamping every write made through this catalog.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Reads projects and tasks under both read locks.
    ///
    /// No project delete or task write can interleave, so every
    /// `project_id` in the result names a project in the result.
    pub fn snapshot(&self) -> RepoResult<CatalogSnapshot> {
        let projects = self.projects.read();
        let tasks = self.tasks.read();
        Ok(CatalogSnapshot {
            projects: projects.all()?,
            tasks: tasks.all()?,
        })
    }
}

impl MemoryCatalog {
    /// Empty in-memory catalog on the system clock.
    pub fn in_memory() -> Self {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            MemoryStore::new(),
            MemoryTaskStore::new(),
            MemoryStore::new(),
            clock,
        )
    }
}

impl SqliteCatalog {
    /// Opens (creating if needed) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::from_connection(open_db(path)?, Arc::new(SystemClock))
    }

    /// Opens a migrated private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?, Arc::new(SystemClock))
    }

    /// Builds a catalog over an already migrated connection.
    ///
    /// # Errors
    /// - Schema readiness errors when the connection is not migrated.
    pub fn from_connection(conn: Connection, clock: Arc<dyn Clock>) -> RepoResult<Self> {
        let conn = share_connection(conn);
        Ok(Self::new(
            SqliteProjectStore::try_new(conn.clone())?,
            SqliteTaskStore::try_new(conn.clone())?,
            SqliteUserStore::try_new(conn)?,
            clock,
        ))
    }
}
