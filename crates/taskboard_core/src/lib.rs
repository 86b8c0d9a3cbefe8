//! Domain core for the taskboard service.
//! Tasks, projects and users with validation, email uniqueness and
//! project/task referential integrity, over in-memory or SQLite storage.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CoreConfig, StorageConfig};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::project::{Project, ProjectInput};
pub use model::task::{Task, TaskInput};
pub use model::user::{User, UserInput};
pub use model::validation::ValidationError;
pub use model::{Entity, EntityId, EntityKind};
pub use repo::{EntityStore, RepoError, RepoResult, TaskStore};
pub use service::{
    seed_sample_data, Catalog, CatalogSnapshot, ErrorKind, MemoryCatalog, ProjectFilter,
    SeedReport, ServiceError, ServiceResult, SqliteCatalog, TaskListQuery,
};

/// Minimal health-check API for adapters.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
