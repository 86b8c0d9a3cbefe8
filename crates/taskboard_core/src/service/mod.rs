//! Core use-case services.
//!
//! # Responsibility
//! - Compose validation, uniqueness, storage and integrity into per-kind
//!   façades.
//! - Keep transport adapters decoupled from storage details.

use crate::model::Entity;
use log::{info, warn};

pub mod catalog;
pub mod error;
pub mod integrity;
pub mod project_service;
pub mod query;
pub mod seed;
pub mod task_service;
pub mod uniqueness;
pub mod user_service;

pub use catalog::{Catalog, CatalogSnapshot, MemoryCatalog, SqliteCatalog};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use integrity::IntegrityCoordinator;
pub use project_service::ProjectService;
pub use query::{ProjectFilter, TaskListQuery};
pub use seed::{seed_sample_data, SeedReport};
pub use task_service::TaskService;
pub use uniqueness::{check_unique, ensure_unique, UniqueField, UserEmail};
pub use user_service::UserService;

fn log_outcome<E: Entity>(event: &str, result: &ServiceResult<E>) {
    match result {
        Ok(entity) => info!(
            "event={} module=service status=ok kind={} id={}",
            event,
            E::KIND,
            entity.id()
        ),
        Err(err) => warn!(
            "event={} module=service status=rejected kind={} error_kind={:?} error={}",
            event,
            E::KIND,
            err.kind(),
            err
        ),
    }
}
