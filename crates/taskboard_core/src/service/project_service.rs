//! Project use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete entry points for projects.
//! - Route deletes through the integrity coordinator.
//!
//! # Invariants
//! - Deleting a project never deletes tasks; it detaches them.
//! - Delete holds the project write lock for its whole duration.

use super::error::{ServiceError, ServiceResult};
use super::integrity::IntegrityCoordinator;
use super::log_outcome;
use super::query;
use crate::clock::Clock;
use crate::model::project::{Project, ProjectInput};
use crate::model::task::Task;
use crate::model::{EntityId, EntityKind};
use crate::repo::{EntityStore, Shared, TaskStore};
use log::{info, warn};
use std::sync::Arc;

/// Façade for the project kind.
pub struct ProjectService<P, T>
where
    P: EntityStore<Project>,
    T: TaskStore,
{
    projects: Shared<P>,
    tasks: Shared<T>,
    integrity: IntegrityCoordinator<T>,
    clock: Arc<dyn Clock>,
}

impl<P, T> Clone for ProjectService<P, T>
where
    P: EntityStore<Project>,
    T: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            projects: self.projects.clone(),
            tasks: self.tasks.clone(),
            integrity: self.integrity.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<P, T> ProjectService<P, T>
where
    P: EntityStore<Project>,
    T: TaskStore,
{
    pub fn new(
        projects: Shared<P>,
        tasks: Shared<T>,
        integrity: IntegrityCoordinator<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            tasks,
            integrity,
            clock,
        }
    }

    /// Creates a project.
    pub fn create(&self, input: ProjectInput) -> ServiceResult<Project> {
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            let now = self.clock.now_epoch_ms();
            Ok(self.projects.write().insert(Project::from_input(input, now))?)
        });
        log_outcome("project_create", &result);
        result
    }

    /// Loads one project.
    pub fn get(&self, id: EntityId) -> ServiceResult<Project> {
        self.projects
            .read()
            .find_by_id(id)?
            .ok_or(ServiceError::not_found(EntityKind::Project, id))
    }

    /// Lists every project in id order.
    pub fn list(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.projects.read().all()?)
    }

    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.projects.read().len()?)
    }

    /// Tasks currently assigned to `id`.
    ///
    /// # Errors
    /// - `NotFound` when the project does not exist.
    pub fn tasks(&self, id: EntityId) -> ServiceResult<Vec<Task>> {
        let projects = self.projects.read();
        if projects.find_by_id(id)?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Project, id));
        }
        let tasks = self.tasks.read().all()?;
        Ok(query::by_parent(tasks, id))
    }

    /// Replaces name and description.
    pub fn update(&self, id: EntityId, input: ProjectInput) -> ServiceResult<Project> {
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            let now = self.clock.now_epoch_ms();
            Ok(self
                .projects
                .write()
                .update(id, &mut |project| project.apply(input.clone(), now))?)
        });
        log_outcome("project_update", &result);
        result
    }

    /// Deletes a project after detaching its tasks.
    ///
    /// Returns the ids of the tasks whose `project_id` was cleared.
    pub fn delete(&self, id: EntityId) -> ServiceResult<Vec<EntityId>> {
        let mut projects = self.projects.write();
        match self.integrity.delete_parent(&mut *projects, id) {
            Ok(detached) => {
                info!(
                    "event=project_delete module=service status=ok id={} tasks_detached={}",
                    id,
                    detached.len()
                );
                Ok(detached)
            }
            Err(err) => {
                warn!(
                    "event=project_delete module=service status=rejected id={} kind={:?} error={}",
                    id,
                    err.kind(),
                    err
                );
                Err(err)
            }
        }
    }
}
