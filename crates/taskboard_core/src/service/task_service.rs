//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete entry points for tasks.
//! - Validate input and the referenced project before any store mutation.
//! - Expose the status, project and pagination views of the query layer.
//!
//! # Invariants
//! - A task is only written while its referenced project is held under the
//!   project read lock, so a concurrent project delete cannot leave it
//!   pointing at a removed project.
//! - `id` and `created_at` never change after create.

use super::error::{ServiceError, ServiceResult};
use super::log_outcome;
use super::query::{self, TaskListQuery};
use crate::clock::Clock;
use crate::model::project::Project;
use crate::model::task::{Task, TaskInput};
use crate::model::{EntityId, EntityKind};
use crate::repo::{EntityStore, Shared, TaskStore};
use log::{info, warn};
use std::sync::Arc;

/// Façade for the task kind.
pub struct TaskService<T, P>
where
    T: TaskStore,
    P: EntityStore<Project>,
{
    tasks: Shared<T>,
    projects: Shared<P>,
    clock: Arc<dyn Clock>,
}

impl<T, P> Clone for TaskService<T, P>
where
    T: TaskStore,
    P: EntityStore<Project>,
{
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            projects: self.projects.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<T, P> TaskService<T, P>
where
    T: TaskStore,
    P: EntityStore<Project>,
{
    pub fn new(tasks: Shared<T>, projects: Shared<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    /// Creates a task.
    ///
    /// # Errors
    /// - `Validation` for a blank/oversized title or an inverted schedule.
    /// - `ParentNotFound` when `project_id` names a missing project.
    pub fn create(&self, input: TaskInput) -> ServiceResult<Task> {
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            let project_id = input.project_id;
            self.with_checked_parent(project_id, |tasks| {
                let now = self.clock.now_epoch_ms();
                Ok(tasks.insert(Task::from_input(input, now))?)
            })
        });
        log_outcome("task_create", &result);
        result
    }

    /// Loads one task.
    pub fn get(&self, id: EntityId) -> ServiceResult<Task> {
        self.tasks
            .read()
            .find_by_id(id)?
            .ok_or(ServiceError::not_found(EntityKind::Task, id))
    }

    /// Lists every task in id order.
    pub fn list(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.read().all()?)
    }

    /// Tasks whose completion flag equals `completed`.
    pub fn list_by_status(&self, completed: bool) -> ServiceResult<Vec<Task>> {
        Ok(query::by_status(self.list()?, completed))
    }

    /// Tasks of one project. An unknown project yields an empty list.
    pub fn list_by_project(&self, project_id: EntityId) -> ServiceResult<Vec<Task>> {
        Ok(query::by_parent(self.list()?, project_id))
    }

    /// Completed tasks, most recently updated first.
    pub fn completed(&self) -> ServiceResult<Vec<Task>> {
        Ok(query::completed_recent_first(self.list()?))
    }

    /// Pending tasks, oldest first.
    pub fn pending(&self) -> ServiceResult<Vec<Task>> {
        Ok(query::pending_oldest_first(self.list()?))
    }

    /// Lists tasks using filter and pagination options.
    pub fn query(&self, options: &TaskListQuery) -> ServiceResult<Vec<Task>> {
        Ok(query::apply(self.list()?, options))
    }

    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.tasks.read().len()?)
    }

    /// Replaces the mutable field set of a task.
    ///
    /// Checks run in order: field validation, parent existence, target
    /// existence. The first failure is returned and nothing is written.
    pub fn update(&self, id: EntityId, input: TaskInput) -> ServiceResult<Task> {
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            self.with_checked_parent(input.project_id, |tasks| {
                let now = self.clock.now_epoch_ms();
                Ok(tasks.update(id, &mut |task| task.apply(input.clone(), now))?)
            })
        });
        log_outcome("task_update", &result);
        result
    }

    /// Deletes a task.
    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        let existed = self.tasks.write().delete(id)?;
        if !existed {
            warn!("event=task_delete module=service status=rejected id={id} reason=not_found");
            return Err(ServiceError::not_found(EntityKind::Task, id));
        }
        info!("event=task_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Runs `write` under the task write lock, holding the project read
    /// lock first when `project_id` is set and the project exists.
    fn with_checked_parent<R>(
        &self,
        project_id: Option<EntityId>,
        write: impl FnOnce(&mut T) -> ServiceResult<R>,
    ) -> ServiceResult<R> {
        let _parent_guard = match project_id {
            Some(project_id) => {
                let projects = self.projects.read();
                if projects.find_by_id(project_id)?.is_none() {
                    return Err(ServiceError::ParentNotFound(project_id));
                }
                Some(projects)
            }
            None => None,
        };
        let mut tasks = self.tasks.write();
        write(&mut *tasks)
    }
}
