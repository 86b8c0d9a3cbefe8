//! Referential integrity between projects and their tasks.
//!
//! # Responsibility
//! - Clear `project_id` on every task that references a project being deleted.
//! - Remove the project inside the same critical section as the sweep.
//!
//! # Invariants
//! - Lock order is projects, then tasks. Callers hand in the project store
//!   they already hold for writing; the coordinator takes the task lock.
//! - After a successful delete no task references the removed project.
//! - A failed parent removal re-attaches the swept tasks before returning.

use super::error::{ServiceError, ServiceResult};
use crate::model::project::Project;
use crate::model::{EntityId, EntityKind};
use crate::repo::{EntityStore, Shared, TaskStore};
use log::{error, info};

/// Coordinates parent deletion with the task store.
///
/// Holds only the narrow [`TaskStore`] surface; it never sees other task
/// fields or other stores.
pub struct IntegrityCoordinator<T: TaskStore> {
    tasks: Shared<T>,
}

impl<T: TaskStore> Clone for IntegrityCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
        }
    }
}

impl<T: TaskStore> IntegrityCoordinator<T> {
    pub fn new(tasks: Shared<T>) -> Self {
        Self { tasks }
    }

    /// Detaches every task from `project_id`, then deletes the project.
    ///
    /// `projects` must be the write-guarded project store. Returns the ids
    /// of the detached tasks.
    ///
    /// # Errors
    /// - `NotFound` when the project does not exist; nothing is touched.
    /// - Store errors from the sweep or the removal. Both leave task
    ///   references as they were before the call.
    pub fn delete_parent<P>(
        &self,
        projects: &mut P,
        project_id: EntityId,
    ) -> ServiceResult<Vec<EntityId>>
    where
        P: EntityStore<Project> + ?Sized,
    {
        if projects.find_by_id(project_id)?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Project, project_id));
        }

        let mut tasks = self.tasks.write();
        let swept = tasks.ids_referencing(project_id)?;
        tasks.set_parent(&swept, None)?;

        match projects.delete(project_id) {
            Ok(true) => {}
            Ok(false) => panic!(
                "project {project_id} vanished while its store was locked for delete"
            ),
            Err(err) => {
                if let Err(restore_err) = tasks.set_parent(&swept, Some(project_id)) {
                    error!(
                        "event=integrity_restore module=integrity status=error project_id={} tasks={} error={}",
                        project_id,
                        swept.len(),
                        restore_err
                    );
                }
                return Err(err.into());
            }
        }

        let leftover = tasks.ids_referencing(project_id)?;
        assert!(
            leftover.is_empty(),
            "tasks {leftover:?} still reference deleted project {project_id}"
        );

        info!(
            "event=integrity_sweep module=integrity status=ok project_id={} tasks_detached={}",
            project_id,
            swept.len()
        );
        Ok(swept)
    }
}

#[cfg(test)]
mod tests {
    use super::IntegrityCoordinator;
    use crate::model::project::{Project, ProjectInput};
    use crate::model::task::{Task, TaskInput};
    use crate::repo::{shared, EntityStore, MemoryStore, MemoryTaskStore, TaskStore};
    use crate::service::error::ServiceError;

    #[test]
    fn delete_parent_detaches_children_only() {
        let mut projects = MemoryStore::<Project>::new();
        let p1 = projects
            .insert(Project::from_input(ProjectInput::new("p1"), 1))
            .unwrap();
        let p2 = projects
            .insert(Project::from_input(ProjectInput::new("p2"), 1))
            .unwrap();

        let tasks = shared(MemoryTaskStore::new());
        {
            let mut guard = tasks.write();
            for (title, parent) in [("a", p1.id), ("b", p2.id), ("c", p1.id)] {
                guard
                    .insert(Task::from_input(TaskInput::new(title).in_project(parent), 1))
                    .unwrap();
            }
        }

        let coordinator = IntegrityCoordinator::new(tasks.clone());
        let swept = coordinator.delete_parent(&mut projects, p1.id).unwrap();
        assert_eq!(swept, vec![1, 3]);
        assert!(projects.find_by_id(p1.id).unwrap().is_none());

        let guard = tasks.read();
        assert_eq!(guard.find_by_id(1).unwrap().unwrap().project_id, None);
        assert_eq!(guard.find_by_id(2).unwrap().unwrap().project_id, Some(p2.id));
        assert!(guard.ids_referencing(p1.id).unwrap().is_empty());
    }

    #[test]
    fn delete_parent_missing_project_is_not_found() {
        let mut projects = MemoryStore::<Project>::new();
        let coordinator = IntegrityCoordinator::new(shared(MemoryTaskStore::new()));
        let err = coordinator.delete_parent(&mut projects, 5).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 5, .. }));
    }
}
