//! Read-only derived views over task collections.
//!
//! # Invariants
//! - Filters are pure and work on the snapshot handed to them; there is no
//!   caching, so results always reflect the store at call time.
//! - Input order (id ascending) is preserved unless a function documents
//!   its own ordering.

use crate::model::task::Task;
use crate::model::EntityId;
use std::cmp::Reverse;

/// Project membership filter for task listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectFilter {
    /// No constraint on `project_id`.
    #[default]
    Any,
    /// Only tasks without a project.
    Unassigned,
    /// Only tasks of one project.
    Assigned(EntityId),
}

impl ProjectFilter {
    fn matches(self, project_id: Option<EntityId>) -> bool {
        match self {
            Self::Any => true,
            Self::Unassigned => project_id.is_none(),
            Self::Assigned(id) => project_id == Some(id),
        }
    }
}

/// Composable task list options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
    pub project: ProjectFilter,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Tasks whose completion flag equals `completed`.
pub fn by_status(tasks: impl IntoIterator<Item = Task>, completed: bool) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| task.completed == completed)
        .collect()
}

/// Tasks whose `project_id` equals `project_id`.
pub fn by_parent(tasks: impl IntoIterator<Item = Task>, project_id: EntityId) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| task.project_id == Some(project_id))
        .collect()
}

/// Completed tasks, most recently updated first.
///
/// Never-updated tasks sort last; ties keep id order.
pub fn completed_recent_first(tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
    let mut items = by_status(tasks, true);
    items.sort_by_key(|task| (Reverse(task.updated_at), task.id));
    items
}

/// Pending tasks, oldest first by `created_at`.
pub fn pending_oldest_first(tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
    let mut items = by_status(tasks, false);
    items.sort_by_key(|task| (task.created_at, task.id));
    items
}

/// Applies filter and pagination options.
pub fn apply(tasks: impl IntoIterator<Item = Task>, query: &TaskListQuery) -> Vec<Task> {
    let filtered = tasks
        .into_iter()
        .filter(|task| query.completed.map_or(true, |done| task.completed == done))
        .filter(|task| query.project.matches(task.project_id))
        .skip(query.offset);
    match query.limit {
        Some(limit) => filtered.take(limit).collect(),
        None => filtered.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        apply, by_parent, by_status, completed_recent_first, pending_oldest_first,
        ProjectFilter, TaskListQuery,
    };
    use crate::model::task::Task;

    fn task(id: u64, completed: bool, project_id: Option<u64>, created_at: i64) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            completed,
            starts_at: None,
            due_at: None,
            project_id,
            created_at,
            updated_at: None,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, false, Some(1), 30),
            task(2, true, Some(1), 10),
            task(3, false, None, 20),
            task(4, true, Some(2), 40),
        ]
    }

    #[test]
    fn status_and_parent_filters() {
        assert_eq!(ids(&by_status(sample(), true)), vec![2, 4]);
        assert_eq!(ids(&by_status(sample(), false)), vec![1, 3]);
        assert_eq!(ids(&by_parent(sample(), 1)), vec![1, 2]);
        assert!(by_parent(sample(), 9).is_empty());
    }

    #[test]
    fn completed_sorts_by_updated_desc_with_never_updated_last() {
        let mut tasks = sample();
        tasks[1].updated_at = Some(100);
        tasks.push(Task {
            updated_at: Some(200),
            ..task(5, true, None, 50)
        });
        assert_eq!(ids(&completed_recent_first(tasks)), vec![5, 2, 4]);
    }

    #[test]
    fn pending_sorts_by_created_asc() {
        assert_eq!(ids(&pending_oldest_first(sample())), vec![3, 1]);
    }

    #[test]
    fn list_query_combines_filters_and_pagination() {
        let query = TaskListQuery {
            project: ProjectFilter::Unassigned,
            ..TaskListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &query)), vec![3]);

        let query = TaskListQuery {
            completed: Some(true),
            project: ProjectFilter::Assigned(2),
            ..TaskListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &query)), vec![4]);

        let query = TaskListQuery {
            limit: Some(2),
            offset: 1,
            ..TaskListQuery::default()
        };
        assert_eq!(ids(&apply(sample(), &query)), vec![2, 3]);
    }
}
