//! Task domain model.
//!
//! # Responsibility
//! - Define the task record (the "item" kind) and its mutable input set.
//! - Validate title and scheduling window constraints.
//!
//! # Invariants
//! - `title` is non-blank and at most `MAX_TITLE_CHARS` characters.
//! - `starts_at < due_at` whenever both are set.
//! - `project_id`, when set, points to an existing project (enforced by the
//!   task service and the integrity coordinator, not by this type).

use super::validation::{require_schedule, require_text, ValidationError, MAX_TITLE_CHARS};
use super::{advance_updated_at, Entity, EntityId, EntityKind};
use serde::{Deserialize, Serialize};

/// Canonical stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned id.
    pub id: EntityId,
    pub title: String,
    pub completed: bool,
    /// Epoch ms of optional planned start.
    pub starts_at: Option<i64>,
    /// Epoch ms of optional deadline.
    pub due_at: Option<i64>,
    /// Owning project. `None` means unassigned.
    pub project_id: Option<EntityId>,
    /// Epoch ms creation timestamp; immutable.
    pub created_at: i64,
    /// Epoch ms of last field update; `None` until first update.
    pub updated_at: Option<i64>,
}

/// Mutable field set of a task, used for create and full-replacement update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub due_at: Option<i64>,
    #[serde(default)]
    pub project_id: Option<EntityId>,
}

impl TaskInput {
    /// Creates an incomplete, unassigned task input.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the completion flag.
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Assigns the task to a project.
    pub fn in_project(mut self, project_id: EntityId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the scheduling window.
    pub fn scheduled(mut self, starts_at: Option<i64>, due_at: Option<i64>) -> Self {
        self.starts_at = starts_at;
        self.due_at = due_at;
        self
    }

    /// Checks field constraints without touching any store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title, MAX_TITLE_CHARS)?;
        require_schedule(self.starts_at, self.due_at)
    }
}

impl Task {
    /// Builds an unsaved task (`id = 0`) from validated input.
    pub fn from_input(input: TaskInput, created_at: i64) -> Self {
        Self {
            id: 0,
            title: input.title,
            completed: input.completed,
            starts_at: input.starts_at,
            due_at: input.due_at,
            project_id: input.project_id,
            created_at,
            updated_at: None,
        }
    }

    /// Replaces the mutable field set, keeping `id` and `created_at`.
    pub fn apply(&mut self, input: TaskInput, now: i64) {
        self.title = input.title;
        self.completed = input.completed;
        self.starts_at = input.starts_at;
        self.due_at = input.due_at;
        self.project_id = input.project_id;
        self.updated_at = Some(advance_updated_at(self.created_at, self.updated_at, now));
    }

    /// Returns the mutable field set of this task.
    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            title: self.title.clone(),
            completed: self.completed,
            starts_at: self.starts_at,
            due_at: self.due_at,
            project_id: self.project_id,
        }
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
