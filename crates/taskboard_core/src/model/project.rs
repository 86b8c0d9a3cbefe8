//! Project domain model.
//!
//! Projects own tasks by reference only. Deleting a project detaches its
//! tasks; it never deletes them.

use super::validation::{require_text, ValidationError, MAX_PROJECT_NAME_CHARS};
use super::{advance_updated_at, Entity, EntityId, EntityKind};
use serde::{Deserialize, Serialize};

/// Canonical stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Mutable field set of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectInput {
    /// Creates a project input without description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks field constraints without touching any store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, MAX_PROJECT_NAME_CHARS)
    }
}

impl Project {
    /// Builds an unsaved project (`id = 0`) from validated input.
    pub fn from_input(input: ProjectInput, created_at: i64) -> Self {
        Self {
            id: 0,
            name: input.name,
            description: input.description,
            created_at,
            updated_at: None,
        }
    }

    /// Replaces name and description, keeping `id` and `created_at`.
    pub fn apply(&mut self, input: ProjectInput, now: i64) {
        self.name = input.name;
        self.description = input.description;
        self.updated_at = Some(advance_updated_at(self.created_at, self.updated_at, now));
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
