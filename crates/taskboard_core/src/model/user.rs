//! User domain model.
//!
//! # Invariants
//! - `name` is non-blank.
//! - `email` is non-blank, contains `@`, and is unique across users
//!   (uniqueness is enforced by the user service, not by this type).

use super::validation::{require_email, require_text, ValidationError, MAX_USER_NAME_CHARS};
use super::{Entity, EntityId, EntityKind};
use serde::{Deserialize, Serialize};

/// Canonical stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub active: bool,
}

/// Mutable field set of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl UserInput {
    /// Creates an active user input.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            active: true,
        }
    }

    /// Sets the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Checks field constraints without touching any store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name, MAX_USER_NAME_CHARS)?;
        require_email(&self.email)
    }
}

impl User {
    /// Builds an unsaved user (`id = 0`) from validated input.
    pub fn from_input(input: UserInput) -> Self {
        Self {
            id: 0,
            name: input.name,
            email: input.email,
            active: input.active,
        }
    }

    /// Replaces the mutable field set, keeping `id`.
    pub fn apply(&mut self, input: UserInput) {
        self.name = input.name;
        self.email = input.email;
        self.active = input.active;
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
