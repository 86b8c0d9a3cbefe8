//! Domain model for tasks, projects and users.
//!
//! # Responsibility
//! - Define canonical entity records and their mutable input payloads.
//! - Keep field constraints next to the data they constrain.
//!
//! # Invariants
//! - Every entity is identified by an `EntityId` assigned by its store.
//! - Ids are never reused within one kind, even after deletion.
//! - `created_at` is written once; `updated_at` only moves forward.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod project;
pub mod task;
pub mod user;
pub mod validation;

/// Store-assigned identifier, unique within one entity kind.
pub type EntityId = u64;

/// Entity kinds managed by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Project,
    User,
}

impl EntityKind {
    /// Stable lowercase name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Project => "project",
            Self::User => "user",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior shared by every stored record.
///
/// Stores use `set_id` exactly once, at insert time. Callers outside the
/// repository layer never assign ids.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Kind tag of this entity type.
    const KIND: EntityKind;

    /// Returns the store-assigned id (`0` before insertion).
    fn id(&self) -> EntityId;

    /// Assigns the store id.
    fn set_id(&mut self, id: EntityId);
}

/// Moves an optional `updated_at` forward to `now`.
///
/// The result never goes below `created_at` or the previous `updated_at`,
/// even when the clock steps backwards.
pub(crate) fn advance_updated_at(created_at: i64, updated_at: Option<i64>, now: i64) -> i64 {
    let floor = updated_at.unwrap_or(created_at).max(created_at);
    now.max(floor)
}

#[cfg(test)]
mod tests {
    use super::advance_updated_at;

    #[test]
    fn updated_at_never_moves_backwards() {
        assert_eq!(advance_updated_at(100, None, 150), 150);
        assert_eq!(advance_updated_at(100, Some(200), 150), 200);
        assert_eq!(advance_updated_at(100, None, 50), 100);
    }
}
