//! Uniqueness guard for declared-unique fields.
//!
//! # Invariants
//! - A candidate never conflicts with the entity it is replacing
//!   (`excluding` is that entity's id on update).
//! - Values are compared exactly as stored. `A@B.com` and `a@b.com` are
//!   different values.

use super::error::ServiceError;
use crate::model::user::User;
use crate::model::{Entity, EntityId};

/// A field whose value must be unique across all entities of kind `E`.
pub trait UniqueField<E: Entity> {
    /// Field name used in conflict errors.
    const FIELD: &'static str;

    /// Returns the raw field value of one entity.
    fn value(entity: &E) -> &str;
}

/// User email uniqueness.
pub struct UserEmail;

impl UniqueField<User> for UserEmail {
    const FIELD: &'static str = "email";

    fn value(entity: &User) -> &str {
        &entity.email
    }
}

/// Returns `false` when any entity other than `excluding` already holds
/// `value` for field `F`.
pub fn check_unique<'a, E, F>(
    existing: impl IntoIterator<Item = &'a E>,
    value: &str,
    excluding: Option<EntityId>,
) -> bool
where
    E: Entity,
    F: UniqueField<E>,
{
    !existing
        .into_iter()
        .filter(|entity| Some(entity.id()) != excluding)
        .any(|entity| F::value(entity) == value)
}

/// Same as [`check_unique`], reporting a conflict as `ServiceError::Conflict`.
pub fn ensure_unique<'a, E, F>(
    existing: impl IntoIterator<Item = &'a E>,
    value: &str,
    excluding: Option<EntityId>,
) -> Result<(), ServiceError>
where
    E: Entity,
    F: UniqueField<E>,
{
    if check_unique::<E, F>(existing, value, excluding) {
        Ok(())
    } else {
        Err(ServiceError::Conflict {
            field: F::FIELD,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{check_unique, ensure_unique, UserEmail};
    use crate::model::user::User;
    use crate::service::error::ServiceError;

    fn user(id: u64, email: &str) -> User {
        User {
            id,
            name: format!("user {id}"),
            email: email.to_string(),
            active: true,
        }
    }

    #[test]
    fn detects_conflict_with_other_entities() {
        let users = vec![user(1, "a@b.com"), user(2, "c@d.com")];
        assert!(!check_unique::<User, UserEmail>(&users, "a@b.com", None));
        assert!(check_unique::<User, UserEmail>(&users, "new@b.com", None));
    }

    #[test]
    fn excluded_entity_does_not_conflict_with_itself() {
        let users = vec![user(1, "a@b.com"), user(2, "c@d.com")];
        assert!(check_unique::<User, UserEmail>(&users, "a@b.com", Some(1)));
        assert!(!check_unique::<User, UserEmail>(&users, "a@b.com", Some(2)));
    }

    #[test]
    fn comparison_is_exact() {
        let users = vec![user(1, "a@b.com")];
        assert!(check_unique::<User, UserEmail>(&users, "A@B.com", None));
        assert!(check_unique::<User, UserEmail>(&users, " a@b.com", None));

        let err = ensure_unique::<User, UserEmail>(&users, "a@b.com", None).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Conflict { field: "email", ref value } if value == "a@b.com"
        ));
    }
}
