//! User use-case service.
//!
//! # Responsibility
//! - Provide create/read/update/delete entry points for users.
//! - Enforce email uniqueness through the uniqueness guard.
//!
//! # Invariants
//! - Uniqueness is checked and the write is applied under one write lock,
//!   so two concurrent creates cannot both claim the same email.

use super::error::{ServiceError, ServiceResult};
use super::log_outcome;
use super::uniqueness::{ensure_unique, UserEmail};
use crate::model::user::{User, UserInput};
use crate::model::{EntityId, EntityKind};
use crate::repo::{EntityStore, Shared};
use log::{info, warn};

/// Façade for the user kind.
pub struct UserService<U: EntityStore<User>> {
    users: Shared<U>,
}

impl<U: EntityStore<User>> Clone for UserService<U> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
        }
    }
}

impl<U: EntityStore<User>> UserService<U> {
    pub fn new(users: Shared<U>) -> Self {
        Self { users }
    }

    /// Creates a user.
    ///
    /// # Errors
    /// - `Validation` for a blank name or an email without `@`.
    /// - `Conflict` when another user already holds the email.
    pub fn create(&self, input: UserInput) -> ServiceResult<User> {
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            let mut users = self.users.write();
            ensure_unique::<User, UserEmail>(&users.all()?, &input.email, None)?;
            Ok(users.insert(User::from_input(input))?)
        });
        log_outcome("user_create", &result);
        result
    }

    /// Loads one user.
    pub fn get(&self, id: EntityId) -> ServiceResult<User> {
        self.users
            .read()
            .find_by_id(id)?
            .ok_or(ServiceError::not_found(EntityKind::User, id))
    }

    /// Lists every user in id order.
    pub fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.read().all()?)
    }

    /// Users whose `active` flag equals `active`.
    pub fn list_by_active(&self, active: bool) -> ServiceResult<Vec<User>> {
        let mut users = self.list()?;
        users.retain(|user| user.active == active);
        Ok(users)
    }

    pub fn count(&self) -> ServiceResult<usize> {
        Ok(self.users.read().len()?)
    }

    /// Replaces name, email and active flag.
    ///
    /// A user keeping its own email never conflicts with itself.
    pub fn update(&self, id: EntityId, input: UserInput) -> ServiceResult<User> {
        let result = input.validate().map_err(ServiceError::from).and_then(|()| {
            let mut users = self.users.write();
            ensure_unique::<User, UserEmail>(&users.all()?, &input.email, Some(id))?;
            Ok(users.update(id, &mut |user| user.apply(input.clone()))?)
        });
        log_outcome("user_update", &result);
        result
    }

    /// Deletes a user.
    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        let existed = self.users.write().delete(id)?;
        if !existed {
            warn!("event=user_delete module=service status=rejected id={id} reason=not_found");
            return Err(ServiceError::not_found(EntityKind::User, id));
        }
        info!("event=user_delete module=service status=ok id={id}");
        Ok(())
    }
}
