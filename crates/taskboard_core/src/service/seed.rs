//! Demo data for fresh catalogs.
//!
//! Rows are inserted through the façades, so seeding obeys the same
//! validation, uniqueness and integrity rules as any caller.
//!
//! # Invariants
//! - A catalog that already holds any project, task or user is left
//!   untouched, so reopening a seeded database never duplicates rows.

use super::catalog::Catalog;
use super::error::ServiceResult;
use crate::model::project::{Project, ProjectInput};
use crate::model::task::TaskInput;
use crate::model::user::{User, UserInput};
use crate::model::EntityId;
use crate::repo::{EntityStore, TaskStore};
use log::info;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Ids of the rows created by [`seed_sample_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub projects: Vec<EntityId>,
    pub tasks: Vec<EntityId>,
    pub users: Vec<EntityId>,
}

impl SeedReport {
    /// True when seeding was skipped.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.tasks.is_empty() && self.users.is_empty()
    }
}

/// Inserts one project, two scheduled tasks and three users into an
/// empty catalog.
///
/// Task windows start at the catalog clock's current time. The third user
/// is inactive. Returns an empty report when the catalog has data.
pub fn seed_sample_data<P, T, U>(catalog: &Catalog<P, T, U>) -> ServiceResult<SeedReport>
where
    P: EntityStore<Project>,
    T: TaskStore,
    U: EntityStore<User>,
{
    let existing =
        catalog.projects().count()? + catalog.tasks().count()? + catalog.users().count()?;
    if existing > 0 {
        info!("event=seed module=service status=skipped existing_rows={existing}");
        return Ok(SeedReport::default());
    }

    let now = catalog.clock().now_epoch_ms();

    let project = catalog.projects().create(
        ProjectInput::new("Onboarding").described("Sample project created by the seeder"),
    )?;

    let tasks = [
        TaskInput::new("Complete project documentation")
            .scheduled(Some(now), Some(now + 5 * DAY_MS))
            .in_project(project.id),
        TaskInput::new("Review team code").scheduled(Some(now), Some(now + 2 * DAY_MS)),
    ]
    .into_iter()
    .map(|input| catalog.tasks().create(input).map(|task| task.id))
    .collect::<ServiceResult<Vec<_>>>()?;

    let users = [
        UserInput::new("Juan Pérez", "juan@ejemplo.com"),
        UserInput::new("María López", "maria@ejemplo.com"),
        UserInput::new("Carlos Ruiz", "carlos@ejemplo.com").active(false),
    ]
    .into_iter()
    .map(|input| catalog.users().create(input).map(|user| user.id))
    .collect::<ServiceResult<Vec<_>>>()?;

    info!(
        "event=seed module=service status=ok projects=1 tasks={} users={}",
        tasks.len(),
        users.len()
    );
    Ok(SeedReport {
        projects: vec![project.id],
        tasks,
        users,
    })
}
