//! In-memory entity stores.
//!
//! # Responsibility
//! - Hold one kind's collection and next-id counter in process memory.
//! - Maintain the `project_id -> task ids` index for tasks.
//!
//! # Invariants
//! - Ids start at 1 and increase by one per insert, even across deletes.
//! - Map order equals insertion order because ids are monotonic.
//! - The task parent index mirrors `Task::project_id` for every stored task.

use super::{EntityStore, RepoError, RepoResult, TaskStore};
use crate::model::task::Task;
use crate::model::{Entity, EntityId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Generic ordered in-memory store.
#[derive(Debug, Clone)]
pub struct MemoryStore<E> {
    entities: BTreeMap<EntityId, E>,
    next_id: EntityId,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> MemoryStore<E> {
    /// Creates an empty store whose first id is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Id that the next insert will assign.
    pub fn next_id(&self) -> EntityId {
        self.next_id
    }

    fn get_mut(&mut self, id: EntityId) -> RepoResult<&mut E> {
        self.entities
            .get_mut(&id)
            .ok_or(RepoError::NotFound { kind: E::KIND, id })
    }
}

impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    fn insert(&mut self, mut entity: E) -> RepoResult<E> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .unwrap_or_else(|| panic!("{} id space exhausted", E::KIND));
        entity.set_id(id);
        let previous = self.entities.insert(id, entity.clone());
        assert!(
            previous.is_none(),
            "{} id {id} assigned twice; id counter is corrupted",
            E::KIND
        );
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        Ok(self.entities.get(&id).cloned())
    }

    fn update(&mut self, id: EntityId, mutator: &mut dyn FnMut(&mut E)) -> RepoResult<E> {
        let entity = self.get_mut(id)?;
        mutator(entity);
        assert_eq!(entity.id(), id, "{} mutator changed the entity id", E::KIND);
        Ok(entity.clone())
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<bool> {
        Ok(self.entities.remove(&id).is_some())
    }

    fn all(&self) -> RepoResult<Vec<E>> {
        Ok(self.entities.values().cloned().collect())
    }

    fn len(&self) -> RepoResult<usize> {
        Ok(self.entities.len())
    }
}

/// In-memory task store with a secondary index keyed by `project_id`.
///
/// The index makes the integrity sweep O(children of one project) instead of
/// a scan over every task.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: MemoryStore<Task>,
    children: HashMap<EntityId, BTreeSet<EntityId>>,
}

impl MemoryTaskStore {
    /// Creates an empty task store.
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&mut self, project_id: Option<EntityId>, task_id: EntityId) {
        if let Some(project_id) = project_id {
            self.children.entry(project_id).or_default().insert(task_id);
        }
    }

    fn unindex(&mut self, project_id: Option<EntityId>, task_id: EntityId) {
        let Some(project_id) = project_id else {
            return;
        };
        if let Some(ids) = self.children.get_mut(&project_id) {
            ids.remove(&task_id);
            if ids.is_empty() {
                self.children.remove(&project_id);
            }
        }
    }
}

impl EntityStore<Task> for MemoryTaskStore {
    fn insert(&mut self, entity: Task) -> RepoResult<Task> {
        let stored = self.tasks.insert(entity)?;
        self.index(stored.project_id, stored.id);
        Ok(stored)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Task>> {
        self.tasks.find_by_id(id)
    }

    fn update(&mut self, id: EntityId, mutator: &mut dyn FnMut(&mut Task)) -> RepoResult<Task> {
        let previous_parent = self.tasks.get_mut(id)?.project_id;
        let updated = self.tasks.update(id, mutator)?;
        if updated.project_id != previous_parent {
            self.unindex(previous_parent, id);
            self.index(updated.project_id, id);
        }
        Ok(updated)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<bool> {
        let Some(task) = self.tasks.find_by_id(id)? else {
            return Ok(false);
        };
        self.unindex(task.project_id, id);
        self.tasks.delete(id)
    }

    fn all(&self) -> RepoResult<Vec<Task>> {
        self.tasks.all()
    }

    fn len(&self) -> RepoResult<usize> {
        self.tasks.len()
    }
}

impl TaskStore for MemoryTaskStore {
    fn ids_referencing(&self, project_id: EntityId) -> RepoResult<Vec<EntityId>> {
        Ok(self
            .children
            .get(&project_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    fn set_parent(&mut self, ids: &[EntityId], project_id: Option<EntityId>) -> RepoResult<()> {
        for &id in ids {
            self.update(id, &mut |task| task.project_id = project_id)?;
        }
        Ok(())
    }
}
