//! SQLite-backed entity stores.
//!
//! # Responsibility
//! - Implement `EntityStore` for projects, tasks and users over one migrated
//!   connection.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` keys, so they are never reused.
//! - Constructors reject connections that are not fully migrated.
//! - Read paths reject invalid persisted state instead of masking it.

use super::{EntityStore, RepoError, RepoResult, TaskStore};
use crate::db::migrations::latest_version;
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::user::User;
use crate::model::{EntityId, EntityKind};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;

/// One connection shared by the stores of every kind.
///
/// The mutex only serializes individual statements; per-kind consistency
/// is provided by the service layer locks.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Wraps a migrated connection for sharing between stores.
pub fn share_connection(conn: Connection) -> SharedConnection {
    Arc::new(Mutex::new(conn))
}

const PROJECT_COLUMNS: &[&str] = &["id", "name", "description", "created_at", "updated_at"];
const TASK_COLUMNS: &[&str] = &[
    "id",
    "title",
    "completed",
    "starts_at",
    "due_at",
    "project_id",
    "created_at",
    "updated_at",
];
const USER_COLUMNS: &[&str] = &["id", "name", "email", "active"];

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    created_at,
    updated_at
FROM projects";

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    completed,
    starts_at,
    due_at,
    project_id,
    created_at,
    updated_at
FROM tasks";

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    active
FROM users";

/// SQLite-backed project store.
pub struct SqliteProjectStore {
    conn: SharedConnection,
}

impl SqliteProjectStore {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: SharedConnection) -> RepoResult<Self> {
        ensure_table_ready(&conn.lock(), "projects", PROJECT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityStore<Project> for SqliteProjectStore {
    fn insert(&mut self, mut entity: Project) -> RepoResult<Project> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO projects (name, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                entity.name.as_str(),
                entity.description.as_deref(),
                entity.created_at,
                entity.updated_at,
            ],
        )?;
        entity.id = id_from_sql(conn.last_insert_rowid(), "projects.id")?;
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Project>> {
        let Some(sql_id) = id_to_sql(id) else {
            return Ok(None);
        };
        let conn = self.conn.lock();
        load_one(
            &conn,
            &format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"),
            sql_id,
            parse_project_row,
        )
    }

    fn update(
        &mut self,
        id: EntityId,
        mutator: &mut dyn FnMut(&mut Project),
    ) -> RepoResult<Project> {
        let mut project = self.find_by_id(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Project,
            id,
        })?;
        mutator(&mut project);
        assert_eq!(project.id, id, "project mutator changed the entity id");

        let changed = self.conn.lock().execute(
            "UPDATE projects
             SET
                name = ?2,
                description = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![
                sql_id_of(id)?,
                project.name.as_str(),
                project.description.as_deref(),
                project.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Project,
                id,
            });
        }
        Ok(project)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<bool> {
        delete_row(&self.conn.lock(), "projects", id)
    }

    fn all(&self) -> RepoResult<Vec<Project>> {
        let conn = self.conn.lock();
        load_all(
            &conn,
            &format!("{PROJECT_SELECT_SQL} ORDER BY id ASC;"),
            parse_project_row,
        )
    }

    fn len(&self) -> RepoResult<usize> {
        count_rows(&self.conn.lock(), "projects")
    }
}

/// SQLite-backed task store.
pub struct SqliteTaskStore {
    conn: SharedConnection,
}

impl SqliteTaskStore {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: SharedConnection) -> RepoResult<Self> {
        ensure_table_ready(&conn.lock(), "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityStore<Task> for SqliteTaskStore {
    fn insert(&mut self, mut entity: Task) -> RepoResult<Task> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (
                title,
                completed,
                starts_at,
                due_at,
                project_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                entity.title.as_str(),
                bool_to_int(entity.completed),
                entity.starts_at,
                entity.due_at,
                optional_sql_id(entity.project_id)?,
                entity.created_at,
                entity.updated_at,
            ],
        )?;
        entity.id = id_from_sql(conn.last_insert_rowid(), "tasks.id")?;
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Task>> {
        let Some(sql_id) = id_to_sql(id) else {
            return Ok(None);
        };
        let conn = self.conn.lock();
        load_one(
            &conn,
            &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
            sql_id,
            parse_task_row,
        )
    }

    fn update(&mut self, id: EntityId, mutator: &mut dyn FnMut(&mut Task)) -> RepoResult<Task> {
        let mut task = self.find_by_id(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::Task,
            id,
        })?;
        mutator(&mut task);
        assert_eq!(task.id, id, "task mutator changed the entity id");

        let changed = self.conn.lock().execute(
            "UPDATE tasks
             SET
                title = ?2,
                completed = ?3,
                starts_at = ?4,
                due_at = ?5,
                project_id = ?6,
                updated_at = ?7
             WHERE id = ?1;",
            params![
                sql_id_of(id)?,
                task.title.as_str(),
                bool_to_int(task.completed),
                task.starts_at,
                task.due_at,
                optional_sql_id(task.project_id)?,
                task.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }
        Ok(task)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<bool> {
        delete_row(&self.conn.lock(), "tasks", id)
    }

    fn all(&self) -> RepoResult<Vec<Task>> {
        let conn = self.conn.lock();
        load_all(
            &conn,
            &format!("{TASK_SELECT_SQL} ORDER BY id ASC;"),
            parse_task_row,
        )
    }

    fn len(&self) -> RepoResult<usize> {
        count_rows(&self.conn.lock(), "tasks")
    }
}

impl TaskStore for SqliteTaskStore {
    fn ids_referencing(&self, project_id: EntityId) -> RepoResult<Vec<EntityId>> {
        let Some(sql_id) = id_to_sql(project_id) else {
            return Ok(Vec::new());
        };
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id
             FROM tasks
             WHERE project_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([sql_id])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(id_from_sql(row.get(0)?, "tasks.id")?);
        }
        Ok(ids)
    }

    fn set_parent(&mut self, ids: &[EntityId], project_id: Option<EntityId>) -> RepoResult<()> {
        let parent = optional_sql_id(project_id)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for &id in ids {
            let changed = tx.execute(
                "UPDATE tasks SET project_id = ?2 WHERE id = ?1;",
                params![sql_id_of(id)?, parent],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: EntityKind::Task,
                    id,
                });
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// SQLite-backed user store.
pub struct SqliteUserStore {
    conn: SharedConnection,
}

impl SqliteUserStore {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: SharedConnection) -> RepoResult<Self> {
        ensure_table_ready(&conn.lock(), "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntityStore<User> for SqliteUserStore {
    fn insert(&mut self, mut entity: User) -> RepoResult<User> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (name, email, active) VALUES (?1, ?2, ?3);",
            params![
                entity.name.as_str(),
                entity.email.as_str(),
                bool_to_int(entity.active),
            ],
        )?;
        entity.id = id_from_sql(conn.last_insert_rowid(), "users.id")?;
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<User>> {
        let Some(sql_id) = id_to_sql(id) else {
            return Ok(None);
        };
        let conn = self.conn.lock();
        load_one(
            &conn,
            &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
            sql_id,
            parse_user_row,
        )
    }

    fn update(&mut self, id: EntityId, mutator: &mut dyn FnMut(&mut User)) -> RepoResult<User> {
        let mut user = self.find_by_id(id)?.ok_or(RepoError::NotFound {
            kind: EntityKind::User,
            id,
        })?;
        mutator(&mut user);
        assert_eq!(user.id, id, "user mutator changed the entity id");

        let changed = self.conn.lock().execute(
            "UPDATE users
             SET
                name = ?2,
                email = ?3,
                active = ?4
             WHERE id = ?1;",
            params![
                sql_id_of(id)?,
                user.name.as_str(),
                user.email.as_str(),
                bool_to_int(user.active),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::User,
                id,
            });
        }
        Ok(user)
    }

    fn delete(&mut self, id: EntityId) -> RepoResult<bool> {
        delete_row(&self.conn.lock(), "users", id)
    }

    fn all(&self) -> RepoResult<Vec<User>> {
        let conn = self.conn.lock();
        load_all(
            &conn,
            &format!("{USER_SELECT_SQL} ORDER BY id ASC;"),
            parse_user_row,
        )
    }

    fn len(&self) -> RepoResult<usize> {
        count_rows(&self.conn.lock(), "users")
    }
}

fn load_one<T>(
    conn: &Connection,
    sql: &str,
    id: i64,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse(row)?));
    }
    Ok(None)
}

fn load_all<T>(
    conn: &Connection,
    sql: &str,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

fn delete_row(conn: &Connection, table: &'static str, id: EntityId) -> RepoResult<bool> {
    let Some(sql_id) = id_to_sql(id) else {
        return Ok(false);
    };
    let changed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [sql_id])?;
    Ok(changed > 0)
}

fn count_rows(conn: &Connection, table: &'static str) -> RepoResult<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    usize::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("invalid row count `{count}` in {table}")))
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: id_from_sql(row.get("id")?, "projects.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let project_id = row
        .get::<_, Option<i64>>("project_id")?
        .map(|value| id_from_sql(value, "tasks.project_id"))
        .transpose()?;

    Ok(Task {
        id: id_from_sql(row.get("id")?, "tasks.id")?,
        title: row.get("title")?,
        completed: int_to_bool(row.get("completed")?, "tasks.completed")?,
        starts_at: row.get("starts_at")?,
        due_at: row.get("due_at")?,
        project_id,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: id_from_sql(row.get("id")?, "users.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        active: int_to_bool(row.get("active")?, "users.active")?,
    })
}

fn id_to_sql(id: EntityId) -> Option<i64> {
    i64::try_from(id).ok()
}

fn sql_id_of(id: EntityId) -> RepoResult<i64> {
    id_to_sql(id).ok_or_else(|| RepoError::InvalidData(format!("id `{id}` exceeds sqlite range")))
}

fn optional_sql_id(id: Option<EntityId>) -> RepoResult<Option<i64>> {
    id.map(sql_id_of).transpose()
}

fn id_from_sql(value: i64, column: &'static str) -> RepoResult<EntityId> {
    EntityId::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists = conn
        .query_row(
            "SELECT 1
             FROM sqlite_master
             WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
