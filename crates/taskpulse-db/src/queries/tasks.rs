//! Task-related database queries.

use crate::pool::{DbError, DbPool, DbResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

const TASK_COLUMNS: &str =
    "id, title, description, priority, completed, created_at, updated_at";

/// Task row from database.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn from_sql(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            priority: row.get(3)?,
            completed: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Optional filters for listing tasks. `None` matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub priority: Option<i64>,
    pub completed: Option<bool>,
}

/// Partial update. `None` leaves a column untouched; `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<i64>,
    pub completed: Option<bool>,
}

/// Aggregate counts over the task table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: i64,
    pub completed: i64,
    pub high_pending: i64,
    pub medium_pending: i64,
}

/// Insert a task and return the stored row.
pub fn insert_task(
    pool: &DbPool,
    title: &str,
    description: Option<&str>,
    priority: i64,
) -> DbResult<TaskRow> {
    let now = Utc::now();
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO tasks (title, description, priority, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?4)",
            params![title, description, priority, now],
        )?;
        let id = conn.last_insert_rowid();
        fetch(conn, id)
    })
}

/// Get a task by ID.
pub fn get_task(pool: &DbPool, id: i64) -> DbResult<TaskRow> {
    pool.with_conn(|conn| fetch(conn, id))
}

fn fetch(conn: &rusqlite::Connection, id: i64) -> DbResult<TaskRow> {
    conn.query_row(
        &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
        params![id],
        TaskRow::from_sql,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("Task: {}", id)),
        e => DbError::Connection(e),
    })
}

/// List tasks, newest first.
pub fn list_tasks(pool: &DbPool, filter: TaskFilter) -> DbResult<Vec<TaskRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks
             WHERE (?1 IS NULL OR priority = ?1)
               AND (?2 IS NULL OR completed = ?2)
             ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        ))?;

        let rows = stmt.query_map(params![filter.priority, filter.completed], TaskRow::from_sql)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Apply a partial update and return the new row.
pub fn update_task(pool: &DbPool, id: i64, patch: &TaskPatch) -> DbResult<TaskRow> {
    let now = Utc::now();
    let (set_description, description) = match &patch.description {
        Some(d) => (true, d.as_deref()),
        None => (false, None),
    };

    pool.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE tasks SET
                title = COALESCE(?1, title),
                description = CASE WHEN ?2 THEN ?3 ELSE description END,
                priority = COALESCE(?4, priority),
                completed = COALESCE(?5, completed),
                updated_at = ?6
             WHERE id = ?7",
            params![
                patch.title,
                set_description,
                description,
                patch.priority,
                patch.completed,
                now,
                id
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("Task: {}", id)));
        }
        fetch(conn, id)
    })
}

/// Delete a task. Returns `false` when no such task existed.
pub fn delete_task(pool: &DbPool, id: i64) -> DbResult<bool> {
    pool.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    })
}

/// Mark every incomplete task as completed. Returns the number of rows touched.
pub fn complete_all(pool: &DbPool) -> DbResult<usize> {
    let now = Utc::now();
    pool.with_conn(|conn| {
        conn.execute(
            "UPDATE tasks SET completed = 1, updated_at = ?1 WHERE completed = 0",
            params![now],
        )
        .map_err(DbError::from)
    })
}

/// Delete all completed tasks. Returns the number of deleted rows.
pub fn delete_completed(pool: &DbPool) -> DbResult<usize> {
    pool.with_conn(|conn| {
        conn.execute("DELETE FROM tasks WHERE completed = 1", [])
            .map_err(DbError::from)
    })
}

/// Count tasks for the statistics panel.
pub fn task_counts(pool: &DbPool) -> DbResult<TaskCounts> {
    pool.with_conn(|conn| {
        conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(completed), 0),
                    COALESCE(SUM(CASE WHEN priority = 3 AND completed = 0 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN priority = 2 AND completed = 0 THEN 1 ELSE 0 END), 0)
             FROM tasks",
            [],
            |row| {
                Ok(TaskCounts {
                    total: row.get(0)?,
                    completed: row.get(1)?,
                    high_pending: row.get(2)?,
                    medium_pending: row.get(3)?,
                })
            },
        )
        .map_err(DbError::from)
    })
}
