//! Task management.

pub mod model;

use crate::error::{TaskError, TaskResult};
use model::{Priority, Task, TaskStats};
use serde::{Deserialize, Deserializer};
use taskpulse_db::queries::tasks::{self as queries, TaskFilter, TaskPatch};
use taskpulse_db::{DbError, DbPool};

/// Input for creating a task.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

/// Partial task update. Absent fields are left unchanged.
///
/// `description` is `None` when absent and `Some(None)` when sent as `null`.
/// Both `null` and an empty string clear it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

/// Filter for listing tasks.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TaskQuery {
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

/// Marks a field as present, keeping an explicit `null` apart from absence.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn map_not_found(id: i64) -> impl FnOnce(DbError) -> TaskError {
    move |e| match e {
        DbError::NotFound(_) => TaskError::TaskNotFound(id),
        e => TaskError::Database(e),
    }
}

fn clean_description(description: Option<&str>) -> Option<&str> {
    description.map(str::trim).filter(|d| !d.is_empty())
}

fn validate_title(title: &str) -> TaskResult<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::validation("Task title is required"));
    }
    Ok(title)
}

/// Create a new task.
pub fn create_task(pool: &DbPool, new: &NewTask) -> TaskResult<Task> {
    let title = validate_title(&new.title)?;
    let description = clean_description(new.description.as_deref());

    let row = queries::insert_task(pool, title, description, new.priority.level())?;
    Task::from_row(row)
}

/// Get a task by ID.
pub fn get_task(pool: &DbPool, id: i64) -> TaskResult<Task> {
    let row = queries::get_task(pool, id).map_err(map_not_found(id))?;
    Task::from_row(row)
}

/// List tasks, newest first.
pub fn list_tasks(pool: &DbPool, query: TaskQuery) -> TaskResult<Vec<Task>> {
    let filter = TaskFilter {
        priority: query.priority.map(Priority::level),
        completed: query.completed,
    };
    queries::list_tasks(pool, filter)?
        .into_iter()
        .map(Task::from_row)
        .collect()
}

/// Apply a partial update to a task.
pub fn update_task(pool: &DbPool, id: i64, update: &TaskUpdate) -> TaskResult<Task> {
    let title = match update.title.as_deref() {
        Some(t) => Some(validate_title(t)?.to_string()),
        None => None,
    };

    let patch = TaskPatch {
        title,
        description: update
            .description
            .as_ref()
            .map(|d| clean_description(d.as_deref()).map(str::to_string)),
        priority: update.priority.map(Priority::level),
        completed: update.completed,
    };

    let row = queries::update_task(pool, id, &patch).map_err(map_not_found(id))?;
    Task::from_row(row)
}

/// Mark a task as completed (or reopen it).
pub fn set_completed(pool: &DbPool, id: i64, completed: bool) -> TaskResult<Task> {
    update_task(
        pool,
        id,
        &TaskUpdate {
            completed: Some(completed),
            ..Default::default()
        },
    )
}

/// Delete a task.
pub fn delete_task(pool: &DbPool, id: i64) -> TaskResult<()> {
    if !queries::delete_task(pool, id)? {
        return Err(TaskError::TaskNotFound(id));
    }
    Ok(())
}

/// Complete every open task. Returns the number of tasks updated.
pub fn complete_all(pool: &DbPool) -> TaskResult<usize> {
    Ok(queries::complete_all(pool)?)
}

/// Remove every completed task. Returns the number of tasks deleted.
pub fn clear_completed(pool: &DbPool) -> TaskResult<usize> {
    Ok(queries::delete_completed(pool)?)
}

/// Summary counts for the task list.
pub fn get_stats(pool: &DbPool) -> TaskResult<TaskStats> {
    let counts = queries::task_counts(pool)?;
    Ok(TaskStats::from_counts(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskpulse_db::init_memory_pool;

    fn new_task(title: &str, priority: Priority) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            priority,
        }
    }

    #[test]
    fn test_create_trims_and_validates() {
        let pool = init_memory_pool().unwrap();

        let task = create_task(
            &pool,
            &NewTask {
                title: "  Ship release ".to_string(),
                description: Some("   ".to_string()),
                priority: Priority::High,
            },
        )
        .unwrap();
        assert_eq!(task.title, "Ship release");
        assert_eq!(task.description, None);
        assert_eq!(task.priority, Priority::High);
        assert!(!task.completed);

        let err = create_task(&pool, &new_task("   ", Priority::Low)).unwrap_err();
        assert!(matches!(err, TaskError::ValidationError(_)));
    }

    #[test]
    fn test_new_task_defaults() {
        let new: NewTask = serde_json::from_str(r#"{"title":"Buy milk"}"#).unwrap();
        assert_eq!(new.priority, Priority::Low);
        assert_eq!(new.description, None);
    }

    #[test]
    fn test_get_missing_task() {
        let pool = init_memory_pool().unwrap();
        assert!(matches!(
            get_task(&pool, 5),
            Err(TaskError::TaskNotFound(5))
        ));
        assert!(matches!(
            delete_task(&pool, 5),
            Err(TaskError::TaskNotFound(5))
        ));
        assert!(matches!(
            set_completed(&pool, 5, true),
            Err(TaskError::TaskNotFound(5))
        ));
    }

    #[test]
    fn test_list_by_priority_and_completion() {
        let pool = init_memory_pool().unwrap();
        create_task(&pool, &new_task("low", Priority::Low)).unwrap();
        let high = create_task(&pool, &new_task("high", Priority::High)).unwrap();
        set_completed(&pool, high.id, true).unwrap();

        let highs = list_tasks(
            &pool,
            TaskQuery {
                priority: Some(Priority::High),
                completed: None,
            },
        )
        .unwrap();
        assert_eq!(highs.len(), 1);
        assert!(highs[0].completed);

        let open = list_tasks(
            &pool,
            TaskQuery {
                priority: None,
                completed: Some(false),
            },
        )
        .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "low");
    }

    #[test]
    fn test_update_clears_description() {
        let pool = init_memory_pool().unwrap();
        let task = create_task(
            &pool,
            &NewTask {
                title: "write".to_string(),
                description: Some("draft notes".to_string()),
                priority: Priority::Medium,
            },
        )
        .unwrap();

        let updated = update_task(
            &pool,
            task.id,
            &TaskUpdate {
                description: Some(Some(String::new())),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.priority, Priority::Medium);

        let err = update_task(
            &pool,
            task.id,
            &TaskUpdate {
                title: Some(" ".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::ValidationError(_)));
    }

    #[test]
    fn test_update_null_description_clears_it() {
        let pool = init_memory_pool().unwrap();
        let task = create_task(
            &pool,
            &NewTask {
                title: "write".to_string(),
                description: Some("draft notes".to_string()),
                priority: Priority::Low,
            },
        )
        .unwrap();

        let untouched: TaskUpdate = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        assert_eq!(untouched.description, None);
        let updated = update_task(&pool, task.id, &untouched).unwrap();
        assert_eq!(updated.description.as_deref(), Some("draft notes"));

        let cleared: TaskUpdate = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));
        let updated = update_task(&pool, task.id, &cleared).unwrap();
        assert_eq!(updated.description, None);
        assert!(updated.completed);

        let set: TaskUpdate = serde_json::from_str(r#"{"description":"final"}"#).unwrap();
        let updated = update_task(&pool, task.id, &set).unwrap();
        assert_eq!(updated.description.as_deref(), Some("final"));
    }

    #[test]
    fn test_stats_and_bulk_actions() {
        let pool = init_memory_pool().unwrap();
        create_task(&pool, &new_task("a", Priority::High)).unwrap();
        create_task(&pool, &new_task("b", Priority::Medium)).unwrap();

        let stats = get_stats(&pool).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.high_priority, 1);
        assert_eq!(stats.medium_priority, 1);
        assert_eq!(stats.completion_rate, 0);

        assert_eq!(complete_all(&pool).unwrap(), 2);
        let stats = get_stats(&pool).unwrap();
        assert_eq!(stats.completion_rate, 100);
        assert_eq!(stats.high_priority, 0);

        assert_eq!(clear_completed(&pool).unwrap(), 2);
        assert_eq!(get_stats(&pool).unwrap().total, 0);
    }
}
