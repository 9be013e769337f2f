//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use taskpulse_db::queries::tasks::{TaskCounts, TaskRow};

use crate::error::{TaskError, TaskResult};

/// A task as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a Task from a database row.
    pub fn from_row(row: TaskRow) -> TaskResult<Self> {
        Ok(Self {
            id: row.id,
            title: row.title,
            description: row.description,
            priority: Priority::try_from(row.priority)?,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Task priority. Serialized as its integer level (1, 2 or 3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric level as stored in the database.
    pub fn level(self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl TryFrom<i64> for Priority {
    type Error = TaskError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(TaskError::InvalidPriority(other)),
        }
    }
}

impl From<Priority> for i64 {
    fn from(p: Priority) -> Self {
        p.level()
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    /// Accepts either the name (`high`) or the level (`3`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "1" => Ok(Self::Low),
            "medium" | "2" => Ok(Self::Medium),
            "high" | "3" => Ok(Self::High),
            other => Err(TaskError::validation(format!(
                "Unknown priority '{}'. Valid priorities: low, medium, high",
                other
            ))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task statistics overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    /// Incomplete high-priority tasks.
    pub high_priority: i64,
    /// Incomplete medium-priority tasks.
    pub medium_priority: i64,
    /// Percentage of completed tasks, rounded. Zero when there are no tasks.
    pub completion_rate: i64,
}

impl TaskStats {
    pub fn from_counts(counts: TaskCounts) -> Self {
        let completion_rate = if counts.total > 0 {
            (counts.completed as f64 * 100.0 / counts.total as f64).round() as i64
        } else {
            0
        };

        Self {
            total: counts.total,
            completed: counts.completed,
            pending: counts.total - counts.completed,
            high_priority: counts.high_pending,
            medium_priority: counts.medium_pending,
            completion_rate,
        }
    }
}
