//! TaskPulse Database Layer
//!
//! SQLite persistence for the task table. The pool serialises access to a
//! single connection; all query functions are synchronous and cheap.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{DbError, DbPool, DbResult};

use std::path::Path;
use tracing::info;

/// Open (or create) the database at `path` and bring its schema up to date.
pub fn init_pool(path: &Path) -> DbResult<DbPool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::Io(format!("{}: {}", parent.display(), e)))?;
        }
    }

    let pool = DbPool::open(path)?;
    migrations::run_migrations(&pool)?;
    info!(path = %path.display(), "Database ready");
    Ok(pool)
}

/// In-memory database with migrations applied. Used by tests.
pub fn init_memory_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    migrations::run_migrations(&pool)?;
    Ok(pool)
}
