//! Task management commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;
use taskpulse_core::notifier::{WebNotifier, DEFAULT_WEB_URL};
use taskpulse_core::task::{self, NewTask, TaskQuery};
use taskpulse_core::Priority;

use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a new task
    New(NewTaskArgs),

    /// List tasks
    List(ListArgs),

    /// Mark a task as completed
    Done {
        /// Task ID
        id: i64,
    },

    /// Mark a completed task as open again
    Reopen {
        /// Task ID
        id: i64,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },

    /// Show task statistics
    Stats,

    /// Mark every open task as completed
    CompleteAll,

    /// Delete every completed task
    ClearCompleted,
}

#[derive(Args)]
pub struct NewTaskArgs {
    /// Task title
    pub title: String,

    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority (low, medium, high or 1-3)
    #[arg(short, long, default_value = "low")]
    pub priority: Priority,

    /// Server to notify about high-priority tasks
    #[arg(long, env = "TASKPULSE_WEB_URL", default_value = DEFAULT_WEB_URL)]
    pub notify_url: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks with this priority
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Only completed tasks
    #[arg(long, conflicts_with = "open")]
    pub completed: bool,

    /// Only open tasks
    #[arg(long)]
    pub open: bool,
}

pub async fn execute(cmd: TaskCommands, db_path: &Path) -> Result<()> {
    let pool = taskpulse_db::init_pool(db_path)?;

    match cmd {
        TaskCommands::New(args) => {
            let task = task::create_task(
                &pool,
                &NewTask {
                    title: args.title,
                    description: args.description,
                    priority: args.priority,
                },
            )?;

            println!(
                "{} Created task: {} ({})",
                "✓".green().bold(),
                task.title.cyan(),
                format!("#{}", task.id).dimmed()
            );

            if task.priority.is_high() {
                let notified = WebNotifier::with_url(&args.notify_url)
                    .notify_task_created(&task)
                    .await;
                if notified {
                    println!("  {}", "Connected clients notified".dimmed());
                }
            }
        }

        TaskCommands::List(args) => {
            let completed = match (args.completed, args.open) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let tasks = task::list_tasks(
                &pool,
                TaskQuery {
                    priority: args.priority,
                    completed,
                },
            )?;
            output::print_tasks_table(&tasks);
        }

        TaskCommands::Done { id } => {
            let task = task::set_completed(&pool, id, true)?;
            println!("{} Completed: {}", "✓".green().bold(), task.title.cyan());
        }

        TaskCommands::Reopen { id } => {
            let task = task::set_completed(&pool, id, false)?;
            println!("{} Reopened: {}", "✓".green().bold(), task.title.cyan());
        }

        TaskCommands::Delete { id } => {
            task::delete_task(&pool, id)?;
            println!("{} Deleted task {}", "✓".green().bold(), format!("#{}", id).dimmed());
        }

        TaskCommands::Stats => {
            let stats = task::get_stats(&pool)?;
            output::print_stats(&stats);
        }

        TaskCommands::CompleteAll => {
            let count = task::complete_all(&pool)?;
            println!("{} Marked {} task(s) as completed", "✓".green().bold(), count);
        }

        TaskCommands::ClearCompleted => {
            let count = task::clear_completed(&pool)?;
            println!("{} Deleted {} completed task(s)", "✓".green().bold(), count);
        }
    }

    Ok(())
}
