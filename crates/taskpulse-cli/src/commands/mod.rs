//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod serve;
pub mod task;
pub mod watch;

/// TaskPulse - prioritized tasks with live notifications
#[derive(Parser)]
#[command(name = "taskpulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, env = "TASKPULSE_DB", default_value = "taskpulse.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve(serve::ServeArgs),

    /// Task management
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Show live notifications from a running server
    Watch(watch::WatchArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, &self.db).await,
            Commands::Task(cmd) => task::execute(cmd, &self.db).await,
            Commands::Watch(args) => watch::execute(args).await,
        }
    }
}
