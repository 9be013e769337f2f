//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskpulse_web::ServerConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "TASKPULSE_PORT", default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file used with --log
    #[arg(long, default_value = "taskpulse.log")]
    pub log_file: PathBuf,
}

pub async fn execute(args: ServeArgs, db_path: &Path) -> Result<()> {
    let pool = Arc::new(taskpulse_db::init_pool(db_path)?);
    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };

    println!();
    println!("  {} {}", "TaskPulse".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}        http://{}/api", "API".green(), config.addr());
    println!("  {}  ws://{}/ws", "WebSocket".green(), config.addr());
    println!("  {}   {}", "Database".green(), db_path.display());
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    taskpulse_web::run_server(pool, &config).await?;

    Ok(())
}
