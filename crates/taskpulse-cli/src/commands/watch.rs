//! Live notification viewer.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::time::{Duration, Instant};
use taskpulse_client::{driver, Endpoint, NotificationReceiver, ToastPanel};
use taskpulse_core::NotificationEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

use crate::output;

#[derive(Args)]
pub struct WatchArgs {
    /// Origin of the TaskPulse server
    #[arg(long, env = "TASKPULSE_ORIGIN", default_value = "http://127.0.0.1:3030")]
    pub origin: String,
}

pub async fn execute(args: WatchArgs) -> Result<()> {
    let endpoint = Endpoint::from_origin(&args.origin)?;
    let receiver = NotificationReceiver::new(&endpoint);

    let (tx, mut events) = mpsc::unbounded_channel::<NotificationEvent>();
    let _subscription = receiver.subscribe(move |event: &NotificationEvent| {
        let _ = tx.send(event.clone());
    });

    println!("{} {}", "Watching".cyan().bold(), endpoint.url().dimmed());
    println!(
        "  {}",
        "Type a task ID and press Enter to dismiss it. Ctrl+C to stop.".dimmed()
    );

    let mut driver = tokio::spawn(driver::run(receiver, async {
        let _ = tokio::signal::ctrl_c().await;
    }));

    let mut panel = ToastPanel::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if panel.on_event(&event, Instant::now()) {
                    output::print_toasts(&panel);
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => {
                        if let Ok(id) = line.trim().trim_start_matches('#').parse::<i64>() {
                            if panel.dismiss(id) {
                                output::print_toasts(&panel);
                            }
                        }
                    }
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        stdin_open = false;
                    }
                }
            }
            _ = tick.tick() => {
                if !panel.expire(Instant::now()).is_empty() {
                    output::print_toasts(&panel);
                }
            }
            result = &mut driver => {
                result?;
                break;
            }
        }
    }

    Ok(())
}
