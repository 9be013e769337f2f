//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use taskpulse_client::{ToastPanel, MAX_VISIBLE};
use taskpulse_core::task::model::TaskStats;
use taskpulse_core::{Priority, Task};

const DESCRIPTION_PREVIEW: usize = 60;

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::Low => "low".dimmed(),
        Priority::Medium => "medium".yellow(),
        Priority::High => "high".red().bold(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Print tasks as a table.
pub fn print_tasks_table(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    println!("{:<6} {:<40} {:<10} {:<6} {:<16}", "ID", "Title", "Priority", "Done", "Created");
    println!("{}", "-".repeat(82));

    for task in tasks {
        let done = if task.completed {
            "✓".green()
        } else {
            "·".dimmed()
        };
        let title = truncate(&task.title, 37);
        let title = if task.completed {
            title.dimmed().strikethrough()
        } else {
            title.normal()
        };

        println!(
            "{:<6} {:<40} {:<10} {:<6} {:<16}",
            task.id,
            title,
            priority_label(task.priority),
            done,
            task.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }

    println!();
    println!("{}", format!("{} task(s)", tasks.len()).dimmed());
}

/// Print task statistics.
pub fn print_stats(stats: &TaskStats) {
    println!("{}", "Task Statistics".bold());
    println!();
    println!("  {:<18} {}", "Total", stats.total.to_string().cyan());
    println!("  {:<18} {}", "Completed", stats.completed.to_string().green());
    println!("  {:<18} {}", "Pending", stats.pending.to_string().yellow());
    println!("  {:<18} {}", "High priority", stats.high_priority.to_string().red());
    println!("  {:<18} {}", "Medium priority", stats.medium_priority);
    println!("  {:<18} {}%", "Completion rate", stats.completion_rate);
}

/// Print the currently visible notifications, newest first.
pub fn print_toasts(panel: &ToastPanel) {
    println!();
    if panel.is_empty() {
        println!("{}", "No active notifications.".dimmed());
        return;
    }

    println!(
        "{} {}",
        "Notifications".bold(),
        format!("({}/{})", panel.visible().len(), MAX_VISIBLE).dimmed()
    );
    for task in panel.visible() {
        println!(
            "  {} {}  {}",
            "⚡".yellow(),
            "High Priority Task Added!".red().bold(),
            format!("#{}", task.id).dimmed()
        );
        println!("     {}", task.title.cyan().bold());
        if let Some(desc) = &task.description {
            println!("     {}", truncate(desc, DESCRIPTION_PREVIEW).dimmed());
        }
    }
}
