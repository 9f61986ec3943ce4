//! `hermes logs`: list recorded task logs.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Deserialize;

use crate::infrastructure::config::ConfigLoader;

#[derive(Deserialize)]
struct LogEntry {
    task_id: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    task: String,
    #[serde(default)]
    completed_at: Option<String>,
}

pub fn execute(limit: usize) -> Result<()> {
    let config = ConfigLoader::load()?;
    let log_dir = std::path::Path::new(&config.log_dir);

    let mut entries: Vec<(std::time::SystemTime, LogEntry)> = Vec::new();
    if let Ok(dir) = std::fs::read_dir(log_dir) {
        for file in dir.flatten() {
            let path = file.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else {
                continue;
            };
            let Ok(entry) = serde_json::from_str::<LogEntry>(&contents) else {
                continue;
            };
            let modified = file
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            entries.push((modified, entry));
        }
    }

    if entries.is_empty() {
        println!("No task logs found in {}.", log_dir.display());
        return Ok(());
    }

    entries.sort_by(|a, b| b.0.cmp(&a.0));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Task ID", "Started", "Status", "Task"]);
    for (_, entry) in entries.into_iter().take(limit) {
        let status = if entry.completed_at.is_some() {
            "completed"
        } else {
            "dispatched"
        };
        table.add_row(vec![
            entry.task_id.chars().take(8).collect::<String>(),
            entry.timestamp,
            status.to_string(),
            truncate(&entry.task, 60),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{prefix}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_text_adds_ellipsis() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }
}
