//! Per-task JSON audit logs.
//!
//! One file per task under the configured log directory, written when the
//! task is dispatched and appended to on completion. The orchestration
//! core never reads these back; they exist for history display and audit
//! by external tooling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use uuid::Uuid;

use crate::domain::models::{Selection, TaskPlan};

pub struct TaskLogger {
    task_id: Uuid,
    log_dir: PathBuf,
}

impl TaskLogger {
    pub fn new(log_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
        Ok(Self {
            task_id: Uuid::new_v4(),
            log_dir,
        })
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    fn log_file(&self) -> PathBuf {
        self.log_dir.join(format!("{}.json", self.task_id))
    }

    /// Record the task text, plan, and selection at dispatch time.
    pub fn log_task(&self, task: &str, plan: &TaskPlan, selection: &Selection) -> Result<()> {
        let data = json!({
            "task_id": self.task_id,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "task": task,
            "plan": plan,
            "selection": selection,
        });
        std::fs::write(self.log_file(), serde_json::to_string_pretty(&data)?)
            .with_context(|| format!("failed to write task log {}", self.log_file().display()))?;
        Ok(())
    }

    /// Append the final output to an existing task log. A missing log file
    /// (task never dispatched) is not an error.
    pub fn log_result(&self, result: &str) -> Result<()> {
        let path = self.log_file();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read task log {}", path.display()))
            }
        };

        let mut data: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("task log {} is not valid JSON", path.display()))?;
        data["result"] = json!(result);
        data["completed_at"] = json!(chrono::Utc::now().to_rfc3339());
        std::fs::write(&path, serde_json::to_string_pretty(&data)?)
            .with_context(|| format!("failed to update task log {}", path.display()))?;
        Ok(())
    }
}
