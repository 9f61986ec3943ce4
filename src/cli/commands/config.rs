//! `hermes config`: inspect and update the model rule table.

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::models::{Engine, EngineRule, TaskType};
use crate::infrastructure::config::ConfigLoader;

const PROJECT_CONFIG: &str = ".hermes/config.yaml";

pub fn show() -> Result<()> {
    let config = ConfigLoader::load()?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Task Type", "Engine", "Model"]);
    for (task_type, rule) in &config.models {
        table.add_row(vec![
            task_type.to_string(),
            rule.engine.to_string(),
            rule.model.clone().unwrap_or_else(|| "default".to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn set(task_type: &str, engine: &str, model: Option<String>) -> Result<()> {
    let task_type: TaskType = task_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("invalid task type")?;
    let engine: Engine = engine
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("invalid engine")?;

    let mut config = ConfigLoader::load()?;
    config.models.insert(
        task_type,
        EngineRule {
            engine,
            model: model.clone(),
        },
    );
    ConfigLoader::save(&config, PROJECT_CONFIG)?;

    println!(
        "{} now routes to {} ({})",
        task_type,
        engine,
        model.as_deref().unwrap_or("default")
    );
    Ok(())
}
