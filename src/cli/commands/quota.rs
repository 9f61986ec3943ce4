//! `hermes quota`: show today's engine usage.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::models::Engine;
use crate::domain::ports::QuotaTracker;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::FileQuotaStore;

pub fn execute() -> Result<()> {
    let config = ConfigLoader::load()?;
    let quota = FileQuotaStore::new(FileQuotaStore::default_path(), config.quota.limits.clone());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Engine", "Used Today", "Limit"]);
    for engine in [Engine::Claude, Engine::Codex, Engine::Cursor, Engine::Ollama] {
        let limit = config
            .quota
            .limits
            .get(&engine)
            .map_or_else(|| "unlimited".to_string(), ToString::to_string);
        table.add_row(vec![
            engine.to_string(),
            quota.usage(engine).to_string(),
            limit,
        ]);
    }
    println!("{table}");

    if quota.exceeded() {
        println!("Daily quota exceeded; new tasks will be refused until tomorrow.");
    }
    Ok(())
}
