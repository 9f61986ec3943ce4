//! `hermes run`: route and execute a task.

use std::sync::Arc;

use anyhow::Result;
use console::style;

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::engines::{build_registry, OllamaClient};
use crate::infrastructure::{FileQuotaStore, ShellCommandRunner};
use crate::services::planner::OllamaPlanner;
use crate::services::router::{Router, RunOptions};
use crate::services::summarizer::OllamaSummarizer;

pub async fn execute(task: String, dry_run: bool, cloud: bool, git: bool) -> Result<()> {
    let config = ConfigLoader::load()?;
    let registry = build_registry(&config.engines);
    let quota = Arc::new(FileQuotaStore::new(
        FileQuotaStore::default_path(),
        config.quota.limits.clone(),
    ));

    // One health probe per process decides safe mode for planning and
    // diagnostic summarization.
    let ollama = Arc::new(OllamaClient::new(config.engines.ollama.clone()));
    let healthy = ollama.health_check().await;
    if healthy {
        println!("{} Local AI engine (ollama) is available.", style("✓").green());
    } else {
        println!(
            "{} Local AI (ollama) unavailable. Running in safe mode for planning and diagnostics.",
            style("!").yellow()
        );
    }

    let planner = Arc::new(OllamaPlanner::new(ollama.clone(), healthy));
    let summarizer = Arc::new(OllamaSummarizer::new(ollama, healthy));

    let router = Router::new(
        config,
        registry,
        quota,
        planner,
        summarizer,
        Arc::new(ShellCommandRunner),
        std::env::current_dir()?,
    );

    router
        .run(&task, &RunOptions { dry_run, cloud, git })
        .await
}
