//! `hermes doctor`: engine availability checks.

use anyhow::Result;
use console::style;

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::engines::OllamaClient;

pub async fn execute() -> Result<()> {
    let config = ConfigLoader::load()?;
    println!("Running hermes diagnostics...\n");

    check_binary("Claude CLI", &config.engines.claude.binary);
    check_binary("Codex CLI", &config.engines.codex.binary);
    check_binary("Cursor CLI", &config.engines.cursor.binary);

    let ollama = OllamaClient::new(config.engines.ollama.clone());
    let ollama_status = if ollama.health_check().await {
        style("OK").green()
    } else {
        style("Unreachable").red()
    };
    println!(
        "Ollama ({}): {ollama_status}",
        config.engines.ollama.base_url
    );

    println!("\nDiagnostics complete.");
    Ok(())
}

fn check_binary(label: &str, binary: &str) {
    let status = match which::which(binary) {
        Ok(path) => style(format!("OK ({})", path.display())).green(),
        Err(_) => style("Missing".to_string()).red(),
    };
    println!("{label}: {status}");
}
