//! `hermes init`: write the default project configuration.

use std::path::Path;

use anyhow::Result;

use crate::infrastructure::config::ConfigLoader;

const PROJECT_CONFIG: &str = ".hermes/config.yaml";

pub fn execute(force: bool) -> Result<()> {
    if Path::new(PROJECT_CONFIG).exists() && !force {
        println!("hermes config already exists at {PROJECT_CONFIG} (use --force to overwrite)");
        return Ok(());
    }

    ConfigLoader::write_default(PROJECT_CONFIG)?;
    println!("hermes initialized at {PROJECT_CONFIG}");
    Ok(())
}
