//! Hermes CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hermes::cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            task,
            dry_run,
            cloud,
            git,
        } => hermes::cli::commands::run::execute(task, dry_run, cloud, git).await,
        Commands::Init { force } => hermes::cli::commands::init::execute(force),
        Commands::Config(ConfigCommands::Show) => hermes::cli::commands::config::show(),
        Commands::Config(ConfigCommands::Set {
            task_type,
            engine,
            model,
        }) => hermes::cli::commands::config::set(&task_type, &engine, model),
        Commands::Logs { limit } => hermes::cli::commands::logs::execute(limit),
        Commands::Quota => hermes::cli::commands::quota::execute(),
        Commands::Doctor => hermes::cli::commands::doctor::execute().await,
    };

    if let Err(err) = result {
        hermes::cli::handle_error(err);
    }
}
