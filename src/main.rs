use clap::Parser;
use colored::Colorize;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use placement_workspace::cli::Cli;
use placement_workspace::config::Settings;
use placement_workspace::error::ServiceResult;
use placement_workspace::handler::Handler;
use placement_workspace::storage::{FileStorage, MemoryStorage};
use placement_workspace::store::SharedStorage;
use placement_workspace::workspace::Workspace;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ServiceResult<()> {
    let settings_path = match cli.settings {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let settings = Settings::load(&settings_path)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let storage: SharedStorage = if cli.ephemeral {
        tracing::info!("using in-memory storage");
        Arc::new(MemoryStorage::new())
    } else {
        let root = match cli.data_dir {
            Some(dir) => dir,
            None => settings.data_dir()?,
        };
        let storage = FileStorage::new(root).with_quota(settings.quota_bytes);
        tracing::debug!(root = %storage.root().display(), "using file storage");
        Arc::new(storage)
    };

    let workspace = Workspace::new(storage);
    let mut handler = Handler::new(workspace, settings, settings_path, io::stdout().lock())
        .with_json(cli.json);
    handler.run(cli.command)
}
