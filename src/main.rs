// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let settings = cli.global.settings()?;

    match cli.command {
        None => {
            commands::cmd_fetch(&settings)?;
            Ok(())
        }
        Some(Commands::Fetch {
            progress,
            probe_timeout,
            transfer_timeout,
        }) => {
            let mut settings = settings;
            settings.show_progress |= progress;
            if let Some(secs) = probe_timeout {
                settings.probe_timeout_secs = secs.max(1);
            }
            if let Some(secs) = transfer_timeout {
                settings.transfer_timeout_secs = secs.max(1);
            }
            commands::cmd_fetch(&settings)?;
            Ok(())
        }
        Some(Commands::Deps { package }) => commands::cmd_deps(&settings, &package),
        Some(Commands::Show { package }) => commands::cmd_show(&settings, &package),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "feedfetch",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
