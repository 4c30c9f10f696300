mod command;
mod config;
mod navigator;
mod selector;
mod tree;
mod visibility;
mod wm_client;

use anyhow::{Context, Result};
use config::Config;
use tracing::debug;
use visibility::XpropProbe;
use wm_client::{RealWmClient, WmClient};

fn main() -> Result<()> {
    // Parse CLI arguments
    let config = Config::parse();

    // Initialize logging; stdout is reserved for --dry-run output
    let log_level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if !config.extra.is_empty() {
        debug!("Ignoring extra arguments: {:?}", config.extra);
    }

    let request = config.request();
    debug!("Navigation request: {:?}", request);

    let mut client = RealWmClient::new()?;
    let probe = XpropProbe::new();

    if config.dry_run {
        let snapshot = client.snapshot()?;
        let commands = navigator::plan(&snapshot, &request, &probe)?;
        if config.json {
            let json = serde_json::to_string_pretty(&commands)
                .context("Failed to serialize command plan")?;
            println!("{}", json);
        } else {
            for command in &commands {
                println!("{}", command);
            }
        }
        return Ok(());
    }

    let sent = navigator::navigate(&mut client, &probe, &request)?;
    debug!("Sent {} command(s)", sent.len());

    Ok(())
}
