use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

use bellows_core::Vault;
use bellows_parser::VaultRenderer;
use bellows_site::{export_vault, serve, ServerConfig};

mod cli;
mod config;

use cli::{Cli, Commands, LogLevel};
use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else {
        cli.log_level.map(LogLevel::as_str).unwrap_or("info")
    };
    let env_filter = format!(
        "bellows_cli={0},bellows_core={0},bellows_parser={0},bellows_site={0}",
        log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    match cli.command {
        Commands::Export { vault, output } => {
            let config = CliConfig::load(cli.config.as_deref(), &vault)?;
            let mut vault = open_vault(&vault, &config, &cli.attachment_dir, &cli.root_url)?;
            let renderer = VaultRenderer::new();
            let dest = output.unwrap_or(config.export.output);
            export_vault(&mut vault, &renderer, &dest)?;
        }
        Commands::Serve { vault, host, port } => {
            let config = CliConfig::load(cli.config.as_deref(), &vault)?;
            let vault = open_vault(&vault, &config, &cli.attachment_dir, &cli.root_url)?;
            let renderer = VaultRenderer::new();
            let server = ServerConfig {
                host: host.unwrap_or(config.server.host),
                port: port.unwrap_or(config.server.port),
            };
            serve(vault, renderer, &server).await?;
        }
    }

    Ok(())
}

fn open_vault(
    path: &Path,
    config: &CliConfig,
    attachment_dir: &Option<String>,
    root_url: &Option<String>,
) -> Result<Vault> {
    let vault = Vault::open(path)?
        .with_attachment_dir(
            attachment_dir
                .clone()
                .unwrap_or_else(|| config.vault.attachment_dir.clone()),
        )
        .with_root_url(
            root_url
                .clone()
                .unwrap_or_else(|| config.vault.root_url.clone()),
        );
    info!("found {} notes in {}", vault.len(), path.display());
    Ok(vault)
}
