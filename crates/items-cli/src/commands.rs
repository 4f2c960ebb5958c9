use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use items_server::{ItemsServer, ServerConfig, ROUTES};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Config(args) => cmd_config(args, &cli.format),
        Command::Routes => cmd_routes(&cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn apply_overrides(mut config: ServerConfig, args: &ServeArgs) -> ServerConfig {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.no_seed {
        config.seed = false;
    }
    config
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    let store = if config.seed { "seeded" } else { "empty" };
    println!(
        "{} items API on {} ({} store)",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        store.yellow()
    );
    ItemsServer::new(config).serve().await?;
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    match format {
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn cmd_routes(format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for route in ROUTES {
                println!(
                    "  {:<7} {:<26} {}",
                    route.method.cyan().bold(),
                    route.path,
                    route.summary.dimmed()
                );
            }
        }
        OutputFormat::Json => {
            let routes: Vec<_> = ROUTES
                .iter()
                .map(|r| json!({"method": r.method, "path": r.path, "summary": r.summary}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
    }
    Ok(())
}
