//! Config command - configuration management.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use super::{Context, print_json};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show resolved configuration and the files it came from
    Show,

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let config = ctx.config();

    if ctx.json_output {
        return print_json(&json!({
            "backend": {
                "url": ctx.backend_url,
                "timeoutSecs": config.timeout().as_secs(),
                "userAgent": config.user_agent(),
            },
            "storage": {
                "dataDir": ctx.data_dir(),
                "sessionKey": config.session_key(),
                "bookmarksKey": config.bookmarks_key(),
                "winnersPrefix": config.winners_prefix(),
            },
            "auth": {
                "coalesceRefresh": config.coalesce_refresh(),
                "noRefreshPaths": config.no_refresh_paths(),
            },
            "sources": ctx.loaded.loaded_from(),
            "warnings": ctx.loaded.warnings,
        }));
    }

    println!("# Bountyboard Configuration\n");

    println!("Config file search order (later overrides earlier):");
    for source in &ctx.loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!(
            "  {} {:<8} {}",
            status,
            source.layer.label(),
            source.path.display()
        );
    }
    for warning in &ctx.loaded.warnings {
        println!("  ! {}", warning);
    }
    println!();

    println!("Backend:");
    println!("  url:          {}", ctx.backend_url);
    println!("  timeout:      {}s", config.timeout().as_secs());
    if let Some(agent) = config.user_agent() {
        println!("  user agent:   {}", agent);
    }
    println!();

    println!("Storage:");
    println!("  data dir:     {}", ctx.data_dir().display());
    println!("  session key:  {}", config.session_key());
    println!("  bookmarks:    {}", config.bookmarks_key());
    println!("  drafts:       {}<bounty>", config.winners_prefix());
    println!();

    println!("Auth:");
    println!("  coalesce refresh: {}", config.coalesce_refresh());
    println!("  no-refresh paths: {}", config.no_refresh_paths().join(", "));

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    let path = bountyboard_config::user_config_path();
    if ctx.json_output {
        return print_json(&json!({ "path": path }));
    }
    match path {
        Some(path) => println!("{}", path.display()),
        None => eprintln!("Could not determine config directory"),
    }
    Ok(())
}
