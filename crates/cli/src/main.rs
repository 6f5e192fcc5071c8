mod cli;
mod context;
mod terminal;
mod watch;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use awsctx_core::{config, Config};
use awsctx_registry::{CredentialRegistry, RegionRegistry};

use crate::cli::{CliArgs, Command};
use crate::context::Context;
use crate::terminal::Terminal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    config::load_dotenv();
    let args = CliArgs::parse();
    let terminal = Terminal::new(args.json);

    let config = Config::from_env();
    config.log_summary();

    if let Err(e) = run(args, config, &terminal).await {
        terminal.print_error(&format!("{:#}", e))?;
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: CliArgs, config: Config, terminal: &Terminal) -> Result<()> {
    let ctx = Context::open(config, &args.workspace, args.offline).await?;

    match args.command {
        Command::Status => {
            ctx.load()?;
            print_settled(&ctx, terminal, &args.workspace).await?;
        }
        Command::UseProfile { credential_id } => {
            ctx.load()?;
            ctx.manager.change_credential_provider(&credential_id);
            print_settled(&ctx, terminal, &args.workspace).await?;
            ctx.save()?;
        }
        Command::UseRegion { region_id } => {
            ctx.load()?;
            ctx.manager.change_region(&region_id);
            print_settled(&ctx, terminal, &args.workspace).await?;
            ctx.save()?;
        }
        Command::Use {
            credential_id,
            region_id,
        } => {
            ctx.load()?;
            ctx.manager
                .change_connection_settings(&credential_id, &region_id);
            print_settled(&ctx, terminal, &args.workspace).await?;
            ctx.save()?;
        }
        Command::Refresh => {
            ctx.load()?;
            ctx.manager.wait_until_stable_timeout(ctx.config.connection.stable_wait()).await?;
            ctx.manager.refresh_connection_state();
            print_settled(&ctx, terminal, &args.workspace).await?;
        }
        Command::Profiles => {
            ctx.load()?;
            let selected = ctx.manager.persisted_selection().active_profile;
            terminal.print_credentials(&ctx.credentials.list(), selected.as_deref())?;
        }
        Command::Regions { partition } => {
            ctx.load()?;
            let selected = ctx.manager.persisted_selection().active_region;
            let mut groups = Vec::new();
            for p in ctx.regions.partitions() {
                if partition.as_deref().is_some_and(|wanted| wanted != p.id) {
                    continue;
                }
                let regions = ctx.regions.regions_in_partition(&p.id);
                groups.push((p, regions));
            }
            if groups.is_empty() {
                bail!("unknown partition '{}'", partition.unwrap_or_default());
            }
            terminal.print_regions(&groups, selected.as_deref())?;
        }
        Command::Watch => {
            watch::run(&ctx, terminal, &args.workspace).await?;
        }
    }

    info!("Done");
    Ok(())
}

/// Wait for validation to finish (bounded), then print the outcome.
async fn print_settled(ctx: &Context, terminal: &Terminal, workspace: &str) -> Result<()> {
    let state = ctx
        .manager
        .wait_until_stable_timeout(ctx.config.connection.stable_wait())
        .await?;
    terminal.print_status(
        workspace,
        &state,
        &ctx.manager.recently_used_credentials(),
        &ctx.manager.recently_used_regions(),
    )
}
