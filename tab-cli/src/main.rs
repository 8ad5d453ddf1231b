use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use tab_cli::app::{self, Command};
use tab_cli::config::{AppConfig, ConfigOverrides};
use tab_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Keeps a running tab of what each guest at a table ordered.
///
/// Entries are stored locally (SQLite by default) and survive between runs.
/// Paying in cash takes 15% off an entry.
#[derive(Debug, Parser)]
#[command(name = "table-tab", version)]
struct Cli {
    /// Configuration file. Defaults to `table-tab.toml` when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Store backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store location. For SQLite a file path or `:memory:`.
    #[arg(long, global = true)]
    location: Option<String>,

    /// Log filter, e.g. `debug` or `tab_core=trace`. RUST_LOG wins when set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(ConfigOverrides {
        backend: cli.backend,
        location: cli.location,
        log_level: cli.log_level,
    });

    logging::init_default_logging(&config.logging.level, config.logging.file.as_deref())?;
    debug!(?config, "starting");

    let registry = app::build_registry();
    let mut repo = app::open_repository(&registry, &config.store).await?;

    let output = app::execute(&mut repo, cli.command).await?;
    println!("{}", output.trim_end());

    Ok(())
}
