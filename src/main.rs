use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use link_cost_rebalancer::config::{Config, ConfigOverrides};
use link_cost_rebalancer::dispatch::handle_alarm;
use link_cost_rebalancer::inventory::http::HttpInventory;
use link_cost_rebalancer::output::json::render_json;
use link_cost_rebalancer::output::table::render_outcome_table;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "link-cost-rebalancer",
    about = "Alarm-driven link cost rebalancing for leaf/spine fabrics"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long = "inventory-url")]
    inventory_url: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Consume one correlation alarm record and rebalance link costs
    Handle {
        /// Raw pipe-delimited alarm record; read from stdin when omitted
        #[arg(long)]
        alarm: Option<String>,
        /// Compute and report the new costs without persisting them
        #[arg(long)]
        dry_run: bool,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    config.apply_overrides(ConfigOverrides {
        inventory_url: cli.inventory_url.clone(),
    });

    match &cli.command {
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
            Ok(())
        }
        Commands::Handle { alarm, dry_run } => {
            let raw = match alarm {
                Some(raw) => raw.clone(),
                None => read_record_from_stdin()?,
            };
            let inventory = HttpInventory::new(
                config.inventory.base_url.as_str(),
                config.inventory.timeout_secs,
            );
            let policy = config.policy();
            let outcome = handle_alarm(&inventory, &policy, raw.trim_end(), *dry_run).await?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_outcome_table(&outcome)),
                OutputFormat::Json => println!("{}", render_json(&outcome)?),
            }
            Ok(())
        }
    }
}

fn read_record_from_stdin() -> Result<String> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    if raw.trim().is_empty() {
        return Err(anyhow!("no alarm record supplied on stdin"));
    }
    Ok(raw)
}
