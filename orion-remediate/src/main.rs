//! orion-remediate - command line entry point
//!
//! Loads `.env`, the YAML config and the server list, then runs either the
//! classification remediation or one of the custom property admin commands
//! against every server in turn.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use orion_remediate::config::{load_config, RemediateConfig};
use orion_remediate::custom_props::{self, PropertyType};
use orion_remediate::driver;
use orion_remediate::servers::{merge_servers, read_server_list};
use orion_remediate::swis::SwisConnector;
use orion_remediate::Connector;

#[derive(Parser, Debug)]
#[command(name = "orion-remediate")]
#[command(about = "Custom property administration and remediation for SolarWinds Orion", long_about = None)]
struct Args {
    /// SWIS user name
    #[arg(long, env = "ORION_USERNAME")]
    username: String,

    /// SWIS password
    #[arg(long, env = "ORION_PASSWORD", hide_env_values = true)]
    password: String,

    /// Target server, repeatable. Added to the configured servers.
    #[arg(long = "host")]
    hosts: Vec<String>,

    /// File with one server per line
    #[arg(long)]
    server_list: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recompute Environment, Device_Type and Device_Function on every node
    Remediate {
        /// Classify and diff only, write nothing
        #[arg(long)]
        dry_run: bool,

        /// Write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Node custom property administration
    Props {
        #[command(subcommand)]
        action: PropsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PropsCommand {
    List,
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "type", value_enum, default_value_t = PropertyType::String)]
        value_type: PropertyType,
        /// Max length for string properties
        #[arg(long)]
        size: Option<u32>,
    },
    Delete {
        name: String,
        /// Allow deleting a classification property
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orion_remediate=info")),
        )
        .init();

    let args = Args::parse();
    let cfg = load_config().await;
    let hosts = resolve_hosts(&cfg, &args).await?;
    if hosts.is_empty() {
        anyhow::bail!("no target server: use --host, --server-list or the servers config key");
    }

    let connector = SwisConnector::new(args.username.clone(), args.password.clone(), cfg.swis.clone());

    let clean = match args.command.unwrap_or(Command::Remediate {
        dry_run: false,
        report: None,
    }) {
        Command::Remediate { dry_run, report } => {
            let dry_run = dry_run || cfg.dry_run;
            let run = driver::run(&connector, &hosts, dry_run).await;
            run.log_summary();
            if let Some(path) = report {
                run.write_json(&path)
                    .await
                    .with_context(|| format!("failed to write report {}", path.display()))?;
                info!("report written to {}", path.display());
            }
            !run.has_failures()
        }
        Command::Props { action } => run_props(&connector, &hosts, &action).await,
    };

    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn resolve_hosts(cfg: &RemediateConfig, args: &Args) -> Result<Vec<String>> {
    let mut from_file = Vec::new();
    for path in cfg.server_list.iter().chain(args.server_list.iter()) {
        from_file.extend(read_server_list(path).await?);
    }
    Ok(merge_servers([cfg.servers.as_slice(), from_file.as_slice(), args.hosts.as_slice()]))
}

/// Runs one admin command on every server. Returns false if any server failed.
async fn run_props(connector: &dyn Connector, hosts: &[String], action: &PropsCommand) -> bool {
    let mut clean = true;

    for host in hosts {
        let inventory = match connector.connect(host).await {
            Ok(inventory) => inventory,
            Err(e) => {
                error!("[{host}] skipped: {e}");
                clean = false;
                continue;
            }
        };

        let result = match action {
            PropsCommand::List => custom_props::list_custom_properties(inventory.as_ref())
                .await
                .map(|props| {
                    info!("[{host}] {} node custom properties", props.len());
                    for p in props {
                        let size = p.max_length.map(|l| l.to_string()).unwrap_or_default();
                        println!("{host}\t{}\t{}\t{}\t{}", p.field, p.data_type, size, p.description);
                    }
                }),
            PropsCommand::Create {
                name,
                description,
                value_type,
                size,
            } => {
                custom_props::create_custom_property(inventory.as_ref(), name, description, *value_type, *size).await
            }
            PropsCommand::Delete { name, force } => {
                custom_props::delete_custom_property(inventory.as_ref(), name, *force).await
            }
        };

        if let Err(e) = result {
            warn!("[{host}] {e}");
            clean = false;
        }
    }

    clean
}
