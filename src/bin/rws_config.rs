//! Inspect and validate the supported-repository configuration.
//!
//! Usage:
//!   rws-config --config config/supported_repos.json validate
//!   rws-config distros --json
//!   rws-config check live/enabled/debian/buster
//!   rws-config plan live/2.8/el/7 tarantool-2.8.2-1.el7.x86_64.rpm
//!
//! Without `--config` the document is located through `RWS_CFG` and the
//! `S3_*` storage overrides are applied.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rws_config::{ConfigStore, UploadTarget, plan_upload, sync_prefixes};
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rws-config")]
#[command(about = "Validate and query the supported-repository taxonomy")]
struct Cli {
    /// Configuration document; defaults to $RWS_CFG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the document and print a summary.
    Validate,
    /// List distributions in document order.
    Distros {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print one distribution as JSON.
    Show { name: String },
    /// List product series.
    Series {
        /// Only enabled series.
        #[arg(long)]
        enabled: bool,
    },
    /// Check an upload path such as live/1.10/el/7.
    Check { target: String },
    /// Print where files would be placed for an upload path.
    Plan {
        target: String,
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// List repository prefixes covered by a full metadata sync.
    Prefixes,
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = match &cli.config {
        Some(path) => ConfigStore::load_path(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => ConfigStore::load_from_env().context("loading configuration from RWS_CFG")?,
    };
    let model = store.model();

    match cli.command {
        Command::Validate => {
            println!(
                "ok: {} repo kinds, {} series ({} enabled), {} distributions",
                model.repo_kinds().len(),
                model.series().len(),
                model.enabled_series().len(),
                model.list_distributions().len()
            );
        }
        Command::Distros { json } => {
            if json {
                let entries: Vec<_> = model
                    .distributions()
                    .map(|(name, spec)| json!({"name": name, "base": spec.base, "versions": spec.versions}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (name, spec) in model.distributions() {
                    println!("{name}\t{}\t{}", spec.base, spec.versions.join(","));
                }
            }
        }
        Command::Show { name } => {
            let spec = store.get_distribution(&name)?;
            println!("{}", serde_json::to_string_pretty(spec)?);
        }
        Command::Series { enabled } => {
            let series = if enabled {
                model.enabled_series()
            } else {
                model.series()
            };
            for s in series {
                println!("{s}");
            }
        }
        Command::Check { target } => {
            let parsed = UploadTarget::parse(&target, model)?;
            let series = parsed.series_list(model);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "target": parsed,
                    "series": series,
                }))?
            );
        }
        Command::Plan { target, files } => {
            let parsed = UploadTarget::parse(&target, model)?;
            let names: Vec<&str> = files.iter().map(String::as_str).collect();
            let plan = plan_upload(&store, &parsed, &names)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::Prefixes => {
            for prefix in sync_prefixes(&store) {
                println!("{prefix}");
            }
        }
    }

    Ok(())
}
