//! CLI binary: serve the relief planner API or run one planning pass offline.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relief_planner::distance::{HaversineMetric, PlanarMetric};
use relief_planner::planner::plan_with_metric;
use relief_planner::records::{centers_from_records, villages_from_records};
use relief_planner::service::{self, ServiceConfig};
use relief_planner::store::JsonFileStore;
use relief_planner::traits::{Collection, RegistryStore};

#[derive(Parser)]
#[command(name = "relief-planner", about = "Disaster relief village-to-center planner")]
struct Cli {
    /// Directory holding villages.json and relief_centers.json
    #[arg(short, long, global = true, env = "RELIEF_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "RELIEF_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },

    /// Generate a plan from the registry and print it as JSON
    Plan {
        /// Use great-circle distance instead of the planar approximation
        #[arg(long)]
        haversine: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let config = ServiceConfig {
                bind,
                data_dir: cli.data_dir,
            };
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            runtime
                .block_on(service::run(config))
                .context("relief planner service failed")?;
        }
        Commands::Plan { haversine } => {
            let store = JsonFileStore::open(&cli.data_dir)
                .with_context(|| format!("failed to open registry in {}", cli.data_dir.display()))?;
            let villages = villages_from_records(&store.load(Collection::Villages)?)?;
            let centers = centers_from_records(&store.load(Collection::ReliefCenters)?)?;

            let assignments = if haversine {
                plan_with_metric(&villages, &centers, &HaversineMetric)?
            } else {
                plan_with_metric(&villages, &centers, &PlanarMetric)?
            };

            println!("{}", serde_json::to_string_pretty(&assignments)?);
        }
    }

    Ok(())
}
