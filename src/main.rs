use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use icp_score::{AggregationConfig, ScoringConfig, run_aggregation, run_scoring};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

#[derive(Parser, Debug)]
#[command(name = "icp-score")]
#[command(about = "Medicare coding-signal aggregation and ICP scoring", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate provider utilization into per-organization coding metrics
    Aggregate {
        /// Provider-by-service utilization extract (CSV or Parquet)
        #[arg(long)]
        utilization: PathBuf,

        /// Enrollment extract mapping enrollment ids to NPIs
        #[arg(long, requires = "reassignment")]
        enrollment: Option<PathBuf>,

        /// Reassignment extract linking individuals to organizations
        #[arg(long, requires = "enrollment")]
        reassignment: Option<PathBuf>,

        /// Output table; `.parquet` writes Parquet, anything else CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Utilization rows per chunk
        #[arg(long, env = "ICP_BATCH_SIZE")]
        batch_size: Option<usize>,
    },

    /// Score enriched organizations against the ideal customer profile
    Score {
        /// Enriched organization table (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// MIPS staging table
        #[arg(long)]
        mips: Option<PathBuf>,

        /// HPSA/MUA staging table
        #[arg(long)]
        designations: Option<PathBuf>,

        /// Output table; `.parquet` writes Parquet, anything else CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Write procedure-alignment data quality as JSON
        #[arg(long)]
        quality_report: Option<PathBuf>,

        /// Score on one thread
        #[arg(long)]
        sequential: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate {
            utilization,
            enrollment,
            reassignment,
            output,
            batch_size,
        } => {
            let mut config = AggregationConfig::new(utilization, output);
            if let (Some(enrollment), Some(reassignment)) = (enrollment, reassignment) {
                config = config.with_bridge(enrollment, reassignment);
            }
            if let Some(batch_size) = batch_size {
                config = config.with_batch_size(batch_size);
            }
            let (output, _) = run_aggregation(&config).with_context(|| {
                format!("aggregating {}", config.utilization_path.display())
            })?;
            info!(
                "Wrote {} organizations ({} level) to {}",
                output.metrics.len(),
                output.level,
                config.output_path.display()
            );
        }
        Commands::Score {
            input,
            mips,
            designations,
            output,
            quality_report,
            sequential,
        } => {
            let mut config = ScoringConfig::new(input, output);
            if let Some(path) = mips {
                config = config.with_mips(path);
            }
            if let Some(path) = designations {
                config = config.with_designations(path);
            }
            if let Some(path) = quality_report {
                config = config.with_quality_report(path);
            }
            if sequential {
                config = config.sequential();
            }
            let output = run_scoring(&config)
                .with_context(|| format!("scoring {}", config.input_path.display()))?;
            info!(
                "Wrote {} scored organizations to {}",
                output.results.len(),
                config.output_path.display()
            );
        }
    }
    Ok(())
}
