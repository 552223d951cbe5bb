use anyhow::Result;
use clap::{Parser, Subcommand};
use scanner_interaction::{ClientConfig, HttpAnalysisClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "scanner")]
#[command(about = "AI Opportunity Scanner CLI - automation and ROI analysis for job descriptions", long_about = None)]
struct Cli {
    /// Base URL of the analysis service (overrides config.toml and SCANNER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a job description and print the result
    Analyze {
        /// Job title, e.g. "Operations Manager"
        #[arg(long)]
        title: String,

        /// Industry name (see `scanner industries`)
        #[arg(long)]
        industry: String,

        /// Job description text (at least 50 characters)
        #[arg(long, conflicts_with = "description_file", required_unless_present = "description_file")]
        description: Option<String>,

        /// Read the job description from a file
        #[arg(long)]
        description_file: Option<PathBuf>,

        /// Optional email to receive a copy of the report
        #[arg(long)]
        email: Option<String>,

        /// How many times to retry the whole analysis after a failure
        #[arg(long, default_value_t = 0)]
        manual_retries: u32,
    },
    /// Check that the analysis service is reachable
    Health,
    /// List supported industries
    Industries,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(api_url: Option<String>) -> Result<HttpAnalysisClient> {
    let mut config = ClientConfig::load()?;
    if let Some(url) = api_url {
        config = config.with_api_base_url(url);
    }
    Ok(HttpAnalysisClient::new(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            title,
            industry,
            description,
            description_file,
            email,
            manual_retries,
        } => {
            let job_description =
                commands::analyze::read_description(description, description_file.as_deref())?;
            let client = build_client(cli.api_url)?;
            commands::analyze::run(
                client,
                commands::analyze::AnalyzeArgs {
                    title,
                    industry,
                    job_description,
                    email,
                    manual_retries,
                },
            )
            .await?
        }
        Commands::Health => commands::health::check(&build_client(cli.api_url)?).await?,
        Commands::Industries => commands::industries::list(),
    }

    Ok(())
}
