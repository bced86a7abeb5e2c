use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use shape_detector_cli::{AnalyzeJob, JobSource};
use shape_detector::{
    FetchConfig, Pipeline, PipelineBuilder,
    io::{DirectorySnapshots, FileImageSource, encode_jpeg},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run zone detection for a job file
    Analyze {
        /// Path to the TOML or JSON job file
        #[arg(short, long)]
        job: PathBuf,
        /// Write the masked image as JPEG to this path
        #[arg(short, long)]
        preview: Option<PathBuf>,
        /// Directory receiving one JPEG per pipeline stage
        #[arg(short, long)]
        snapshots: Option<PathBuf>,
        /// Request timeout in seconds
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
    /// Print the JSON schema of the job file
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze { job, preview, snapshots, timeout } => {
            analyze(job, preview.as_deref(), snapshots.as_deref(), *timeout).await?;
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(AnalyzeJob);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

async fn analyze(job_path: &Path, preview: Option<&Path>, snapshots: Option<&Path>, timeout: u64) -> Result<()> {
    let job = AnalyzeJob::from_file(job_path)?;
    info!("Loaded job from: {}", job_path.display());

    let fetch = FetchConfig { timeout_secs: Some(timeout), ..FetchConfig::default() };
    let mut builder = PipelineBuilder::new().with_fetch_config(fetch);
    let location = match job.source()? {
        JobSource::Url(url) => url,
        JobSource::Path(path) => {
            builder = builder.with_source(FileImageSource::new());
            path
        }
    };
    if let Some(dir) = snapshots {
        let sink = DirectorySnapshots::new(dir)?;
        info!("Writing stage snapshots to: {}", sink.dir().display());
        builder = builder.with_snapshots(sink);
    }
    let pipeline: Pipeline = builder.build()?;

    let mut run = pipeline.session(location, job.zones());
    info!(run_id = %run.run_id(), "Analyzing {} zones of {}", run.zones().len(), run.url());
    run.download().await?;
    run.adjust()?;
    run.mask()?;
    let detections = run.analyze()?;

    for zone in &job.zones {
        let detected = detections.get(&zone.name).copied().unwrap_or(false);
        println!("{}: {}", zone.name, if detected { "detected" } else { "clear" });
    }

    if let Some(path) = preview {
        match run.image() {
            Some(image) => {
                std::fs::write(path, encode_jpeg(image)?)?;
                info!("Preview written to: {}", path.display());
            }
            None => warn!("No masked image available for preview"),
        }
    }

    Ok(())
}
