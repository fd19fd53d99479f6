use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scrape_dl::{Config, JobResult, JobRunner, cancel_on_shutdown};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Scrape metadata and download the video behind a YouTube or TikTok URL
#[derive(Parser)]
#[command(name = "scrape-dl", version)]
struct Cli {
    /// Video page URL
    #[arg(long)]
    url: String,

    /// Directory that receives `jobs/<job_id>/` (defaults to SCRAPE_DL_DATA_DIR or ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    let runner = match JobRunner::from_config(&config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown(cancel.clone()));

    match runner.run(&cli.url, &cancel).await {
        Ok(result) => {
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            print_summary(&failure.result);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(result: &JobResult) {
    println!("job id:       {}", result.job.id);
    println!("platform:     {}", result.job.platform);
    println!("success:      {}", result.success);
    if let Some(path) = &result.metadata_path {
        println!("metadata:     {}", path.display());
    }
    if let Some(path) = &result.video_path {
        println!("video:        {} ({} bytes)", path.display(), result.video_bytes);
    }
    if let Some(completed_at) = result.completed_at {
        println!("completed at: {}", completed_at.to_rfc3339());
    }
    if let Some(message) = &result.error_message {
        println!("error:        {message}");
    }
}
