//! Fetches every resource the game client needs into an application directory.
//!
//! Drives the fetcher the way the launcher's UI does: dispatch once, then poll
//! on a fixed tick until everything is ready or a download fails.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use resource_fetch::{FsStorage, HttpEngine, Layout, ResourceFetcher, Sources, Status};

/// Default interval between polls, in milliseconds.
const DEFAULT_TICK_MS: u64 = 100;

#[derive(Parser)]
#[command(about = "Download the game's music, sounds and texture bundle")]
struct CliArgs {
    /// Application directory that receives `audio/` and `default.zip`.
    #[arg(long, default_value = ".")]
    app_dir: PathBuf,

    /// JSON file overriding remote endpoints.
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Interval between polls in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Only report what is missing, without downloading.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_sources(path: Option<&PathBuf>) -> resource_fetch::Result<Sources> {
    let Some(path) = path else {
        return Ok(Sources::default());
    };
    let json = std::fs::read_to_string(path).map_err(|e| resource_fetch::Error::Storage {
        operation: "read",
        path: path.clone(),
        message: e.to_string(),
    })?;
    Sources::from_json(&json)
}

fn run(args: &CliArgs) -> resource_fetch::Result<ExitCode> {
    let sources = load_sources(args.sources.as_ref())?;
    let mut fetcher =
        ResourceFetcher::new(Layout::new(&args.app_dir), FsStorage).with_sources(sources);

    let inventory = fetcher.scan()?;
    println!(
        "{} resources missing ({:.2} MB)",
        inventory.missing_count(),
        inventory.download_size_mb()
    );
    if inventory.all_present() {
        println!("All resources present");
        return Ok(ExitCode::SUCCESS);
    }
    if args.dry_run {
        return Ok(ExitCode::SUCCESS);
    }

    let runtime = tokio::runtime::Runtime::new().map_err(|e| resource_fetch::Error::Config {
        context: "async runtime",
        detail: e.to_string(),
    })?;
    let mut engine = HttpEngine::new(runtime.handle().clone());
    let print_status = |status: Status| println!("{status}");

    fetcher.dispatch(&mut engine, print_status)?;

    let tick = Duration::from_millis(args.tick_ms);
    while !fetcher.poll(&mut engine, print_status)? {
        if let Some(name) = fetcher.failure() {
            tracing::error!(name, "Download failed, giving up");
            return Ok(ExitCode::FAILURE);
        }
        std::thread::sleep(tick);
    }

    if let Some(bundle) = fetcher.take_bundle() {
        tracing::info!(
            classic_jar = bundle.classic_jar.len(),
            modern_jar = bundle.modern_jar.len(),
            terrain_patch = bundle.terrain_patch.len(),
            gui_patch = bundle.gui_patch.len(),
            "Bundle parts received"
        );
    }

    println!("All resources ready");
    Ok(ExitCode::SUCCESS)
}
