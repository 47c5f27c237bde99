//! linkarr - organize media libraries with relative symlinks.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linkarr::config::{ConfigLoader, LogLevel, RunMode, Settings};
use linkarr::jobs::{self, LinkRunner};
use linkarr::watcher::{FolderWatcher, WatchLoop};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Watch,
    Once,
}

impl From<ModeArg> for RunMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Watch => RunMode::Watch,
            ModeArg::Once => RunMode::Once,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "linkarr",
    about = "Organize media libraries with relative symlinks",
    version
)]
struct Cli {
    /// Config file (JSON, or TOML with a .toml extension).
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Override the run mode from the config file.
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Validate the config, list the jobs and exit.
    #[arg(long)]
    check: bool,
}

fn init_tracing(verbosity: u8, configured: LogLevel) {
    let level = match verbosity {
        0 => configured.as_filter(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loader = cli
        .config
        .clone()
        .map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let settings = match loader.load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(cli.verbose, LogLevel::default());
            tracing::error!(error = %e, "Config error");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(cli.verbose, settings.log_level);
    tracing::info!(jobs = settings.jobs.len(), "Config loaded successfully");

    if cli.check {
        print_jobs(&settings);
        return ExitCode::SUCCESS;
    }

    match cli.mode.map_or(settings.mode, RunMode::from) {
        RunMode::Once => run_once(settings).await,
        RunMode::Watch => run_watch(settings).await,
    }
}

fn print_jobs(settings: &Settings) {
    println!(
        "mode: {:?}, format: {:?}",
        settings.mode, settings.media_server_format
    );
    for job in &settings.jobs {
        println!(
            "[{}] {:<5} {} -> {} ({})",
            if job.is_enabled() { "on" } else { "off" },
            job.media_type(),
            job.source().display(),
            job.dest().display(),
            job.matcher().pattern()
        );
    }
}

async fn run_once(settings: Settings) -> ExitCode {
    tracing::info!("Triggering a single run");
    let outcomes =
        tokio::task::spawn_blocking(move || jobs::run_all(&LinkRunner, &settings.jobs)).await;

    match outcomes {
        Ok(outcomes) if outcomes.iter().all(|o| o.result.is_ok()) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "Run panicked");
            ExitCode::FAILURE
        }
    }
}

async fn run_watch(settings: Settings) -> ExitCode {
    let watch = WatchLoop::new(settings.jobs);
    let roots = watch.watched_roots();

    if let Some(missing) = roots.iter().find(|root| !root.is_dir()) {
        tracing::error!(folder = %missing.display(), "Source folder does not exist");
        return ExitCode::FAILURE;
    }

    let (mut watcher, events) = match FolderWatcher::new(roots) {
        Ok(watcher) => watcher,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start folder watcher");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let stats = watch.run(events, cancel).await;
    watcher.stop();

    tracing::info!(
        runs = stats.initial_runs + stats.change_runs,
        failed = stats.failed_runs,
        "Stopped watching"
    );
    ExitCode::SUCCESS
}

/// Cancel `cancel` on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    cancel.cancel();
}
