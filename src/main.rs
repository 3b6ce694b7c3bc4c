mod prompt;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Input;
use docsync::config::{
    add_excluded_dir, add_excluded_file, add_profile, load_config_or_default, remove_profile,
    write_config, SyncProfile,
};
use docsync::reconciliation::{AutoApprove, Decider, DryRun, ExecutionReport};
use docsync::sync::{log_summary, prepare_sync, run_sync};
use docsync::utils::{get_default_config_path, FOLLOW_UP_FILE};
use docsync::FollowUpLog;
use prompt::PromptDecider;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Docsync - reconcile two copies of a shared document tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Logging verbosity
    #[arg(long, global = true, value_enum, default_value_t = Verbosity::Info)]
    verbosity: Verbosity,

    /// Path to the profiles file (defaults to ~/.docsync/profiles.json)
    #[arg(long, global = true, env = "DOCSYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a new profile (prompts for missing values)
    Setup {
        /// Profile name (e.g. client name)
        #[arg(long)]
        name: Option<String>,

        /// Root directory of the primary tree
        #[arg(long)]
        primary_dir: Option<String>,

        /// Root directory of the secondary tree
        #[arg(long)]
        secondary_dir: Option<String>,
    },

    /// Reconcile the two trees of a profile
    Sync {
        profile: String,

        /// Apply every action without asking
        #[arg(short, long)]
        yes: bool,

        /// Report the actions without applying any
        #[arg(long, conflicts_with = "yes")]
        dry_run: bool,

        /// File that collects notes for postponed decisions
        #[arg(long, env = "DOCSYNC_FOLLOW_UP", default_value = FOLLOW_UP_FILE)]
        follow_up: PathBuf,
    },

    /// Delete a stored profile
    RemoveProfile { name: String },

    /// Exclude a directory name from every sync
    ExcludeDir { dir_name: String },

    /// Exclude a file name from every sync
    ExcludeFile { file_name: String },

    /// List stored profiles and exclusions
    Profiles,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Verbosity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Verbosity {
    fn as_filter(self) -> &'static str {
        match self {
            Verbosity::Debug => "debug",
            Verbosity::Info => "info",
            Verbosity::Warning => "warn",
            Verbosity::Error | Verbosity::Critical => "error",
        }
    }
}

fn init_logging(verbosity: Verbosity) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.as_filter()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn print_separator() {
    println!("{}", "-".repeat(50).cyan());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity)?;
    debug!("Logger set to {:?} level.", args.verbosity);

    let config_path = match args.config {
        Some(path) => path,
        None => get_default_config_path().context("Failed to determine home directory")?,
    };

    match args.command {
        Command::Setup {
            name,
            primary_dir,
            secondary_dir,
        } => setup(&config_path, name, primary_dir, secondary_dir).await,
        Command::Sync {
            profile,
            yes,
            dry_run,
            follow_up,
        } => sync(&config_path, &profile, yes, dry_run, follow_up).await,
        Command::RemoveProfile { name } => {
            let mut config = load_config_or_default(&config_path).await;
            remove_profile(&mut config, &name)?;
            write_config(&config_path, &config).await?;
            println!("Profile '{}' removed.", name);
            Ok(())
        }
        Command::ExcludeDir { dir_name } => {
            let mut config = load_config_or_default(&config_path).await;
            if add_excluded_dir(&mut config, &dir_name) {
                write_config(&config_path, &config).await?;
                println!("Directory '{}' added to exclusion list.", dir_name);
            } else {
                println!("Directory '{}' is already excluded.", dir_name);
            }
            Ok(())
        }
        Command::ExcludeFile { file_name } => {
            let mut config = load_config_or_default(&config_path).await;
            if add_excluded_file(&mut config, &file_name) {
                write_config(&config_path, &config).await?;
                println!("File '{}' added to exclusion list.", file_name);
            } else {
                println!("File '{}' is already excluded.", file_name);
            }
            Ok(())
        }
        Command::Profiles => {
            let config = load_config_or_default(&config_path).await;
            if config.profiles.is_empty() {
                println!("No profiles configured. Run 'setup' first.");
            }
            for (name, profile) in &config.profiles {
                println!(
                    "{}: {} <-> {}",
                    name.bold(),
                    profile.primary_dir,
                    profile.secondary_dir
                );
            }
            println!("Excluded files: {:?}", config.excluded_files);
            println!("Excluded dirs: {:?}", config.excluded_dirs);
            Ok(())
        }
    }
}

async fn setup(
    config_path: &Path,
    name: Option<String>,
    primary_dir: Option<String>,
    secondary_dir: Option<String>,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Profile name (e.g. client name)")
            .interact_text()?,
    };
    let primary_dir = match primary_dir {
        Some(dir) => dir,
        None => Input::<String>::new()
            .with_prompt("Root directory of the primary tree")
            .interact_text()?,
    };
    let secondary_dir = match secondary_dir {
        Some(dir) => dir,
        None => Input::<String>::new()
            .with_prompt("Root directory of the secondary tree")
            .interact_text()?,
    };

    for dir in [&primary_dir, &secondary_dir] {
        if !Path::new(dir).is_dir() {
            bail!("Directory '{}' does not exist.", dir);
        }
    }

    let mut config = load_config_or_default(config_path).await;
    add_profile(&mut config, &name, SyncProfile::new(primary_dir, secondary_dir));
    write_config(config_path, &config).await?;
    println!("Profile '{}' saved successfully.", name);
    Ok(())
}

async fn sync(
    config_path: &Path,
    profile: &str,
    yes: bool,
    dry_run: bool,
    follow_up: PathBuf,
) -> anyhow::Result<()> {
    println!("{}", "Docsync".magenta().bold());

    let config = load_config_or_default(config_path).await;
    if config.profile(profile).is_none() {
        warn!("Profile '{}' not found. Run 'setup' command first.", profile);
        return Ok(());
    }

    let cancel_flag = Arc::new(AtomicBool::new(false));
    let signal_flag = cancel_flag.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if signal_flag.swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
            warn!("Interrupted. Press Ctrl-C again to quit immediately.");
        }
    });

    let plan = prepare_sync(&config, profile, Some(cancel_flag)).await?;

    print_separator();
    log_summary(&plan);
    print_separator();

    for warning in &plan.warnings {
        warn!("Skipped {}: {}", warning.path.display(), warning.message);
    }

    let mut decider: Box<dyn Decider> = if yes {
        Box::new(AutoApprove)
    } else if dry_run {
        Box::new(DryRun)
    } else {
        Box::new(PromptDecider)
    };

    let follow_up = FollowUpLog::new(follow_up);
    let report = run_sync(&plan, decider.as_mut(), &follow_up);
    print_report(&report, &follow_up);
    Ok(())
}

fn print_report(report: &ExecutionReport, follow_up: &FollowUpLog) {
    let total = report.applied.len()
        + report.skipped.len()
        + report.deferred.len()
        + report.failed.len()
        + report.unasked.len();
    if total == 0 {
        return;
    }

    print_separator();
    info!(
        "{} applied, {} skipped, {} deferred, {} failed.",
        report.applied.len(),
        report.skipped.len(),
        report.deferred.len(),
        report.failed.len()
    );
    if !report.deferred.is_empty() {
        info!("Follow-up notes written to {}", follow_up.path().display());
    }
    for failure in &report.failed {
        warn!("{}: {}", failure.path, failure.message);
    }
    if report.was_aborted() {
        warn!("Aborted. {} action(s) were not asked:", report.unasked.len());
        for path in &report.unasked {
            warn!(" - {}", path);
        }
    }
}
