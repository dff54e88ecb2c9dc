// Remote Edit
// Pick a file on remote storage, edit it locally, and upload it back with verification

// IMPORTS ------------------>>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use remote_edit::constants::{DEFAULT_LOG_FILTER, VERBOSE_LOG_FILTER};
use remote_edit::core::{
    BatchSummary, Destination, ReconcileReport, ReconcileState, Settings, SettingsOverrides, UserConfig,
};
use remote_edit::operations::{
    EditSession, MountManager, Rclone, Reconciler, RemoteStore, SessionOutcome, StdFs,
};
use remote_edit::ui::{CommandEditor, NumberedPicker};

//--------------------------------------------------------<<

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                   COMMAND LINE                                                   │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

#[derive(Parser)]
#[command(name = "remote-edit")]
#[command(about = "Edit files on remote storage and upload them back with size verification")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $REMOTE_EDIT_CONFIG or ~/.config/remote-edit/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every poll and state transition
    #[arg(short, long, global = true)]
    verbose: bool,

    /// rclone remote name
    #[arg(long, global = true)]
    remote: Option<String>,

    /// Directory inside the remote
    #[arg(long = "remote-dir", global = true)]
    remote_dir: Option<String>,

    /// Where the remote is mounted
    #[arg(long = "mount-point", global = true)]
    mount_point: Option<String>,

    /// Local directory for working copies
    #[arg(long = "work-dir", global = true)]
    work_dir: Option<String>,

    /// Size checks before an upload counts as unconfirmed
    #[arg(long = "max-attempts", global = true)]
    max_attempts: Option<u32>,

    /// Seconds between size checks
    #[arg(long = "retry-delay", global = true)]
    retry_delay: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a remote file, edit it, and upload it back
    Edit {
        /// Editor command (overrides $VISUAL and $EDITOR)
        #[arg(long)]
        editor: Option<String>,

        /// List and download through rclone instead of the mount
        #[arg(long)]
        no_mount: bool,

        /// Unmount the remote when done
        #[arg(long)]
        unmount: bool,
    },
    /// Upload local files if they are newer than the destination copy
    Push {
        /// Files to reconcile
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Destination directory or rclone path (remote:dir); defaults to the configured remote
        #[arg(long)]
        dest: Option<String>,
    },
    /// List files available for editing
    List {
        /// Directory or rclone path to list; defaults to the configured remote
        #[arg(long)]
        dest: Option<String>,
    },
    /// Mount the configured remote
    Mount,
    /// Unmount the configured remote
    Unmount,
    /// Print the effective configuration
    Config {
        /// Save it as the user config file
        #[arg(long)]
        write: bool,
    },
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        let mut overrides = SettingsOverrides {
            remote: self.remote.clone(),
            remote_directory: self.remote_dir.clone(),
            mount_point: self.mount_point.clone(),
            work_dir: self.work_dir.clone(),
            max_attempts: self.max_attempts,
            retry_delay_secs: self.retry_delay,
            ..Default::default()
        };

        if let Commands::Edit { editor, no_mount, unmount } = &self.command {
            overrides.editor = editor.clone();
            overrides.no_mount = *no_mount;
            overrides.unmount_after_edit = *unmount;
        }

        overrides
    }
}

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                 MAIN ENTRY POINT                                                 │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { VERBOSE_LOG_FILTER } else { DEFAULT_LOG_FILTER };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref(), &cli.overrides())?;

    match cli.command {
        Commands::Edit { .. } => run_edit(&settings),
        Commands::Push { files, dest } => run_push(&settings, &files, dest.as_deref()),
        Commands::List { dest } => run_list(&settings, dest.as_deref()),
        Commands::Mount => MountManager::new(&settings.rclone_binary).mount(&settings.remote, &settings.mount_point),
        Commands::Unmount => MountManager::new(&settings.rclone_binary).unmount(&settings.mount_point),
        Commands::Config { write } => run_config(&settings, cli.config, write),
    }
}

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                     COMMANDS                                                     │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn run_edit(settings: &Settings) -> Result<()> {
    let rclone = Rclone::new(&settings.rclone_binary);
    let mounts = MountManager::new(&settings.rclone_binary);

    let mut session = EditSession::new(
        &StdFs,
        &rclone,
        settings.destination(),
        &settings.work_dir,
        settings.retry,
    )
    .with_excludes(settings.global_excludes.clone());

    if settings.mount_on_edit {
        mounts.mount(&settings.remote, &settings.mount_point)?;
        session = session.with_mount(settings.mount_point.join(&settings.remote_directory));
    }

    let editor = if settings.editor_from_cli {
        CommandEditor::new(&settings.editor)
    } else {
        CommandEditor::from_env(&settings.editor)
    };

    let outcome = session.run(&mut NumberedPicker::stdio(), &editor);

    // Unmount even when the session failed
    if settings.mount_on_edit && settings.unmount_after_edit {
        if let Err(e) = mounts.unmount(&settings.mount_point) {
            error!("{:#}", e);
        }
    }

    match outcome? {
        SessionOutcome::NothingToEdit => println!("Nothing to edit in {}", settings.destination()),
        SessionOutcome::Cancelled => println!("Cancelled."),
        SessionOutcome::Reconciled(report) => print_report(&report),
    }

    Ok(())
}

fn run_push(settings: &Settings, files: &[PathBuf], dest: Option<&str>) -> Result<()> {
    let destination = dest.map(Destination::parse).unwrap_or_else(|| settings.destination());
    let rclone = Rclone::new(&settings.rclone_binary);

    info!(%destination, files = files.len(), "reconciling");
    let summary = Reconciler::new(&StdFs, &rclone, settings.retry).reconcile_batch(files, &destination)?;

    print_summary(&summary);
    Ok(())
}

fn run_list(settings: &Settings, dest: Option<&str>) -> Result<()> {
    let destination = dest.map(Destination::parse).unwrap_or_else(|| settings.destination());
    let rclone = Rclone::new(&settings.rclone_binary);

    let names = match destination.remote_directory() {
        Some(directory) => rclone.list_objects(&directory)?,
        None => EditSession::new(&StdFs, &rclone, destination.clone(), &settings.work_dir, settings.retry).list()?,
    };

    let matcher = remote_edit::utilities::PatternMatcher::new(settings.global_excludes.clone());
    for name in matcher.filter(names) {
        println!("{}", name);
    }

    Ok(())
}

fn run_config(settings: &Settings, config_path: Option<PathBuf>, write: bool) -> Result<()> {
    let config = settings.to_user_config();

    if write {
        let path = config_path
            .or_else(UserConfig::default_path)
            .context("No config path given and $HOME is not set")?;
        config.save(&path)?;
        println!("Wrote {}", path.display());
    } else {
        print!("{}", serde_yaml::to_string(&config).context("Failed to serialize config")?);
    }

    Ok(())
}

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                     REPORTING                                                    │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn print_report(report: &ReconcileReport) {
    let source = report.source_path.display();

    match (report.state, report.transfer) {
        (ReconcileState::Confirmed, Some(outcome)) => println!(
            "{}: uploaded and verified ({} bytes, attempt {})",
            source, outcome.local_size_bytes, outcome.attempts_used
        ),
        (ReconcileState::Exhausted, Some(outcome)) => println!(
            "{}: upload NOT verified after {} attempts (local {} bytes, remote {} bytes); local copy kept",
            source, outcome.attempts_used, outcome.local_size_bytes, outcome.remote_size_bytes
        ),
        (ReconcileState::Skipped, _) => println!("{}: skipped ({:?}); local copy untouched", source, report.skip_reason),
        (state, _) => println!("{}: {:?}", source, state),
    }
}

fn print_summary(summary: &BatchSummary) {
    for report in &summary.reports {
        print_report(report);
    }
    for message in &summary.errors {
        println!("{}", message);
    }

    println!(
        "{} confirmed, {} not verified, {} skipped",
        summary.confirmed, summary.exhausted, summary.skipped
    );
}
