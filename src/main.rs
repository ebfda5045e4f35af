use anyhow::Result;
use bak::areas::repository::Repository;
use bak::artifacts::core::PagerWriter;
use bak::artifacts::diff::tree_diff::DiffFilter;
use bak::artifacts::mirror::config::MirrorConfig;
use bak::artifacts::mirror::store::DirStore;
use bak::commands::porcelain::log::LogOptions;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bak",
    version = "0.1.0",
    about = "Incremental snapshot backups mirrored into a remote store",
    long_about = "bak records content-addressed snapshots of a backup directory \
    and mirrors only the changes between the last mirrored snapshot and the \
    newest one into a destination store.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a backup repository",
        long_about = "This command initializes a backup repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the backup directory")]
        path: Option<String>,
    },
    #[command(
        name = "snapshot",
        about = "Record a snapshot of the backup directory",
        long_about = "This command stores every file of the backup directory and records a new snapshot \
        unless nothing changed since the last one."
    )]
    Snapshot {
        #[arg(short, long, help = "The snapshot message")]
        message: Option<String>,
    },
    #[command(
        name = "log",
        about = "Show snapshot history",
        long_about = "This command walks the snapshot history newest-first, starting from HEAD or the given revision."
    )]
    Log {
        #[arg(index = 1, help = "The revision to start from (defaults to HEAD)")]
        revision: Option<String>,
        #[arg(long, help = "One line per snapshot")]
        oneline: bool,
    },
    #[command(
        name = "ls-files",
        about = "List the files recorded in a snapshot",
        long_about = "This command recursively lists every file of a snapshot's tree in path order."
    )]
    LsFiles {
        #[arg(index = 1, default_value = "HEAD", help = "The snapshot to list")]
        revision: String,
        #[arg(short, long, help = "Show entry mode and blob oid per file")]
        long: bool,
    },
    #[command(
        name = "diff",
        about = "Show the changeset between two snapshots",
        long_about = "This command prints one name-status line (A/D/M and path) for every file \
        that differs between the two snapshots."
    )]
    Diff {
        #[arg(index = 1, help = "The old revision")]
        old: String,
        #[arg(index = 2, help = "The new revision")]
        new: String,
        #[arg(
            long = "diff-filter",
            help = "Restrict to the given change kinds (combination of A, D, M)"
        )]
        diff_filter: Option<String>,
    },
    #[command(
        name = "sync",
        about = "Mirror pending changes to the destination",
        long_about = "This command replays the changeset between the last mirrored snapshot and HEAD \
        onto the destination directory and advances the mirror marker. The destination is remembered \
        in the repository, so later runs can omit it."
    )]
    Sync {
        #[arg(index = 1, help = "The mirror destination directory")]
        destination: Option<PathBuf>,
        #[arg(long, help = "Print the plan without touching the mirror")]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => {
                    if !std::path::Path::new(path).exists() {
                        std::fs::create_dir_all(path)?;
                    }
                    Repository::new(path, Box::new(std::io::stdout()))?
                }
                None => {
                    let pwd = std::env::current_dir()?;
                    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?
                }
            };

            repository.init()?
        }
        Commands::Snapshot { message } => {
            let mut repository = repository_in_cwd()?;

            repository.snapshot(message.as_deref())?
        }
        Commands::Log { revision, oneline } => {
            let opts = LogOptions {
                revision: revision.clone(),
                oneline: *oneline,
            };

            if use_pager() {
                let pager = minus::Pager::new();
                let writer = PagerWriter::new(pager.clone());
                let pwd = std::env::current_dir()?;
                let mut repository =
                    Repository::new(&pwd.to_string_lossy(), Box::new(writer))?;

                repository.log(&opts)?;
                minus::page_all(pager)?;
            } else {
                let mut repository = repository_in_cwd()?;
                repository.log(&opts)?;
            }
        }
        Commands::LsFiles { revision, long } => {
            let mut repository = repository_in_cwd()?;

            repository.ls_files(revision, *long)?
        }
        Commands::Diff {
            old,
            new,
            diff_filter,
        } => {
            let filter = match diff_filter {
                Some(filter) => DiffFilter::try_parse(filter)
                    .ok_or_else(|| anyhow::anyhow!("invalid diff filter: {}", filter))?,
                None => DiffFilter::all(),
            };

            let mut repository = repository_in_cwd()?;

            repository.diff_snapshots(old, new, filter)?
        }
        Commands::Sync {
            destination,
            dry_run,
        } => {
            let mut repository = repository_in_cwd()?;
            let config_path = repository.mirror_config_path();

            let destination = match destination {
                Some(destination) => destination.clone(),
                None => {
                    MirrorConfig::load(&config_path)?
                        .ok_or_else(|| {
                            anyhow::anyhow!(
                                "no mirror destination given and none remembered; run `bak sync <destination>` once"
                            )
                        })?
                        .destination
                }
            };

            let store = DirStore::new(destination.clone());
            repository.sync(&store, *dry_run).await?;

            if !*dry_run {
                MirrorConfig { destination }.save(&config_path)?;
            }
        }
    }

    Ok(())
}

fn repository_in_cwd() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}

fn use_pager() -> bool {
    std::env::var_os("NO_PAGER").is_none() && std::io::stdout().is_terminal()
}
