use clap::{Parser, Subcommand};
use lg::commands::*;
use lg::core::{
    error::{LgError, Result},
    print_error,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lg")]
#[command(about = "Private git branches on top of a Perforce workspace")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the baseline branch and a topic branch in the current directory
    Init {
        /// Name of the topic branch
        #[arg(short = 'n', long)]
        name: Option<String>,
        /// Keep git metadata under this directory instead of in-tree
        #[arg(short = 'r', long)]
        remote_dir: Option<PathBuf>,
    },
    /// Add files to the baseline and rebase the topic branch onto it
    Import {
        /// Files to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Commit external changes to baselined files (run on the baseline branch)
    Sync {
        /// Commit message
        message: Option<String>,
    },
    /// Set up the current directory from existing lg metadata
    Clone {
        /// Name of the topic branch
        #[arg(short = 'n', long)]
        name: Option<String>,
        /// Keep git metadata under this directory instead of in-tree
        #[arg(short = 'r', long)]
        remote_dir: Option<PathBuf>,
        /// Metadata directory, working tree, or pointer file to clone from
        source: PathBuf,
    },
    /// List files changed on the topic branch
    Files {
        /// Revision range (default: <baseline>...HEAD)
        range: Option<String>,
    },
    /// Show commits on the topic branch
    Log {
        /// Revision range (default: <baseline>..HEAD)
        range: Option<String>,
    },
    /// Show working tree status without untracked files
    Status,
    /// Open the topic branch's changes in a pending p4 changelist
    Export {
        /// Print the p4 commands instead of running them
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let result = match cli.command {
        Commands::Init { name, remote_dir } => execute_init(name, remote_dir),
        Commands::Import { paths } => execute_import(paths),
        Commands::Sync { message } => execute_sync(message),
        Commands::Clone {
            name,
            remote_dir,
            source,
        } => execute_clone(source, name, remote_dir),
        Commands::Files { range } => execute_files(range),
        Commands::Log { range } => execute_log(range),
        Commands::Status => execute_status(),
        Commands::Export { dry_run } => execute_export(dry_run),
    };

    if let Err(e) = result {
        if let LgError::ExportFailed { failed } = &e {
            for command in failed {
                print_error(command);
            }
        }
        print_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
