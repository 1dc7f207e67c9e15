//! jnibuild - Android NDK build orchestrator
//!
//! Entry point: parses arguments, sets up logging and dispatches to the
//! commands in [`jnibuild::commands`].

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jnibuild::commands::{BuildCommand, CleanCommand, FormatCommand};
use jnibuild::toolchain::{Abi, SUPPORTED_ABIS};
use jnibuild::VERSION;

/// Cross-platform Android NDK build tool
#[derive(Parser, Debug)]
#[command(name = "jnibuild", version, about = "Android NDK build tool for the librime JNI library")]
struct Cli {
    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root containing CMakeLists.txt
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configure, build and install the native library
    Build {
        /// Android NDK path
        #[arg(long, visible_alias = "ndk")]
        toolchain_path: Option<PathBuf>,
        /// Target ABI
        #[arg(
            long,
            value_parser = PossibleValuesParser::new(SUPPORTED_ABIS.iter().copied())
                .try_map(|s| s.parse::<Abi>())
        )]
        arch: Option<Abi>,
        /// Release build
        #[arg(long)]
        release: bool,
        /// Debug build
        #[arg(long)]
        debug: bool,
        /// Minimum Android API level
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        min_api: Option<u32>,
        /// Print the resolved configuration and plan as JSON without building
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove the build directory
    Clean,
    /// Format the JNI sources with clang-format
    Format,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            toolchain_path,
            arch,
            release,
            debug,
            min_api,
            dry_run,
        } => BuildCommand {
            project_dir: cli.project_dir,
            toolchain_path,
            arch,
            release,
            debug,
            min_api,
            dry_run,
        }
        .execute(),
        Command::Clean => CleanCommand {
            project_dir: cli.project_dir,
        }
        .execute(),
        Command::Format => FormatCommand {
            project_dir: cli.project_dir,
            verbose: cli.verbose,
        }
        .execute()
        .map(|_| ()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialise logging: {}", e);
    }
    debug!("jnibuild v{}", VERSION);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
