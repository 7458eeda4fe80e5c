mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "vprobe",
    about = "Orchestrate vision-unit probing runs against an external Python entrypoint",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .vprobe/ or .git/)
    #[arg(long, global = true, env = "VPROBE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the conda environment and python dependencies
    Setup {
        /// Print the composed commands without executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a single probing experiment
    Run {
        /// Model family: resnet, dino, or clip
        family: String,

        #[command(flatten)]
        overrides: cmd::run::RunArgs,

        /// Print the composed command line without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run every family in fixed order (resnet, dino, clip), aborting on the
    /// first failure
    Suite {
        /// Print the composed command lines without executing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show each family's resolved argument set
    List,

    /// Validate the project configuration
    Config {
        #[command(subcommand)]
        subcommand: cmd::config::ConfigSubcommand,
    },

    /// Show past runs
    History,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Setup { dry_run } => cmd::setup::run(&root, dry_run),
        Commands::Run {
            family,
            overrides,
            dry_run,
        } => cmd::run::run(&root, &family, overrides, dry_run),
        Commands::Suite { dry_run } => cmd::suite::run(&root, dry_run),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::History => cmd::history::run(&root, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        let code = e
            .downcast_ref::<cmd::run::RunExit>()
            .map(cmd::run::RunExit::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
