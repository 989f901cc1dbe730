use clap::{Parser, Subcommand};
use ritual_core::{Config, RoutineId};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ritual", version, about = "Ritual routine timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Routine management
    Routine {
        #[command(subcommand)]
        action: commands::routine::RoutineAction,
    },
    /// Task management within a routine
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Drive a routine run
    Run {
        /// Routine to operate on (defaults to the active routine)
        #[arg(long, short, global = true)]
        routine: Option<RoutineId>,
        #[command(subcommand)]
        action: commands::run::RunAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    // stdout carries JSON, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RITUAL_LOG")
                .unwrap_or_else(|_| EnvFilter::new(Config::load_or_default().log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Routine { action } => commands::routine::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Run { routine, action } => commands::run::run(routine, action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
