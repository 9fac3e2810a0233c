use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripbrief::cli::commands::TripArgs;
use tripbrief::cli::commands::plan::PlanOptions;

#[derive(Parser)]
#[command(name = "tripbrief")]
#[command(
    version,
    about = "Multi-day RV travel briefings generated with Gemini"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a travel-day briefing
    Plan {
        #[command(flatten)]
        trip: TripArgs,
        #[arg(long, help = "Model to use (default: configured or first available)")]
        model: Option<String>,
        #[arg(long, help = "Wait for the full briefing instead of streaming it")]
        no_stream: bool,
        #[arg(long, short, help = "Directory for the offline copy")]
        output: Option<PathBuf>,
        #[arg(long, help = "Do not save an offline copy")]
        no_save: bool,
    },

    /// Print the compiled prompt without calling the model
    Prompt {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// List models available for generation
    Models,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Edit configuration file with $EDITOR
    Edit {
        #[arg(long, short, help = "Edit global config")]
        global: bool,
    },
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mTripBrief encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tripbrief::cli::Output::new().error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Plan {
            trip,
            model,
            no_stream,
            output,
            no_save,
        } => {
            tripbrief::cli::commands::plan::run(PlanOptions {
                trip,
                model,
                no_stream,
                output,
                no_save,
            })?;
        }
        Commands::Prompt { trip } => {
            tripbrief::cli::commands::prompt::run(&trip)?;
        }
        Commands::Models => {
            tripbrief::cli::commands::models::run()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                tripbrief::cli::commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                tripbrief::cli::commands::config::path()?;
            }
            ConfigAction::Edit { global } => {
                tripbrief::cli::commands::config::edit(global)?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    tripbrief::cli::commands::config::init_global(force)?;
                } else {
                    tripbrief::cli::commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
