use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use extprofile::ProfileKind;
use extprofile::cli::GlobalOptions;
use extprofile::cli::commands;

/// Parse profile kind from string
fn parse_profile_kind(s: &str) -> Result<ProfileKind, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "extprofile")]
#[command(
    version,
    about = "Detect project types and manage per-project tool profiles"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Project root (default: current directory)")]
    root: Option<PathBuf>,

    #[arg(long, global = true, help = "JSON file listing installed tools")]
    catalog: Option<PathBuf>,

    #[arg(long, global = true, help = "Editor extensions directory to scan")]
    extensions_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the project type of the root
    Detect {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Show and edit profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Show project type, profiles and recorded states
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show one or both profiles
    Show {
        #[arg(value_parser = parse_profile_kind, help = "custom or recommended (default: both)")]
        kind: Option<ProfileKind>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Toggle a tool in a profile
    Toggle {
        #[arg(value_parser = parse_profile_kind, help = "custom or recommended")]
        kind: ProfileKind,
        #[arg(help = "Tool identifier, e.g. publisher.name")]
        id: String,
    },
    /// Add an installed tool to the custom profile
    Add {
        #[arg(help = "Tool identifier, e.g. publisher.name")]
        id: String,
    },
    /// Clear a profile
    Reset {
        #[arg(value_parser = parse_profile_kind, help = "custom or recommended")]
        kind: ProfileKind,
    },
    /// Push a profile's enabled states to the host
    Apply {
        #[arg(value_parser = parse_profile_kind, help = "custom or recommended")]
        kind: ProfileKind,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
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
    /// Create .extprofile.toml in the project root
    Init {
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
        eprintln!("\x1b[31mextprofile encountered an unexpected error:\x1b[0m");
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

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
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
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = GlobalOptions {
        root: cli.root,
        catalog: cli.catalog,
        extensions_dir: cli.extensions_dir,
    };

    let rt = Runtime::new()?;
    rt.block_on(run_async(cli.command, &options))?;

    Ok(())
}

async fn run_async(command: Commands, options: &GlobalOptions) -> extprofile::Result<()> {
    match command {
        Commands::Detect { format } => commands::detect::run(options, &format).await,
        Commands::Status { format } => commands::status::run(options, &format).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show { kind, format } => {
                commands::profile::show(options, kind, &format).await
            }
            ProfileAction::Toggle { kind, id } => {
                commands::profile::toggle(options, kind, &id).await
            }
            ProfileAction::Add { id } => commands::profile::add(options, &id).await,
            ProfileAction::Reset { kind } => commands::profile::reset(options, kind).await,
            ProfileAction::Apply { kind, format } => {
                commands::profile::apply(options, kind, &format).await
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => commands::config::show(options, &format),
            ConfigAction::Path => commands::config::path(options),
            ConfigAction::Init { force } => commands::config::init(options, force),
        },
    }
}
