use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use logshare::config::resolve_config_path;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser)]
#[command(name = "logshare")]
#[command(about = "Render the latest workload logs into a shareable HTML report", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Debug logging when RUST_LOG is unset
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API (default)
    Serve,
    /// Render a report locally without publishing it
    Report {
        #[arg(long)]
        category: String,
        #[arg(long)]
        name: String,
        /// Write the HTML here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List the active (category, name) -> log group mappings
    Mappings,
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    Init {
        #[arg(long)]
        stdout: bool,
    },
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so `report` can stream HTML on stdout
    let fmt_layer = match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };
    let default_filter = match cli.verbose {
        0 => "logshare=info,tower_http=info",
        _ => "logshare=debug,tower_http=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(fmt_layer)
        .init();

    let config_path = resolve_config_path(cli.config.as_deref());

    match cli.command {
        Some(Commands::Serve) | None => {
            logshare::cli::run::run(config_path).await?;
        }
        Some(Commands::Report {
            category,
            name,
            output,
        }) => {
            logshare::cli::report::report(config_path, &category, &name, output.as_deref()).await?;
        }
        Some(Commands::Mappings) => {
            logshare::cli::report::mappings(config_path)?;
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { stdout } => {
                logshare::cli::config::init(stdout)?;
            }
            ConfigAction::Validate => {
                logshare::cli::config::validate(config_path)?;
            }
        },
    }

    Ok(())
}
