//! CLI application for the TaxNova tax assistant.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{ask, chat, config, estimate, extract, filing, resources};

/// TaxNova - Form 16 extraction, tax estimates and an AI tax assistant
#[derive(Parser)]
#[command(name = "taxnova")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract salary figures from a Form 16 PDF
    Extract(extract::ExtractArgs),

    /// Estimate deductions, liability and tax due
    Estimate(estimate::EstimateArgs),

    /// Auto-fill and file a return (simulation only)
    File(filing::FileArgs),

    /// Ask the assistant a single question
    Ask(ask::AskArgs),

    /// Start an interactive assistant session
    Chat(chat::ChatArgs),

    /// List tax resource links
    Resources(resources::ResourcesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Estimate(args) => estimate::run(args, config_path).await,
        Commands::File(args) => filing::run(args, config_path).await,
        Commands::Ask(args) => ask::run(args, config_path).await,
        Commands::Chat(args) => chat::run(args, config_path).await,
        Commands::Resources(args) => resources::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
