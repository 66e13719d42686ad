use std::path::Path;

use clap::Parser;
use clap::Subcommand;
use cmd::command::generate;
use cmd::command::generate::Generate;
use cmd::command::pipeline;
use cmd::command::pipeline::RunPipeline;
use cmd::command::report;
use cmd::command::report::Report;
use cmd::config::Config;
use cmd::config::LogLevel;
use cmd::error::Error;
use cmd::error::Result;
use tracing::level_filters::LevelFilter;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Subcommand, Clone)]
enum Commands {
    /// Generate stores, products and transactions
    Generate(Generate),
    /// Run the bronze/silver/gold pipeline
    Pipeline(RunPipeline),
    /// Print the business report and export csv files
    Report(Report),
}

impl Commands {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Generate(args) => args.config.as_deref(),
            Commands::Pipeline(args) => args.config.as_deref(),
            Commands::Report(args) => args.config.as_deref(),
        }
    }
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Overrides `[log] level`
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let cfg = Config::load(args.command.config_path())?;

    let level: LevelFilter = args.log_level.unwrap_or(cfg.log.level).into();
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::SetGlobalDefaultError)?;

    let version = env!("CARGO_PKG_VERSION");
    info!("lakehouse v{version}");

    match &args.command {
        Commands::Generate(args) => generate::start(args, cfg)?,
        Commands::Pipeline(args) => pipeline::start(args, cfg).await?,
        Commands::Report(args) => report::start(args, cfg).await?,
    }

    Ok(())
}
