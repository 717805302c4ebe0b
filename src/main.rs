use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use rvc_models::{commands, core::config::Config, core::logging};

#[derive(Parser)]
#[clap(name = "rvc-models")]
#[clap(about = "Install the predictor and embedder models used by RVC")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to a configuration file (default: ./rvc-models.toml)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Threshold for third-party log output: DEBUG, INFO, WARNING, ERROR or CRITICAL
    #[clap(long, global = true)]
    log_level: Option<String>,

    /// Apply the log level to every logger, not only third-party ones
    #[clap(long, global = true)]
    global_logging: bool,

    /// Leave log filtering to RUST_LOG
    #[clap(long, global = true)]
    no_log_config: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CatalogArgs {
    /// Also install the ONNX variants of the predictors
    #[clap(long)]
    onnx: bool,
    /// Directory holding predictors/ and embedders/ (default: rvc/models)
    #[clap(long)]
    root: Option<PathBuf>,
    /// Print machine-readable JSON
    #[clap(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every model that is not present yet
    Install {
        #[clap(flatten)]
        catalog: CatalogArgs,
        /// Download into a temporary file and rename it once complete
        #[clap(long)]
        atomic: bool,
        /// Exit with a non-zero status if any model failed to install
        #[clap(long)]
        strict: bool,
    },
    /// Show which models are installed
    List {
        #[clap(flatten)]
        catalog: CatalogArgs,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.global_logging {
            config.logging.apply_globally = true;
        }
        if self.no_log_config {
            config.logging.enabled = false;
        }

        let catalog = match &self.command {
            Commands::Install {
                catalog, atomic, ..
            } => {
                if *atomic {
                    config.atomic = true;
                }
                catalog
            }
            Commands::List { catalog } => catalog,
        };

        if catalog.onnx {
            config.onnx = true;
        }
        if let Some(root) = &catalog.root {
            config.root = root.clone();
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    logging::configure(&config.logging)?;

    match cli.command {
        Commands::Install {
            catalog, strict, ..
        } => {
            let report = commands::install::install_models(&config, catalog.json)?;
            Ok(!(strict && report.has_failures()))
        }
        Commands::List { catalog } => {
            commands::list::list_models(&config, catalog.json)?;
            Ok(true)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
