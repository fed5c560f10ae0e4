use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use eolctl::api::EndOfLifeClient;
use eolctl::cache::CacheHandle;
use eolctl::commands::{self, AppContext};
use eolctl::config::{self, Config};
use eolctl::error::EolError;
use eolctl::filter::Selection;
use eolctl::logging;
use eolctl::output::OutputFormat;

#[derive(Parser)]
#[command(name = "eolctl")]
#[command(version, about = "End-of-Life lookups for products, versions and projects")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Directory to export the JSON result to (as output.json)
    #[arg(long, global = true)]
    output_path: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// Config file (defaults to ./config.yaml or ./config/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip the response cache
    #[arg(long, global = true)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List data from the API
    List {
        #[command(subcommand)]
        target: ListTarget,
    },
    /// Get lifecycle data for a product
    Get {
        #[command(subcommand)]
        target: GetTarget,
    },
    /// Detect a project's runtime and check its EOL status
    Scan {
        #[command(subcommand)]
        target: ScanTarget,
    },
    /// Compare two release cycles
    Compare {
        #[command(subcommand)]
        target: CompareTarget,
    },
}

#[derive(Subcommand)]
enum ListTarget {
    /// All products known to the API
    AvailableProducts,
}

#[derive(Subcommand)]
enum GetTarget {
    /// Release cycles of one product
    Product(GetProductArgs),
}

#[derive(Args)]
struct GetProductArgs {
    /// Product name, as listed by `list available-products`
    #[arg(short, long)]
    name: String,

    /// A single release cycle
    #[arg(short, long)]
    version: Option<String>,

    /// Lower bound of a cycle range (inclusive)
    #[arg(long)]
    min: Option<String>,

    /// Upper bound of a cycle range (inclusive)
    #[arg(long)]
    max: Option<String>,
}

#[derive(Subcommand)]
enum ScanTarget {
    /// Scan a project directory
    Project {
        dir: PathBuf,

        /// Scan subdirectories too
        #[arg(short, long)]
        recursive: bool,
    },
}

#[derive(Subcommand)]
enum CompareTarget {
    /// Compare two release cycles of one product
    Product {
        /// Product name
        #[arg(short, long)]
        name: String,
        first: String,
        second: String,
    },
}

/// Flag combinations clap can't express, checked before any I/O
fn validate(cli: &Cli) -> Result<Option<Selection>, EolError> {
    match &cli.command {
        Command::Get {
            target: GetTarget::Product(args),
        } => Selection::from_args(
            args.version.as_deref(),
            args.min.as_deref(),
            args.max.as_deref(),
        )
        .map(Some),
        _ => Ok(None),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let selection = validate(&cli)?;

    let config = Config::load(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(config.log.level.as_str());
    let _guard = logging::init(level, &config::log_path());
    info!("eolctl {}", env!("CARGO_PKG_VERSION"));

    let client = EndOfLifeClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?;
    let cache = if cli.no_cache || !config.cache.enabled {
        CacheHandle::disabled()
    } else {
        CacheHandle::new(config::cache_path(), config.cache.ttl())
    };
    let mut ctx = AppContext::new(Box::new(client), cache, config.cache.ttl())
        .with_output(cli.output)
        .with_default_format(config.output.format)
        .with_output_path(cli.output_path);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let mut stdout = std::io::stdout().lock();
    let result = runtime.block_on(async {
        match cli.command {
            Command::List {
                target: ListTarget::AvailableProducts,
            } => commands::list::available_products(&mut ctx, &mut stdout).await,
            Command::Get {
                target: GetTarget::Product(args),
            } => {
                let selection = selection.unwrap_or(Selection::All);
                commands::get::product(&mut ctx, &args.name, &selection, &mut stdout).await
            }
            Command::Scan {
                target: ScanTarget::Project { dir, recursive },
            } => {
                let today = chrono::Local::now().date_naive();
                commands::scan::project(&mut ctx, &dir, recursive, today, &mut stdout).await
            }
            Command::Compare {
                target: CompareTarget::Product { name, first, second },
            } => commands::compare::product(&mut ctx, &name, &first, &second, &mut stdout).await,
        }
    });

    if let Err(err) = &result {
        error!(kind = err.kind().as_str(), "{}", err);
    }
    result.map_err(anyhow::Error::from)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err.downcast_ref::<EolError>().map_or(1, EolError::exit_code);
            ExitCode::from(code)
        }
    }
}
