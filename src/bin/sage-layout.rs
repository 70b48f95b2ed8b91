use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sage_layout::common::config::{Config, PackStrategy, config_file};
use sage_layout::common::log;
use sage_layout::layout_engine::{LayoutEngine, PackItem, PackingSystem, PackingSystemKind};
use sage_layout::model::{AppId, BatchUpdate, BoardSnapshot, Size};
use tracing::info;

#[derive(Parser)]
#[command(name = "sage-layout")]
#[command(about = "Arrange SAGE3 board apps so that none overlap")]
struct Cli {
    /// Configuration file to use instead of ~/.sage-layout.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log packer decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Arrange apps of a board snapshot
    Arrange(ArrangeArgs),
    /// Pack raw rectangles in the order given
    Pack {
        /// Rectangle size as WxH, e.g. 400x300
        #[arg(long = "size", required = true)]
        sizes: Vec<Size>,
        #[arg(long)]
        strategy: Option<PackStrategy>,
    },
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Args)]
struct ArrangeArgs {
    /// Board snapshot (JSON)
    board: PathBuf,

    /// Ids of the apps to arrange, all apps when omitted
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    #[arg(long)]
    padding: Option<f64>,

    #[arg(long)]
    strategy: Option<PackStrategy>,

    /// Write the result here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print the layout plan instead of the updated snapshot
    #[arg(long)]
    updates_only: bool,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Report invalid values
    Validate,
    /// Write the default configuration
    Init {
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli: Cli = Parser::parse();
    let config_path = cli.config.clone().unwrap_or_else(config_file);

    // config commands must work on a file that does not load
    let result = match cli.command {
        Commands::Config { config_cmd } => {
            log::init_logging(if cli.verbose { "debug" } else { "warn" });
            config_command(config_cmd, &config_path)
        }
        Commands::Arrange(args) => {
            load_config(&config_path, cli.verbose).and_then(|config| arrange(&config, args))
        }
        Commands::Pack { sizes, strategy } => load_config(&config_path, cli.verbose)
            .and_then(|config| pack(&config, &sizes, strategy)),
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

/// Loads the config and installs logging with its filter.
fn load_config(path: &Path, verbose: bool) -> anyhow::Result<Config> {
    let config = Config::load(path);
    let filter = match (&config, verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.settings.log_filter.clone(),
        (Err(_), false) => "warn".to_string(),
    };
    log::init_logging(&filter);
    config.with_context(|| format!("loading {}", path.display()))
}

fn config_command(command: ConfigCommands, path: &Path) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = Config::load(path).with_context(|| format!("loading {}", path.display()))?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommands::Validate => {
            let issues = Config::check(path);
            if issues.is_empty() {
                println!("{} is valid", path.display());
                return Ok(());
            }
            for issue in &issues {
                eprintln!("  {issue}");
            }
            bail!("{} has {} issue(s)", path.display(), issues.len());
        }
        ConfigCommands::Init { force } => {
            Config::init(path, force)?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

fn pack(config: &Config, sizes: &[Size], strategy: Option<PackStrategy>) -> anyhow::Result<()> {
    let system = PackingSystemKind::from(strategy.unwrap_or(config.settings.layout.strategy));
    let items: Vec<PackItem<usize>> =
        sizes.iter().enumerate().map(|(i, s)| PackItem::new(i, s.width, s.height)).collect();
    let packing = system.pack(&items)?;
    println!("{}", serde_json::to_string_pretty(&packing)?);
    Ok(())
}

fn arrange(config: &Config, args: ArrangeArgs) -> anyhow::Result<()> {
    let mut board = BoardSnapshot::read(&args.board)
        .with_context(|| format!("reading board {}", args.board.display()))?;

    let mut settings = config.settings.layout.clone();
    if let Some(strategy) = args.strategy {
        settings.strategy = strategy;
    }
    if let Some(padding) = args.padding {
        settings.padding = padding;
    }

    let selection = match &args.select {
        Some(ids) => board.select(&ids.iter().map(AppId::new).collect::<Vec<_>>()),
        None => board.apps.clone(),
    };
    let plan = LayoutEngine::new(&settings).arrange(&selection)?;
    info!(
        arranged = plan.updates.len(),
        skipped = plan.skipped.len(),
        strategy = %settings.strategy,
        "arranged board"
    );
    board.apply_batch(&plan.updates)?;

    let json = if args.updates_only {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string_pretty(&board)?
    };
    match args.output {
        Some(path) => std::fs::write(&path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
