use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use mendeley_lookup::config::{default_config_path, load_config, save_config};
use mendeley_lookup::discovery::{find_database_path, MendeleyPaths};
use mendeley_lookup::errors::{LookupError, Result};
use mendeley_lookup::lookup::ReferenceLookup;
use mendeley_lookup::types::local_url_to_path;
use tracing_subscriber::EnvFilter;

/// Browse Mendeley Desktop references and open their documents.
#[derive(Parser)]
#[command(
    name = "mendeley-lookup",
    about = "Browse Mendeley Desktop references and open their documents"
)]
struct Cli {
    /// Mendeley database to read (overrides config and discovery)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Config file (default: per-user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all references
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Print the local file URL of a reference
    Resolve {
        /// Reference uuid
        uuid: String,
    },
    /// Open the document of a reference with the default application
    Open {
        /// Reference uuid
        uuid: String,
    },
    /// Print the note link node for a reference as JSON
    Link {
        /// Reference uuid
        uuid: String,
    },
    /// Look for the default Mendeley database
    Discover,
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved configuration
    Show,
    /// Save the Mendeley database path
    SetDb {
        /// Path to the Mendeley SQLite database
        path: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = resolve_config_path(cli.config)?;
    let mut config = load_config(&config_path)?;
    let mendeley_paths = MendeleyPaths::default_locations();

    let lookup = match cli.db {
        Some(db) => ReferenceLookup::new(Some(db)),
        None => ReferenceLookup::from_config(&config, mendeley_paths.as_ref()),
    };

    match cli.command {
        Commands::List { json } => {
            let references = lookup.list_references()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&references)?);
            } else if references.is_empty() {
                println!("No references found");
            } else {
                for reference in &references {
                    println!("{}  {}", reference.uuid, reference.as_text_reference());
                }
            }
        }
        Commands::Resolve { uuid } => match lookup.resolve_file_path(&uuid)? {
            Some(local_url) => println!("{}", local_url),
            None => println!("No file associated with '{}'", uuid),
        },
        Commands::Open { uuid } => match lookup.resolve_file_path(&uuid)? {
            Some(local_url) => {
                let path = local_url_to_path(&local_url);
                opener::open(&path).map_err(|e| LookupError::Launch {
                    message: e.to_string(),
                    path: path.display().to_string(),
                })?;
            }
            None => println!("No file associated with '{}'", uuid),
        },
        Commands::Link { uuid } => match lookup.link_node_for(&uuid)? {
            Some(node) => println!("{}", serde_json::to_string_pretty(&node)?),
            None => println!("No reference found for '{}'", uuid),
        },
        Commands::Discover => match mendeley_paths.as_ref().and_then(find_database_path) {
            Some(path) => println!("{}", path.display()),
            None => println!("Mendeley database not found"),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("Config file: {}", config_path.display());
                match config.configured_database_path() {
                    Some(path) => println!("  Database: {}", path.display()),
                    None => println!("  Database: (not set)"),
                }
                match lookup.database_path() {
                    Some(path) => println!("  In use:   {}", path.display()),
                    None => println!("  In use:   (none)"),
                }
            }
            ConfigAction::SetDb { path } => {
                config.set_database_path(&path);
                save_config(&config_path, &config)?;
                let mut lookup = lookup;
                if let Some(db) = config.configured_database_path() {
                    lookup.set_database_path(Some(db));
                }
                match lookup.database_path() {
                    Some(db) => println!("Using Mendeley database {}", db.display()),
                    None => println!("No Mendeley database set"),
                }
            }
        },
    }
    Ok(())
}

/// Resolves the config file location, defaulting to the per-user config directory.
fn resolve_config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => default_config_path().ok_or_else(|| LookupError::Config {
            message: "no per-user config directory on this platform; pass --config".to_string(),
        }),
    }
}
