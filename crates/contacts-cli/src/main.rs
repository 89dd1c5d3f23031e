//! Contacts CLI
//!
//! Command-line interface for contacts - a contact list kept in a REST store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contacts_core::{Config, Controller, RestContactStore};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "contacts")]
#[command(about = "Contacts - manage a contact list kept in a REST store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List all contacts
    #[command(alias = "ls")]
    List,
    /// Create a new contact
    #[command(alias = "create")]
    Add {
        /// Contact name
        name: String,
        /// Phone number
        phone: String,
    },
    /// Edit a contact
    Edit {
        /// Contact ID (full ID or prefix)
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New phone number
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Delete a contact
    #[command(alias = "rm")]
    Delete {
        /// Contact ID (full ID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Search contacts by name or phone
    Search {
        /// Search term
        term: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;

    // Handle TUI (default when no command given)
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(config).await;
    }

    init_cli_logging();

    let store = RestContactStore::from_config(&config).context("Failed to create HTTP client")?;
    tracing::debug!("Using contact store at {}", store.collection_url());
    let mut controller = Controller::new(Arc::new(store));

    match cli.command {
        Some(Commands::List) => commands::contact::list(&mut controller, &output).await,
        Some(Commands::Add { name, phone }) => {
            commands::contact::add(&mut controller, name, phone, &output).await
        }
        Some(Commands::Edit { id, name, phone }) => {
            commands::contact::edit(&mut controller, id, name, phone, &output).await
        }
        Some(Commands::Delete { id, yes }) => {
            commands::contact::delete(&mut controller, id, yes, &output).await
        }
        Some(Commands::Search { term }) => {
            commands::contact::search(&mut controller, term, &output).await
        }
        Some(Commands::Tui) | Some(Commands::Config { .. }) | None => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Log to stderr for one-shot commands (only if CONTACTS_LOG is set)
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("CONTACTS_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "contacts_core={},contacts_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args_defaults_to_tui() {
        let cli = Cli::try_parse_from(["contacts"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_add() {
        let cli = Cli::try_parse_from(["contacts", "add", "Ada", "123"]).unwrap();
        match cli.command {
            Some(Commands::Add { name, phone }) => {
                assert_eq!(name, "Ada");
                assert_eq!(phone, "123");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_cli_edit_optional_fields() {
        let cli = Cli::try_parse_from(["contacts", "edit", "7", "--phone", "555"]).unwrap();
        match cli.command {
            Some(Commands::Edit { id, name, phone }) => {
                assert_eq!(id, "7");
                assert!(name.is_none());
                assert_eq!(phone.as_deref(), Some("555"));
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_cli_delete_alias_and_global_flags() {
        let cli = Cli::try_parse_from(["contacts", "rm", "7", "-y", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Delete { yes: true, .. })));
    }

    #[test]
    fn test_cli_config_path() {
        let cli =
            Cli::try_parse_from(["contacts", "--config", "/tmp/c.toml", "config", "show"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }
}
