//! CLI command definitions for the `routinely` binary.
//!
//! Uses clap derive macros. Catalog, endpoint, model and API key can be
//! overridden per invocation or via `ROUTINELY_*` environment variables.

pub mod chat;
pub mod products;
pub mod selection;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::state::ConfigOverrides;

/// Pick products and generate a personalized routine.
#[derive(Parser)]
#[command(name = "routinely", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Catalog location: URL or file path.
    #[arg(long, global = true, env = "ROUTINELY_CATALOG")]
    pub catalog: Option<String>,

    /// Chat-completion endpoint URL.
    #[arg(long, global = true, env = "ROUTINELY_CHAT_ENDPOINT")]
    pub chat_endpoint: Option<String>,

    /// Model identifier sent with each chat request.
    #[arg(long, global = true, env = "ROUTINELY_MODEL")]
    pub model: Option<String>,

    /// Bearer token for the chat endpoint.
    #[arg(long, global = true, env = "ROUTINELY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            catalog: self.catalog.clone(),
            chat_endpoint: self.chat_endpoint.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List catalog products, optionally filtered.
    #[command(alias = "ls")]
    Products {
        /// Only show products in this category.
        #[arg(long, short)]
        category: Option<String>,

        /// Case-insensitive match on name, brand or description.
        #[arg(long, short)]
        search: Option<String>,

        /// Show the description of this product (repeatable).
        #[arg(long)]
        expand: Vec<String>,
    },

    /// List the catalog's categories.
    Categories,

    /// Select a product, or deselect it if already selected.
    Toggle {
        /// Product name, exactly as listed.
        name: String,
    },

    /// Remove a product from the selection.
    #[command(alias = "rm")]
    Remove {
        /// Product name, exactly as listed.
        name: String,
    },

    /// Remove every product from the selection.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show the current selection.
    Selection,

    /// Generate a routine from the selection, then chat about it.
    Routine,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_products_filters() {
        let cli = Cli::try_parse_from([
            "routinely",
            "products",
            "--category",
            "skincare",
            "--search",
            "serum",
            "--expand",
            "Vitamin C Serum",
        ])
        .unwrap();

        match cli.command {
            Commands::Products {
                category,
                search,
                expand,
            } => {
                assert_eq!(category.as_deref(), Some("skincare"));
                assert_eq!(search.as_deref(), Some("serum"));
                assert_eq!(expand, vec!["Vitamin C Serum".to_string()]);
            }
            _ => panic!("expected products command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["routinely", "selection", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_model_flag_becomes_override() {
        let cli = Cli::try_parse_from(["routinely", "--model", "gpt-4o-mini", "routine"]).unwrap();
        assert_eq!(cli.overrides().model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }
}
