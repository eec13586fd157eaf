//! menu-ctl: command-line access to the MenuManager template filters.
//!
//! Generates encryption keys, encrypts/decrypts URL parameters the way the
//! `enc` / `dec` filters do, and renders templates with the full catalog.

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "menu-ctl", version)]
#[command(about = "MenuManager template filter tooling")]
#[command(styles = output::clap_styles())]
pub(crate) struct Cli {
    /// Config file (defaults to ./.menu-filters.toml, then ~/.config/menu-filters.toml)
    #[arg(long, global = true, env = "MENU_FILTERS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Generate a new encryption key for `encryption-key`
    Keygen,
    /// Encrypt a value into a URL-safe token
    Enc { value: String },
    /// Decrypt a token produced by `enc`
    Dec { token: String },
    /// Render a template with a JSON context file
    Render {
        /// Template name relative to the template directory
        template: String,
        /// JSON file holding the context object
        #[arg(long, short)]
        context: Option<PathBuf>,
        /// Template directory (overrides `template-dir`)
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },
    /// List the registered filter names
    Filters,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("menu_ctl=info,menu_filters=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
