//! Command handlers for menu-ctl.

mod cipher;
mod render;

use anyhow::Result;
use menu_filters::FilterConfig;

use crate::output;
use crate::{Cli, Commands};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => FilterConfig::load_from(path)?,
        None => FilterConfig::load(),
    };

    match cli.command {
        Commands::Keygen => cipher::keygen(),
        Commands::Enc { value } => cipher::encrypt(&config, &value),
        Commands::Dec { token } => cipher::decrypt(&config, &token),
        Commands::Render {
            template,
            context,
            template_dir,
        } => render::render(&config, &template, context.as_deref(), template_dir.as_deref()),
        Commands::Filters => {
            list_filters();
            Ok(())
        }
    }
}

fn list_filters() {
    output::header("Registered filters:");
    let mut names = menu_filters::FILTER_NAMES.to_vec();
    names.sort_unstable();
    for name in names {
        output::item(name);
    }
}
