//! `cmsfront pages` command implementation.

use std::path::PathBuf;

use clap::Args;
use cms_client::{PageSearch, PageSource};
use cms_config::{CliSettings, Config};

use super::source::page_source;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    /// Path to configuration file (default: auto-discover cms.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search criterion as `key=value` (repeatable).
    #[arg(short, long, value_name = "KEY=VALUE")]
    search: Vec<String>,

    /// Bypass the page cache.
    #[arg(long)]
    no_cache: bool,
}

impl PagesArgs {
    /// Execute the pages command.
    ///
    /// # Errors
    ///
    /// Returns an error if a criterion is malformed or the list cannot be
    /// fetched.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let search = parse_search(&self.search)?;

        let cli_settings = CliSettings {
            cache_enabled: self.no_cache.then_some(false),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = page_source(&config, version)?;

        let pages = source.get_page_list(&search)?;
        for page in &pages {
            output.result_line(&format!(
                "{}\t{}\t{}",
                page.identifier, page.url, page.title
            ))?;
        }
        output.info(&format!("{} page(s)", pages.len()));

        Ok(())
    }
}

fn parse_search(pairs: &[String]) -> Result<PageSearch, CliError> {
    pairs
        .iter()
        .map(|pair| {
            PageSearch::parse_pair(pair).ok_or_else(|| {
                CliError::Validation(format!("Invalid search criterion '{pair}', expected key=value"))
            })
        })
        .collect()
}
