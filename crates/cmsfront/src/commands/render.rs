//! `cmsfront render` command implementation.

use std::path::PathBuf;

use clap::Args;
use cms_client::PageSource;
use cms_config::{CliSettings, Config};
use cms_renderer::PageRenderer;

use super::source::page_source;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Page identifier (empty for the front page).
    #[arg(default_value = "")]
    identifier: String,

    /// Path to configuration file (default: auto-discover cms.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bypass the page cache.
    #[arg(long)]
    no_cache: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or rendered.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            cache_enabled: self.no_cache.then_some(false),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = page_source(&config, version)?;

        let tree = source.get_page(&self.identifier)?;
        let renderer = PageRenderer::new(&tree);
        let html = renderer.render_page()?;

        let status = renderer.http_status();
        if status != 200 {
            output.info(&format!("Page declares HTTP status {status}"));
        }

        output.result(&html)?;
        Ok(())
    }
}
