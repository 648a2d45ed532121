//! `cmsfront serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use cms_config::{CliSettings, Config};
use cms_server::{run_server, server_config_from_config};

use super::source::page_source;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover cms.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and CMS call logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable caching (default: enabled).
    #[arg(long)]
    cache: Option<bool>,

    /// Disable caching.
    #[arg(long, conflicts_with = "cache")]
    no_cache: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            cache_enabled: self.resolve_cache_enabled(),
            host: self.host,
            port: self.port,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = page_source(&config, version)?;

        output.highlight(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!("CMS endpoint: {}", config.require_cms()?.url));
        if config.cache_resolved.enabled {
            output.info(&format!(
                "Cache directory: {}",
                config.cache_resolved.dir.display()
            ));
        } else {
            output.info("Cache: disabled");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config, Arc::new(source))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `cache_enabled` from --cache/--no-cache flags.
    fn resolve_cache_enabled(&self) -> Option<bool> {
        self.no_cache.then_some(false).or(self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ServeArgs,
    }

    fn parse(args: &[&str]) -> ServeArgs {
        TestCli::parse_from(std::iter::once("serve").chain(args.iter().copied())).args
    }

    #[test]
    fn test_cache_flags() {
        assert_eq!(parse(&[]).resolve_cache_enabled(), None);
        assert_eq!(parse(&["--no-cache"]).resolve_cache_enabled(), Some(false));
        assert_eq!(
            parse(&["--cache", "true"]).resolve_cache_enabled(),
            Some(true)
        );
    }

    #[test]
    fn test_overrides() {
        let args = parse(&["--host", "0.0.0.0", "-p", "9000", "-v"]);
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(9000));
        assert!(args.verbose);
    }
}
