//! Configuration management for cmsfront.
//!
//! Parses `cms.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `cms.url`
//! - `cms.private_key`
//! - `cms.session_id`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cms.toml";

/// Public XML-RPC endpoint of the Intraface CMS.
pub const DEFAULT_CMS_URL: &str = "http://www.intraface.dk/xmlrpc/cms/server0300.php";

/// Default lifetime of cached CMS responses.
const DEFAULT_CACHE_LIFETIME_SECS: u64 = 3600;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// CMS connection (optional section, required by commands that fetch).
    pub cms: Option<CmsConfig>,
    /// Cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

/// CMS connection configuration.
#[derive(Debug, Deserialize)]
pub struct CmsConfig {
    /// XML-RPC endpoint URL.
    #[serde(default = "default_cms_url")]
    pub url: String,
    /// Private key identifying the site owner.
    pub private_key: String,
    /// Site to fetch pages from.
    pub site_id: i32,
    /// Session id sent with the credentials; generated per process if unset.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Character encoding of XML-RPC requests and responses.
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// HTTP timeout for one XML-RPC call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl CmsConfig {
    /// HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "cms.url")?;
        require_http_url(&self.url, "cms.url")?;
        require_non_empty(&self.private_key, "cms.private_key")?;
        require_non_empty(&self.encoding, "cms.encoding")?;
        if self.site_id <= 0 {
            return Err(ConfigError::Validation(
                "cms.site_id must be greater than 0".to_owned(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "cms.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_cms_url() -> String {
    DEFAULT_CMS_URL.to_owned()
}

fn default_encoding() -> String {
    "iso-8859-1".to_owned()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Raw cache configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
    lifetime_secs: Option<u64>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug)]
pub struct CacheConfig {
    /// Whether CMS responses are cached.
    pub enabled: bool,
    /// Cache root directory.
    pub dir: PathBuf,
    /// Age at which a cached response expires.
    pub lifetime: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".cms/cache"),
            lifetime: Duration::from_secs(DEFAULT_CACHE_LIFETIME_SECS),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`cms.private_key`").
        field: String,
        /// Error message (e.g., "${`CMS_PRIVATE_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cms.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
    }

    /// Get validated CMS configuration.
    ///
    /// Use this instead of accessing the `cms` field directly when the
    /// command needs to talk to the CMS.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_cms(&self) -> Result<&CmsConfig, ConfigError> {
        let cms = self
            .cms
            .as_ref()
            .ok_or_else(|| ConfigError::Validation("[cms] section required in config".into()))?;
        cms.validate()?;
        Ok(cms)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            cms: None,
            cache: CacheConfigRaw::default(),
            cache_resolved: CacheConfig {
                dir: base.join(".cms/cache"),
                ..CacheConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[cms]` section is only validated through [`Self::require_cms`],
    /// so commands that never contact the CMS work without it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref mut cms) = self.cms {
            cms.url = expand::expand_env(&cms.url, "cms.url")?;
            cms.private_key = expand::expand_env(&cms.private_key, "cms.private_key")?;
            if let Some(ref session_id) = cms.session_id {
                cms.session_id = Some(expand::expand_env(session_id, "cms.session_id")?);
            }
        }
        Ok(())
    }

    /// Resolve the cache directory relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: config_dir.join(self.cache.dir.as_deref().unwrap_or(".cms/cache")),
            lifetime: Duration::from_secs(
                self.cache
                    .lifetime_secs
                    .unwrap_or(DEFAULT_CACHE_LIFETIME_SECS),
            ),
        };
    }
}
