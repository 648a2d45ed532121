//! Page source construction shared by all commands.

use cms_cache::{FileCache, NullCache};
use cms_client::{CachedSource, ClientConfig, CmsClient};
use cms_config::{CmsConfig, Config};
use uuid::Uuid;

use crate::error::CliError;

/// Build the CMS client behind the configured page cache.
pub(super) fn page_source(
    config: &Config,
    version: &str,
) -> Result<CachedSource<CmsClient>, CliError> {
    let client = CmsClient::new(client_config(config.require_cms()?))?;

    let cache = &config.cache_resolved;
    let source = if cache.enabled {
        tracing::info!(dir = %cache.dir.display(), lifetime = ?cache.lifetime, "Page cache enabled");
        CachedSource::new(
            client,
            &FileCache::new(cache.dir.clone(), version, cache.lifetime),
        )
    } else {
        CachedSource::new(client, &NullCache)
    };

    Ok(source)
}

fn client_config(cms: &CmsConfig) -> ClientConfig {
    let mut config = ClientConfig::new(
        cms.url.as_str(),
        cms.private_key.as_str(),
        session_id(cms.session_id.as_deref()),
        cms.site_id,
    );
    config.encoding.clone_from(&cms.encoding);
    config.timeout = cms.timeout();
    config
}

/// Configured session id, or a fresh one per process.
fn session_id(configured: Option<&str>) -> String {
    match configured {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => Uuid::new_v4().simple().to_string(),
    }
}
