use anyhow::Context;
use folio_config::RelayConfig;
use folio_relay_impl::{RelayServiceConfig, RelayServiceImpl};

/// Create the relay client, or `None` if the relay is disabled
pub fn connect(config: &RelayConfig) -> anyhow::Result<Option<RelayServiceImpl>> {
    if !config.enabled {
        return Ok(None);
    }

    let relay_config = RelayServiceConfig::new(
        &config.public_key,
        config.access_token.as_deref(),
        config.endpoint_override.clone(),
    )?;
    RelayServiceImpl::new(relay_config)
        .map(Some)
        .context("Failed to create relay client")
}
