use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{File, FileFormat};
use folio_models::contact::ContactEmailAddress;
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    load_with_override(paths, &[])
}

/// Loads the config files in order, then applies inline TOML snippets such as
/// `"relay.enabled = false"` on top.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;

    overrides
        .iter()
        .fold(builder, |builder, snippet| {
            builder.add_source(File::from_str(snippet, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub relay: RelayConfig,
    pub contact: ContactConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
pub struct RelayConfig {
    pub enabled: bool,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub access_token: Option<String>,
    pub endpoint_override: Option<Url>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Fixed destination address added to every outgoing message.
    pub recipient: Option<ContactEmailAddress>,
    pub status_clear_delay: Duration,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub key: String,
    pub capacity: usize,
    /// Maximum size of a single stored value in bytes.
    pub quota: usize,
}
