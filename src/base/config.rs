//! Load configuration from a `KEY=value` file via `dotenvy`, with env fallback via the `config` crate.

use std::{
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::Res;

/// Default listen address for the health endpoint.
pub const DEFAULT_HEALTH_ADDR: &str = "127.0.0.1:8788";

/// Config file read when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = ".env";

/// Prefix for environment variables (e.g. `MIRAI_DISCORD_TOKEN`).
pub const ENV_PREFIX: &str = "MIRAI";

/// File keys (case-sensitive) and the fields they populate.
const KNOWN_KEYS: &[(&str, &str)] = &[
    ("DISCORD_TOKEN", "discord_token"),
    ("APP_ID", "app_id"),
    ("GUILD_ID", "guild_id"),
    ("HEALTH_ADDR", "health_addr"),
];

fn default_health_addr() -> String {
    DEFAULT_HEALTH_ADDR.to_string()
}

/// Configuration for the bot.
///
/// Immutable after load; cloning only bumps a reference count.
#[derive(Debug, Clone)]
pub struct Config {
    /// The loaded values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Raw configuration values, as deserialized.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigInner {
    /// Bot token (`DISCORD_TOKEN`). Required.
    #[serde(default)]
    pub discord_token: Option<SecretString>,
    /// Application ID (`APP_ID`). Falls back to the bot user's ID once connected.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Guild ID (`GUILD_ID`). When set, commands are registered to this guild only.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// Listen address for the health endpoint (`HEALTH_ADDR`).
    #[serde(default = "default_health_addr")]
    pub health_addr: String,
}

impl ConfigInner {
    /// The bot token. Empty only if the config was never validated.
    pub fn token(&self) -> &str {
        self.discord_token.as_ref().map(|t| t.expose_secret().as_str()).unwrap_or_default()
    }

    /// The configured application ID, if any.
    pub fn application_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// The configured guild ID, if any.
    pub fn guild_id(&self) -> Option<&str> {
        self.guild_id.as_deref()
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// Reads `explicit_path` (which must exist) or, failing that, `.env` in the
    /// working directory if present. `MIRAI_*` environment variables fill in
    /// anything the file leaves out.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        Self::load_with_env(explicit_path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(explicit_path: Option<&Path>, environment: config::Environment) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(environment);

        let path = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Some(PathBuf::from(DEFAULT_CONFIG_PATH)),
            None => None,
        };

        if let Some(path) = path {
            for (field, value) in read_file_entries(&path)? {
                cfg = cfg.set_override(field, value)?;
            }
        }

        Self::from_inner(cfg.build()?.try_deserialize()?)
    }

    /// Validate and normalize an already-populated configuration.
    pub fn from_inner(mut inner: ConfigInner) -> Res<Self> {
        inner.discord_token = inner.discord_token.filter(|t| !t.expose_secret().trim().is_empty());
        inner.app_id = inner.app_id.filter(|v| !v.trim().is_empty());
        inner.guild_id = inner.guild_id.filter(|v| !v.trim().is_empty());

        if inner.health_addr.trim().is_empty() {
            inner.health_addr = default_health_addr();
        }

        if inner.discord_token.is_none() {
            return Err(anyhow::anyhow!("DISCORD_TOKEN is missing from the configuration."));
        }

        Ok(Self { inner: Arc::new(inner) })
    }
}

/// Read the known, non-empty `KEY=value` entries from a config file.
///
/// Empty values are dropped so the environment can still supply them.
fn read_file_entries(path: &Path) -> Res<Vec<(&'static str, String)>> {
    let iter = dotenvy::from_path_iter(path).with_context(|| format!("Failed to read config file `{}`.", path.display()))?;

    let mut entries = Vec::new();

    for item in iter {
        let (key, value) = match item {
            Ok(kv) => kv,
            Err(e) => {
                warn!("Skipping malformed config line: {}", e);
                continue;
            }
        };

        match KNOWN_KEYS.iter().find(|(name, _)| *name == key) {
            Some(_) if value.trim().is_empty() => debug!("Config key `{}` is empty; treating it as unset.", key),
            Some((_, field)) => entries.push((*field, value)),
            None => debug!("Ignoring unknown config key `{}`.", key),
        }
    }

    Ok(entries)
}
