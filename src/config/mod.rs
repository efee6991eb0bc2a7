//! Loading [`Config`] from TOML files and the environment.

use anyhow::{Context, Result};
use std::path::Path;

pub use cg_core::config::Config;

/// Overrides `upstream.api_key`.
pub const API_KEY_ENV: &str = "CINEGATE_TMDB_API_KEY";
/// Overrides `upstream.api_url`.
pub const API_URL_ENV: &str = "CINEGATE_TMDB_API_URL";

const DEFAULT_PATHS: [&str; 3] = [
    "./cinegate.toml",
    "~/.config/cinegate/config.toml",
    "/etc/cinegate/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from `custom_path` or the first default location that exists,
/// falling back to defaults. Environment overrides are applied last.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    let mut config = match custom_path {
        Some(path) => load_config(path)?,
        None => match find_default_config() {
            Some(path) => {
                tracing::debug!("Using config file {:?}", path);
                load_config(&path)?
            }
            None => Config::default(),
        },
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn find_default_config() -> Option<std::path::PathBuf> {
    DEFAULT_PATHS.iter().find_map(|path_str| {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        path.exists().then(|| path.to_path_buf())
    })
}

/// Apply `CINEGATE_*` overrides. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = set(API_KEY_ENV) {
        config.upstream.api_key = key;
    }
    if let Some(url) = set(API_URL_ENV) {
        config.upstream.api_url = url;
    }
}

/// Reject configurations the server cannot start with.
fn validate_config(config: &Config) -> Result<()> {
    if config.server.host.trim().is_empty() {
        anyhow::bail!("server.host cannot be empty");
    }

    if config.upstream.request_timeout_secs == 0 {
        anyhow::bail!("upstream.request_timeout_secs must be greater than 0");
    }

    if config.locale.default_language.trim().is_empty() {
        anyhow::bail!("locale.default_language cannot be empty");
    }

    Ok(())
}
