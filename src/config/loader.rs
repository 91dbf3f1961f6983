use std::path::{Path, PathBuf};

use crate::error::PixivError;

use super::env::expand_config;
use super::types::{PixivConfig, DEFAULT_API_REFERER, DEFAULT_OAUTH_URL};

/// Find the config file to use, highest precedence first:
///
/// 1. `--config` CLI flag
/// 2. `PIXIV_CONFIG` env var
/// 3. `~/.pixiv/config.json`
///
/// An explicitly named file that does not exist is still returned so the
/// caller reports it instead of silently falling through.
pub fn discover_config_file(cli_config: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = cli_config {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var("PIXIV_CONFIG") {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::home_dir()
        .map(|home| home.join(".pixiv").join("config.json"))
        .filter(|p| p.exists())
}

fn load_config_file(path: &Path) -> Result<PixivConfig, PixivError> {
    let content = std::fs::read_to_string(path).map_err(|e| PixivError::Config {
        path: path.to_path_buf(),
        detail: format!("Cannot read file: {e}"),
    })?;

    serde_json::from_str::<PixivConfig>(&content).map_err(|e| PixivError::Config {
        path: path.to_path_buf(),
        detail: format!("Invalid JSON: {e}"),
    })
}

/// Build a config purely from `PIXIV_*` environment variables.
pub fn config_from_env() -> Result<PixivConfig, PixivError> {
    let var = |name: &str| std::env::var(name).unwrap_or_default();
    let config = PixivConfig {
        client_id: var("PIXIV_CLIENT_ID"),
        client_secret: var("PIXIV_CLIENT_SECRET"),
        hash_secret: var("PIXIV_HASH_SECRET"),
        oauth_url: std::env::var("PIXIV_OAUTH_URL").unwrap_or_else(|_| DEFAULT_OAUTH_URL.into()),
        api_referer: DEFAULT_API_REFERER.to_string(),
    };
    validate(config, Path::new("<env>"))
}

/// Load configuration from the discovered file, or from the environment
/// when no file is present. Env references inside file values are expanded.
pub fn load_config(cli_config: Option<&str>) -> Result<PixivConfig, PixivError> {
    let Some(path) = discover_config_file(cli_config) else {
        tracing::debug!("No config file found, reading PIXIV_* environment variables");
        return config_from_env();
    };

    tracing::debug!("Loading config from {}", path.display());
    let mut config = load_config_file(&path)?;
    expand_config(&mut config)?;
    validate(config, &path)
}

fn validate(config: PixivConfig, source: &Path) -> Result<PixivConfig, PixivError> {
    let missing = config.missing_fields();
    if missing.is_empty() {
        Ok(config)
    } else {
        Err(PixivError::Config {
            path: source.to_path_buf(),
            detail: format!("missing {}", missing.join(", ")),
        })
    }
}
