use std::path::{Path, PathBuf};

use crate::error::PixivError;
use crate::token::Token;

/// Default location of the CLI's saved token.
pub fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pixiv")
        .join("token.json")
}

pub fn load_token(path: &Path) -> Option<Token> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::warn!("Ignoring unreadable token file {}: {e}", path.display());
            None
        }
    }
}

pub fn save_token(path: &Path, token: &Token) -> Result<(), PixivError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(token)
        .map_err(|e| PixivError::Decode(format!("Failed to serialize token: {e}")))?;
    std::fs::write(path, data)?;
    Ok(())
}
