pub mod cli;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod oauth;
pub mod signature;
pub mod store;
pub mod token;
pub mod transport;

pub use client::Client;
pub use config::{load_config, PixivConfig};
pub use decode::{DecodeHook, Identity};
pub use error::PixivError;
pub use oauth::{get_token, login, refresh, Grant};
pub use token::{Token, User};

/// One-shot convenience: log in with a refresh token, download, release.
pub async fn download_once(
    config: &PixivConfig,
    refresh_token: &str,
    url: &str,
    filename: impl AsRef<std::path::Path>,
) -> Result<u64, PixivError> {
    let client = refresh(config, refresh_token).await?;
    let written = client.download(url, filename, false).await?;
    client.close();
    Ok(written)
}
