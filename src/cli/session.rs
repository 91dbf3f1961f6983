use std::path::Path;

use crate::client::Client;
use crate::config::PixivConfig;
use crate::error::PixivError;
use crate::oauth;
use crate::store::{load_token, save_token};

/// Get an authenticated client for the CLI.
///
/// The stored token is used as-is, or refreshed first when it has expired.
pub async fn authenticated_client(
    config: &PixivConfig,
    store: &Path,
) -> Result<Client, PixivError> {
    let token = load_token(store).ok_or_else(|| {
        PixivError::InvalidToken(format!(
            "no saved token at {}. Run: pixiv login",
            store.display()
        ))
    })?;

    if !token.is_expired() {
        return Client::new(config.clone(), token);
    }

    tracing::debug!("Saved token for {} expired, refreshing", token.user.account);
    let client = oauth::refresh(config, &token.refresh_token).await?;
    save_token(store, client.token())?;
    Ok(client)
}
