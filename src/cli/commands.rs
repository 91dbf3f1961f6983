use std::io::IsTerminal;
use std::path::Path;

use crate::config::PixivConfig;
use crate::decode::Identity;
use crate::error::PixivError;
use crate::oauth;
use crate::store::save_token;

use super::output::{print_account, print_value, OutputMode};
use super::session::authenticated_client;

pub async fn run_login(
    config: &PixivConfig,
    store: &Path,
    email: &str,
    password: &str,
    mode: OutputMode,
) -> Result<(), PixivError> {
    let client = oauth::login(config, email, password).await?;
    save_token(store, client.token())?;
    print_account("Logged in", client.token(), mode, std::io::stdout().is_terminal());
    client.close();
    Ok(())
}

pub async fn run_refresh(
    config: &PixivConfig,
    store: &Path,
    refresh_token: Option<&str>,
    mode: OutputMode,
) -> Result<(), PixivError> {
    let refresh_token = match refresh_token {
        Some(t) => t.to_string(),
        None => crate::store::load_token(store)
            .map(|t| t.refresh_token)
            .ok_or_else(|| {
                PixivError::InvalidToken(format!(
                    "no saved token at {}. Run: pixiv login",
                    store.display()
                ))
            })?,
    };
    let client = oauth::refresh(config, &refresh_token).await?;
    save_token(store, client.token())?;
    print_account("Refreshed", client.token(), mode, std::io::stdout().is_terminal());
    client.close();
    Ok(())
}

pub async fn run_download(
    config: &PixivConfig,
    store: &Path,
    url: &str,
    filename: &Path,
    override_existing: bool,
    mode: OutputMode,
) -> Result<(), PixivError> {
    let client = authenticated_client(config, store).await?;
    let written = client.download(url, filename, override_existing).await?;
    match mode {
        OutputMode::Json => print_value(&serde_json::json!({
            "path": filename.display().to_string(),
            "bytes": written,
        })),
        OutputMode::Pretty => println!("Saved {written} bytes to {}", filename.display()),
    }
    client.close();
    Ok(())
}

pub async fn run_post(
    config: &PixivConfig,
    store: &Path,
    url: &str,
    args: &[String],
) -> Result<(), PixivError> {
    let form = parse_form_args(args)?;
    let client = authenticated_client(config, store).await?;
    let value = client.post(url, &form, &Identity).await?;
    print_value(&value);
    client.close();
    Ok(())
}

/// Parse `key=value` arguments into form fields.
pub fn parse_form_args(args: &[String]) -> Result<Vec<(String, String)>, PixivError> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .filter(|(k, _)| !k.is_empty())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| PixivError::Config {
                    path: std::path::PathBuf::from("<args>"),
                    detail: format!("Expected key=value, got '{arg}'"),
                })
        })
        .collect()
}
