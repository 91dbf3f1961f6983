use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::config::PixivConfig;
use crate::decode::{body_text, decode_as, decode_with, DecodeHook, Identity};
use crate::error::PixivError;
use crate::oauth;
use crate::token::Token;
use crate::transport::{api_headers, build_transport, referer_value};

/// Authenticated handle to the app API.
///
/// Each client owns its own HTTP transport, configured once at construction
/// with the app identity headers and this token's bearer credential, so two
/// clients for different accounts never see each other's headers. Dropping
/// the client (or calling [`Client::close`]) releases its connection pool.
pub struct Client {
    config: PixivConfig,
    token: Token,
    http: reqwest::Client,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("user", &self.token.user.account)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Wrap a previously obtained token. Fails if its access token is empty.
    pub fn new(config: PixivConfig, token: Token) -> Result<Self, PixivError> {
        token.validate()?;
        let http = build_transport(api_headers(&token, &config.api_referer)?)?;
        Ok(Self {
            config,
            token,
            http,
        })
    }

    pub async fn login(
        config: &PixivConfig,
        email: &str,
        password: &str,
    ) -> Result<Self, PixivError> {
        oauth::login(config, email, password).await
    }

    pub async fn from_refresh_token(
        config: &PixivConfig,
        refresh_token: &str,
    ) -> Result<Self, PixivError> {
        oauth::refresh(config, refresh_token).await
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn config(&self) -> &PixivConfig {
        &self.config
    }

    /// Build a new client from this client's refresh token.
    pub async fn refresh(&self) -> Result<Self, PixivError> {
        oauth::refresh(&self.config, &self.token.refresh_token).await
    }

    /// Send a request and return the body of a 2xx response as UTF-8 text.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String, PixivError> {
        let resp = req.send().await?;
        let status = resp.status();
        tracing::debug!("{} responded {status}", resp.url());
        if !status.is_success() {
            return Err(http_error(resp).await);
        }
        body_text(&resp.bytes().await?)
    }

    /// Form-encoded POST; the JSON response is decoded through `hook`.
    pub async fn post<D, H>(
        &self,
        url: &str,
        data: &D,
        hook: &H,
    ) -> Result<serde_json::Value, PixivError>
    where
        D: Serialize + ?Sized,
        H: DecodeHook + ?Sized,
    {
        tracing::debug!("POST {url}");
        let text = self.send(self.http.post(url).form(data)).await?;
        decode_with(&text, hook)
    }

    /// Form-encoded POST deserialized straight into `T`.
    pub async fn post_json<T, D>(&self, url: &str, data: &D) -> Result<T, PixivError>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        tracing::debug!("POST {url}");
        let text = self.send(self.http.post(url).form(data)).await?;
        decode_as(&text, &Identity)
    }

    /// GET with query parameters; the JSON response is decoded through `hook`.
    pub async fn get<Q, H>(
        &self,
        url: &str,
        params: &Q,
        hook: &H,
    ) -> Result<serde_json::Value, PixivError>
    where
        Q: Serialize + ?Sized,
        H: DecodeHook + ?Sized,
    {
        tracing::debug!("GET {url}");
        let text = self.send(self.http.get(url).query(params)).await?;
        decode_with(&text, hook)
    }

    pub async fn get_json<T, Q>(&self, url: &str, params: &Q) -> Result<T, PixivError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        tracing::debug!("GET {url}");
        let text = self.send(self.http.get(url).query(params)).await?;
        decode_as(&text, &Identity)
    }

    /// Stream `url` to `filename` and return the number of bytes written.
    ///
    /// When `override_existing` is true and `filename` already exists the
    /// download is refused with [`PixivError::FileExists`]; when false an
    /// existing file is replaced. The body is written to a `.part` sibling
    /// and renamed into place only after the last chunk arrives.
    pub async fn download(
        &self,
        url: &str,
        filename: impl AsRef<Path>,
        override_existing: bool,
    ) -> Result<u64, PixivError> {
        let path = filename.as_ref();
        if override_existing && tokio::fs::try_exists(path).await? {
            return Err(PixivError::FileExists(path.to_path_buf()));
        }

        tracing::debug!("GET {url} -> {}", path.display());
        let mut resp = self
            .http
            .get(url)
            .header(reqwest::header::REFERER, referer_value(&self.config.api_referer)?)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(http_error(resp).await);
        }

        let part = part_path(path);
        let written = async {
            let mut file = tokio::fs::File::create(&part).await?;
            let mut written = 0u64;
            while let Some(chunk) = resp.chunk().await? {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<_, PixivError>(written)
        }
        .await;

        match written {
            Ok(written) => match tokio::fs::rename(&part, path).await {
                Ok(()) => {
                    tracing::debug!("Saved {written} bytes to {}", path.display());
                    Ok(written)
                }
                Err(e) => {
                    remove_part(&part).await;
                    Err(e.into())
                }
            },
            Err(e) => {
                remove_part(&part).await;
                Err(e)
            }
        }
    }

    /// Release the transport now instead of at end of scope.
    pub fn close(self) {
        tracing::debug!("Closing client for {}", self.token.user.account);
    }
}

/// Turn a non-2xx response into `Http`, or `Transport` if its body is unreadable.
async fn http_error(resp: reqwest::Response) -> PixivError {
    let status = resp.status().as_u16();
    match resp.text().await {
        Ok(body) => PixivError::Http { status, body },
        Err(e) => {
            tracing::warn!("Could not read body of HTTP {status} response: {e}");
            PixivError::Transport(e)
        }
    }
}

async fn remove_part(part: &Path) {
    if let Err(e) = tokio::fs::remove_file(part).await {
        tracing::warn!("Could not remove {}: {e}", part.display());
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
