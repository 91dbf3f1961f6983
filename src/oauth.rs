use crate::client::Client;
use crate::config::PixivConfig;
use crate::error::PixivError;
use crate::signature::sign;
use crate::token::Token;
use crate::transport::oauth_headers;

/// Credential exchanged at the token endpoint.
#[derive(Clone, Copy)]
pub enum Grant<'a> {
    Password { username: &'a str, password: &'a str },
    RefreshToken(&'a str),
}

impl<'a> Grant<'a> {
    fn name(&self) -> &'static str {
        match self {
            Grant::Password { .. } => "password",
            Grant::RefreshToken(_) => "refresh_token",
        }
    }

    /// Full form body: the grant's own fields plus client identification.
    fn form(&self, config: &'a PixivConfig) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![("grant_type", self.name())];
        match *self {
            Grant::Password { username, password } => {
                form.push(("username", username));
                form.push(("password", password));
            }
            Grant::RefreshToken(refresh_token) => {
                form.push(("refresh_token", refresh_token));
            }
        }
        form.push(("get_secure_url", "1"));
        form.push(("client_id", config.client_id.as_str()));
        form.push(("client_secret", config.client_secret.as_str()));
        form
    }
}

/// Shows only the grant type; username, password and refresh token are omitted.
impl std::fmt::Debug for Grant<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grant").field("grant_type", &self.name()).finish_non_exhaustive()
    }
}

/// Exchange a grant for a new token. One attempt, no retry.
pub async fn get_token(config: &PixivConfig, grant: Grant<'_>) -> Result<Token, PixivError> {
    let headers = oauth_headers(&sign(&config.hash_secret))?;
    tracing::debug!("POST {} (grant_type={})", config.oauth_url, grant.name());

    let resp = reqwest::Client::new()
        .post(&config.oauth_url)
        .headers(headers)
        .form(&grant.form(config))
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;
    tracing::debug!("Token endpoint responded {status}");
    if !status.is_success() {
        return Err(PixivError::Http {
            status: status.as_u16(),
            body,
        });
    }

    Token::from_response(&body)
}

/// Log in with an account's email (or pixiv ID) and password.
pub async fn login(
    config: &PixivConfig,
    email: &str,
    password: &str,
) -> Result<Client, PixivError> {
    let token = get_token(
        config,
        Grant::Password {
            username: email,
            password,
        },
    )
    .await?;
    Client::new(config.clone(), token)
}

/// Obtain a fresh token from a refresh token and wrap it in a new client.
pub async fn refresh(config: &PixivConfig, refresh_token: &str) -> Result<Client, PixivError> {
    let token = get_token(config, Grant::RefreshToken(refresh_token)).await?;
    Client::new(config.clone(), token)
}
