use serde::{Deserialize, Serialize};

pub const DEFAULT_OAUTH_URL: &str = "https://oauth.secure.pixiv.net/auth/token";
pub const DEFAULT_API_REFERER: &str = "https://app-api.pixiv.net/";

/// Client-identification secrets and endpoints shared by every request.
///
/// The secrets identify the official mobile app to the OAuth endpoint; they
/// are deployment configuration, never per-user data.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixivConfig {
    pub client_id: String,
    pub client_secret: String,
    pub hash_secret: String,
    #[serde(default = "default_oauth_url")]
    pub oauth_url: String,
    #[serde(default = "default_api_referer")]
    pub api_referer: String,
}

fn default_oauth_url() -> String {
    DEFAULT_OAUTH_URL.to_string()
}

fn default_api_referer() -> String {
    DEFAULT_API_REFERER.to_string()
}

impl PixivConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        hash_secret: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            hash_secret: hash_secret.into(),
            oauth_url: default_oauth_url(),
            api_referer: default_api_referer(),
        }
    }

    /// Point token requests at a different endpoint (mock servers, proxies).
    pub fn with_oauth_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_url = url.into();
        self
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push("clientId");
        }
        if self.client_secret.is_empty() {
            missing.push("clientSecret");
        }
        if self.hash_secret.is_empty() {
            missing.push("hashSecret");
        }
        missing
    }
}

/// Shows the client id and endpoints; both secrets are omitted.
impl std::fmt::Debug for PixivConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixivConfig")
            .field("client_id", &self.client_id)
            .field("oauth_url", &self.oauth_url)
            .field("api_referer", &self.api_referer)
            .finish_non_exhaustive()
    }
}
