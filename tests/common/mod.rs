pub mod http_mock;

use pixiv_client::PixivConfig;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const HASH_SECRET: &str = "test-hash-secret";

/// Config whose token endpoint points at the mock server.
#[allow(dead_code)]
pub fn mock_config(server_uri: &str) -> PixivConfig {
    PixivConfig::new(CLIENT_ID, CLIENT_SECRET, HASH_SECRET)
        .with_oauth_url(format!("{server_uri}/auth/token"))
}

/// Token endpoint response body, including the legacy `response` duplicate.
#[allow(dead_code)]
pub fn token_body(access_token: &str, refresh_token: &str) -> serde_json::Value {
    let inner = serde_json::json!({
        "access_token": access_token,
        "expires_in": 3600,
        "token_type": "bearer",
        "scope": "",
        "refresh_token": refresh_token,
        "user": {
            "profile_image_urls": {
                "px_16x16": "https://i.pximg.net/user-profile/16.png",
                "px_50x50": "https://i.pximg.net/user-profile/50.png",
                "px_170x170": "https://i.pximg.net/user-profile/170.png"
            },
            "id": "1234567",
            "name": "Test User",
            "account": "test_user",
            "mail_address": "me@example.com",
            "is_premium": false,
            "x_restrict": 0,
            "is_mail_authorized": true
        }
    });
    let mut body = inner.clone();
    body["response"] = inner;
    body
}
