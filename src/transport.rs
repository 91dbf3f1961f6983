use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::PixivError;
use crate::signature::ClientSignature;
use crate::token::Token;

pub const API_USER_AGENT: &str = "PixivIOSApp/7.6.2 (iOS 12.2; iPhone9,1)";
pub const OAUTH_USER_AGENT: &str = "PixivAndroidApp/5.0.115 (Android 6.0; PixivBot)";
pub const ACCEPT_LANGUAGE: &str = "en-US";
pub const APP_OS: &str = "ios";
pub const APP_OS_VERSION: &str = "12.2";
pub const APP_VERSION: &str = "7.6.2";

/// Headers for the token endpoint, including a freshly computed signature.
pub fn oauth_headers(signature: &ClientSignature) -> Result<HeaderMap, PixivError> {
    let mut header_map = HeaderMap::new();
    header_map.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(OAUTH_USER_AGENT),
    );
    for (name, value) in signature.headers() {
        let val = HeaderValue::from_str(value)
            .map_err(|e| PixivError::Decode(format!("Invalid {name} header: {e}")))?;
        let key = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| PixivError::Decode(format!("Invalid header name '{name}': {e}")))?;
        header_map.insert(key, val);
    }
    header_map.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    Ok(header_map)
}

/// Headers every authenticated API request carries: the iOS app identity
/// plus the bearer credential taken from `token`.
pub fn api_headers(token: &Token, referer: &str) -> Result<HeaderMap, PixivError> {
    let mut header_map = HeaderMap::new();
    header_map.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(API_USER_AGENT),
    );
    header_map.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    header_map.insert("app-os", HeaderValue::from_static(APP_OS));
    header_map.insert("app-os-version", HeaderValue::from_static(APP_OS_VERSION));
    header_map.insert("app-version", HeaderValue::from_static(APP_VERSION));
    header_map.insert(reqwest::header::REFERER, referer_value(referer)?);

    let mut auth = HeaderValue::from_str(&token.bearer())
        .map_err(|e| PixivError::InvalidToken(format!("access_token is not a valid header value: {e}")))?;
    auth.set_sensitive(true);
    header_map.insert(reqwest::header::AUTHORIZATION, auth);
    Ok(header_map)
}

pub fn referer_value(referer: &str) -> Result<HeaderValue, PixivError> {
    HeaderValue::from_str(referer).map_err(|e| PixivError::Config {
        path: std::path::PathBuf::from("<config>"),
        detail: format!("Invalid apiReferer '{referer}': {e}"),
    })
}

/// Build an HTTP transport that sends `headers` on every request.
pub fn build_transport(headers: HeaderMap) -> Result<reqwest::Client, PixivError> {
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}
