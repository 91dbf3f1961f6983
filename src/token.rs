use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PixivError;

/// Key the token endpoint still duplicates the whole payload under for
/// backwards compatibility.
pub const LEGACY_WRAPPER_KEY: &str = "response";

/// OAuth credentials issued by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub user: User,
    /// Local receipt time; not sent by the server.
    #[serde(default = "Utc::now")]
    pub issued_at: DateTime<Utc>,
}

/// Profile of the account the token was issued for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub profile_image_urls: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Token {
    /// Decode a token endpoint response body, dropping the legacy wrapper.
    pub fn from_response(body: &str) -> Result<Self, PixivError> {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| PixivError::Decode(format!("Failed to parse token response: {e}")))?;
        let serde_json::Value::Object(mut obj) = value else {
            return Err(PixivError::Decode(
                "Token response is not a JSON object".to_string(),
            ));
        };
        obj.remove(LEGACY_WRAPPER_KEY);

        serde_json::from_value(serde_json::Value::Object(obj))
            .map_err(|e| PixivError::Decode(format!("Unexpected token response shape: {e}")))
    }

    /// Check the invariant required before the token can authenticate a client.
    pub fn validate(&self) -> Result<(), PixivError> {
        if self.access_token.is_empty() {
            return Err(PixivError::InvalidToken(
                "access_token is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Expiry instant, or `None` when `expires_in` is out of the representable
    /// range. A huge positive lifetime never expires; a huge negative one
    /// already has.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        chrono::TimeDelta::try_seconds(self.expires_in)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(at) => Utc::now() >= at,
            None => self.expires_in < 0,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "access_token": "acc123",
        "expires_in": 3600,
        "token_type": "bearer",
        "scope": "",
        "refresh_token": "ref456",
        "user": {
            "profile_image_urls": {"px_16x16": "https://i.pximg.net/16.png"},
            "id": "1234567",
            "name": "someone",
            "account": "someone_acc",
            "is_premium": false
        },
        "response": {
            "access_token": "acc123",
            "expires_in": 3600,
            "token_type": "bearer",
            "scope": "",
            "refresh_token": "ref456"
        }
    }"#;

    fn token(access: &str, expires_in: i64) -> Token {
        Token {
            access_token: access.into(),
            refresh_token: "r".into(),
            expires_in,
            token_type: "bearer".into(),
            scope: String::new(),
            user: User::default(),
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn from_response_reads_fields() {
        let token = Token::from_response(BODY).unwrap();
        assert_eq!(token.access_token, "acc123");
        assert_eq!(token.refresh_token, "ref456");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.user.id, "1234567");
        assert_eq!(token.user.account, "someone_acc");
        assert_eq!(
            token.user.profile_image_urls.get("px_16x16").map(String::as_str),
            Some("https://i.pximg.net/16.png")
        );
        assert_eq!(token.user.extra["is_premium"], false);
    }

    #[test]
    fn from_response_strips_legacy_wrapper() {
        let token = Token::from_response(BODY).unwrap();
        let json = serde_json::to_value(&token).unwrap();
        assert!(json.get(LEGACY_WRAPPER_KEY).is_none());
        assert!(json["user"].get(LEGACY_WRAPPER_KEY).is_none());
    }

    #[test]
    fn from_response_rejects_non_object() {
        let err = Token::from_response("[1, 2]").unwrap_err();
        assert_eq!(err.code(), "decode_error");
    }

    #[test]
    fn from_response_rejects_missing_access_token() {
        let err = Token::from_response(r#"{"refresh_token": "r"}"#).unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn empty_access_token_is_invalid() {
        assert!(token("", 3600).validate().is_err());
        assert!(token("a", 3600).validate().is_ok());
    }

    #[test]
    fn expiry_follows_expires_in() {
        assert!(!token("a", 3600).is_expired());
        assert!(token("a", -1).is_expired());
    }

    #[test]
    fn huge_expires_in_never_expires() {
        let token = Token::from_response(
            r#"{"access_token":"a","refresh_token":"r","expires_in":9223372036854775807,"token_type":"bearer"}"#,
        )
        .unwrap();
        assert!(token.expires_at().is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn very_negative_expires_in_is_expired() {
        let token = token("a", i64::MIN);
        assert!(token.expires_at().is_none());
        assert!(token.is_expired());
    }

    #[test]
    fn bearer_header_value() {
        assert_eq!(token("abc", 1).bearer(), "Bearer abc");
    }
}
