mod common;

use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pixiv_client::{get_token, login, refresh, Grant, PixivError};

/// Login sends one signed POST with the app identity and the password grant.
#[tokio::test]
async fn login_posts_signed_password_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(header(
            "user-agent",
            "PixivAndroidApp/5.0.115 (Android 6.0; PixivBot)",
        ))
        .and(header("accept-language", "en-US"))
        .and(header_exists("x-client-time"))
        .and(header_exists("x-client-hash"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=me%40example.com"))
        .and(body_string_contains("password=hunter2"))
        .and(body_string_contains("get_secure_url=1"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::token_body("acc-1", "ref-1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = common::mock_config(&server.uri());
    let client = login(&config, "me@example.com", "hunter2").await.unwrap();

    assert_eq!(client.token().access_token, "acc-1");
    assert_eq!(client.token().refresh_token, "ref-1");
    assert_eq!(client.token().user.account, "test_user");
    client.close();
}

/// The hash header is the MD5 of the time header followed by the hash secret.
#[tokio::test]
async fn signature_matches_time_header() {
    let server = common::http_mock::start_token_server("acc", "ref").await;
    let config = common::mock_config(&server.uri());

    get_token(&config, Grant::RefreshToken("ref")).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    let time = headers.get("x-client-time").unwrap().to_str().unwrap();
    let hash = headers.get("x-client-hash").unwrap().to_str().unwrap();

    assert!(time.ends_with("+00:00"));
    let expected = format!("{:x}", md5::compute(format!("{time}{}", common::HASH_SECRET)));
    assert_eq!(hash, expected);
}

#[tokio::test]
async fn refresh_uses_refresh_token_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::token_body("acc-2", "new-refresh")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = common::mock_config(&server.uri());
    let client = refresh(&config, "old-refresh").await.unwrap();
    assert_eq!(client.token().access_token, "acc-2");
    assert_eq!(client.token().refresh_token, "new-refresh");

    let body = String::from_utf8(server.received_requests().await.unwrap()[0].body.clone()).unwrap();
    assert!(!body.contains("password"));
}

#[tokio::test]
async fn client_refresh_reuses_held_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body("acc-1", "ref-1")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("refresh_token=ref-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body("acc-2", "ref-2")))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::mock_config(&server.uri());
    let first = login(&config, "me@example.com", "pw").await.unwrap();
    let second = first.refresh().await.unwrap();

    assert_eq!(first.token().access_token, "acc-1");
    assert_eq!(second.token().access_token, "acc-2");
}

/// Non-2xx responses surface status and exact body, with no retry.
#[tokio::test]
async fn error_status_carries_status_and_body() {
    let server = MockServer::start().await;
    let body = r#"{"has_error":true,"errors":{"system":{"message":"103:pixiv ID、またはメールアドレス、パスワードが正しいかチェックしてください。","code":1508}}}"#;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::mock_config(&server.uri());
    let err = login(&config, "me@example.com", "wrong").await.unwrap_err();

    match err {
        PixivError::Http { status, body: got } => {
            assert_eq!(status, 400);
            assert_eq!(got, body);
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn any_2xx_status_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::token_body("acc", "ref")))
        .mount(&server)
        .await;

    let config = common::mock_config(&server.uri());
    let token = get_token(&config, Grant::RefreshToken("ref")).await.unwrap();
    assert_eq!(token.access_token, "acc");
}

#[tokio::test]
async fn empty_access_token_is_rejected() {
    let server = common::http_mock::start_token_server("", "ref").await;
    let config = common::mock_config(&server.uri());

    let err = refresh(&config, "ref").await.unwrap_err();
    assert_eq!(err.code(), "invalid_token");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>cloudflare</html>"))
        .mount(&server)
        .await;

    let config = common::mock_config(&server.uri());
    let err = get_token(&config, Grant::RefreshToken("ref")).await.unwrap_err();
    assert_eq!(err.code(), "decode_error");
}
