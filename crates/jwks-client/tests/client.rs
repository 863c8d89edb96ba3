//! JwksClient integration tests against a mocked JWKS endpoint

mod common;

use common::*;
use jwks_client::{ClientOptions, Error, ErrorKind, JwksClient, TransportOptions};
use serde_json::json;
use std::time::Duration;

// ============================================================================
// get_keys
// ============================================================================

#[tokio::test]
async fn test_get_keys_returns_raw_entries() {
    let mut server = mockito::Server::new_async().await;
    let mut keys = vec![ec_key(), rsa_key()];
    keys.extend(non_signing_keys());
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(key_set(keys))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let keys = client.get_keys().await.expect("keys");

    assert_eq!(keys.len(), 5);
    assert_eq!(keys[0].kid.as_deref(), Some(EC_KID));
    assert_eq!(keys[2].key_use.as_deref(), Some("enc"));
    assert_eq!(keys[4].kty.as_deref(), Some("something"));
    assert_eq!(keys[4].x5c.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_get_keys_server_error_message() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(500)
        .with_body("Unknown Server Error")
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let err = client.get_keys().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteFetch);
    assert_eq!(err.kind().name(), "RemoteFetchError");
    assert_eq!(err.to_string(), "Unknown Server Error");
}

#[tokio::test]
async fn test_get_keys_sends_custom_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", JWKS_PATH)
        .match_header("x-tenant", "acme")
        .match_header("authorization", "Bearer abc")
        .match_header("user-agent", "jwks-client-tests")
        .with_status(200)
        .with_body(key_set(vec![ec_key()]))
        .create();

    let mut options = options_for(&server);
    options
        .header("x-tenant", "acme")
        .headers([("authorization", "Bearer abc")])
        .transport(TransportOptions {
            user_agent: Some("jwks-client-tests".to_string()),
            timeout: Some(Duration::from_secs(5)),
            ..TransportOptions::default()
        });
    let client = JwksClient::new(options).expect("client");

    client.get_keys().await.expect("keys");
    mock.assert();
}

#[tokio::test]
async fn test_get_keys_with_relaxed_tls() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(vec![ec_key()]))
        .create();

    let mut options = options_for(&server);
    options.strict_ssl(false);
    let client = JwksClient::new(options).expect("client");

    assert_eq!(client.get_keys().await.expect("keys").len(), 1);
}

#[tokio::test]
async fn test_get_keys_unreachable_endpoint() {
    let client =
        JwksClient::new(ClientOptions::new("http://127.0.0.1:1/jwks.json")).expect("client");

    let err = client.get_keys().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteFetch);
    assert!(err.to_string().starts_with("network: "));
}

// ============================================================================
// get_signing_keys
// ============================================================================

#[tokio::test]
async fn test_get_signing_keys_filters_and_converts() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let mut keys = non_signing_keys();
    keys.insert(1, ec_key_with_private());
    keys.push(rsa_key());
    keys.push(ec_key_2());
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(keys))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let signing_keys = client.get_signing_keys().await.expect("signing keys");

    let kids: Vec<&str> = signing_keys.iter().map(|k| k.kid()).collect();
    assert_eq!(kids, vec![EC_KID, RSA_KID, EC_KID_2]);

    assert_eq!(signing_keys[0].public_key(), EC_PUBLIC_PEM);
    assert_eq!(signing_keys[0].private_key(), Some(EC_PRIVATE_PEM));
    assert_eq!(signing_keys[0].algorithm(), Some("ES256"));
    assert_eq!(signing_keys[1].public_key(), RSA_PUBLIC_PEM);
    assert_eq!(signing_keys[1].private_key(), None);
    assert!(signing_keys[2].has_private_key());
}

#[tokio::test]
async fn test_get_signing_keys_without_signature_keys() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(non_signing_keys()))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let err = client.get_signing_keys().await.unwrap_err();

    assert_eq!(err, Error::NoSigningKeys);
    assert_eq!(err.kind().name(), "NoSigningKeysError");
    assert_eq!(
        err.to_string(),
        "The JWKS endpoint did not contain any signing keys"
    );
}

#[tokio::test]
async fn test_get_signing_keys_empty_set() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(vec![]))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let err = client.get_signing_keys().await.unwrap_err();

    assert_eq!(err, Error::EmptyKeySet);
    assert_eq!(err.to_string(), "The JWKS endpoint did not contain any keys");
}

// ============================================================================
// get_signing_key
// ============================================================================

#[tokio::test]
async fn test_get_signing_key_matches_full_set() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(vec![rsa_key(), ec_key_2(), ec_key_with_private()]))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let signing_keys = client.get_signing_keys().await.expect("signing keys");

    for expected in &signing_keys {
        let key = client.get_signing_key(expected.kid()).await.expect("key");
        assert_eq!(&key, expected);
    }
}

#[tokio::test]
async fn test_get_signing_key_unknown_kid() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(vec![ec_key(), rsa_key()]))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");

    for kid in ["1234", "", "rsa-1024 ", "nkfcnee1ndfdntq5rtq5otexqzrbmjyymzy0nejcqtjbmjjbqkzcma"] {
        let err = client.get_signing_key(kid).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningKeyNotFound, "kid: {kid:?}");
        assert_eq!(
            err.to_string(),
            format!("Unable to find a signing key that matches '{kid}'")
        );
    }
}

#[tokio::test]
async fn test_get_signing_key_single_key_object() {
    let mut server = mockito::Server::new_async().await;
    let mut key = ec_key();
    key["kid"] = json!("K1");
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key.to_string())
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let signing_key = client.get_signing_key("K1").await.expect("key");

    assert_eq!(signing_key.kid(), "K1");
    assert_eq!(signing_key.public_key(), EC_PUBLIC_PEM);
    assert_eq!(signing_key.private_key(), None);
}

#[tokio::test]
async fn test_get_signing_key_skips_malformed_entries() {
    init_tracing();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(200)
        .with_body(key_set(vec![
            ec_key(),
            json!({"kty": "oct", "use": "enc", "kid": 42}),
            json!({"kty": "RSA", "use": "sig", "kid": "chain", "x5c": "MIIB"}),
        ]))
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let signing_key = client.get_signing_key(EC_KID).await.expect("key");

    assert_eq!(signing_key.public_key(), EC_PUBLIC_PEM);
    assert_eq!(client.get_keys().await.expect("keys").len(), 1);
}

#[tokio::test]
async fn test_get_signing_key_propagates_fetch_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", JWKS_PATH)
        .with_status(503)
        .with_body(json!({"message": "maintenance"}).to_string())
        .create();

    let client = JwksClient::new(options_for(&server)).expect("client");
    let err = client.get_signing_key(EC_KID).await.unwrap_err();

    assert_eq!(err, Error::RemoteFetch("maintenance".to_string()));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_invalid_configuration() {
    let too_long = format!("https://example.com/{}", "a".repeat(4096));
    for uri in ["", "   ", "example.com/jwks.json", "file:///etc/jwks.json", too_long.as_str()] {
        let err = JwksClient::new(ClientOptions::new(uri)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration, "uri: {uri}");
        assert_eq!(err.kind().name(), "InvalidConfigurationError");
    }

    let mut options = ClientOptions::new("https://example.com/jwks.json");
    options.header("bad header", "value");
    assert!(matches!(
        JwksClient::new(options),
        Err(Error::InvalidConfiguration(msg)) if msg.contains("header")
    ));
}
