//! Integration tests for the Pointer API router

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use sei_pointer_api::api::{create_router, AppState};
use sei_pointer_api::testing::FakeLookup;
use sei_pointer_api::{PointerType, ServiceConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const EVM_TOKEN: &str = "0x809FF4801aA5bDb33045d1fEC810D082490D63a4";
const CW_POINTER: &str = "sei1msjly0e2v5u99z53vqre47ltv0fsfa6h9fzrljuvp0e5zg76x7fswxcxjl";
const IBC_DENOM: &str = "ibc/CA6FBFAF399474A06263E10D0CE5AEBBE15189D6D4B2DD9ADE61007E68EB9DB0";
const IBC_POINTER: &str = "0x3894085Ef7Ff0f0aeDf52E2A2704928d1Ec074F1";
const TRUSTED_KEY: &str = "test-key";

fn app_with(config: ServiceConfig) -> Router {
    let fake = FakeLookup::new()
        .with_pointer(EVM_TOKEN, PointerType::Erc20, CW_POINTER)
        .with_pointee(CW_POINTER, PointerType::Erc20, EVM_TOKEN)
        .with_pointer(IBC_DENOM, PointerType::Native, IBC_POINTER);
    create_router(Arc::new(AppState::new(&config, Arc::new(fake))))
}

fn app() -> Router {
    let mut config = ServiceConfig::default();
    config.api_keys.insert(TRUSTED_KEY.to_string());
    app_with(config)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn evm(n: u32) -> String {
    format!("0x{:040x}", n + 1)
}

#[tokio::test]
async fn test_get_evm_base_asset() {
    let (status, body) = send(app(), get(&format!("/{}", EVM_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], EVM_TOKEN);
    assert_eq!(body["isBaseAsset"], true);
    assert_eq!(body["isPointer"], false);
    assert_eq!(body["pointerType"], "ERC20");
    assert_eq!(body["pointerAddress"], CW_POINTER);
    assert_eq!(body["pointeeAddress"], "");
}

#[tokio::test]
async fn test_get_percent_encoded_ibc_denom() {
    let encoded = IBC_DENOM.replace('/', "%2F");
    let (status, body) = send(app(), get(&format!("/{}", encoded))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], IBC_DENOM);
    assert_eq!(body["pointerType"], "NATIVE");
    assert_eq!(body["pointerAddress"], IBC_POINTER);
}

#[tokio::test]
async fn test_get_null_address() {
    let (status, body) =
        send(app(), get("/0x0000000000000000000000000000000000000000")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPointer"], true);
    assert_eq!(body["pointerType"], "NATIVE");
    assert_eq!(body["pointeeAddress"], "usei");
}

#[tokio::test]
async fn test_get_invalid_address() {
    let (status, body) = send(app(), get("/0xabc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["address"], "0xabc");
    assert_eq!(body["errorCode"], "ADDR_INVALID_FORMAT");
    assert!(body.get("isPointer").is_none());
}

#[tokio::test]
async fn test_post_single_address() {
    let (status, body) = send(app(), post_json("/", json!({ "address": CW_POINTER }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPointer"], true);
    assert_eq!(body["pointerType"], "ERC20");
    assert_eq!(body["pointeeAddress"], EVM_TOKEN);
}

#[tokio::test]
async fn test_post_check_address_alias() {
    let (status, body) = send(
        app(),
        post_json("/check-address", json!({ "address": EVM_TOKEN })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isBaseAsset"], true);
}

#[tokio::test]
async fn test_post_batch_keeps_order_and_isolates_failures() {
    let (status, body) = send(
        app(),
        post_json(
            "/",
            json!({ "addresses": [EVM_TOKEN, "sei1", IBC_DENOM] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["address"], EVM_TOKEN);
    assert_eq!(results[0]["pointerType"], "ERC20");
    assert_eq!(results[1]["address"], "sei1");
    assert_eq!(results[1]["errorCode"], "ADDR_INVALID_FORMAT");
    assert_eq!(results[2]["pointerAddress"], IBC_POINTER);
}

#[tokio::test]
async fn test_query_string_addresses() {
    let uri = format!("/?addresses={},{}", EVM_TOKEN, CW_POINTER);
    let (status, body) = send(app(), get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_input_is_bad_request() {
    let (status, body) = send(app(), post_json("/", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "API_BAD_REQUEST");

    let (status, body) = send(app(), post_json("/", json!({ "addresses": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "API_EMPTY_BATCH");

    let (status, _) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_anonymous_batch_cap() {
    let addresses: Vec<String> = (0..26).map(evm).collect();
    let (status, body) = send(app(), post_json("/", json!({ "addresses": addresses }))).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "API_BATCH_TOO_LARGE");
}

#[tokio::test]
async fn test_trusted_key_raises_batch_cap() {
    let addresses: Vec<String> = (0..26).map(evm).collect();
    let mut request = post_json("/", json!({ "addresses": addresses }));
    request
        .headers_mut()
        .insert("x-api-key", TRUSTED_KEY.parse().unwrap());

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 26);
}

#[tokio::test]
async fn test_unknown_key_is_unauthorized() {
    let mut request = get(&format!("/{}", EVM_TOKEN));
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().unwrap());

    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "API_UNAUTHORIZED");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let config = ServiceConfig {
        max_body_bytes: 128,
        ..Default::default()
    };
    let addresses: Vec<String> = (0..10).map(evm).collect();
    let (status, _) = send(
        app_with(config),
        post_json("/", json!({ "addresses": addresses })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_rate_limit_headers_and_rejection() {
    let config = ServiceConfig {
        rate_limit_per_minute: 1,
        ..Default::default()
    };
    let app = app_with(config);

    let response = app
        .clone()
        .oneshot(get(&format!("/{}", EVM_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["X-RateLimit-Remaining"], "0");
    assert!(response.headers().contains_key("x-request-id"));

    let (status, body) = send(app, get(&format!("/{}", EVM_TOKEN))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "API_RATE_LIMITED");
}

#[tokio::test]
async fn test_unknown_keys_share_the_ip_window() {
    let mut config = ServiceConfig {
        rate_limit_per_minute: 1,
        ..Default::default()
    };
    config.api_keys.insert(TRUSTED_KEY.to_string());
    let app = app_with(config);

    let with_key = |key: &str| {
        let mut request = get(&format!("/{}", EVM_TOKEN));
        request
            .headers_mut()
            .insert("x-api-key", key.parse().unwrap());
        request
    };

    let (status, _) = send(app.clone(), with_key("guess-1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(app.clone(), with_key("guess-2")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "API_RATE_LIMITED");

    // a known key keeps its own window
    let (status, _) = send(app, with_key(TRUSTED_KEY)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_stats() {
    let app = app();

    let (status, body) = send(app.clone(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");

    send(app.clone(), get(&format!("/{}", EVM_TOKEN))).await;
    send(app.clone(), get(&format!("/{}", EVM_TOKEN))).await;

    let (status, body) = send(app, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cache"]["entries"], 1);
    assert_eq!(body["data"]["cache"]["hits"], 1);
    assert_eq!(body["data"]["lookups"]["issued"], 7);
    assert_eq!(body["data"]["lookup_strategy"], "parallel");
}
