// Copyright 2026 S4Core Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Container Keys Integration Tests
//!
//! Drives the full router (container keys, identity auth, handlers) with
//! in-process requests via tower::ServiceExt::oneshot.

use axum::{
    body::{Body, Bytes},
    http::{Method, Request, StatusCode},
    Router,
};
use ck_api::store::StoredObject;
use ck_api::{create_router, AppState, IdentityConfig, InMemoryMetadataSource, ObjectStore};
use ck_core::RawMetadata;
use http_body_util::BodyExt;
use tower::ServiceExt;

const KEY_INVALID: &str = "401 Unauthorized: Auth Key invalid\n";
const TOKEN: &str = "test-token";

struct TestApp {
    router: Router,
    metadata: InMemoryMetadataSource,
    objects: ObjectStore,
}

fn metadata(pairs: &[(&str, &str)]) -> RawMetadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn create_test_app(identity: IdentityConfig) -> TestApp {
    let source = InMemoryMetadataSource::new();
    source
        .set_container_metadata(
            "AUTH_test",
            "photos",
            metadata(&[
                ("Full-Key", "owner-key"),
                ("Read-Key", "viewer-key"),
                ("Read-Key-2", "guest-key"),
                ("Color", "blue"),
            ]),
        )
        .await;
    source
        .set_container_metadata("AUTH_test", "open", RawMetadata::new())
        .await;

    let state = AppState::new(source.clone(), identity);
    let objects = state.objects.clone();
    objects
        .put(
            "AUTH_test",
            "photos",
            "cat.jpg",
            StoredObject {
                data: Bytes::from_static(b"meow"),
                content_type: "image/jpeg".to_string(),
            },
        )
        .await;

    TestApp {
        router: create_router(state),
        metadata: source,
        objects,
    }
}

async fn create_default_app() -> TestApp {
    create_test_app(IdentityConfig::new(vec![TOKEN.to_string()])).await
}

fn request(method: Method, uri: &str, headers: &[(&str, &str)], body: &'static str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Helper to read response body as string.
async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Read key
// ============================================================================

#[tokio::test]
async fn test_read_key_allows_get() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(body_to_string(response.into_body()).await, "meow");
}

#[tokio::test]
async fn test_read_key_allows_head() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::HEAD,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_suffixed_read_key_allows_get() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "guest-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_read_key_refused_for_put() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/v1/AUTH_test/photos/dog.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key"), ("X-Auth-Token", TOKEN)],
            "woof",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_string(response.into_body()).await, KEY_INVALID);
    assert!(app.objects.get("AUTH_test", "photos", "dog.jpg").await.is_none());
}

#[tokio::test]
async fn test_read_key_refused_for_delete() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::DELETE,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.objects.get("AUTH_test", "photos", "cat.jpg").await.is_some());
}

#[tokio::test]
async fn test_read_key_refused_for_post() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::POST,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_string(response.into_body()).await, KEY_INVALID);
}

#[tokio::test]
async fn test_full_key_is_not_a_read_key() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "owner-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Full key
// ============================================================================

#[tokio::test]
async fn test_full_key_allows_put() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/v1/AUTH_test/photos/dog.jpg",
            &[
                ("X-Container-Meta-Full-Key", "owner-key"),
                ("Content-Type", "image/jpeg"),
            ],
            "woof",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let stored = app.objects.get("AUTH_test", "photos", "dog.jpg").await.unwrap();
    assert_eq!(stored.data, Bytes::from_static(b"woof"));
    assert_eq!(stored.content_type, "image/jpeg");
}

#[tokio::test]
async fn test_full_key_allows_delete() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::DELETE,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Full-Key", "owner-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.objects.get("AUTH_test", "photos", "cat.jpg").await.is_none());
}

#[tokio::test]
async fn test_wrong_full_key_refused() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Full-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-trans-id"));
    assert_eq!(body_to_string(response.into_body()).await, KEY_INVALID);
}

#[tokio::test]
async fn test_refused_head_has_empty_body() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::HEAD,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Full-Key", "nope")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_string(response.into_body()).await, "");
}

// ============================================================================
// Both headers
// ============================================================================

#[tokio::test]
async fn test_full_key_checked_when_both_present() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/v1/AUTH_test/photos/dog.jpg",
            &[
                ("X-Container-Meta-Full-Key", "owner-key"),
                ("X-Container-Meta-Read-Key", "garbage"),
            ],
            "woof",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_valid_read_key_ignored_when_full_key_wrong() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[
                ("X-Container-Meta-Full-Key", "garbage"),
                ("X-Container-Meta-Read-Key", "viewer-key"),
            ],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Deferral to identity auth
// ============================================================================

#[tokio::test]
async fn test_no_key_no_token_is_unauthorized() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(Method::GET, "/v1/AUTH_test/photos/cat.jpg", &[], ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "401 Unauthorized: Authentication required\n"
    );
}

#[tokio::test]
async fn test_no_key_with_token_is_allowed() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/v1/AUTH_test/photos/dog.jpg",
            &[("X-Auth-Token", TOKEN)],
            "woof",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_empty_key_header_defers() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Full-Key", ""), ("X-Auth-Token", TOKEN)],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_key_is_final_even_with_token() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "nope"), ("X-Auth-Token", TOKEN)],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_string(response.into_body()).await, KEY_INVALID);
}

#[tokio::test]
async fn test_disabled_identity_auth() {
    let app = create_test_app(IdentityConfig::disabled()).await;

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/v1/AUTH_test/photos/cat.jpg", &[], ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "nope")],
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Containers
// ============================================================================

#[tokio::test]
async fn test_container_without_keys_refuses_any_key() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/open",
            &[("X-Container-Meta-Full-Key", "owner-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_container_refuses_key() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/missing/cat.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_string(response.into_body()).await, KEY_INVALID);
}

#[tokio::test]
async fn test_read_key_lists_container() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "cat.jpg\n");
}

#[tokio::test]
async fn test_head_container_reports_count() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::HEAD,
            "/v1/AUTH_test/photos",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["x-container-object-count"], "1");
}

#[tokio::test]
async fn test_key_on_account_path_defers() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test",
            &[("X-Container-Meta-Full-Key", "nope"), ("X-Auth-Token", TOKEN)],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_escape_does_not_alias_another_container() {
    let app = create_default_app().await;
    app.metadata
        .set_container_metadata("AUTH_test", "x\u{1}y", metadata(&[("Full-Key", "other-key")]))
        .await;
    app.metadata
        .set_container_metadata("AUTH_test", "x%+1y", RawMetadata::new())
        .await;

    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/v1/AUTH_test/x%+1y/o",
            &[("X-Container-Meta-Full-Key", "other-key")],
            "data",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_to_string(response.into_body()).await, KEY_INVALID);
    assert!(app.objects.get("AUTH_test", "x%+1y", "o").await.is_none());
    assert!(app.objects.get("AUTH_test", "x\u{1}y", "o").await.is_none());
}

#[tokio::test]
async fn test_percent_encoded_container_uses_decoded_keys() {
    let app = create_default_app().await;
    app.metadata
        .set_container_metadata("AUTH_test", "my photos", metadata(&[("Full-Key", "spaced-key")]))
        .await;

    let response = app
        .router
        .oneshot(request(
            Method::PUT,
            "/v1/AUTH_test/my%20photos/o",
            &[("X-Container-Meta-Full-Key", "spaced-key")],
            "data",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(app.objects.get("AUTH_test", "my photos", "o").await.is_some());
}

#[tokio::test]
async fn test_rotated_key_takes_effect_immediately() {
    let app = create_default_app().await;

    app.metadata
        .set_container_metadata("AUTH_test", "photos", metadata(&[("Read-Key", "new-key")]))
        .await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "viewer-key")],
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .oneshot(request(
            Method::GET,
            "/v1/AUTH_test/photos/cat.jpg",
            &[("X-Container-Meta-Read-Key", "new-key")],
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Public endpoints
// ============================================================================

#[tokio::test]
async fn test_info_endpoint() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(Method::GET, "/info", &[], ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value =
        serde_json::from_str(&body_to_string(response.into_body()).await).unwrap();
    assert_eq!(
        json["containerkeys"]["full_key_header"],
        "x-container-meta-full-key"
    );
    assert_eq!(
        json["containerkeys"]["read_key_header"],
        "x-container-meta-read-key"
    );
    assert_eq!(
        json["containerkeys"]["read_only_methods"],
        serde_json::json!(["GET", "HEAD"])
    );
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = create_default_app().await;

    let response = app
        .router
        .oneshot(request(Method::GET, "/metrics", &[], ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body_to_string(response.into_body()).await,
        "503 Service Unavailable: Metrics disabled\n"
    );
}
