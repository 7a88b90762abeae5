use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use listingbot::error::CompletionError;
use listingbot::tests::util::{dpm_copy_json, dpm_vision_json, ScriptedClient};
use listingbot::{api_router, Orchestrator, PipelineSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

const GENERATE: &str = "/api/generate-product-copy";

fn app_with(client: Arc<ScriptedClient>) -> axum::Router {
    api_router(Orchestrator::new(client, PipelineSettings::default()))
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(GENERATE)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = app_with(Arc::new(ScriptedClient::default()));
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri(GENERATE)
                .header("origin", "https://admin.example.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn bare_options_is_empty_success() {
    let app = app_with(Arc::new(ScriptedClient::default()));
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri(GENERATE)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn generate_returns_analysis_and_copy() {
    let client = Arc::new(ScriptedClient::replying(&[
        &dpm_vision_json().to_string(),
        &dpm_copy_json().to_string(),
    ]));
    let app = app_with(client.clone());

    let response = app
        .oneshot(generate_request(json!({
            "title": "British DPM combat shirt",
            "category": "Field Shirts",
            "isCollectable": false,
            "staffNotes": null,
            "images": ["data:image/png;base64,aW1n"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let payload = body_json(response).await;
    assert_eq!(payload["visionAnalysis"]["camouflagePattern"], "DPM");
    assert_eq!(
        payload["generatedContent"]["navPath"],
        "Clothing > Shirts & T-Shirts > Field Shirts"
    );
    assert!(payload["generatedContent"]["seo"]["metaTitle"].is_string());
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn multi_megabyte_photo_reaches_the_model() {
    let client = Arc::new(ScriptedClient::replying(&[
        &dpm_vision_json().to_string(),
        &dpm_copy_json().to_string(),
    ]));
    let app = app_with(client.clone());
    let photo = format!("data:image/jpeg;base64,{}", "A".repeat(3 * 1024 * 1024));

    let response = app
        .oneshot(generate_request(json!({
            "title": "British DPM combat shirt",
            "images": [photo.clone(), photo]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.call_count(), 2);
    assert_eq!(client.requests()[0].messages[1].image_count(), 2);
}

#[tokio::test]
async fn oversized_body_is_reported_as_too_large() {
    let client = Arc::new(ScriptedClient::default());
    let app = app_with(client.clone());
    let photo = format!(
        "data:image/jpeg;base64,{}",
        "A".repeat(listingbot::api::MAX_BODY_BYTES)
    );

    let response = app
        .oneshot(generate_request(json!({
            "title": "British DPM combat shirt",
            "images": [photo]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Request body too large");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_images_is_bad_request_without_model_calls() {
    let client = Arc::new(ScriptedClient::default());
    let app = app_with(client.clone());

    let response = app
        .oneshot(generate_request(json!({ "title": "Parka", "images": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Title and at least one image are required.");
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn upstream_failure_is_server_error() {
    let client = Arc::new(ScriptedClient::new(vec![Err(CompletionError::Status {
        status: 502,
        body: "bad gateway".into(),
    })]));
    let app = app_with(client.clone());

    let response = app
        .oneshot(generate_request(json!({
            "title": "Parka",
            "images": ["data:image/png;base64,aW1n"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = body_json(response).await;
    assert_eq!(payload["error"], "Vision API error: 502");
    assert_eq!(client.call_count(), 1);
}
