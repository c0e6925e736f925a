//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use messaging::{InMemoryBroker, PRODUCT_EVENTS_TOPIC};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let (state, _broker, _publisher) = api::create_default_state();
    api::create_app(state, get_metrics_handle())
}

async fn setup_connected() -> (axum::Router, Arc<InMemoryBroker>) {
    let (state, broker, publisher) = api::create_default_state();
    publisher.connect(broker.clone()).await;
    (api::create_app(state, get_metrics_handle()), broker)
}

async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_string(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn create_category(app: &axum::Router, name: &str) -> String {
    let (status, json) = request(
        app,
        "POST",
        "/categories",
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

/// Creates a product already holding one category and one attribute, so it
/// is eligible for activation.
async fn create_activatable_product(app: &axum::Router, name: &str) -> String {
    let category_id = create_category(app, &format!("{name} category")).await;
    let (status, json) = request(
        app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "name": name,
            "category_ids": [category_id],
            "attributes": [{ "key": "color", "value": "red" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();
    let (status, json) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_category() {
    let app = setup();

    let (status, json) = request(
        &app,
        "POST",
        "/categories",
        Some(serde_json::json!({ "name": "Electronics" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "Electronics");
    assert_eq!(json["parent_id"], serde_json::Value::Null);
    assert_eq!(json["version"], 1);
    assert!(json["id"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_category_name_conflicts() {
    let app = setup();
    create_category(&app, "Electronics").await;

    let (status, json) = request(
        &app,
        "POST",
        "/categories",
        Some(serde_json::json!({ "name": "electronics" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Category with this name already exists");
}

#[tokio::test]
async fn test_get_category_not_found() {
    let app = setup();

    let (status, json) = request(
        &app,
        "GET",
        &format!("/categories/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Category not found");
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let app = setup();

    let (status, _) = request(&app, "GET", "/categories/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(&app, "GET", "/products/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_category_rename_and_detach_parent() {
    let app = setup();
    let parent_id = create_category(&app, "Electronics").await;

    let (status, json) = request(
        &app,
        "POST",
        "/categories",
        Some(serde_json::json!({ "name": "Phones", "parent_id": parent_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["parent_id"], parent_id);
    let child_id = json["id"].as_str().unwrap().to_string();

    // Rename only; parent stays.
    let (status, json) = request(
        &app,
        "PATCH",
        &format!("/categories/{child_id}"),
        Some(serde_json::json!({ "name": "Smartphones" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Smartphones");
    assert_eq!(json["parent_id"], parent_id);

    // Explicit null detaches from the parent.
    let (status, json) = request(
        &app,
        "PATCH",
        &format!("/categories/{child_id}"),
        Some(serde_json::json!({ "parent_id": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["parent_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_create_product_starts_as_draft() {
    let app = setup();

    let (status, json) = request(
        &app,
        "POST",
        "/products",
        Some(serde_json::json!({ "name": "Laptop", "description": "Portable" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["status"], "DRAFT");
    assert_eq!(json["description"], "Portable");
    assert_eq!(json["categories"], serde_json::json!([]));
    assert_eq!(json["attributes"], serde_json::json!([]));
}

#[tokio::test]
async fn test_create_product_with_unknown_category() {
    let app = setup();

    let (status, json) = request(
        &app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "name": "Laptop",
            "category_ids": [uuid::Uuid::new_v4().to_string()]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "One or more categories not found");
}

#[tokio::test]
async fn test_object_attribute_value_is_rejected() {
    let app = setup();

    let (status, _) = request(
        &app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "name": "Laptop",
            "attributes": [{ "key": "specs", "value": { "cpu": "fast" } }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activation_flow() {
    let app = setup();
    let product_id = create_activatable_product(&app, "Laptop").await;

    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/activate"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ACTIVE");

    // Activating again is rejected: no longer DRAFT.
    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/activate"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Only DRAFT products can be activated");
}

#[tokio::test]
async fn test_activation_requires_category() {
    let app = setup();

    let (_, json) = request(
        &app,
        "POST",
        "/products",
        Some(serde_json::json!({
            "name": "Laptop",
            "attributes": [{ "key": "color", "value": "red" }]
        })),
    )
    .await;
    let product_id = json["id"].as_str().unwrap();

    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/activate"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Product must have at least 1 category to be activated"
    );
}

#[tokio::test]
async fn test_archive_is_idempotent() {
    let app = setup();
    let product_id = create_activatable_product(&app, "Laptop").await;

    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/archive"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ARCHIVED");
    let version = json["version"].as_i64().unwrap();

    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/archive"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ARCHIVED");
    assert_eq!(json["version"], version + 1);
}

#[tokio::test]
async fn test_description_editable_after_archive() {
    let app = setup();
    let product_id = create_activatable_product(&app, "Laptop").await;
    request(
        &app,
        "POST",
        &format!("/products/{product_id}/archive"),
        None,
    )
    .await;

    let (status, json) = request(
        &app,
        "PATCH",
        &format!("/products/{product_id}/description"),
        Some(serde_json::json!({ "description": "Discontinued" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["description"], "Discontinued");
}

#[tokio::test]
async fn test_attribute_lifecycle() {
    let app = setup();

    let (_, json) = request(
        &app,
        "POST",
        "/products",
        Some(serde_json::json!({ "name": "Laptop" })),
    )
    .await;
    let product_id = json["id"].as_str().unwrap().to_string();

    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/attributes"),
        Some(serde_json::json!({ "key": "ram", "value": 16.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["attributes"][0]["key"], "ram");

    // Adding the same key again is rejected.
    let (status, json) = request(
        &app,
        "POST",
        &format!("/products/{product_id}/attributes"),
        Some(serde_json::json!({ "key": "ram", "value": 32.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Attribute with key \"ram\" already exists");

    let (status, json) = request(
        &app,
        "PUT",
        &format!("/products/{product_id}/attributes/ram"),
        Some(serde_json::json!({ "value": 32.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["attributes"][0]["value"], 32.0);

    let (status, json) = request(
        &app,
        "DELETE",
        &format!("/products/{product_id}/attributes/ram"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["attributes"], serde_json::json!([]));
}

#[tokio::test]
async fn test_active_product_keeps_last_category() {
    let app = setup();
    let product_id = create_activatable_product(&app, "Laptop").await;
    request(
        &app,
        "POST",
        &format!("/products/{product_id}/activate"),
        None,
    )
    .await;

    let (_, json) = request(&app, "GET", &format!("/products/{product_id}"), None).await;
    let category_id = json["categories"][0].as_str().unwrap().to_string();

    let (status, json) = request(
        &app,
        "DELETE",
        &format!("/products/{product_id}/categories/{category_id}"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "ACTIVE product must have at least 1 category");
}

#[tokio::test]
async fn test_commands_publish_to_broker() {
    let (app, broker) = setup_connected().await;
    let product_id = create_activatable_product(&app, "Laptop").await;
    request(
        &app,
        "POST",
        &format!("/products/{product_id}/activate"),
        None,
    )
    .await;

    // PRODUCT_CREATED and PRODUCT_ACTIVATED land on the product topic.
    assert_eq!(broker.message_count(PRODUCT_EVENTS_TOPIC).await, 2);
}
