mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{delete, get, post, put, text};
use record_services::config::StoreSettings;
use record_services::controller::ResourceController;
use record_services::model::{Product, ProductDraft};
use record_services::product_service;
use resource_store::mock::MockStore;
use resource_store::StoreError;
use serde_json::{json, Value};
use std::sync::Arc;

fn app() -> (Router, Arc<ResourceController<Product>>) {
    let service = product_service::start(&StoreSettings::default()).unwrap();
    let controller = service.controller();
    (product_service::router(controller.clone()), controller)
}

async fn create(app: &Router, name: &str, price: f64, stock: i32) -> Value {
    let (status, body) = post(
        app,
        "/api/products",
        json!({ "name": name, "price": price, "stock": stock }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body.unwrap()
}

#[tokio::test]
async fn test_create_assigns_fresh_ids_and_round_trips_fields() {
    let (app, controller) = app();

    let (status, body) = post(
        &app,
        "/api/products",
        json!({ "id": 99, "name": "Desk", "description": "Oak", "price": 120.5, "stock": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let desk = body.unwrap();
    assert_ne!(desk["id"], 99, "client-supplied id must be ignored");
    assert_eq!(desk["name"], "Desk");
    assert_eq!(desk["description"], "Oak");
    assert_eq!(desk["price"], 120.5);
    assert_eq!(desk["stock"], 4);

    let chair = create(&app, "Chair", 30.0, 10).await;
    assert_ne!(chair["id"], desk["id"]);
    assert_eq!(chair["description"], Value::Null);

    let (status, body) = get(&app, &format!("/api/products/{}", desk["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), desk);

    assert_eq!(controller.metrics().created(), 2);
}

#[tokio::test]
async fn test_absent_ids_are_not_found_and_leave_the_store_alone() {
    let (app, _controller) = app();
    create(&app, "Lamp", 15.0, 2).await;

    assert_eq!(get(&app, "/api/products/404").await, (StatusCode::NOT_FOUND, None));
    assert_eq!(
        put(
            &app,
            "/api/products/404",
            json!({ "name": "X", "price": 1.0, "stock": 1 })
        )
        .await,
        (StatusCode::NOT_FOUND, None)
    );
    assert_eq!(delete(&app, "/api/products/404").await, (StatusCode::NOT_FOUND, None));

    let (_, list) = get(&app, "/api/products").await;
    let list = list.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Lamp");
}

#[tokio::test]
async fn test_update_replaces_fields_and_keeps_the_id() {
    let (app, _controller) = app();
    let product = create(&app, "N1", 1.0, 1).await;
    let id = &product["id"];

    let (status, body) = put(
        &app,
        &format!("/api/products/{id}"),
        json!({ "name": "N2", "description": "D2", "price": 5.00, "stock": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap(),
        json!({ "id": id, "name": "N2", "description": "D2", "price": 5.0, "stock": 3 })
    );
}

#[tokio::test]
async fn test_delete_is_not_found_the_second_time() {
    let (app, _controller) = app();
    let product = create(&app, "Temp", 1.0, 1).await;
    let uri = format!("/api/products/{}", product["id"]);

    assert_eq!(delete(&app, &uri).await, (StatusCode::OK, None));
    assert_eq!(get(&app, &uri).await, (StatusCode::NOT_FOUND, None));
    assert_eq!(delete(&app, &uri).await, (StatusCode::NOT_FOUND, None));
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let (app, _controller) = app();
    create(&app, "Gaming Laptop", 1500.0, 3).await;
    create(&app, "laptop sleeve", 25.0, 40).await;
    create(&app, "Keyboard", 80.0, 12).await;

    let (status, body) = get(&app, "/api/products/search?name=LAPTOP").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<Value> = body
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Gaming Laptop"), json!("laptop sleeve")]);

    let (_, body) = get(&app, "/api/products/search?name=").await;
    assert_eq!(body.unwrap().as_array().unwrap().len(), 3);

    let (_, body) = get(&app, "/api/products/search?name=mouse").await;
    assert_eq!(body.unwrap(), json!([]));
}

#[tokio::test]
async fn test_search_ignores_case_beyond_ascii() {
    let (app, _controller) = app();
    let eclair = create(&app, "Éclair", 3.5, 12).await;
    create(&app, "Croissant", 2.0, 30).await;

    // "éclair" and "ÉCLAIR", percent-encoded.
    for uri in [
        "/api/products/search?name=%C3%A9clair",
        "/api/products/search?name=%C3%89CLAIR",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), json!([eclair]), "{uri}");
    }
}

#[tokio::test]
async fn test_malformed_requests_are_rejected_before_the_controller() {
    let (app, controller) = app();

    let (status, body) = get(&app, "/api/products/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(matches!(body, Some(Value::String(_))), "{body:?}");

    let (status, body) = get(&app, "/api/products/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(matches!(body, Some(Value::String(_))), "{body:?}");

    let (status, body) = post(&app, "/api/products", json!({ "name": "No price" })).await;
    assert!(status.is_client_error());
    assert!(matches!(body, Some(Value::String(_))), "{body:?}");

    assert_eq!(controller.metrics().requests(), 0);
    assert_eq!(controller.metrics().created(), 0);
}

#[tokio::test]
async fn test_counters_track_requests_and_creates() {
    let (app, controller) = app();
    let metrics = controller.metrics();

    let (status, body) = get(&app, "/api/products/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body.unwrap(),
        json!({ "status": "UP", "service": "product-service" })
    );
    assert_eq!(metrics.requests(), 0, "health is not counted");

    let product = create(&app, "A", 1.0, 1).await;
    create(&app, "B", 2.0, 2).await;
    get(&app, "/api/products").await;
    get(&app, &format!("/api/products/{}", product["id"])).await;
    get(&app, "/api/products/9999").await;
    get(&app, "/api/products/search?name=a").await;

    assert_eq!(metrics.requests(), 6);
    assert_eq!(metrics.created(), 2);

    let (status, scrape) = text(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(scrape.contains("product_requests_total 6"), "{scrape}");
    assert!(scrape.contains("products_created_total 2"), "{scrape}");
}

#[tokio::test]
async fn test_storage_failure_is_a_server_error() {
    let mut mock = MockStore::<Product>::new();
    mock.expect_find_all()
        .return_err(StoreError::Storage("disk I/O error".into()));
    mock.expect_insert()
        .return_err(StoreError::Storage("disk I/O error".into()));

    let controller = Arc::new(ResourceController::new(
        product_service::SERVICE_NAME,
        mock.client(),
        product_service::metrics(),
    ));
    let app = product_service::router(controller.clone());

    assert_eq!(
        get(&app, "/api/products").await,
        (StatusCode::INTERNAL_SERVER_ERROR, None)
    );
    let draft = serde_json::to_value(ProductDraft::new("Fail", 1.0, 1)).unwrap();
    assert_eq!(
        post(&app, "/api/products", draft).await,
        (StatusCode::INTERNAL_SERVER_ERROR, None)
    );

    assert_eq!(controller.metrics().requests(), 2);
    assert_eq!(controller.metrics().created(), 0);
    mock.verify();
}
