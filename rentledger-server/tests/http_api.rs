//! End-to-end tests driving the full router against a real database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p rentledger-server -- --ignored
//!
//! Tests share one database, so every test works with its own uniquely
//! named property and never asserts on global table contents.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use rentledger_server::db::{create_pool, migrations};
use rentledger_server::{build_router, AppState, ServerConfig};

async fn make_app() -> axum::Router {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");

    // Each test starts from a clean slate for its own property names;
    // see reset_property below.
    build_router(AppState { pool }, &ServerConfig::default())
}

/// Delete any rows left over from a previous run of the same test.
async fn reset_property(name: &str) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    sqlx::query(
        "DELETE FROM expenses WHERE property_id IN \
         (SELECT property_id FROM properties WHERE property_name = $1)",
    )
    .bind(name)
    .execute(&pool)
    .await
    .expect("expense cleanup");
    sqlx::query("DELETE FROM properties WHERE property_name = $1")
        .bind(name)
        .execute(&pool)
        .await
        .expect("property cleanup");
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn expense_body() -> Value {
    json!({
        "paid_to": "Acme",
        "payment_reason": "repair",
        "created_on": "2024-01-01",
        "download_url": "http://x/1",
        "amount": 150.0,
        "fully_paid": false
    })
}

#[tokio::test]
#[ignore = "requires database"]
async fn property_create_then_get_roundtrip() {
    reset_property("e2e Roundtrip House").await;
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e Roundtrip House"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["status"], "success");
    assert_eq!(created["results"], 1);
    assert_eq!(
        created["data"]["property"]["property_name"],
        "e2e Roundtrip House"
    );
    let id = created["data"]["property"]["property_id"].as_i64().unwrap();

    let resp = app
        .oneshot(get(&format!("/api/v1/properties/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched["data"]["property"]["property_id"], id);
    assert_eq!(
        fetched["data"]["property"]["property_name"],
        "e2e Roundtrip House"
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn property_list_envelope_counts_rows() {
    reset_property("e2e List House").await;
    let app = make_app().await;

    app.clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e List House"}),
        ))
        .await
        .unwrap();

    let resp = app.oneshot(get("/api/v1/properties")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let properties = body["data"]["properties"].as_array().unwrap();
    assert_eq!(body["results"].as_u64().unwrap() as usize, properties.len());
    assert!(properties
        .iter()
        .any(|p| p["property_name"] == "e2e List House"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn lakeview_expense_flow() {
    reset_property("Lakeview").await;
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "Lakeview"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let property = body_json(resp).await;
    let property_id = property["data"]["property"]["property_id"]
        .as_i64()
        .unwrap();

    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/expenses/Lakeview", expense_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["data"]["expense"]["property_id"], property_id);
    let expenses_id = created["data"]["expense"]["expenses_id"].as_i64().unwrap();

    // Joined read includes the property name.
    let resp = app
        .clone()
        .oneshot(get(&format!("/api/v1/expenses/{expenses_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched["data"]["expense"]["property_name"], "Lakeview");
    assert_eq!(fetched["data"]["expense"]["paid_to"], "Acme");

    // Full-body update flips fully_paid.
    let mut update = expense_body();
    update["fully_paid"] = json!(true);
    let resp = app
        .clone()
        .oneshot(put_json(
            &format!("/api/v1/expenses/Lakeview/{expenses_id}"),
            update,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["data"]["expense"]["fully_paid"], true);
    assert_eq!(updated["data"]["expense"]["expenses_id"], expenses_id);
}

#[tokio::test]
#[ignore = "requires database"]
async fn expense_under_unknown_property_is_404() {
    let app = make_app().await;

    let resp = app
        .oneshot(post_json(
            "/api/v1/expenses/no-such-property-anywhere",
            expense_body(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
#[ignore = "requires database"]
async fn partial_expense_body_is_400() {
    reset_property("e2e-partial-house").await;
    let app = make_app().await;

    app.clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e-partial-house"}),
        ))
        .await
        .unwrap();

    // amount, fully_paid, download_url omitted
    let resp = app
        .oneshot(post_json(
            "/api/v1/expenses/e2e-partial-house",
            json!({
                "paid_to": "Acme",
                "payment_reason": "repair",
                "created_on": "2024-01-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
#[ignore = "requires database"]
async fn property_delete_is_204_then_404() {
    reset_property("e2e Delete House").await;
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e Delete House"}),
        ))
        .await
        .unwrap();
    let id = body_json(resp).await["data"]["property"]["property_id"]
        .as_i64()
        .unwrap();

    let resp = app
        .clone()
        .oneshot(delete(&format!("/api/v1/properties/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert!(bytes.is_empty());

    // Row is gone.
    let resp = app
        .clone()
        .oneshot(get(&format!("/api/v1/properties/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Repeating the delete reports 404, not 204.
    let resp = app
        .oneshot(delete(&format!("/api/v1/properties/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn property_delete_orphans_expenses() {
    reset_property("e2e-orphan-house").await;
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e-orphan-house"}),
        ))
        .await
        .unwrap();
    let property_id = body_json(resp).await["data"]["property"]["property_id"]
        .as_i64()
        .unwrap();

    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/expenses/e2e-orphan-house", expense_body()))
        .await
        .unwrap();
    let expenses_id = body_json(resp).await["data"]["expense"]["expenses_id"]
        .as_i64()
        .unwrap();

    let resp = app
        .clone()
        .oneshot(delete(&format!("/api/v1/properties/{property_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The expense row survives with a dangling property_id: it still
    // shows up in the flat list...
    let resp = app.clone().oneshot(get("/api/v1/expenses")).await.unwrap();
    let body = body_json(resp).await;
    let orphan = body["data"]["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["expenses_id"] == expenses_id)
        .cloned()
        .expect("orphaned expense still listed");
    assert_eq!(orphan["property_id"], property_id);

    // ...but the joined single read no longer matches.
    let resp = app
        .oneshot(get(&format!("/api/v1/expenses/{expenses_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn expense_delete_idempotence_reports_404() {
    reset_property("e2e-expense-delete-house").await;
    let app = make_app().await;

    app.clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e-expense-delete-house"}),
        ))
        .await
        .unwrap();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/expenses/e2e-expense-delete-house",
            expense_body(),
        ))
        .await
        .unwrap();
    let expenses_id = body_json(resp).await["data"]["expense"]["expenses_id"]
        .as_i64()
        .unwrap();

    let resp = app
        .clone()
        .oneshot(delete(&format!("/api/v1/expenses/{expenses_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(delete(&format!("/api/v1/expenses/{expenses_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_property_name_is_400() {
    let app = make_app().await;

    let resp = app
        .oneshot(post_json("/api/v1/properties", json!({"property_name": ""})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_property_name_is_409() {
    reset_property("e2e Duplicate House").await;
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e Duplicate House"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .oneshot(post_json(
            "/api/v1/properties",
            json!({"property_name": "e2e Duplicate House"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_property_id_is_404() {
    let app = make_app().await;

    let resp = app
        .clone()
        .oneshot(get("/api/v1/properties/9223372036854775807"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(put_json(
            "/api/v1/properties/9223372036854775807",
            json!({"property_name": "Renamed"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
