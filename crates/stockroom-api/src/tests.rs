//! Router-level tests against an in-memory `SqliteStore`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use chrono::Duration;
use serde_json::{Value, json};
use stockroom_store_sqlite::SqliteStore;
use tower::ServiceExt as _;

use crate::{AppState, TokenIssuer, api_router, token::DEFAULT_TOKEN_TTL_MINUTES};

async fn make_state() -> AppState<SqliteStore> {
  AppState {
    store:  Arc::new(SqliteStore::open_in_memory().await.unwrap()),
    tokens: Arc::new(TokenIssuer::new(
      "test-secret",
      Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
    )),
  }
}

/// A valid token without going through signup; the extractor only checks the
/// signature and expiry.
fn token(state: &AppState<SqliteStore>) -> String { state.tokens.issue(1).unwrap() }

async fn send(
  app: Router,
  method: Method,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(t) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, value)
}

async fn create_product(
  state: &AppState<SqliteStore>,
  sku: &str,
  price: f64,
  qty: i64,
) -> i64 {
  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/products",
    Some(&token(state)),
    Some(json!({
      "name": format!("Product {sku}"),
      "sku": sku,
      "price": price,
      "quantity_in_stock": qty,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

fn signup_body(name: &str, email: &str, password: &str) -> Value {
  json!({
    "name": name,
    "email": email,
    "phone_number": "0700000000",
    "password_hash": password,
  })
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn signup_then_login_issues_token_for_user() {
  let state = make_state().await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "alice@example.com", "abcd1234")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  let user_id = body["id"].as_i64().unwrap();

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/auth/login",
    None,
    Some(json!({ "email": "alice@example.com", "password_hash": "abcd1234" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["name"], "alice");
  assert_eq!(body["id"].as_i64(), Some(user_id));

  let claims = state
    .tokens
    .verify(body["access_token"].as_str().unwrap())
    .unwrap();
  assert_eq!(claims.user_id, user_id);
  assert_eq!(claims.exp - claims.iat, 30 * 60);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
  let state = make_state().await;
  send(
    api_router(state.clone()),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "alice@example.com", "abcd1234")),
  )
  .await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/auth/login",
    None,
    Some(json!({ "email": "alice@example.com", "password_hash": "wrong1234" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body.get("access_token").is_none());

  let (status, _) = send(
    api_router(state),
    Method::POST,
    "/auth/login",
    None,
    Some(json!({ "email": "nobody@example.com", "password_hash": "abcd1234" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_rejects_duplicates() {
  let state = make_state().await;
  let (status, _) = send(
    api_router(state.clone()),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "alice@example.com", "abcd1234")),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "new@example.com", "abcd1234")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "name already exists!");

  let (status, body) = send(
    api_router(state),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("bob", "alice@example.com", "abcd1234")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "email already exists!");
}

#[tokio::test]
async fn signup_rejects_weak_password_and_missing_fields() {
  let state = make_state().await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "alice@example.com", "onlyletters")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().contains("at least 8 characters"));

  let (status, body) = send(
    api_router(state),
    Method::POST,
    "/auth/signup",
    None,
    Some(json!({ "name": "alice", "password_hash": "abcd1234" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "missing required fields: email, phone_number");
}

#[tokio::test]
async fn duplicate_name_is_reported_before_weak_password() {
  let state = make_state().await;
  send(
    api_router(state.clone()),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "alice@example.com", "abcd1234")),
  )
  .await;

  let (status, body) = send(
    api_router(state),
    Method::POST,
    "/auth/signup",
    None,
    Some(signup_body("alice", "other@example.com", "weak")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "name already exists!");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
  let state = make_state().await;

  let (status, _) = send(api_router(state.clone()), Method::GET, "/products", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = send(
    api_router(state.clone()),
    Method::GET,
    "/products",
    Some("not-a-jwt"),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let expired = TokenIssuer::new("test-secret", Duration::minutes(-10))
    .issue(1)
    .unwrap();
  let (status, _) = send(
    api_router(state.clone()),
    Method::GET,
    "/products",
    Some(&expired),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);

  let (status, _) = send(
    api_router(state.clone()),
    Method::GET,
    "/products",
    Some(&token(&state)),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn malformed_requests_get_json_400s() {
  let state = make_state().await;
  let t = token(&state);
  let product_id = create_product(&state, "A-1", 10.0, 5).await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/products",
    Some(&t),
    Some(json!({ "name": "Widget", "sku": "W-1", "price": "ten", "quantity_in_stock": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().contains("price"), "{body}");

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/sales",
    Some(&t),
    Some(json!({ "product_id": product_id, "quantity_sold": "3" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].is_string(), "{body}");

  let (status, body) = send(
    api_router(state.clone()),
    Method::GET,
    "/products/abc",
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].is_string(), "{body}");

  // No Content-Type header.
  let resp = api_router(state.clone())
    .oneshot(
      Request::builder()
        .method(Method::POST)
        .uri("/auth/signup")
        .body(Body::from(
          signup_body("alice", "alice@example.com", "abcd1234").to_string(),
        ))
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(body["message"].is_string(), "{body}");

  let (_, product) = send(
    api_router(state),
    Method::GET,
    &format!("/products/{product_id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(product["quantity_in_stock"], 5);
}

// ── Products & suppliers ─────────────────────────────────────────────────────

#[tokio::test]
async fn product_lifecycle() {
  let state = make_state().await;
  let t = token(&state);
  let id = create_product(&state, "A-1", 10.0, 5).await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::GET,
    &format!("/products/{id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["sku"], "A-1");
  assert_eq!(body["quantity_in_stock"], 5);

  let (status, body) = send(
    api_router(state.clone()),
    Method::PATCH,
    &format!("/products/{id}"),
    Some(&t),
    Some(json!({ "quantity_in_stock": 8 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["quantity_in_stock"], 8);
  assert_eq!(body["price"], 10.0);

  let (status, _) = send(
    api_router(state.clone()),
    Method::DELETE,
    &format!("/products/{id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = send(
    api_router(state),
    Method::GET,
    &format!("/products/{id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn product_validation_errors_are_400() {
  let state = make_state().await;
  let t = token(&state);

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/products",
    Some(&t),
    Some(json!({ "name": "Widget", "sku": "W-1" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["message"], "missing required fields: price, quantity_in_stock");

  let (status, _) = send(
    api_router(state.clone()),
    Method::POST,
    "/products",
    Some(&t),
    Some(json!({ "name": "Widget", "sku": "W-1", "price": 0, "quantity_in_stock": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  create_product(&state, "W-1", 1.0, 1).await;
  let (status, _) = send(
    api_router(state),
    Method::POST,
    "/products",
    Some(&t),
    Some(json!({ "name": "Again", "sku": "W-1", "price": 2, "quantity_in_stock": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_missing_entities_is_404_without_side_effects() {
  let state = make_state().await;
  let t = token(&state);
  let id = create_product(&state, "A-1", 1.0, 1).await;

  for uri in ["/products/999", "/suppliers/999"] {
    let (status, body) = send(api_router(state.clone()), Method::DELETE, uri, Some(&t), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    assert!(body["message"].is_string(), "{uri}");
  }

  let (_, body) = send(api_router(state), Method::GET, "/products", Some(&t), None).await;
  let products = body.as_array().unwrap();
  assert_eq!(products.len(), 1);
  assert_eq!(products[0]["id"].as_i64(), Some(id));
}

#[tokio::test]
async fn supplier_lifecycle() {
  let state = make_state().await;
  let t = token(&state);

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/suppliers",
    Some(&t),
    Some(json!({ "name": "Acme", "contact": "acme@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["id"].as_i64().unwrap();

  let (status, body) = send(
    api_router(state.clone()),
    Method::PATCH,
    &format!("/suppliers/{id}"),
    Some(&t),
    Some(json!({ "name": "Acme Ltd" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Acme Ltd");
  assert_eq!(body["contact"], "acme@example.com");

  let (status, body) = send(api_router(state.clone()), Method::GET, "/suppliers", Some(&t), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, _) = send(
    api_router(state.clone()),
    Method::DELETE,
    &format!("/suppliers/{id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    api_router(state),
    Method::GET,
    &format!("/suppliers/{id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Sales ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn selling_three_of_five_at_ten() {
  let state = make_state().await;
  let t = token(&state);
  let product_id = create_product(&state, "A-1", 10.0, 5).await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/sales",
    Some(&t),
    Some(json!({ "product_id": product_id, "quantity_sold": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["total_price"], 30.0);
  let sale_id = body["sale_id"].as_i64().unwrap();
  let receipt_id = body["receipt_id"].as_i64().unwrap();

  let (_, product) = send(
    api_router(state.clone()),
    Method::GET,
    &format!("/products/{product_id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(product["quantity_in_stock"], 2);

  let (status, sale) = send(
    api_router(state.clone()),
    Method::GET,
    &format!("/sales/{sale_id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(sale["quantity_sold"], 3);
  assert_eq!(sale["receipt_id"].as_i64(), Some(receipt_id));

  let (status, receipt) = send(
    api_router(state.clone()),
    Method::GET,
    &format!("/receipts/{receipt_id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(receipt["total_amount"], 30.0);
  assert_eq!(receipt["sale_id"].as_i64(), Some(sale_id));

  let (status, summary) = send(
    api_router(state),
    Method::GET,
    &format!("/stock-summaries/{product_id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(summary["total_sold_value"], 30.0);
  assert_eq!(summary["total_stock_value"], -30.0);
  assert_eq!(summary["total_unsold_value"], 20.0);
}

#[tokio::test]
async fn overselling_is_400_and_writes_nothing() {
  let state = make_state().await;
  let t = token(&state);
  let product_id = create_product(&state, "A-1", 10.0, 2).await;

  let (status, body) = send(
    api_router(state.clone()),
    Method::POST,
    "/sales",
    Some(&t),
    Some(json!({ "product_id": product_id, "quantity_sold": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["message"].as_str().unwrap().contains("insufficient stock"));

  let (_, sales) = send(api_router(state.clone()), Method::GET, "/sales", Some(&t), None).await;
  assert!(sales.as_array().unwrap().is_empty());

  let (_, summaries) = send(
    api_router(state.clone()),
    Method::GET,
    "/stock-summaries",
    Some(&t),
    None,
  )
  .await;
  assert!(summaries.as_array().unwrap().is_empty());

  let (status, _) = send(api_router(state.clone()), Method::GET, "/receipts/1", Some(&t), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (_, product) = send(
    api_router(state),
    Method::GET,
    &format!("/products/{product_id}"),
    Some(&t),
    None,
  )
  .await;
  assert_eq!(product["quantity_in_stock"], 2);
}

#[tokio::test]
async fn selling_unknown_product_is_404() {
  let state = make_state().await;
  let t = token(&state);
  let (status, _) = send(
    api_router(state),
    Method::POST,
    "/sales",
    Some(&t),
    Some(json!({ "product_id": 404, "quantity_sold": 1 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_is_public() {
  let state = make_state().await;
  let resp = api_router(state)
    .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}
