//! HTTP-level tests for the booking marketplace router, running against an
//! in-memory document store.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use stay_api::{create_router, AppConfig, AppState};
use stay_store::DocumentStore;
use stay_stripe::{StripeConfig, StripePaymentClient};

fn test_state() -> AppState {
    let store = DocumentStore::in_memory().unwrap();
    // Unroutable gateway base URL: any attempted call fails loudly.
    let payments = StripePaymentClient::new(
        StripeConfig::new("sk_test_dummy").with_api_base_url("http://127.0.0.1:1"),
    )
    .unwrap();
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_path: ":memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        environment: "test".to_string(),
    };
    AppState::with_parts(store, payments, config)
}

fn server() -> TestServer {
    TestServer::new(create_router(test_state())).unwrap()
}

async fn token_for(server: &TestServer, email: &str) -> String {
    let response = server.post("/jwt").json(&json!({ "email": email })).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let server = server();

    let root = server.get("/").await;
    assert_eq!(root.status_code(), StatusCode::OK);
    assert_eq!(root.text(), "Stay booking server is running..");

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>()["service"], "stay-booking");
}

#[tokio::test]
async fn test_user_upsert_is_idempotent_with_latest_fields() {
    let server = server();

    let first = server
        .put("/users/sam@example.com")
        .json(&json!({ "email": "sam@example.com", "role": "guest" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let first = first.json::<Value>();
    assert_eq!(first["upsertedCount"], 1);
    assert!(first["upsertedId"].is_string());

    let second = server
        .put("/users/sam@example.com")
        .json(&json!({ "email": "sam@example.com", "role": "host" }))
        .await;
    let second = second.json::<Value>();
    assert_eq!(second["matchedCount"], 1);
    assert_eq!(second["upsertedCount"], 0);

    let user = server.get("/users/sam@example.com").await.json::<Value>();
    assert_eq!(user["role"], "host");
}

#[tokio::test]
async fn test_user_upsert_without_email_in_body_stays_retrievable() {
    let server = server();

    server
        .put("/users/sam@example.com")
        .json(&json!({ "role": "guest" }))
        .await;
    let second = server
        .put("/users/sam@example.com")
        .json(&json!({ "role": "host" }))
        .await;
    assert_eq!(second.json::<Value>()["matchedCount"], 1);

    let user = server.get("/users/sam@example.com").await.json::<Value>();
    assert_eq!(user["email"], "sam@example.com");
    assert_eq!(user["role"], "host");
}

#[tokio::test]
async fn test_get_missing_user_is_null() {
    let server = server();
    let response = server.get("/users/ghost@example.com").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_room_round_trip_preserves_opaque_fields() {
    let server = server();
    let room = json!({
        "host": { "email": "host@example.com", "name": "Ana" },
        "title": "Loft by the sea",
        "price": 120,
        "images": ["a.jpg"]
    });

    let created = server.post("/rooms").json(&room).await;
    assert_eq!(created.status_code(), StatusCode::OK);
    let id = created.json::<Value>()["insertedId"]
        .as_str()
        .unwrap()
        .to_string();

    let fetched = server.get(&format!("/room/{id}")).await.json::<Value>();
    assert_eq!(fetched["_id"], id.as_str());
    assert_eq!(fetched["title"], "Loft by the sea");
    assert_eq!(fetched["price"], 120);
    assert_eq!(fetched["host"]["name"], "Ana");

    let all = server.get("/rooms").await.json::<Vec<Value>>();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_delete_missing_room_reports_zero() {
    let server = server();
    let response = server.delete("/rooms/no-such-id").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["deletedCount"], 0);
}

#[tokio::test]
async fn test_room_status_update() {
    let server = server();
    let created = server
        .post("/rooms")
        .json(&json!({ "host": { "email": "h@x.com" }, "booked": false }))
        .await;
    let id = created.json::<Value>()["insertedId"]
        .as_str()
        .unwrap()
        .to_string();

    let update = server
        .patch(&format!("/rooms/status/{id}"))
        .json(&json!({ "status": true }))
        .await;
    assert_eq!(update.status_code(), StatusCode::OK);
    assert_eq!(update.json::<Value>()["modifiedCount"], 1);

    let room = server.get(&format!("/room/{id}")).await.json::<Value>();
    assert_eq!(room["booked"], true);
}

#[tokio::test]
async fn test_host_rooms_requires_bearer_token() {
    let server = server();

    let missing = server.get("/rooms/host@example.com").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json::<Value>()["error"], "Unauthorized access");

    let garbage = server
        .get("/rooms/host@example.com")
        .add_header(header::AUTHORIZATION, bearer("not-a-token"))
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_host_rooms_rejects_mismatched_identity() {
    let server = server();
    let token = token_for(&server, "mallory@example.com").await;

    let response = server
        .get("/rooms/host@example.com")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"], "Forbidden access");
}

#[tokio::test]
async fn test_host_rooms_scopes_to_owner() {
    let server = server();
    server
        .post("/rooms")
        .json(&json!({ "host": { "email": "host@example.com" }, "title": "Mine" }))
        .await;
    server
        .post("/rooms")
        .json(&json!({ "host": { "email": "other@example.com" }, "title": "Theirs" }))
        .await;

    let token = token_for(&server, "host@example.com").await;
    let response = server
        .get("/rooms/host@example.com")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let rooms = response.json::<Vec<Value>>();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["title"], "Mine");
}

#[tokio::test]
async fn test_bookings_without_email_filter_is_empty_list() {
    let server = server();

    let guest = server.get("/bookings").await;
    assert_eq!(guest.status_code(), StatusCode::OK);
    assert_eq!(guest.json::<Vec<Value>>().len(), 0);

    let host = server.get("/bookings/host").await;
    assert_eq!(host.status_code(), StatusCode::OK);
    assert_eq!(host.json::<Vec<Value>>().len(), 0);
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let server = server();
    let booking = json!({
        "guest": { "email": "guest@example.com" },
        "host": "host@example.com",
        "date": "2025-06-01",
        "price": 240
    });

    let created = server.post("/bookings").json(&booking).await;
    assert_eq!(created.status_code(), StatusCode::OK);
    let id = created.json::<Value>()["insertedId"]
        .as_str()
        .unwrap()
        .to_string();

    let by_guest = server
        .get("/bookings")
        .add_query_param("email", "guest@example.com")
        .await
        .json::<Vec<Value>>();
    assert_eq!(by_guest.len(), 1);
    assert_eq!(by_guest[0]["date"], "2025-06-01");

    let by_host = server
        .get("/bookings/host")
        .add_query_param("email", "host@example.com")
        .await
        .json::<Vec<Value>>();
    assert_eq!(by_host.len(), 1);

    let deleted = server.delete(&format!("/bookings/{id}")).await;
    assert_eq!(deleted.json::<Value>()["deletedCount"], 1);

    let after = server
        .get("/bookings")
        .add_query_param("email", "guest@example.com")
        .await
        .json::<Vec<Value>>();
    assert!(after.is_empty());
}

#[tokio::test]
async fn test_deleting_room_leaves_bookings_untouched() {
    let server = server();
    let created = server
        .post("/rooms")
        .json(&json!({ "host": { "email": "h@x.com" }, "title": "Cabin" }))
        .await;
    let room_id = created.json::<Value>()["insertedId"]
        .as_str()
        .unwrap()
        .to_string();

    server
        .post("/bookings")
        .json(&json!({
            "guest": { "email": "g@x.com" },
            "host": "h@x.com",
            "roomId": room_id
        }))
        .await;

    server.delete(&format!("/rooms/{room_id}")).await;

    let bookings = server
        .get("/bookings")
        .add_query_param("email", "g@x.com")
        .await
        .json::<Vec<Value>>();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["roomId"], room_id.as_str());
}

#[tokio::test]
async fn test_payment_intent_requires_token() {
    let server = server();
    let response = server
        .post("/create-payment-intent")
        .json(&json!({ "price": 100 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_payment_intent_without_price_makes_no_gateway_call() {
    let server = server();
    let token = token_for(&server, "guest@example.com").await;

    // The gateway base URL is unroutable; a 400 here proves no call was
    // attempted and no client secret was produced.
    let response = server
        .post("/create-payment-intent")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body = response.json::<Value>();
    assert!(body.get("clientSecret").is_none());
}
