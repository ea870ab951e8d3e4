//! HTTP API tests over in-memory adapters

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tower::ServiceExt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::TransitionPolicy;
use domain_users::User;
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{TestHarness, UserFixtures};

fn router(harness: &TestHarness) -> Router {
    let state = AppState::new(
        harness.lifecycle.clone(),
        harness.users.clone(),
        harness.hub.clone(),
        ApiConfig::default(),
    )
    .with_health_check(Arc::new(harness.user_directory.clone()))
    .with_health_check(Arc::new(harness.claim_store.clone()));
    create_router(state)
}

struct TestApp {
    harness: TestHarness,
    server: TestServer,
    alice: User,
    bob: User,
}

impl TestApp {
    async fn start() -> Self {
        Self::with_harness(TestHarness::new()).await
    }

    async fn with_harness(harness: TestHarness) -> Self {
        let alice = harness.provision(UserFixtures::alice()).await;
        let bob = harness.provision(UserFixtures::bob()).await;
        let server = TestServer::new(router(&harness)).unwrap();
        Self {
            harness,
            server,
            alice,
            bob,
        }
    }

    async fn submit(&self, description: &str, amount: f64) -> Value {
        let response = self
            .server
            .post("/api/claims")
            .json(&json!({
                "description": description,
                "claimAmount": amount,
                "userId": self.alice.id.as_uuid(),
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }
}

fn amount_of(body: &Value) -> Decimal {
    body["claimAmount"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_create_claim_returns_view() {
    let app = TestApp::start().await;

    let body = app.submit("Broken windshield", 1500.0).await;

    assert_eq!(body["status"], "pending");
    assert_eq!(amount_of(&body), dec!(1500));
    assert_eq!(body["userName"], "Alice Liddell");
    assert_eq!(body["userId"], json!(app.alice.id.as_uuid()));
    assert!(body["claimNumber"].as_str().unwrap().starts_with("CLM-"));
    assert!(body["reviewedById"].is_null());
    assert!(body["reviewedAt"].is_null());
}

#[tokio::test]
async fn test_non_positive_amount_is_unprocessable() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/claims")
        .json(&json!({
            "description": "Nothing happened",
            "claimAmount": 0,
            "userId": app.alice.id.as_uuid(),
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "claim amount must be greater than 0");
    assert!(app.harness.claim_store.is_empty().await);
}

#[tokio::test]
async fn test_high_precision_amount_is_returned_exactly() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/claims")
        .json(&json!({
            "description": "Fleet write-off",
            "claimAmount": "12345678901234567.89",
            "userId": app.alice.id.as_uuid(),
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>();
    assert_eq!(created["claimAmount"], "12345678901234567.89");

    let fetched = app
        .server
        .get(&format!("/api/claims/{}", created["id"].as_str().unwrap()))
        .await
        .json::<Value>();
    assert_eq!(fetched["claimAmount"], "12345678901234567.89");
}

#[tokio::test]
async fn test_missing_field_is_unprocessable() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/claims")
        .json(&json!({
            "description": "No amount given",
            "userId": app.alice.id.as_uuid(),
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].as_str().unwrap().contains("claimAmount"));
    assert!(app.harness.claim_store.is_empty().await);
}

#[tokio::test]
async fn test_review_without_admin_is_unprocessable() {
    let app = TestApp::start().await;
    let created = app.submit("Scratched bumper", 310.0).await;

    let response = app
        .server
        .put(&format!("/api/claims/{}/review", created["id"].as_str().unwrap()))
        .json(&json!({"status": "approved"}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["error"], "validation_error");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/claims")
        .bytes("{\"description\": ".into())
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "bad_request");
}

#[tokio::test]
async fn test_claim_for_unknown_user_is_not_found() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/claims")
        .json(&json!({
            "description": "Stolen bike",
            "claimAmount": 300,
            "userId": uuid::Uuid::new_v4(),
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_claim_by_id_and_number() {
    let app = TestApp::start().await;
    let created = app.submit("Hail damage", 820.5).await;
    let id = created["id"].as_str().unwrap();
    let number = created["claimNumber"].as_str().unwrap();

    let by_id = app.server.get(&format!("/api/claims/{}", id)).await;
    by_id.assert_status_ok();
    assert_eq!(by_id.json::<Value>()["claimNumber"], number);

    let prefixed = app.server.get(&format!("/api/claims/CLAIM-{}", id)).await;
    prefixed.assert_status_ok();

    let by_number = app.server.get(&format!("/api/claims/number/{}", number)).await;
    by_number.assert_status_ok();
    assert_eq!(by_number.json::<Value>()["id"], id);
}

#[tokio::test]
async fn test_unknown_claim_is_not_found() {
    let app = TestApp::start().await;

    let response = app
        .server
        .get(&format!("/api/claims/{}", uuid::Uuid::new_v4()))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"], "not_found");
}

#[tokio::test]
async fn test_invalid_claim_id_is_bad_request() {
    let app = TestApp::start().await;

    let response = app.server.get("/api/claims/not-a-uuid").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_review_updates_claim() {
    let app = TestApp::start().await;
    let created = app.submit("Flooded basement", 4200.0).await;

    let response = app
        .server
        .put(&format!("/api/claims/{}/review", created["id"].as_str().unwrap()))
        .json(&json!({
            "status": "APPROVED",
            "reviewComments": "Photos confirm damage",
            "adminId": app.bob.id.as_uuid(),
        }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["reviewedByName"], "Bob Admin");
    assert_eq!(body["reviewComments"], "Photos confirm damage");
    assert!(body["reviewedAt"].is_string());
}

#[tokio::test]
async fn test_non_admin_review_is_forbidden() {
    let app = TestApp::start().await;
    let created = app.submit("Cracked tile", 90.0).await;

    let response = app
        .server
        .put(&format!("/api/claims/{}/review", created["id"].as_str().unwrap()))
        .json(&json!({
            "status": "approved",
            "adminId": app.alice.id.as_uuid(),
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_strict_policy_rejects_reopening() {
    let app = TestApp::with_harness(TestHarness::with_policy(TransitionPolicy::Strict)).await;
    let created = app.submit("Dented door", 640.0).await;
    let path = format!("/api/claims/{}/review", created["id"].as_str().unwrap());

    app.server
        .put(&path)
        .json(&json!({"status": "rejected", "adminId": app.bob.id.as_uuid()}))
        .await
        .assert_status_ok();

    let reopen = app
        .server
        .put(&path)
        .json(&json!({"status": "pending", "adminId": app.bob.id.as_uuid()}))
        .await;

    reopen.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_listing_endpoints() {
    let app = TestApp::start().await;
    let first = app.submit("First", 100.0).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = app.submit("Second", 200.0).await;

    let all = app.server.get("/api/claims").await.json::<Vec<Value>>();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["id"], second["id"]);
    assert_eq!(all[1]["id"], first["id"]);

    let mine = app
        .server
        .get(&format!("/api/claims/user/{}", app.alice.id.as_uuid()))
        .await
        .json::<Vec<Value>>();
    assert_eq!(mine.len(), 2);

    let bobs = app
        .server
        .get(&format!("/api/claims/user/{}", app.bob.id.as_uuid()))
        .await
        .json::<Vec<Value>>();
    assert!(bobs.is_empty());

    let pending = app.server.get("/api/claims/status/PENDING").await.json::<Vec<Value>>();
    assert_eq!(pending.len(), 2);

    let approved = app.server.get("/api/claims/status/approved").await.json::<Vec<Value>>();
    assert!(approved.is_empty());

    app.server
        .get("/api/claims/status/lost")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .get(&format!("/api/claims/user/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_user_endpoints() {
    let app = TestApp::start().await;

    let created = app
        .server
        .post("/api/users")
        .json(&json!({
            "username": "dave",
            "email": "dave@example.com",
            "fullName": "Dave Lister",
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let dave = created.json::<Value>();
    assert_eq!(dave["role"], "regular");

    let by_id = app
        .server
        .get(&format!("/api/users/{}", dave["id"].as_str().unwrap()))
        .await;
    by_id.assert_status_ok();
    assert_eq!(by_id.json::<Value>()["username"], "dave");

    app.server
        .get("/api/users/username/dave")
        .await
        .assert_status_ok();
    app.server
        .get("/api/users/username/nobody")
        .await
        .assert_status_not_found();

    let admins = app.server.get("/api/users/role/ADMIN").await.json::<Vec<Value>>();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0]["username"], "bob");

    let everyone = app.server.get("/api/users").await.json::<Vec<Value>>();
    assert_eq!(everyone.len(), 3);

    app.server
        .get("/api/users/role/superuser")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/users")
        .json(&json!({
            "username": "alice",
            "email": "other@example.com",
            "fullName": "Another Alice",
            "role": "regular",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "conflict");
}

#[tokio::test]
async fn test_invalid_user_is_unprocessable() {
    let app = TestApp::start().await;

    let response = app
        .server
        .post("/api/users")
        .json(&json!({
            "username": "erin",
            "email": "not-an-email",
            "fullName": "Erin",
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_probes() {
    let app = TestApp::start().await;

    let live = app.server.get("/health").await;
    live.assert_status_ok();
    assert_eq!(live.json::<Value>()["status"], "healthy");

    let ready = app.server.get("/health/ready").await;
    ready.assert_status_ok();
    assert_eq!(ready.json::<Value>()["adapters"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = TestApp::start().await;

    let response = app.server.get("/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_admin_stream_requires_admin() {
    let app = TestApp::start().await;

    app.server
        .get("/api/notifications/admin")
        .add_query_param("adminId", app.alice.id.as_uuid())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .get(&format!("/api/notifications/user/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status_not_found();
}

async fn next_frame(body: Body) -> String {
    let mut frames = body.into_data_stream();
    let chunk = tokio::time::timeout(Duration::from_secs(2), frames.next())
        .await
        .expect("notification should arrive")
        .expect("stream should stay open")
        .unwrap();
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[tokio::test]
async fn test_user_stream_receives_creation_notice() {
    let harness = TestHarness::new();
    let alice = harness.provision(UserFixtures::alice()).await;
    let app = router(&harness);

    let stream = app
        .clone()
        .oneshot(
            Request::get(format!("/api/notifications/user/{}", alice.id.as_uuid()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    let view = harness
        .lifecycle
        .create_claim("Burst pipe".into(), dec!(980), alice.id)
        .await
        .unwrap();

    let frame = next_frame(stream.into_body()).await;
    assert!(frame.contains("event:"));
    assert!(frame.contains(&format!("Claim {} created successfully", view.claim_number)));
}

#[tokio::test]
async fn test_admin_stream_receives_submission_notice() {
    let harness = TestHarness::new();
    let alice = harness.provision(UserFixtures::alice()).await;
    let bob = harness.provision(UserFixtures::bob()).await;
    let app = router(&harness);

    let stream = app
        .oneshot(
            Request::get(format!("/api/notifications/admin?adminId={}", bob.id.as_uuid()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);

    let view = harness
        .lifecycle
        .create_claim("Fallen tree".into(), dec!(2500), alice.id)
        .await
        .unwrap();

    let frame = next_frame(stream.into_body()).await;
    assert!(frame.contains(&format!(
        "New claim {} submitted by Alice Liddell",
        view.claim_number
    )));
}
