mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use helpers::make_test_app;
use serde_json::{Value, json};
use serial_test::serial;

fn create(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/payments/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
#[serial]
async fn same_transaction_id_is_collapsed() {
    let app = make_test_app().await;
    let claim = json!({
        "plan": "live",
        "status": "completed",
        "amount": 4500,
        "userName": "Alice",
        "paymentMethod": "qr",
        "transactionId": "TX-77"
    });

    let (status, first) = app.send(create(claim.clone())).await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["data"]["duplicate"], false);
    assert_eq!(first["message"], "Payment data saved successfully");

    let (status, second) = app.send(create(claim)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["duplicate"], true);
    assert_eq!(second["data"]["paymentId"], first["data"]["paymentId"]);
}

#[tokio::test]
#[serial]
async fn repeated_claim_in_window_returns_same_payment() {
    let app = make_test_app().await;
    let claim = json!({ "plan": "code", "status": "completed", "amount": 2500, "userName": "Alice" });

    let (_, first) = app.send(create(claim.clone())).await;
    let (_, second) = app.send(create(claim)).await;
    assert_eq!(second["data"]["paymentId"], first["data"]["paymentId"]);
    assert_eq!(second["data"]["duplicate"], true);

    let (_, other_payer) = app
        .send(create(json!({ "plan": "code", "status": "completed", "amount": 2500, "userName": "Bob" })))
        .await;
    assert_ne!(other_payer["data"]["paymentId"], first["data"]["paymentId"]);
}

#[tokio::test]
#[serial]
async fn invalid_claim_lists_all_violations() {
    let app = make_test_app().await;

    let (status, json) = app
        .send(create(json!({ "plan": "platinum", "amount": -1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["amount", "plan", "status"]);
}

#[tokio::test]
#[serial]
async fn verify_applies_plan_coverage() {
    let app = make_test_app().await;

    let mut ids = Vec::new();
    for (plan, user) in [("code", "c"), ("live", "l"), ("mock", "m")] {
        let (_, json) = app
            .send(create(json!({ "plan": plan, "status": "completed", "amount": 1, "userName": user })))
            .await;
        ids.push(json["data"]["paymentId"].as_str().unwrap().to_string());
    }
    let (code, live, mock) = (&ids[0], &ids[1], &ids[2]);

    for id in [code, live, mock] {
        let (status, json) = app
            .send(get(&format!("/api/payments/verify?id={id}&plan=code")))
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["id"], id.as_str());
    }

    // `plan` defaults to live.
    let (status, json) = app.send(get(&format!("/api/payments/verify?id={code}"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["success"], false);

    let (status, json) = app.send(get(&format!("/api/payments/verify?id={mock}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["plan"], "mock");
    assert_eq!(json["data"]["userName"], "m");
}

#[tokio::test]
#[serial]
async fn verify_rejects_bad_queries() {
    let app = make_test_app().await;

    let (status, json) = app.send(get("/api/payments/verify")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Payment ID is required");

    let (status, _) = app.send(get("/api/payments/verify?id=abc&plan=gold")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app.send(get("/api/payments/verify?id=unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Payment not found");
}

#[tokio::test]
#[serial]
async fn details_returns_receipt_fields() {
    let app = make_test_app().await;
    let (_, created) = app
        .send(create(json!({
            "plan": "code",
            "status": "completed",
            "amount": 2500,
            "userName": "Alice",
            "transactionId": "TX-5",
            "paymentDate": "2025-10-19T09:30:00Z"
        })))
        .await;
    let id = created["data"]["paymentId"].as_str().unwrap();

    let (status, json) = app.send(get(&format!("/api/payments/details?id={id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["transactionId"], "TX-5");
    assert_eq!(data["amount"], 2500.0);
    assert_eq!(data["plan"], "code");
    assert_eq!(data["status"], "completed");
    assert_eq!(data["userName"], "Alice");
    assert!(data["paymentDate"].as_str().unwrap().starts_with("2025-10-19T09:30:00"));

    let (status, _) = app.send(get("/api/payments/details")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.send(get("/api/payments/details?id=nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
